//! # Effect Resolver
//!
//! 将文档中的 `Interaction` + 所属 `Element` 解析为 `ResolvedEffect`。
//!
//! 这是文档效果 → 可执行效果的**唯一转换入口**。
//! 默认值填充、数值校验、"以目标为中心"的定位都在这里完成；
//! 所有坐标换算都委托给 [`crate::position`]。
//!
//! 解析永不失败：参数问题用默认值修复，类型未知或目标缺失时返回无操作效果，
//! 问题本身以 [`EngineWarning`] 的形式随结果返回。

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::registry::{Easing, EffectKind, defaults};
use crate::config::EngineConfig;
use crate::deck::{Element, Interaction, SlideDeck};
use crate::effect::{
    EffectParams, PanZoomParams, SlideDirection, SoundParams, SpotlightParams, SpotlightShape,
    TextDisplayMode, TooltipParams, TransitionParams, coerce_ms, is_invalid_ms,
};
use crate::error::EngineWarning;
use crate::position::{self, ContainerBounds, DeviceClass, PercentPoint};

/// 解析上下文
///
/// 由调用方（通常是 `TimelineScheduler`）提供当前渲染环境。
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// 整个文档（用于查找目标元素 / 目标幻灯片）
    pub deck: &'a SlideDeck,
    /// 触发元素所在幻灯片
    pub slide_index: usize,
    /// 当前设备类别
    pub device: DeviceClass,
    /// 当前容器尺寸
    pub bounds: ContainerBounds,
    /// 引擎配置
    pub config: &'a EngineConfig,
}

/// 效果来源
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectSource {
    pub slide_index: usize,
    pub element_id: String,
    pub interaction_id: String,
}

/// 无操作的原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NoopReason {
    /// 效果类型不在已知集合内
    Unsupported { kind: String },
    /// 引用的目标元素 / 幻灯片不存在
    MissingTarget { target_id: String },
}

/// 自动关闭策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoDismiss {
    /// 激活后指定毫秒关闭
    After(u64),
    /// 只能被显式关闭
    Never,
    /// 音频播放结束时关闭；时长未知时按兜底时长
    OnMediaEnd { fallback_ms: u64 },
    /// 激活后立即结束（无生命周期）
    Immediate,
}

/// 解析后的效果参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResolvedKind {
    Spotlight {
        shape: SpotlightShape,
        dim_percentage: f64,
        /// 光圈中心（百分比）
        center: PercentPoint,
        /// 光圈宽度（像素）
        width: f64,
        /// 光圈高度（像素）
        height: f64,
        /// 解析时的容器尺寸（执行器据此计算像素几何）
        bounds: ContainerBounds,
        message: Option<String>,
    },
    PanZoom {
        target: PercentPoint,
        zoom_level: f64,
        smooth: bool,
    },
    ShowText {
        text: String,
        display_mode: TextDisplayMode,
        font_size: f64,
        auto_close: bool,
        position: Option<PercentPoint>,
    },
    Modal {
        title: String,
        message: String,
    },
    Tooltip {
        text: String,
        anchor: PercentPoint,
    },
    Sound {
        url: String,
        volume: f64,
    },
    Transition {
        /// 目标幻灯片索引
        slide_index: usize,
    },
    Noop {
        reason: NoopReason,
    },
}

/// 解析后的效果
///
/// 所有数值均为有限非负数，可直接执行。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEffect {
    pub kind: ResolvedKind,
    /// 持续时间（毫秒）
    pub duration_ms: u64,
    /// 延迟（毫秒）
    pub delay_ms: u64,
    pub easing: Easing,
    pub dismiss: AutoDismiss,
    pub source: EffectSource,
}

impl ResolvedEffect {
    /// 无操作效果
    pub fn noop(source: EffectSource, reason: NoopReason) -> Self {
        Self {
            kind: ResolvedKind::Noop { reason },
            duration_ms: 0,
            delay_ms: 0,
            easing: Easing::default(),
            dismiss: AutoDismiss::Immediate,
            source,
        }
    }

    /// 效果类型标签
    pub fn effect_kind(&self) -> EffectKind {
        match self.kind {
            ResolvedKind::Spotlight { .. } => EffectKind::Spotlight,
            ResolvedKind::PanZoom { .. } => EffectKind::PanZoom,
            ResolvedKind::ShowText { .. } => EffectKind::ShowText,
            ResolvedKind::Modal { .. } => EffectKind::Modal,
            ResolvedKind::Tooltip { .. } => EffectKind::Tooltip,
            ResolvedKind::Sound { .. } => EffectKind::Sound,
            ResolvedKind::Transition { .. } => EffectKind::Transition,
            ResolvedKind::Noop { .. } => EffectKind::Noop,
        }
    }

    /// 是否为无操作效果
    pub fn is_noop(&self) -> bool {
        matches!(self.kind, ResolvedKind::Noop { .. })
    }

    /// 该效果在时间轴上占用的时长：延迟 + 持续时间
    pub fn step_span_ms(&self) -> u64 {
        self.delay_ms.saturating_add(self.duration_ms)
    }
}

/// 解析结果
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub effect: ResolvedEffect,
    /// 解析过程中发现的问题（均已修复或降级）
    pub warnings: Vec<EngineWarning>,
}

/// 将交互解析为可执行效果
///
/// ## 默认值
///
/// | 类型 | 默认 | 自动关闭 |
/// |------|------|----------|
/// | spotlight | circle, dim=70 | 持续时间后（未指定为 5000ms） |
/// | pan_zoom | zoom=2.0, smooth | 持续时间 + 3000ms |
/// | show_text | modal, 16px | 仅 `auto_close` 时 |
/// | modal | 标题=元素标题或 "Information" | 仅显式关闭 |
/// | tooltip | 锚定触发元素 | 固定 3000ms |
/// | sound | volume=0.7 | 音频结束或取消 |
/// | transition | 下一张 | 立即 |
pub fn resolve(interaction: &Interaction, element: &Element, ctx: &ResolveContext<'_>) -> Resolution {
    let source = EffectSource {
        slide_index: ctx.slide_index,
        element_id: element.id.clone(),
        interaction_id: interaction.id.clone(),
    };
    let mut checker = ParamChecker::new(&interaction.id);
    let effect = &interaction.effect;
    let kind_tag = EffectKind::of(&effect.params);

    // 解析时丢弃的坏字段，一律按默认值处理
    for param in &effect.malformed {
        checker.report(param, "默认值");
    }

    // 公共字段
    if is_invalid_ms(effect.duration) {
        checker.report("duration", "0");
    }
    if is_invalid_ms(effect.delay) {
        checker.report("delay", "0");
    }
    let duration_ms = coerce_ms(effect.duration).unwrap_or_else(|| kind_tag.default_duration_ms());
    let delay_ms = effect.delay_ms();
    let easing = match effect.easing.as_deref() {
        None => Easing::default(),
        Some(id) => Easing::parse(id).unwrap_or_else(|| {
            checker.report("easing", "ease_in_out");
            Easing::default()
        }),
    };

    let base = |kind: ResolvedKind, dismiss: AutoDismiss| ResolvedEffect {
        kind,
        duration_ms,
        delay_ms,
        easing,
        dismiss,
        source: source.clone(),
    };

    let outcome = match &effect.params {
        EffectParams::Spotlight(params) => {
            resolve_spotlight(params, element, ctx, &mut checker).map(|kind| {
                base(kind, AutoDismiss::After(delay_ms.saturating_add(duration_ms)))
            })
        }

        EffectParams::PanZoom(params) => resolve_pan_zoom(params, element, ctx, &mut checker)
            .map(|kind| {
                base(
                    kind,
                    AutoDismiss::After(
                        delay_ms
                            .saturating_add(duration_ms)
                            .saturating_add(defaults::PAN_ZOOM_GRACE_MS),
                    ),
                )
            }),

        EffectParams::ShowText(params) => {
            let auto_close = params.auto_close.unwrap_or(false);
            let font_size = checker.number(
                "font_size",
                params.font_size,
                defaults::FONT_SIZE,
                1.0..=512.0,
            );
            let dismiss = if auto_close {
                AutoDismiss::After(
                    delay_ms
                        .saturating_add(duration_ms)
                        .saturating_add(ctx.config.text_auto_close_ms),
                )
            } else {
                AutoDismiss::Never
            };
            Ok(base(
                ResolvedKind::ShowText {
                    text: params.text.clone().unwrap_or_default(),
                    display_mode: params.display_mode.unwrap_or_default(),
                    font_size,
                    auto_close,
                    position: params.position.map(PercentPoint::clamped),
                },
                dismiss,
            ))
        }

        EffectParams::Modal(params) => {
            let title = params
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .or_else(|| element.title.clone().filter(|t| !t.is_empty()))
                .unwrap_or_else(|| defaults::MODAL_TITLE.to_string());
            Ok(base(
                ResolvedKind::Modal {
                    title,
                    message: params.message.clone().unwrap_or_default(),
                },
                AutoDismiss::Never,
            ))
        }

        EffectParams::Tooltip(params) => resolve_tooltip(params, element, ctx, &interaction.id).map(|kind| {
            base(
                kind,
                AutoDismiss::After(delay_ms.saturating_add(defaults::TOOLTIP_DISMISS_MS)),
            )
        }),

        EffectParams::Sound(params) => {
            let kind = resolve_sound(params, &mut checker);
            let window = coerce_ms(effect.duration).unwrap_or(ctx.config.sound_fallback_ms);
            Ok(base(
                kind,
                AutoDismiss::OnMediaEnd {
                    fallback_ms: delay_ms.saturating_add(window),
                },
            ))
        }

        EffectParams::Transition(params) => {
            resolve_transition(params, element, ctx, &interaction.id).map(|kind| base(kind, AutoDismiss::Immediate))
        }

        EffectParams::Unsupported { kind } => Err(Degraded {
            reason: NoopReason::Unsupported { kind: kind.clone() },
            warning: EngineWarning::UnsupportedEffect {
                element_id: element.id.clone(),
                interaction_id: interaction.id.clone(),
                kind: kind.clone(),
            },
        }),
    };

    let mut warnings = checker.warnings;
    let effect = match outcome {
        Ok(effect) => effect,
        Err(degraded) => {
            tracing::warn!(
                element = %element.id,
                interaction = %interaction.id,
                warning = %degraded.warning,
                "效果降级为无操作"
            );
            warnings.push(degraded.warning);
            ResolvedEffect::noop(source, degraded.reason)
        }
    };

    Resolution { effect, warnings }
}

/// 降级为无操作的原因
struct Degraded {
    reason: NoopReason,
    warning: EngineWarning,
}

impl Degraded {
    fn missing_target(element: &Element, interaction_id: &str, target_id: &str) -> Self {
        Self {
            reason: NoopReason::MissingTarget {
                target_id: target_id.to_string(),
            },
            warning: EngineWarning::MissingTarget {
                element_id: element.id.clone(),
                interaction_id: interaction_id.to_string(),
                target_id: target_id.to_string(),
            },
        }
    }
}

/// 找出效果真正作用的元素：`target_id` 指向的元素，或触发元素本身
fn focus_element<'a>(
    target_id: Option<&str>,
    element: &'a Element,
    ctx: &ResolveContext<'a>,
    interaction_id: &str,
) -> Result<&'a Element, Degraded> {
    let Some(target_id) = target_id else {
        return Ok(element);
    };
    ctx.deck
        .slide(ctx.slide_index)
        .and_then(|slide| slide.find_element(target_id))
        .ok_or_else(|| Degraded::missing_target(element, interaction_id, target_id))
}

/// 元素视觉中心（百分比）
fn percent_center(element: &Element, ctx: &ResolveContext<'_>) -> PercentPoint {
    position::to_percentage(position::center_of(element, ctx.device), ctx.bounds)
}

fn resolve_spotlight(
    params: &SpotlightParams,
    element: &Element,
    ctx: &ResolveContext<'_>,
    checker: &mut ParamChecker<'_>,
) -> Result<ResolvedKind, Degraded> {
    let focus = focus_element(params.target_id.as_deref(), element, ctx, checker.interaction_id)?;
    let center = match params.position {
        Some(p) => p.clamped(),
        None => percent_center(focus, ctx),
    };

    let rendered = position::rendered_rect(focus, ctx.device);
    let padding = defaults::SPOTLIGHT_PADDING_PX * 2.0;
    let width = checker
        .dimension("width", params.width)
        .unwrap_or(rendered.width + padding);
    let height = checker
        .dimension("height", params.height)
        .unwrap_or(rendered.height + padding);

    Ok(ResolvedKind::Spotlight {
        shape: params.shape.unwrap_or_default(),
        dim_percentage: checker.number(
            "dim_percentage",
            params.dim_percentage,
            defaults::SPOTLIGHT_DIM_PERCENTAGE,
            0.0..=100.0,
        ),
        center,
        width,
        height,
        bounds: ctx.bounds,
        message: params.message.clone(),
    })
}

fn resolve_pan_zoom(
    params: &PanZoomParams,
    element: &Element,
    ctx: &ResolveContext<'_>,
    checker: &mut ParamChecker<'_>,
) -> Result<ResolvedKind, Degraded> {
    let target = match params.target {
        Some(p) => p.clamped(),
        None => {
            let focus =
                focus_element(params.target_id.as_deref(), element, ctx, checker.interaction_id)?;
            percent_center(focus, ctx)
        }
    };
    Ok(ResolvedKind::PanZoom {
        target,
        zoom_level: checker.number(
            "zoom_level",
            params.zoom_level,
            defaults::ZOOM_LEVEL,
            0.1..=defaults::MAX_ZOOM_LEVEL,
        ),
        smooth: params.smooth.unwrap_or(true),
    })
}

fn resolve_tooltip(
    params: &TooltipParams,
    element: &Element,
    ctx: &ResolveContext<'_>,
    interaction_id: &str,
) -> Result<ResolvedKind, Degraded> {
    let anchor = match params.anchor {
        Some(p) => p.clamped(),
        None => {
            let focus = focus_element(params.target_id.as_deref(), element, ctx, interaction_id)?;
            percent_center(focus, ctx)
        }
    };
    Ok(ResolvedKind::Tooltip {
        text: params.text.clone().unwrap_or_default(),
        anchor,
    })
}

fn resolve_sound(params: &SoundParams, checker: &mut ParamChecker<'_>) -> ResolvedKind {
    let url = params.url.clone().unwrap_or_default();
    if url.is_empty() {
        checker.report("url", "静音");
    }
    ResolvedKind::Sound {
        url,
        volume: checker.number("volume", params.volume, defaults::SOUND_VOLUME, 0.0..=1.0),
    }
}

fn resolve_transition(
    params: &TransitionParams,
    element: &Element,
    ctx: &ResolveContext<'_>,
    interaction_id: &str,
) -> Result<ResolvedKind, Degraded> {
    let last = ctx.deck.len().saturating_sub(1);
    let slide_index = match (&params.target_slide_id, params.direction) {
        (Some(id), _) => ctx
            .deck
            .slide_index_of(id)
            .ok_or_else(|| Degraded::missing_target(element, interaction_id, id))?,
        (None, Some(SlideDirection::Previous)) => ctx.slide_index.saturating_sub(1),
        (None, Some(SlideDirection::First)) => 0,
        (None, Some(SlideDirection::Last)) => last,
        (None, Some(SlideDirection::Next) | None) => (ctx.slide_index + 1).min(last),
    };
    Ok(ResolvedKind::Transition { slide_index })
}

/// 数值参数校验器
///
/// 非法值替换为默认值，并记录一条 `InvalidParameter` 警告。
struct ParamChecker<'a> {
    interaction_id: &'a str,
    warnings: Vec<EngineWarning>,
}

impl<'a> ParamChecker<'a> {
    fn new(interaction_id: &'a str) -> Self {
        Self {
            interaction_id,
            warnings: Vec::new(),
        }
    }

    fn report(&mut self, param: &str, fallback: &str) {
        tracing::debug!(
            interaction = self.interaction_id,
            param,
            fallback,
            "参数无效，使用默认值"
        );
        self.warnings.push(EngineWarning::InvalidParameter {
            interaction_id: self.interaction_id.to_string(),
            param: param.to_string(),
            fallback: fallback.to_string(),
        });
    }

    /// 未设置 → 默认值；非有限或越界 → 默认值 + 警告
    fn number(
        &mut self,
        param: &str,
        value: Option<f64>,
        default: f64,
        range: RangeInclusive<f64>,
    ) -> f64 {
        match value {
            None => default,
            Some(v) if v.is_finite() && range.contains(&v) => v,
            Some(_) => {
                self.report(param, &default.to_string());
                default
            }
        }
    }

    /// 像素尺寸：必须是有限正数，否则视为未设置
    fn dimension(&mut self, param: &str, value: Option<f64>) -> Option<f64> {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => Some(v),
            Some(_) => {
                self.report(param, "目标渲染尺寸");
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{HotspotSize, Slide};
    use crate::effect::{Effect, ModalParams, ShowTextParams};
    use crate::position::Rect;

    fn deck_with(elements: Vec<Element>) -> SlideDeck {
        SlideDeck::new(
            "deck",
            vec![
                Slide::new("s0", elements),
                Slide::new("s1", vec![]),
                Slide::new("s2", vec![]),
            ],
        )
    }

    fn ctx<'a>(deck: &'a SlideDeck, config: &'a EngineConfig) -> ResolveContext<'a> {
        ResolveContext {
            deck,
            slide_index: 0,
            device: DeviceClass::Desktop,
            bounds: ContainerBounds::new(800.0, 600.0),
            config,
        }
    }

    fn resolve_on_first(deck: &SlideDeck, config: &EngineConfig) -> Resolution {
        let element = &deck.slides[0].elements[0];
        let interaction = &element.interactions[0];
        resolve(interaction, element, &ctx(deck, config))
    }

    fn hotspot_with(effect: Effect) -> Element {
        Element::hotspot_at("hs1", Rect::new(100.0, 100.0, 40.0, 40.0))
            .with_interaction(Interaction::timeline("i1", effect))
    }

    // ========== 聚光灯 ==========

    #[test]
    fn test_spotlight_centers_on_hotspot() {
        let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::Spotlight(
            SpotlightParams::default(),
        )))]);
        let config = EngineConfig::default();
        let resolution = resolve_on_first(&deck, &config);

        assert!(resolution.warnings.is_empty());
        match &resolution.effect.kind {
            ResolvedKind::Spotlight {
                shape,
                dim_percentage,
                center,
                width,
                ..
            } => {
                assert_eq!(*shape, SpotlightShape::Circle);
                assert_eq!(*dim_percentage, 70.0);
                assert_eq!(*center, PercentPoint::new(15.0, 20.0));
                assert_eq!(*width, 40.0 + defaults::SPOTLIGHT_PADDING_PX * 2.0);
            }
            other => panic!("Expected Spotlight, got {:?}", other),
        }
        assert_eq!(resolution.effect.duration_ms, 5000);
        assert_eq!(resolution.effect.dismiss, AutoDismiss::After(5000));
    }

    #[test]
    fn test_spotlight_explicit_position_and_duration() {
        let params = SpotlightParams {
            position: Some(PercentPoint::new(120.0, 30.0)),
            dim_percentage: Some(40.0),
            ..SpotlightParams::default()
        };
        let deck = deck_with(vec![hotspot_with(
            Effect::new(EffectParams::Spotlight(params))
                .with_duration(800.0)
                .with_delay(200.0),
        )]);
        let config = EngineConfig::default();
        let effect = resolve_on_first(&deck, &config).effect;

        match &effect.kind {
            ResolvedKind::Spotlight {
                center,
                dim_percentage,
                ..
            } => {
                assert_eq!(*center, PercentPoint::new(100.0, 30.0));
                assert_eq!(*dim_percentage, 40.0);
            }
            other => panic!("Expected Spotlight, got {:?}", other),
        }
        assert_eq!(effect.dismiss, AutoDismiss::After(1000));
        assert_eq!(effect.step_span_ms(), 1000);
    }

    #[test]
    fn test_spotlight_target_element() {
        let params = SpotlightParams {
            target_id: Some("box".to_string()),
            ..SpotlightParams::default()
        };
        let deck = deck_with(vec![
            hotspot_with(Effect::new(EffectParams::Spotlight(params))),
            Element::shape(
                "box",
                crate::position::ResponsivePosition::uniform(Rect::new(400.0, 300.0, 80.0, 60.0)),
            ),
        ]);
        let config = EngineConfig::default();
        let effect = resolve_on_first(&deck, &config).effect;

        match &effect.kind {
            ResolvedKind::Spotlight { center, height, .. } => {
                assert_eq!(*center, PercentPoint::new(55.0, 55.0));
                assert_eq!(*height, 60.0 + defaults::SPOTLIGHT_PADDING_PX * 2.0);
            }
            other => panic!("Expected Spotlight, got {:?}", other),
        }
    }

    #[test]
    fn test_spotlight_missing_target_is_noop() {
        let params = SpotlightParams {
            target_id: Some("gone".to_string()),
            ..SpotlightParams::default()
        };
        let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::Spotlight(params)))]);
        let config = EngineConfig::default();
        let resolution = resolve_on_first(&deck, &config);

        assert_eq!(
            resolution.effect.kind,
            ResolvedKind::Noop {
                reason: NoopReason::MissingTarget {
                    target_id: "gone".to_string()
                }
            }
        );
        assert_eq!(resolution.effect.dismiss, AutoDismiss::Immediate);
        assert!(matches!(
            &resolution.warnings[..],
            [EngineWarning::MissingTarget { target_id, .. }] if target_id == "gone"
        ));
    }

    #[test]
    fn test_spotlight_invalid_dim_falls_back() {
        let params = SpotlightParams {
            dim_percentage: Some(f64::NAN),
            ..SpotlightParams::default()
        };
        let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::Spotlight(params)))]);
        let config = EngineConfig::default();
        let resolution = resolve_on_first(&deck, &config);

        assert!(matches!(
            resolution.effect.kind,
            ResolvedKind::Spotlight { dim_percentage, .. } if dim_percentage == 70.0
        ));
        assert_eq!(resolution.warnings.len(), 1);
    }

    #[test]
    fn test_spotlight_bad_shape_in_document_falls_back_to_circle() {
        let effect: Effect = serde_json::from_str(
            r#"{ "params": { "type": "spotlight", "shape": "hexagon" }, "duration": 800 }"#,
        )
        .unwrap();
        let deck = deck_with(vec![hotspot_with(effect)]);
        let config = EngineConfig::default();
        let resolution = resolve_on_first(&deck, &config);

        assert!(matches!(
            resolution.effect.kind,
            ResolvedKind::Spotlight {
                shape: SpotlightShape::Circle,
                ..
            }
        ));
        assert_eq!(resolution.effect.duration_ms, 800);
        assert!(matches!(
            resolution.warnings.as_slice(),
            [EngineWarning::InvalidParameter { param, .. }] if param == "shape"
        ));
    }

    #[test]
    fn test_spotlight_zero_bounds_no_nan() {
        let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::Spotlight(
            SpotlightParams::default(),
        )))]);
        let config = EngineConfig::default();
        let element = &deck.slides[0].elements[0];
        let mut context = ctx(&deck, &config);
        context.bounds = ContainerBounds::new(0.0, 0.0);
        let effect = resolve(&element.interactions[0], element, &context).effect;

        match effect.kind {
            ResolvedKind::Spotlight { center, .. } => {
                assert_eq!(center, PercentPoint::new(0.0, 0.0));
            }
            other => panic!("Expected Spotlight, got {:?}", other),
        }
    }

    // ========== 平移缩放 ==========

    #[test]
    fn test_pan_zoom_defaults() {
        let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::PanZoom(
            PanZoomParams::default(),
        )))]);
        let config = EngineConfig::default();
        let effect = resolve_on_first(&deck, &config).effect;

        assert_eq!(
            effect.kind,
            ResolvedKind::PanZoom {
                target: PercentPoint::new(15.0, 20.0),
                zoom_level: 2.0,
                smooth: true,
            }
        );
        assert_eq!(effect.duration_ms, 1000);
        assert_eq!(effect.dismiss, AutoDismiss::After(4000));
    }

    #[test]
    fn test_pan_zoom_out_of_range_zoom() {
        let params = PanZoomParams {
            zoom_level: Some(-3.0),
            target: Some(PercentPoint::new(50.0, 50.0)),
            ..PanZoomParams::default()
        };
        let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::PanZoom(params)))]);
        let config = EngineConfig::default();
        let resolution = resolve_on_first(&deck, &config);

        assert!(matches!(
            resolution.effect.kind,
            ResolvedKind::PanZoom { zoom_level, .. } if zoom_level == 2.0
        ));
        assert!(matches!(
            &resolution.warnings[..],
            [EngineWarning::InvalidParameter { param, .. }] if param == "zoom_level"
        ));
    }

    // ========== 文本 / 模态框 / 提示 ==========

    #[test]
    fn test_show_text_persists_without_auto_close() {
        let params = ShowTextParams {
            text: Some("hello".to_string()),
            ..ShowTextParams::default()
        };
        let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::ShowText(params)))]);
        let config = EngineConfig::default();
        let effect = resolve_on_first(&deck, &config).effect;

        assert_eq!(effect.duration_ms, 500);
        assert_eq!(effect.dismiss, AutoDismiss::Never);
        assert!(matches!(
            effect.kind,
            ResolvedKind::ShowText { display_mode: TextDisplayMode::Modal, font_size, .. } if font_size == 16.0
        ));
    }

    #[test]
    fn test_show_text_auto_close() {
        let params = ShowTextParams {
            auto_close: Some(true),
            ..ShowTextParams::default()
        };
        let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::ShowText(params)))]);
        let config = EngineConfig::default();
        let effect = resolve_on_first(&deck, &config).effect;

        assert_eq!(
            effect.dismiss,
            AutoDismiss::After(500 + config.text_auto_close_ms)
        );
    }

    #[test]
    fn test_modal_title_defaults() {
        let config = EngineConfig::default();

        let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::Modal(
            ModalParams::default(),
        )))]);
        let effect = resolve_on_first(&deck, &config).effect;
        assert!(matches!(&effect.kind, ResolvedKind::Modal { title, .. } if title == "Information"));
        assert_eq!(effect.dismiss, AutoDismiss::Never);

        let titled = hotspot_with(Effect::new(EffectParams::Modal(ModalParams::default())))
            .with_title("Engine room");
        let deck = deck_with(vec![titled]);
        let effect = resolve_on_first(&deck, &config).effect;
        assert!(matches!(&effect.kind, ResolvedKind::Modal { title, .. } if title == "Engine room"));
    }

    #[test]
    fn test_tooltip_fixed_window() {
        let deck = deck_with(vec![hotspot_with(
            Effect::new(EffectParams::Tooltip(TooltipParams::default())).with_duration(10_000.0),
        )]);
        let config = EngineConfig::default();
        let effect = resolve_on_first(&deck, &config).effect;

        assert_eq!(effect.dismiss, AutoDismiss::After(3000));
        assert!(matches!(
            effect.kind,
            ResolvedKind::Tooltip { anchor, .. } if anchor == PercentPoint::new(15.0, 20.0)
        ));
    }

    #[test]
    fn test_large_hotspot_center() {
        let element = Element::hotspot_at("hs1", Rect::new(100.0, 100.0, 40.0, 40.0))
            .with_size(HotspotSize::Large)
            .with_interaction(Interaction::timeline(
                "i1",
                Effect::new(EffectParams::Tooltip(TooltipParams::default())),
            ));
        let deck = deck_with(vec![element]);
        let config = EngineConfig::default();
        let effect = resolve_on_first(&deck, &config).effect;

        // 直径 56 → 中心 128
        assert!(matches!(
            effect.kind,
            ResolvedKind::Tooltip { anchor, .. } if anchor == PercentPoint::new(16.0, 128.0 * 100.0 / 600.0)
        ));
    }

    // ========== 声音 ==========

    #[test]
    fn test_sound_defaults() {
        let params = SoundParams {
            url: Some("chime.mp3".to_string()),
            volume: None,
        };
        let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::Sound(params)))]);
        let config = EngineConfig::default();
        let effect = resolve_on_first(&deck, &config).effect;

        assert_eq!(
            effect.kind,
            ResolvedKind::Sound {
                url: "chime.mp3".to_string(),
                volume: 0.7,
            }
        );
        assert_eq!(
            effect.dismiss,
            AutoDismiss::OnMediaEnd {
                fallback_ms: config.sound_fallback_ms
            }
        );
    }

    #[test]
    fn test_sound_missing_url_reported() {
        let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::Sound(
            SoundParams::default(),
        )))]);
        let config = EngineConfig::default();
        let resolution = resolve_on_first(&deck, &config);

        assert!(matches!(
            &resolution.warnings[..],
            [EngineWarning::InvalidParameter { param, .. }] if param == "url"
        ));
    }

    // ========== 切换 ==========

    #[test]
    fn test_transition_targets() {
        let config = EngineConfig::default();
        let cases = [
            (TransitionParams::default(), Some(1)),
            (
                TransitionParams {
                    direction: Some(SlideDirection::Last),
                    ..TransitionParams::default()
                },
                Some(2),
            ),
            (
                TransitionParams {
                    direction: Some(SlideDirection::Previous),
                    ..TransitionParams::default()
                },
                Some(0),
            ),
            (
                TransitionParams {
                    target_slide_id: Some("s2".to_string()),
                    direction: Some(SlideDirection::First),
                },
                Some(2),
            ),
            (
                TransitionParams {
                    target_slide_id: Some("nope".to_string()),
                    direction: None,
                },
                None,
            ),
        ];

        for (params, expected) in cases {
            let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::Transition(
                params,
            )))]);
            let effect = resolve_on_first(&deck, &config).effect;
            match expected {
                Some(index) => {
                    assert_eq!(effect.kind, ResolvedKind::Transition { slide_index: index });
                    assert_eq!(effect.dismiss, AutoDismiss::Immediate);
                }
                None => assert!(effect.is_noop()),
            }
        }
    }

    // ========== 公共字段 ==========

    #[test]
    fn test_unsupported_kind_is_noop() {
        let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::Unsupported {
            kind: "glow".to_string(),
        }))]);
        let config = EngineConfig::default();
        let resolution = resolve_on_first(&deck, &config);

        assert_eq!(
            resolution.effect.kind,
            ResolvedKind::Noop {
                reason: NoopReason::Unsupported {
                    kind: "glow".to_string()
                }
            }
        );
        assert_eq!(resolution.effect.effect_kind(), EffectKind::Noop);
        assert!(matches!(
            &resolution.warnings[..],
            [EngineWarning::UnsupportedEffect { kind, .. }] if kind == "glow"
        ));
    }

    #[test]
    fn test_invalid_duration_and_delay_coerced_to_zero() {
        let deck = deck_with(vec![hotspot_with(
            Effect::new(EffectParams::Modal(ModalParams::default()))
                .with_duration(f64::NAN)
                .with_delay(-20.0)
                .with_easing("wobble"),
        )]);
        let config = EngineConfig::default();
        let resolution = resolve_on_first(&deck, &config);

        assert_eq!(resolution.effect.duration_ms, 0);
        assert_eq!(resolution.effect.delay_ms, 0);
        assert_eq!(resolution.effect.easing, Easing::EaseInOut);
        assert_eq!(resolution.warnings.len(), 3);
    }

    #[test]
    fn test_source_recorded() {
        let deck = deck_with(vec![hotspot_with(Effect::new(EffectParams::Modal(
            ModalParams::default(),
        )))]);
        let config = EngineConfig::default();
        let effect = resolve_on_first(&deck, &config).effect;

        assert_eq!(
            effect.source,
            EffectSource {
                slide_index: 0,
                element_id: "hs1".to_string(),
                interaction_id: "i1".to_string(),
            }
        );
    }
}
