//! # Effect Registry
//!
//! 效果类型、并发策略、缓动标识与默认参数。
//! 这是所有效果默认值的**唯一来源**。

use serde::{Deserialize, Serialize};

use crate::effect::EffectParams;

/// 效果类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Spotlight,
    PanZoom,
    ShowText,
    Modal,
    Tooltip,
    Sound,
    Transition,
    /// 无操作（不支持的类型、目标缺失）
    Noop,
}

/// 同类效果的并发策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyPolicy {
    /// 每张幻灯片同类只保留一个，新的顶掉旧的
    Exclusive,
    /// 可同时存在多个，各自计时
    Independent,
}

impl EffectKind {
    /// 文档参数对应的类型；不认识的类型归为 `Noop`
    pub fn of(params: &EffectParams) -> Self {
        match params {
            EffectParams::Spotlight(_) => Self::Spotlight,
            EffectParams::PanZoom(_) => Self::PanZoom,
            EffectParams::ShowText(_) => Self::ShowText,
            EffectParams::Modal(_) => Self::Modal,
            EffectParams::Tooltip(_) => Self::Tooltip,
            EffectParams::Sound(_) => Self::Sound,
            EffectParams::Transition(_) => Self::Transition,
            EffectParams::Unsupported { .. } => Self::Noop,
        }
    }

    /// 并发策略
    ///
    /// 画面同一时刻只能聚焦 / 缩放到一个目标，模态框也只能有一个，这三类互斥。
    pub fn concurrency(&self) -> ConcurrencyPolicy {
        match self {
            Self::Spotlight | Self::Modal | Self::PanZoom => ConcurrencyPolicy::Exclusive,
            Self::ShowText | Self::Tooltip | Self::Sound | Self::Transition | Self::Noop => {
                ConcurrencyPolicy::Independent
            }
        }
    }

    /// 默认持续时间（毫秒）
    pub fn default_duration_ms(&self) -> u64 {
        match self {
            Self::Spotlight => defaults::SPOTLIGHT_DURATION_MS,
            Self::PanZoom => defaults::PAN_ZOOM_DURATION_MS,
            Self::ShowText | Self::Modal | Self::Tooltip | Self::Sound => {
                defaults::CONTENT_DURATION_MS
            }
            Self::Transition | Self::Noop => 0,
        }
    }
}

/// 缓动函数标识
///
/// 引擎只负责识别并透传，插值由渲染层完成。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Easing {
    /// 解析缓动标识（不区分大小写，忽略 `-` / `_`）
    ///
    /// `ease-in-out`、`easeInOut`、`ease_in_out` 都能识别。
    pub fn parse(identifier: &str) -> Option<Self> {
        let normalized: String = identifier
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "linear" => Some(Self::Linear),
            "easein" => Some(Self::EaseIn),
            "easeout" => Some(Self::EaseOut),
            "easeinout" | "ease" => Some(Self::EaseInOut),
            _ => None,
        }
    }
}

/// 各效果的默认参数
///
/// 任何需要默认值的地方都应使用这些常量，而非硬编码数字。
pub mod defaults {
    /// 内容类效果（文本 / 模态框 / 提示 / 声音）默认时长
    pub const CONTENT_DURATION_MS: u64 = 500;
    /// 平移缩放默认时长
    pub const PAN_ZOOM_DURATION_MS: u64 = 1000;
    /// 平移缩放结束后的保持时长
    pub const PAN_ZOOM_GRACE_MS: u64 = 3000;
    /// 未显式指定时长的聚光灯，从激活起 5 秒后关闭
    pub const SPOTLIGHT_DURATION_MS: u64 = 5000;
    /// 提示气泡固定显示时长
    pub const TOOLTIP_DISMISS_MS: u64 = 3000;

    /// 聚光灯默认压暗程度（百分比）
    pub const SPOTLIGHT_DIM_PERCENTAGE: f64 = 70.0;
    /// 聚光灯光圈相对目标渲染区域的外扩（像素，每边）
    pub const SPOTLIGHT_PADDING_PX: f64 = 20.0;
    /// 默认缩放倍数
    pub const ZOOM_LEVEL: f64 = 2.0;
    /// 缩放倍数上限
    pub const MAX_ZOOM_LEVEL: f64 = 10.0;
    /// 默认字号
    pub const FONT_SIZE: f64 = 16.0;
    /// 默认音量
    pub const SOUND_VOLUME: f64 = 0.7;
    /// 模态框默认标题（元素无标题时）
    pub const MODAL_TITLE: &str = "Information";
}
