//! # Executor 模块
//!
//! 效果执行状态机：`Idle → Activating → Active → Dismissing → Idle`。
//!
//! 激活与关闭都是同步完成的，`Activating` / `Dismissing` 只在一次调用内部短暂存在，
//! 因此从外部观察，一个句柄要么是 `Active`，要么是 `Idle`。
//!
//! ## 并发策略
//!
//! - 互斥类型（聚光灯 / 模态框 / 平移缩放）：同一幻灯片同类只保留一个，
//!   新实例激活前先以 `Replaced` 关闭旧实例
//! - 独立类型（文本 / 提示 / 声音）：各自持有句柄、各自计时

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::clock::{TimerId, TimerQueue};
use crate::effect::SpotlightShape;
use crate::effects::{AutoDismiss, ConcurrencyPolicy, EffectKind, ResolvedEffect, ResolvedKind};
use crate::error::EngineWarning;
use crate::event::{DismissReason, EngineEvent, SpotlightGeometry};
use crate::media::{MediaPlayer, NullMediaPlayer};
use crate::position::{self, Rect};

/// 效果实例句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExecutionHandle(u64);

impl ExecutionHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// 效果实例阶段
///
/// `Activating` 和 `Dismissing` 只在 `activate` / 关闭的单次调用内部经过，
/// 只出现在 debug 日志里；[`EffectExecutor::phase`] 只会返回 `Active` 或 `Idle`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectPhase {
    Idle,
    Activating,
    Active,
    Dismissing,
}

/// 活跃的效果实例
#[derive(Debug, Clone)]
struct EffectInstance {
    effect: ResolvedEffect,
    /// 自动关闭定时器（`Never` 时为 `None`）
    timer: Option<TimerId>,
}

/// 效果执行器
pub struct EffectExecutor {
    media: Box<dyn MediaPlayer>,
    instances: BTreeMap<ExecutionHandle, EffectInstance>,
    timers: TimerQueue<ExecutionHandle>,
    next_handle: u64,
}

impl Default for EffectExecutor {
    fn default() -> Self {
        Self::new(Box::new(NullMediaPlayer))
    }
}

impl EffectExecutor {
    /// 创建执行器
    ///
    /// # 参数
    ///
    /// - `media`: 宿主提供的音频播放能力
    pub fn new(media: Box<dyn MediaPlayer>) -> Self {
        Self {
            media,
            instances: BTreeMap::new(),
            timers: TimerQueue::new(),
            next_handle: 1,
        }
    }

    /// 激活效果
    ///
    /// 事件按顺序写入 `out`：被顶掉的旧实例的 `EffectDismissed`，然后是本实例的 `EffectActivated`。
    /// 切换类效果只产出 `SlideChangeRequested`，没有生命周期，返回的句柄始终是 `Idle`。
    pub fn activate(
        &mut self,
        effect: ResolvedEffect,
        now: u64,
        out: &mut Vec<EngineEvent>,
    ) -> ExecutionHandle {
        let handle = ExecutionHandle(self.next_handle);
        self.next_handle += 1;

        if let ResolvedKind::Transition { slide_index } = effect.kind {
            tracing::debug!(handle = handle.0, slide_index, "切换幻灯片效果");
            out.push(EngineEvent::SlideChangeRequested { slide_index });
            return handle;
        }

        let kind = effect.effect_kind();
        if kind.concurrency() == ConcurrencyPolicy::Exclusive {
            self.replace_exclusive(kind, effect.source.slide_index, out);
        }

        log_phase(handle, kind, EffectPhase::Idle, EffectPhase::Activating);

        // 各类型的副作用
        let geometry = spotlight_geometry(&effect);
        let dismiss_after = match effect.dismiss {
            AutoDismiss::After(ms) => Some(ms),
            AutoDismiss::Never => None,
            AutoDismiss::OnMediaEnd { fallback_ms } => {
                Some(self.start_sound(handle, &effect, fallback_ms, out))
            }
            AutoDismiss::Immediate => {
                log_phase(handle, kind, EffectPhase::Activating, EffectPhase::Active);
                out.push(EngineEvent::EffectActivated {
                    handle,
                    effect,
                    geometry,
                });
                log_phase(handle, kind, EffectPhase::Active, EffectPhase::Idle);
                out.push(EngineEvent::EffectDismissed {
                    handle,
                    reason: DismissReason::Expired,
                });
                return handle;
            }
        };

        let timer = dismiss_after.map(|ms| self.timers.arm(now.saturating_add(ms), handle));
        log_phase(handle, kind, EffectPhase::Activating, EffectPhase::Active);
        out.push(EngineEvent::EffectActivated {
            handle,
            effect: effect.clone(),
            geometry,
        });
        self.instances.insert(handle, EffectInstance { effect, timer });
        handle
    }

    /// 取消效果（切换幻灯片 / 步骤时由调用方发起）
    ///
    /// 幂等：对 `Idle` 句柄调用返回 `false`，不产生事件。
    pub fn cancel(&mut self, handle: ExecutionHandle, out: &mut Vec<EngineEvent>) -> bool {
        self.finish(handle, DismissReason::Cancelled, out)
    }

    /// 用户主动关闭效果（如关闭模态框）
    pub fn dismiss(&mut self, handle: ExecutionHandle, out: &mut Vec<EngineEvent>) -> bool {
        self.finish(handle, DismissReason::User, out)
    }

    /// 取消某张幻灯片上的所有活跃效果，返回取消数量
    pub fn cancel_slide(&mut self, slide_index: usize, out: &mut Vec<EngineEvent>) -> usize {
        let handles: Vec<_> = self
            .instances
            .iter()
            .filter(|(_, inst)| inst.effect.source.slide_index == slide_index)
            .map(|(h, _)| *h)
            .collect();
        for handle in &handles {
            self.finish(*handle, DismissReason::Cancelled, out);
        }
        handles.len()
    }

    /// 取消所有活跃效果
    pub fn cancel_all(&mut self, out: &mut Vec<EngineEvent>) -> usize {
        let handles: Vec<_> = self.instances.keys().copied().collect();
        for handle in &handles {
            self.finish(*handle, DismissReason::Cancelled, out);
        }
        handles.len()
    }

    /// 触发所有在 `now` 之前（含）到期的自动关闭
    pub fn fire_due(&mut self, now: u64, out: &mut Vec<EngineEvent>) {
        while let Some((_, _, handle)) = self.timers.pop_due(now) {
            if let Some(instance) = self.instances.get_mut(&handle) {
                instance.timer = None;
            }
            self.finish(handle, DismissReason::Expired, out);
        }
    }

    /// 最早的自动关闭时间
    pub fn next_due(&self) -> Option<u64> {
        self.timers.next_due()
    }

    /// 句柄当前阶段
    pub fn phase(&self, handle: ExecutionHandle) -> EffectPhase {
        if self.instances.contains_key(&handle) {
            EffectPhase::Active
        } else {
            EffectPhase::Idle
        }
    }

    /// 活跃句柄（按激活顺序）
    pub fn active_handles(&self) -> Vec<ExecutionHandle> {
        self.instances.keys().copied().collect()
    }

    pub fn active_count(&self) -> usize {
        self.instances.len()
    }

    /// 某类型的活跃实例数
    pub fn active_count_of(&self, kind: EffectKind) -> usize {
        self.instances
            .values()
            .filter(|inst| inst.effect.effect_kind() == kind)
            .count()
    }

    /// 活跃句柄对应的效果
    pub fn effect(&self, handle: ExecutionHandle) -> Option<&ResolvedEffect> {
        self.instances.get(&handle).map(|inst| &inst.effect)
    }

    /// 自动关闭定时器数量
    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    fn replace_exclusive(&mut self, kind: EffectKind, slide_index: usize, out: &mut Vec<EngineEvent>) {
        let prior: Vec<_> = self
            .instances
            .iter()
            .filter(|(_, inst)| {
                inst.effect.effect_kind() == kind && inst.effect.source.slide_index == slide_index
            })
            .map(|(h, _)| *h)
            .collect();
        for handle in prior {
            self.finish(handle, DismissReason::Replaced, out);
        }
    }

    /// 开始播放声音，返回自动关闭的相对时间
    ///
    /// 播放失败不会阻止效果进入 Active，只是没有声音。
    fn start_sound(
        &mut self,
        handle: ExecutionHandle,
        effect: &ResolvedEffect,
        fallback_ms: u64,
        out: &mut Vec<EngineEvent>,
    ) -> u64 {
        let ResolvedKind::Sound { url, volume } = &effect.kind else {
            return fallback_ms;
        };
        if url.is_empty() {
            return fallback_ms;
        }
        match self.media.play(handle, url, *volume) {
            Ok(Some(length_ms)) => effect.delay_ms.saturating_add(length_ms),
            Ok(None) => fallback_ms,
            Err(e) => {
                let warning = EngineWarning::MediaFailed {
                    url: url.clone(),
                    message: e.to_string(),
                };
                tracing::warn!(%warning, "声音播放失败");
                out.push(EngineEvent::Warning(warning));
                fallback_ms
            }
        }
    }

    /// Active → Dismissing → Idle
    fn finish(
        &mut self,
        handle: ExecutionHandle,
        reason: DismissReason,
        out: &mut Vec<EngineEvent>,
    ) -> bool {
        let Some(instance) = self.instances.remove(&handle) else {
            return false;
        };
        let kind = instance.effect.effect_kind();
        log_phase(handle, kind, EffectPhase::Active, EffectPhase::Dismissing);

        if let Some(timer) = instance.timer {
            self.timers.cancel(timer);
        }
        // 只停止本实例的播放，同一 url 的其他实例不受影响
        if let ResolvedKind::Sound { url, .. } = &instance.effect.kind
            && !url.is_empty()
        {
            self.media.stop(handle);
        }

        log_phase(handle, kind, EffectPhase::Dismissing, EffectPhase::Idle);
        out.push(EngineEvent::EffectDismissed { handle, reason });
        true
    }
}

fn log_phase(handle: ExecutionHandle, kind: EffectKind, from: EffectPhase, to: EffectPhase) {
    tracing::debug!(handle = handle.0, ?kind, ?from, ?to, "效果阶段变化");
}

/// 聚光灯的像素几何（其他类型为 `None`）
fn spotlight_geometry(effect: &ResolvedEffect) -> Option<SpotlightGeometry> {
    let ResolvedKind::Spotlight {
        shape,
        dim_percentage,
        center,
        width,
        height,
        bounds,
        ..
    } = &effect.kind
    else {
        return None;
    };
    let center = position::to_pixels(*center, *bounds);
    let (w, h) = match shape {
        SpotlightShape::Circle => {
            let diameter = width.max(*height);
            (diameter, diameter)
        }
        SpotlightShape::Rectangle | SpotlightShape::Oval => (*width, *height),
    };
    Some(SpotlightGeometry {
        center,
        hole: Rect::centered(center, w, h),
        dim_opacity: dim_percentage / 100.0,
    })
}
