//! # Event 模块
//!
//! 引擎向宿主发出的事件。事件是引擎与宿主之间的**唯一通信方式**。
//!
//! 每个操作都返回 `Vec<EngineEvent>`，顺序即发生顺序。
//! 同一步骤的 `EffectActivated` 总是先于该步骤的 `StepChanged`。

use serde::{Deserialize, Serialize};

use crate::effects::ResolvedEffect;
use crate::error::EngineWarning;
use crate::position::{Point, Rect};
use crate::runtime::ExecutionHandle;
use crate::timeline::TimelineStep;

/// 关闭原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissReason {
    /// 自动关闭计时到期（或立即结束的效果）
    Expired,
    /// 被调用方取消（切换幻灯片等）
    Cancelled,
    /// 被同类互斥效果顶掉
    Replaced,
    /// 用户主动关闭
    User,
}

/// 聚光灯的像素几何
///
/// 激活时按当时的容器尺寸计算，渲染层直接使用。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotlightGeometry {
    /// 光圈中心（像素）
    pub center: Point,
    /// 光圈外接矩形（像素）
    pub hole: Rect,
    /// 遮罩不透明度（0.0 - 1.0）
    pub dim_opacity: f64,
}

/// 引擎事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// 当前步骤变化（手动选择或自动推进）
    StepChanged { index: usize, step: TimelineStep },

    /// 效果开始显示
    EffectActivated {
        handle: ExecutionHandle,
        effect: ResolvedEffect,
        geometry: Option<SpotlightGeometry>,
    },

    /// 效果结束
    EffectDismissed {
        handle: ExecutionHandle,
        reason: DismissReason,
    },

    /// 请求宿主切换到指定幻灯片
    SlideChangeRequested { slide_index: usize },

    /// 播放状态变化
    PlaybackChanged { playing: bool },

    /// 自动推进到达最后一步
    TimelineFinished,

    /// 非致命警告
    Warning(EngineWarning),
}

impl EngineEvent {
    /// 事件名（日志用）
    pub fn name(&self) -> &'static str {
        match self {
            Self::StepChanged { .. } => "step_changed",
            Self::EffectActivated { .. } => "effect_activated",
            Self::EffectDismissed { .. } => "effect_dismissed",
            Self::SlideChangeRequested { .. } => "slide_change_requested",
            Self::PlaybackChanged { .. } => "playback_changed",
            Self::TimelineFinished => "timeline_finished",
            Self::Warning(_) => "warning",
        }
    }
}
