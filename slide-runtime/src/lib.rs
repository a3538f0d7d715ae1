//! # Slide Runtime
//!
//! 幻灯片时间轴与效果执行引擎。
//!
//! ## 架构概述
//!
//! `slide-runtime` 是纯逻辑核心，不读取真实时钟，不做渲染、音频或文件 IO。
//! 它通过 **事件驱动模式** 与宿主通信：
//!
//! ```text
//! Host                                   Runtime
//!   │                                       │
//!   │── select_step / play / advance ──────►│
//!   │                                       │
//!   │◄──────────── Vec<EngineEvent> ────────│
//!   │                                       │
//!   │── set_current_slide / set_viewport ──►│
//! ```
//!
//! ## 核心类型
//!
//! - [`SlideDeck`]：文档数据模型
//! - [`TimelineScheduler`]：时间轴调度器（宿主唯一需要持有的对象）
//! - [`EngineEvent`]：Runtime 向 Host 发出的事件
//! - [`EngineConfig`]：引擎配置
//!
//! ## 使用示例
//!
//! ```ignore
//! use slide_runtime::{EngineConfig, SlideDeck, TimelineScheduler};
//!
//! let deck = SlideDeck::from_json(text)?;
//! let mut scheduler = TimelineScheduler::new(deck, EngineConfig::default());
//!
//! let mut events = scheduler.start();
//! loop {
//!     for event in events.drain(..) {
//!         host.handle(event);
//!     }
//!     events = scheduler.advance(frame_ms);
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`deck`] / [`effect`]：文档数据模型
//! - [`position`]：响应式坐标解析
//! - [`timeline`]：步骤列表生成
//! - [`effects`]：效果解析
//! - [`runtime`]：效果执行器与时间轴调度器
//! - [`diagnostic`]：文档静态检查

pub mod config;
pub mod deck;
pub mod diagnostic;
pub mod effect;
pub mod effects;
pub mod error;
pub mod event;
pub mod media;
pub mod position;
pub mod runtime;
pub mod timeline;

// 重导出核心类型
pub use config::EngineConfig;
pub use deck::{
    BackgroundSize, DeckMetadata, DeckSettings, Element, ElementKind, ElementStyle, HotspotSize,
    Interaction, Slide, SlideDeck, SlideLayout, Trigger,
};
pub use diagnostic::{Diagnostic, DiagnosticLevel, DiagnosticResult, analyze_deck};
pub use effect::{Effect, EffectParams};
pub use effects::{AutoDismiss, EffectKind, ResolvedEffect, ResolvedKind};
pub use error::{DeckError, EngineWarning, MediaError};
pub use event::{DismissReason, EngineEvent, SpotlightGeometry};
pub use media::{MediaPlayer, NullMediaPlayer};
pub use position::{ContainerBounds, DeviceClass, PercentPoint, Point, Rect, ResponsivePosition};
pub use runtime::{EffectExecutor, EffectPhase, ExecutionHandle, TimelineScheduler};
pub use timeline::{StepTarget, TimelineStep, build_steps, unique_sorted_steps};
