//! # Effects 模块
//!
//! 效果解析：文档参数 → 带默认值、已校验、已定位的可执行效果。
//!
//! - [`registry`]: 效果类型、并发策略、默认参数
//! - [`resolver`]: `Interaction` → `ResolvedEffect`

pub mod registry;
pub mod resolver;

pub use registry::{ConcurrencyPolicy, Easing, EffectKind, defaults};
pub use resolver::{
    AutoDismiss, EffectSource, NoopReason, Resolution, ResolveContext, ResolvedEffect,
    ResolvedKind, resolve,
};
