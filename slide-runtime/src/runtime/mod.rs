//! # Runtime 模块
//!
//! 执行引擎：虚拟时钟、效果执行器、时间轴调度器。
//!
//! ## 模块结构
//!
//! - [`clock`]：虚拟时钟上的定时器队列
//! - [`executor`]：效果生命周期状态机
//! - [`scheduler`]：时间轴调度

pub mod clock;
pub mod executor;
pub mod scheduler;

pub use clock::{TimerId, TimerQueue};
pub use executor::{EffectExecutor, EffectPhase, ExecutionHandle};
pub use scheduler::TimelineScheduler;
