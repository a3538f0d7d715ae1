//! # Error 模块
//!
//! 定义 slide-runtime 中使用的错误与警告类型。
//!
//! 引擎运行期不向调用方抛错：所有问题都收敛为安全的默认行为，
//! 并通过 [`EngineWarning`] 上报。只有文档解析和媒体播放这两个边界返回 `Result`。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 文档解析错误
#[derive(Error, Debug)]
pub enum DeckError {
    /// JSON 格式或结构错误
    #[error("幻灯片文档解析失败: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 媒体播放错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediaError {
    /// 音频资源无法加载
    #[error("无法加载音频 '{url}': {message}")]
    LoadFailed { url: String, message: String },

    /// 没有可用的音频输出
    #[error("音频输出不可用")]
    OutputUnavailable,

    /// 播放被宿主拒绝（如浏览器自动播放策略）
    #[error("播放被拒绝: {0}")]
    Rejected(String),
}

/// 非致命警告
///
/// 通过 `EngineEvent::Warning` 上报，执行继续。
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineWarning {
    /// 效果类型不在已知集合内
    #[error("交互 '{element_id}/{interaction_id}' 使用了不支持的效果类型 '{kind}'")]
    UnsupportedEffect {
        element_id: String,
        interaction_id: String,
        kind: String,
    },

    /// 效果引用的目标不存在
    #[error("交互 '{element_id}/{interaction_id}' 引用的目标 '{target_id}' 不存在")]
    MissingTarget {
        element_id: String,
        interaction_id: String,
        target_id: String,
    },

    /// 参数值非法，已用默认值替代
    #[error("交互 '{interaction_id}' 的参数 '{param}' 无效，已使用 {fallback}")]
    InvalidParameter {
        interaction_id: String,
        param: String,
        fallback: String,
    },

    /// 声音播放失败（效果照常显示，只是没有声音）
    #[error("音频 '{url}' 播放失败: {message}")]
    MediaFailed { url: String, message: String },

    /// 文档禁止手动跳转
    #[error("当前文档禁止手动跳转步骤")]
    NavigationLocked,

    /// 时间轴没有任何步骤
    #[error("时间轴为空")]
    EmptyTimeline,

    /// 当前幻灯片上找不到元素
    #[error("幻灯片 {slide_index} 上不存在元素 '{element_id}'")]
    UnknownElement {
        slide_index: usize,
        element_id: String,
    },
}
