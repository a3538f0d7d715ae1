//! # Config 模块
//!
//! 引擎级可调参数。文档级设置（如作者指定的步骤间停顿）优先于这里的值。
//!
//! 本模块不做任何 IO，配置文件的读取由宿主负责。

use serde::{Deserialize, Serialize};

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 步骤间默认停顿（毫秒）
    ///
    /// 文档未设置 `auto_progression_delay_ms` 时使用。
    #[serde(default = "default_step_pause_ms")]
    pub default_step_pause_ms: u64,

    /// 声音效果的兜底生命周期（毫秒）
    ///
    /// 播放能力无法给出音频时长，或播放失败时，声音效果在此时长后结束，
    /// 保证不会一直挂在 Active。
    #[serde(default = "default_sound_fallback_ms")]
    pub sound_fallback_ms: u64,

    /// 自动关闭的文本效果在入场结束后停留的时长（毫秒）
    #[serde(default = "default_text_auto_close_ms")]
    pub text_auto_close_ms: u64,
}

fn default_step_pause_ms() -> u64 {
    1000
}

fn default_sound_fallback_ms() -> u64 {
    5000
}

fn default_text_auto_close_ms() -> u64 {
    3000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_step_pause_ms: default_step_pause_ms(),
            sound_fallback_ms: default_sound_fallback_ms(),
            text_auto_close_ms: default_text_auto_close_ms(),
        }
    }
}
