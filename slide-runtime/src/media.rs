//! # Media 模块
//!
//! 音频播放能力抽象。引擎自身不做任何音频 IO，由宿主注入实现。
//!
//! 每次播放都以效果句柄为键：同一 url 可以同时有多个实例在播放，
//! 关闭其中一个只停止它自己。

use crate::error::MediaError;
use crate::runtime::ExecutionHandle;

/// 音频播放能力
///
/// - `NullMediaPlayer`：不出声，总是成功（默认）
/// - 宿主实现：真实播放（或像 CLI 那样只记录日志）
pub trait MediaPlayer {
    /// 为效果实例 `handle` 开始播放
    ///
    /// # 返回
    /// - `Ok(Some(ms))`：已知音频时长，效果在音频结束时关闭
    /// - `Ok(None)`：时长未知，效果按兜底时长关闭
    /// - `Err`：播放失败，效果照常显示并按兜底时长关闭
    fn play(
        &mut self,
        handle: ExecutionHandle,
        url: &str,
        volume: f64,
    ) -> Result<Option<u64>, MediaError>;

    /// 停止 `handle` 对应的播放（未在播放时是无操作）
    fn stop(&mut self, handle: ExecutionHandle);
}

/// 静音播放器
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMediaPlayer;

impl MediaPlayer for NullMediaPlayer {
    fn play(
        &mut self,
        _handle: ExecutionHandle,
        _url: &str,
        _volume: f64,
    ) -> Result<Option<u64>, MediaError> {
        Ok(None)
    }

    fn stop(&mut self, _handle: ExecutionHandle) {}
}
