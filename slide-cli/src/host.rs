//! # Host 模块
//!
//! 无界面宿主：用虚拟时钟驱动调度器，并扮演"协调者"的角色。
//!
//! 收到 `SlideChangeRequested` 后切换当前幻灯片，并取消旧幻灯片上仍在显示的效果。

use slide_runtime::{EngineEvent, ExecutionHandle, MediaError, MediaPlayer, TimelineScheduler};

/// 只记录日志的播放器
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMediaPlayer;

impl MediaPlayer for LoggingMediaPlayer {
    fn play(
        &mut self,
        handle: ExecutionHandle,
        url: &str,
        volume: f64,
    ) -> Result<Option<u64>, MediaError> {
        tracing::info!(handle = handle.id(), url, volume, "播放声音");
        Ok(None)
    }

    fn stop(&mut self, handle: ExecutionHandle) {
        tracing::info!(handle = handle.id(), "停止声音");
    }
}

/// 一次运行的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 虚拟时钟走过的时长
    pub elapsed_ms: u64,
    /// 是否播放到最后一步
    pub finished: bool,
    pub events: usize,
    pub warnings: usize,
}

/// 宿主
pub struct Host<F: FnMut(u64, &EngineEvent)> {
    scheduler: TimelineScheduler,
    sink: F,
    summary: RunSummary,
}

impl<F: FnMut(u64, &EngineEvent)> Host<F> {
    /// 创建宿主
    ///
    /// # 参数
    ///
    /// - `sink`: 每个事件的输出回调（参数为虚拟时间和事件）
    pub fn new(scheduler: TimelineScheduler, sink: F) -> Self {
        Self {
            scheduler,
            sink,
            summary: RunSummary::default(),
        }
    }

    /// 启动时间轴并以 `tick_ms` 为步长运行，最多 `run_ms`
    ///
    /// 时间轴播放结束时提前返回。
    pub fn run(mut self, run_ms: u64, tick_ms: u64, force_play: bool) -> RunSummary {
        let events = self.scheduler.start();
        self.dispatch(events);
        if force_play && !self.scheduler.is_playing() {
            let events = self.scheduler.play();
            self.dispatch(events);
        }

        let tick_ms = tick_ms.max(1);
        while !self.summary.finished && self.summary.elapsed_ms < run_ms {
            let step = tick_ms.min(run_ms - self.summary.elapsed_ms);
            let events = self.scheduler.advance(step);
            self.summary.elapsed_ms += step;
            self.dispatch(events);
        }
        self.summary
    }

    fn dispatch(&mut self, events: Vec<EngineEvent>) {
        for event in events {
            (self.sink)(self.scheduler.now_ms(), &event);
            self.summary.events += 1;

            match event {
                EngineEvent::SlideChangeRequested { slide_index } => {
                    let previous = self.scheduler.current_slide();
                    if previous != slide_index {
                        self.scheduler.set_current_slide(slide_index);
                        let cancelled = self.scheduler.cancel_slide_effects(previous);
                        self.dispatch(cancelled);
                    }
                }
                EngineEvent::Warning(_) => self.summary.warnings += 1,
                EngineEvent::TimelineFinished => self.summary.finished = true,
                _ => {}
            }
        }
    }
}

/// 事件的单行描述
pub fn describe(event: &EngineEvent) -> String {
    match event {
        EngineEvent::StepChanged { index, step } => format!("step    [{}] {}", index, step),
        EngineEvent::EffectActivated {
            handle,
            effect,
            geometry,
        } => {
            let mut line = format!(
                "effect+ #{} {:?} ({}/{}) {}ms",
                handle.id(),
                effect.effect_kind(),
                effect.source.element_id,
                effect.source.interaction_id,
                effect.duration_ms
            );
            if let Some(g) = geometry {
                line.push_str(&format!(
                    " hole=({:.0},{:.0} {:.0}x{:.0})",
                    g.hole.x, g.hole.y, g.hole.width, g.hole.height
                ));
            }
            line
        }
        EngineEvent::EffectDismissed { handle, reason } => {
            format!("effect- #{} {:?}", handle.id(), reason)
        }
        EngineEvent::SlideChangeRequested { slide_index } => format!("slide   -> {}", slide_index),
        EngineEvent::PlaybackChanged { playing } => {
            format!("play    {}", if *playing { "on" } else { "off" })
        }
        EngineEvent::TimelineFinished => "finished".to_string(),
        EngineEvent::Warning(warning) => format!("warning {}", warning),
    }
}
