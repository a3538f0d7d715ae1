//! # Scheduler 模块
//!
//! 时间轴调度：持有当前步骤指针，驱动自动推进，并把步骤选择转交给效果执行器。
//!
//! ## 执行模型
//!
//! ```text
//! select_step / next / previous / play / pause / reset / advance -> Vec<EngineEvent>
//! ```
//!
//! - 任意时刻最多只有一个自动推进定时器；安排新定时器前总是先取消旧的
//! - 定时器时长 = 当前步骤效果的 `delay + duration` + 步骤间停顿
//! - 同一时刻到期时，效果的自动关闭先于自动推进
//!
//! 切换幻灯片后取消旧幻灯片上的效果是调用方的职责（见 [`TimelineScheduler::cancel_slide_effects`]）。

use std::collections::BTreeSet;

use super::clock::{TimerId, TimerQueue};
use super::executor::{EffectExecutor, EffectPhase, ExecutionHandle};
use crate::config::EngineConfig;
use crate::deck::{Element, Interaction, SlideDeck, Trigger};
use crate::effect::coerce_ms;
use crate::effects::{self, ResolveContext};
use crate::error::EngineWarning;
use crate::event::EngineEvent;
use crate::media::{MediaPlayer, NullMediaPlayer};
use crate::position::{ContainerBounds, DeviceClass};
use crate::timeline::{self, StepTarget, TimelineStep};

/// 已完成交互的键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct InteractionKey {
    slide_index: usize,
    element_id: String,
    interaction_id: String,
}

/// 时间轴调度器
pub struct TimelineScheduler {
    deck: SlideDeck,
    config: EngineConfig,
    /// 派生的步骤列表
    steps: Vec<TimelineStep>,
    executor: EffectExecutor,
    /// 当前步骤（首次激活前为 `None`）
    current: Option<usize>,
    playing: bool,
    /// 自动推进定时器（负载为安排时的步骤索引）
    timers: TimerQueue<usize>,
    pending: Option<TimerId>,
    /// 当前步骤效果占用的时长
    current_span_ms: u64,
    completed: BTreeSet<InteractionKey>,
    /// 调用方报告的当前幻灯片
    current_slide: usize,
    device: DeviceClass,
    /// 调用方报告的容器尺寸；未报告时使用幻灯片布局尺寸
    bounds: Option<ContainerBounds>,
    now_ms: u64,
}

impl TimelineScheduler {
    /// 创建调度器（静音播放器）
    pub fn new(deck: SlideDeck, config: EngineConfig) -> Self {
        Self::with_media(deck, config, Box::new(NullMediaPlayer))
    }

    /// 创建调度器并注入音频播放能力
    pub fn with_media(deck: SlideDeck, config: EngineConfig, media: Box<dyn MediaPlayer>) -> Self {
        let steps = timeline::build_steps(&deck);
        Self {
            deck,
            config,
            steps,
            executor: EffectExecutor::new(media),
            current: None,
            playing: false,
            timers: TimerQueue::new(),
            pending: None,
            current_span_ms: 0,
            completed: BTreeSet::new(),
            current_slide: 0,
            device: DeviceClass::default(),
            bounds: None,
            now_ms: 0,
        }
    }

    // ========== 手动控制 ==========

    /// 选中步骤
    ///
    /// 越界索引收敛到 `[0, len - 1]`。文档禁止手动跳转时忽略并警告。
    pub fn select_step(&mut self, index: i64) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        if self.navigation_allowed(&mut out) {
            self.go_to(index, &mut out);
        }
        out
    }

    /// 下一步（未激活时选中第一步）
    pub fn next(&mut self) -> Vec<EngineEvent> {
        let target = self.current.map_or(0, |i| to_i64(i) + 1);
        self.select_step(target)
    }

    /// 上一步（停在第一步）
    pub fn previous(&mut self) -> Vec<EngineEvent> {
        let target = self.current.map_or(0, |i| to_i64(i) - 1);
        self.select_step(target)
    }

    /// 开始自动推进
    ///
    /// 尚未激活任何步骤时先选中第一步；已有定时器时不重复安排。
    pub fn play(&mut self) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        if self.steps.is_empty() {
            self.warn(EngineWarning::EmptyTimeline, &mut out);
            return out;
        }
        if !self.playing {
            self.playing = true;
            out.push(EngineEvent::PlaybackChanged { playing: true });
        }
        if self.current.is_none() {
            self.go_to(0, &mut out);
        } else if self.pending.is_none() {
            self.arm();
        }
        out
    }

    /// 暂停自动推进
    pub fn pause(&mut self) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        self.disarm();
        if self.playing {
            self.playing = false;
            out.push(EngineEvent::PlaybackChanged { playing: false });
        }
        out
    }

    /// 重置到第一步
    ///
    /// 幂等：连续调用两次与调用一次的状态相同。
    pub fn reset(&mut self) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        self.disarm();
        if self.playing {
            self.playing = false;
            out.push(EngineEvent::PlaybackChanged { playing: false });
        }
        self.completed.clear();
        self.current_span_ms = 0;

        if self.deck.is_empty() {
            self.current = None;
            return out;
        }
        out.push(EngineEvent::SlideChangeRequested { slide_index: 0 });

        let target = if self.steps.is_empty() { None } else { Some(0) };
        if self.current != target {
            self.current = target;
            if let Some(step) = self.steps.first() {
                out.push(EngineEvent::StepChanged {
                    index: 0,
                    step: step.clone(),
                });
            }
        }
        tracing::debug!("时间轴已重置");
        out
    }

    /// 加载后的首次激活：选中第一步，文档要求自动播放时开始播放
    pub fn start(&mut self) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        if self.steps.is_empty() {
            self.warn(EngineWarning::EmptyTimeline, &mut out);
            return out;
        }
        self.go_to(0, &mut out);
        if self.deck.settings.auto_advance {
            out.extend(self.play());
        }
        out
    }

    // ========== 时钟 ==========

    /// 推进虚拟时钟
    ///
    /// 依次触发期间到期的所有定时器。同一时刻到期时，效果的自动关闭先于自动推进。
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        let target = self.now_ms.saturating_add(elapsed_ms);

        loop {
            let next_due = [self.executor.next_due(), self.timers.next_due()]
                .into_iter()
                .flatten()
                .min();
            let Some(due) = next_due.filter(|due| *due <= target) else {
                break;
            };
            self.now_ms = self.now_ms.max(due);

            self.executor.fire_due(self.now_ms, &mut out);
            if let Some((_, id, armed_for)) = self.timers.pop_due(self.now_ms) {
                tracing::debug!(step = armed_for, at = self.now_ms, "自动推进定时器触发");
                if self.pending == Some(id) {
                    self.pending = None;
                }
                self.on_auto_progress(&mut out);
            }
        }

        self.now_ms = target;
        out
    }

    // ========== 文档 / 渲染环境 ==========

    /// 替换文档并重新生成步骤，当前索引收敛到新范围
    pub fn set_deck(&mut self, deck: SlideDeck) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        self.disarm();
        self.deck = deck;
        self.steps = timeline::build_steps(&self.deck);

        let clamped = match (self.current, self.steps.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => None,
        };
        if let Some(index) = clamped.filter(|_| clamped != self.current) {
            out.push(EngineEvent::StepChanged {
                index,
                step: self.steps[index].clone(),
            });
        }
        self.current = clamped;
        // 定时器时长按新文档中的当前步骤重新计算
        self.current_span_ms = self.current_step().map_or(0, |step| self.span_of(step));

        if self.steps.is_empty() && self.playing {
            self.playing = false;
            out.push(EngineEvent::PlaybackChanged { playing: false });
        } else if self.playing && self.current.is_some() {
            self.arm();
        }
        out
    }

    /// 调用方报告的设备类别与容器尺寸
    pub fn set_viewport(&mut self, device: DeviceClass, bounds: Option<ContainerBounds>) {
        self.device = device;
        self.bounds = bounds;
    }

    /// 调用方报告的当前幻灯片
    pub fn set_current_slide(&mut self, slide_index: usize) {
        self.current_slide = slide_index;
    }

    // ========== 时间轴之外的交互 ==========

    /// 触发当前幻灯片上某元素的交互（点击 / 悬停）
    pub fn trigger(&mut self, element_id: &str, trigger: Trigger) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        let slide_index = self.current_slide;
        let element = self
            .deck
            .slide(slide_index)
            .and_then(|slide| slide.find_element(element_id))
            .cloned();
        let Some(element) = element else {
            self.warn(
                EngineWarning::UnknownElement {
                    slide_index,
                    element_id: element_id.to_string(),
                },
                &mut out,
            );
            return out;
        };

        for interaction in element.interactions.iter().filter(|i| i.trigger == trigger) {
            self.activate_interaction(slide_index, &element, interaction, &mut out);
            self.completed.insert(InteractionKey {
                slide_index,
                element_id: element.id.clone(),
                interaction_id: interaction.id.clone(),
            });
        }
        out
    }

    /// 用户关闭效果
    pub fn dismiss(&mut self, handle: ExecutionHandle) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        self.executor.dismiss(handle, &mut out);
        out
    }

    /// 取消某张幻灯片上的全部活跃效果
    pub fn cancel_slide_effects(&mut self, slide_index: usize) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        let count = self.executor.cancel_slide(slide_index, &mut out);
        tracing::debug!(slide_index, count, "已取消幻灯片效果");
        out
    }

    // ========== 查询 ==========

    pub fn steps(&self) -> &[TimelineStep] {
        &self.steps
    }

    /// 去重升序的步骤编号
    pub fn unique_sorted_steps(&self) -> Vec<u32> {
        timeline::unique_sorted_steps(&self.steps)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_step(&self) -> Option<&TimelineStep> {
        self.current.and_then(|i| self.steps.get(i))
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn deck(&self) -> &SlideDeck {
        &self.deck
    }

    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    /// 交互是否已完成（任意幻灯片上）
    pub fn is_completed(&self, element_id: &str, interaction_id: &str) -> bool {
        self.completed
            .iter()
            .any(|k| k.element_id == element_id && k.interaction_id == interaction_id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// 挂起的自动推进定时器数量（0 或 1）
    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    /// 自动推进定时器的到期时间
    pub fn next_auto_progress_at(&self) -> Option<u64> {
        self.pending.and_then(|id| self.timers.due_of(id))
    }

    /// 虚拟时钟当前时间
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn effect_phase(&self, handle: ExecutionHandle) -> EffectPhase {
        self.executor.phase(handle)
    }

    pub fn executor(&self) -> &EffectExecutor {
        &self.executor
    }

    // ========== 内部 ==========

    fn navigation_allowed(&self, out: &mut Vec<EngineEvent>) -> bool {
        if self.deck.settings.allow_navigation {
            return true;
        }
        tracing::warn!("文档禁止手动跳转，忽略");
        out.push(EngineEvent::Warning(EngineWarning::NavigationLocked));
        false
    }

    /// 跳转到步骤（不检查导航锁）
    fn go_to(&mut self, index: i64, out: &mut Vec<EngineEvent>) {
        let Some(last) = self.steps.len().checked_sub(1) else {
            self.warn(EngineWarning::EmptyTimeline, out);
            return;
        };
        let index = usize::try_from(index.max(0)).unwrap_or(usize::MAX).min(last);

        self.disarm();
        let step = self.steps[index].clone();

        if step.slide_index != self.current_slide {
            out.push(EngineEvent::SlideChangeRequested {
                slide_index: step.slide_index,
            });
        }

        // 效果先于步骤变化通知
        self.current_span_ms = self.activate_step(&step, out);
        self.current = Some(index);
        tracing::debug!(index, step = %step, "步骤变化");
        out.push(EngineEvent::StepChanged { index, step });

        if self.playing {
            self.arm();
        }
    }

    /// 激活步骤的效果，返回效果占用的时长
    fn activate_step(&mut self, step: &TimelineStep, out: &mut Vec<EngineEvent>) -> u64 {
        let StepTarget::Interaction {
            element_id,
            element_index,
            interaction_index,
            ..
        } = &step.target
        else {
            return 0;
        };

        let pair = self
            .deck
            .slide(step.slide_index)
            .and_then(|slide| slide.elements.get(*element_index))
            .and_then(|element| {
                element
                    .interactions
                    .get(*interaction_index)
                    .map(|interaction| (element.clone(), interaction.clone()))
            });
        let Some((element, interaction)) = pair else {
            self.warn(
                EngineWarning::UnknownElement {
                    slide_index: step.slide_index,
                    element_id: element_id.clone(),
                },
                out,
            );
            return 0;
        };
        self.activate_interaction(step.slide_index, &element, &interaction, out)
    }

    /// 解析并激活交互，返回效果占用的时长
    fn activate_interaction(
        &mut self,
        slide_index: usize,
        element: &Element,
        interaction: &Interaction,
        out: &mut Vec<EngineEvent>,
    ) -> u64 {
        let resolution = effects::resolve(interaction, element, &self.resolve_context(slide_index));

        for warning in resolution.warnings {
            self.warn(warning, out);
        }
        let span = resolution.effect.step_span_ms();
        self.executor.activate(resolution.effect, self.now_ms, out);
        span
    }

    /// 只解析不激活，得到步骤效果占用的时长
    fn span_of(&self, step: &TimelineStep) -> u64 {
        let StepTarget::Interaction {
            element_index,
            interaction_index,
            ..
        } = &step.target
        else {
            return 0;
        };
        self.deck
            .slide(step.slide_index)
            .and_then(|slide| slide.elements.get(*element_index))
            .and_then(|element| {
                element
                    .interactions
                    .get(*interaction_index)
                    .map(|interaction| (element, interaction))
            })
            .map_or(0, |(element, interaction)| {
                effects::resolve(interaction, element, &self.resolve_context(step.slide_index))
                    .effect
                    .step_span_ms()
            })
    }

    fn resolve_context(&self, slide_index: usize) -> ResolveContext<'_> {
        let bounds = self.bounds.unwrap_or_else(|| {
            self.deck
                .slide(slide_index)
                .map(|slide| slide.layout.bounds())
                .unwrap_or_default()
        });
        ResolveContext {
            deck: &self.deck,
            slide_index,
            device: self.device,
            bounds,
            config: &self.config,
        }
    }

    /// 自动推进定时器到期
    ///
    /// 离开的步骤所带的交互记为已完成；到达最后一步时停止播放。
    fn on_auto_progress(&mut self, out: &mut Vec<EngineEvent>) {
        let Some(left) = self.current else {
            return;
        };
        if let Some(step) = self.steps.get(left) {
            if let (Some(element_id), Some(interaction_id)) =
                (step.element_id(), step.interaction_id())
            {
                self.completed.insert(InteractionKey {
                    slide_index: step.slide_index,
                    element_id: element_id.to_string(),
                    interaction_id: interaction_id.to_string(),
                });
            }
        }

        let last = self.steps.len().saturating_sub(1);
        if left < last {
            self.go_to(to_i64(left) + 1, out);
        }

        if self.playing && self.current == Some(last) {
            self.disarm();
            self.playing = false;
            tracing::debug!("时间轴播放结束");
            out.push(EngineEvent::PlaybackChanged { playing: false });
            out.push(EngineEvent::TimelineFinished);
        }
    }

    /// 为当前步骤安排自动推进（先取消旧定时器）
    fn arm(&mut self) {
        self.disarm();
        let Some(index) = self.current else {
            return;
        };
        let due = self
            .now_ms
            .saturating_add(self.current_span_ms)
            .saturating_add(self.step_pause_ms());
        self.pending = Some(self.timers.arm(due, index));
        tracing::debug!(step = index, due, "安排自动推进");
    }

    fn disarm(&mut self) {
        if let Some(id) = self.pending.take() {
            if self.timers.cancel(id).is_some() {
                tracing::debug!("取消自动推进");
            }
        }
    }

    /// 步骤间停顿：文档设置优先，否则使用引擎配置
    fn step_pause_ms(&self) -> u64 {
        coerce_ms(self.deck.settings.auto_progression_delay_ms)
            .unwrap_or(self.config.default_step_pause_ms)
    }

    fn warn(&self, warning: EngineWarning, out: &mut Vec<EngineEvent>) {
        tracing::warn!(%warning, "引擎警告");
        out.push(EngineEvent::Warning(warning));
    }
}

fn to_i64(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{DeckSettings, Slide};
    use crate::effect::{Effect, EffectParams, ModalParams, ShowTextParams};
    use crate::position::Rect;

    fn text_effect() -> Effect {
        Effect::new(EffectParams::ShowText(ShowTextParams::default())).with_duration(500.0)
    }

    /// [entry0, hs1/i1, entry1]
    fn two_slide_deck() -> SlideDeck {
        SlideDeck::new(
            "deck",
            vec![
                Slide::new(
                    "s0",
                    vec![
                        Element::hotspot_at("hs1", Rect::new(100.0, 100.0, 40.0, 40.0))
                            .with_interaction(Interaction::timeline("i1", text_effect())),
                    ],
                ),
                Slide::new("s1", vec![]),
            ],
        )
    }

    fn scheduler() -> TimelineScheduler {
        TimelineScheduler::new(two_slide_deck(), EngineConfig::default())
    }

    #[test]
    fn test_initial_state() {
        let s = scheduler();
        assert_eq!(s.current_index(), None);
        assert!(!s.is_playing());
        assert_eq!(s.steps().len(), 3);
        assert_eq!(s.unique_sorted_steps(), vec![1, 2, 3]);
    }

    #[test]
    fn test_select_step_clamps() {
        let mut s = scheduler();

        s.select_step(-5);
        assert_eq!(s.current_index(), Some(0));

        s.select_step(i64::MAX);
        assert_eq!(s.current_index(), Some(2));
    }

    #[test]
    fn test_activation_precedes_step_changed() {
        let mut s = scheduler();
        let events = s.select_step(1);

        let activated = events
            .iter()
            .position(|e| matches!(e, EngineEvent::EffectActivated { .. }));
        let changed = events
            .iter()
            .position(|e| matches!(e, EngineEvent::StepChanged { index: 1, .. }));
        assert!(activated.is_some());
        assert!(activated < changed);
    }

    #[test]
    fn test_slide_change_requested_only_when_slide_differs() {
        let mut s = scheduler();

        let events = s.select_step(1);
        assert!(!events
            .iter()
            .any(|e| matches!(e, EngineEvent::SlideChangeRequested { .. })));

        let events = s.select_step(2);
        assert!(events.contains(&EngineEvent::SlideChangeRequested { slide_index: 1 }));
    }

    #[test]
    fn test_play_arms_single_timer() {
        let mut s = scheduler();
        s.select_step(1);
        s.play();
        assert_eq!(s.pending_timer_count(), 1);

        // 重复 play 不会产生第二个定时器
        s.play();
        assert_eq!(s.pending_timer_count(), 1);

        // 手动选择会先取消再重新安排
        s.select_step(1);
        assert_eq!(s.pending_timer_count(), 1);
        assert_eq!(s.next_auto_progress_at(), Some(1500));
    }

    #[test]
    fn test_pause_cancels_timer() {
        let mut s = scheduler();
        s.play();
        let events = s.pause();

        assert_eq!(events, vec![EngineEvent::PlaybackChanged { playing: false }]);
        assert_eq!(s.pending_timer_count(), 0);
        assert!(s.advance(10_000).is_empty());
        assert_eq!(s.current_index(), Some(0));
    }

    #[test]
    fn test_auto_progress_fires_at_span_plus_pause() {
        let mut s = scheduler();
        s.select_step(1);
        s.play();

        assert!(s.advance(1499).is_empty());
        assert_eq!(s.current_index(), Some(1));

        s.advance(1);
        assert_eq!(s.current_index(), Some(2));
        assert!(s.is_completed("hs1", "i1"));
    }

    #[test]
    fn test_reaching_last_step_stops_playback() {
        let mut s = scheduler();
        s.select_step(1);
        s.play();
        let events = s.advance(1500);

        assert!(!s.is_playing());
        assert_eq!(s.pending_timer_count(), 0);
        let tail: Vec<_> = events.iter().rev().take(2).collect();
        assert_eq!(tail[0], &EngineEvent::TimelineFinished);
        assert_eq!(tail[1], &EngineEvent::PlaybackChanged { playing: false });
    }

    #[test]
    fn test_deck_pause_overrides_config() {
        let deck = two_slide_deck().with_settings(DeckSettings {
            auto_progression_delay_ms: Some(250.0),
            ..DeckSettings::default()
        });
        let mut s = TimelineScheduler::new(deck, EngineConfig::default());
        s.play();

        // 进入步骤没有效果，只有停顿
        assert_eq!(s.next_auto_progress_at(), Some(250));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut s = scheduler();
        s.select_step(1);
        s.play();
        s.advance(1500);

        s.reset();
        let once = (s.current_index(), s.is_playing(), s.completed_count(), s.pending_timer_count());
        let events = s.reset();
        let twice = (s.current_index(), s.is_playing(), s.completed_count(), s.pending_timer_count());

        assert_eq!(once, (Some(0), false, 0, 0));
        assert_eq!(once, twice);
        assert_eq!(events, vec![EngineEvent::SlideChangeRequested { slide_index: 0 }]);
    }

    #[test]
    fn test_reset_empty_deck() {
        let mut s = TimelineScheduler::new(SlideDeck::new("empty", vec![]), EngineConfig::default());
        assert!(s.reset().is_empty());
        assert_eq!(s.current_index(), None);
        assert!(matches!(
            s.play().as_slice(),
            [EngineEvent::Warning(EngineWarning::EmptyTimeline)]
        ));
    }

    #[test]
    fn test_navigation_locked() {
        let deck = two_slide_deck().with_settings(DeckSettings {
            allow_navigation: false,
            ..DeckSettings::default()
        });
        let mut s = TimelineScheduler::new(deck, EngineConfig::default());

        let events = s.select_step(2);
        assert_eq!(events, vec![EngineEvent::Warning(EngineWarning::NavigationLocked)]);
        assert_eq!(s.current_index(), None);

        // 自动推进不受影响
        s.play();
        assert_eq!(s.current_index(), Some(0));
        s.advance(1000);
        assert_eq!(s.current_index(), Some(1));
    }

    #[test]
    fn test_start_with_auto_advance() {
        let deck = two_slide_deck().with_settings(DeckSettings {
            auto_advance: true,
            ..DeckSettings::default()
        });
        let mut s = TimelineScheduler::new(deck, EngineConfig::default());
        let events = s.start();

        assert_eq!(s.current_index(), Some(0));
        assert!(s.is_playing());
        assert!(events.contains(&EngineEvent::PlaybackChanged { playing: true }));
        assert_eq!(s.pending_timer_count(), 1);
    }

    #[test]
    fn test_set_deck_clamps_index() {
        let mut s = scheduler();
        s.select_step(2);

        let events = s.set_deck(SlideDeck::new("small", vec![Slide::new("only", vec![])]));

        assert_eq!(s.current_index(), Some(0));
        assert_eq!(s.steps().len(), 1);
        assert!(matches!(events.as_slice(), [EngineEvent::StepChanged { index: 0, .. }]));
    }

    #[test]
    fn test_set_deck_rearms_for_new_current_step() {
        let mut s = TimelineScheduler::new(two_slide_deck(), EngineConfig::default());
        s.select_step(1);
        s.play();
        assert_eq!(s.next_auto_progress_at(), Some(1500));

        // 新文档里索引 1 是第二张幻灯片的进入步骤，没有效果
        let deck = SlideDeck::new(
            "three",
            vec![
                Slide::new("s0", vec![]),
                Slide::new("s1", vec![]),
                Slide::new("s2", vec![]),
            ],
        );
        s.set_deck(deck);

        assert_eq!(s.current_index(), Some(1));
        assert!(s.current_step().is_some_and(|step| step.is_slide_entry()));
        assert_eq!(s.next_auto_progress_at(), Some(1000));
        assert_eq!(s.pending_timer_count(), 1);
    }

    #[test]
    fn test_set_deck_uses_new_effect_duration() {
        let mut s = scheduler();
        s.select_step(1);
        s.play();

        let deck = SlideDeck::new(
            "deck",
            vec![Slide::new(
                "s0",
                vec![
                    Element::hotspot_at("hs1", Rect::new(100.0, 100.0, 40.0, 40.0))
                        .with_interaction(Interaction::timeline(
                            "i1",
                            text_effect().with_duration(2000.0),
                        )),
                ],
            )],
        );
        s.set_deck(deck);

        assert_eq!(s.current_index(), Some(1));
        assert_eq!(s.next_auto_progress_at(), Some(3000));
        // 只重新计算时长，不重新激活效果
        assert_eq!(s.executor().active_count(), 1);
    }

    #[test]
    fn test_trigger_click_interaction() {
        let deck = SlideDeck::new(
            "deck",
            vec![Slide::new(
                "s0",
                vec![
                    Element::hotspot_at("btn", Rect::new(0.0, 0.0, 40.0, 40.0)).with_interaction(
                        Interaction::click(
                            "open",
                            Effect::new(EffectParams::Modal(ModalParams::default())),
                        ),
                    ),
                ],
            )],
        );
        let mut s = TimelineScheduler::new(deck, EngineConfig::default());

        let events = s.trigger("btn", Trigger::Click);
        let handle = match events.as_slice() {
            [EngineEvent::EffectActivated { handle, .. }] => *handle,
            other => panic!("Expected one activation, got {:?}", other),
        };
        assert!(s.is_completed("btn", "open"));
        assert!(s.trigger("btn", Trigger::Hover).is_empty());

        let events = s.dismiss(handle);
        assert_eq!(events.len(), 1);
        assert_eq!(s.effect_phase(handle), EffectPhase::Idle);

        let events = s.trigger("missing", Trigger::Click);
        assert!(matches!(
            events.as_slice(),
            [EngineEvent::Warning(EngineWarning::UnknownElement { .. })]
        ));
    }

    #[test]
    fn test_cancel_slide_effects() {
        let mut s = scheduler();
        s.select_step(1);
        assert_eq!(s.executor().active_count(), 1);

        let events = s.cancel_slide_effects(0);
        assert_eq!(events.len(), 1);
        assert_eq!(s.executor().active_count(), 0);
        assert!(s.cancel_slide_effects(0).is_empty());
    }
}
