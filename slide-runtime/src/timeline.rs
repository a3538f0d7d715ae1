//! # Timeline 模块
//!
//! 从文档推导出全局有序、可按索引寻址的步骤列表。
//!
//! ## 排序规则
//!
//! 1. 幻灯片索引（升序）
//! 2. 交互声明的 `delay`，未设置为 0（升序）
//! 3. 声明顺序（稳定）
//!
//! 每张幻灯片先产出一个"进入幻灯片"步骤，再按元素 / 交互顺序产出
//! `trigger == timeline` 的交互步骤。进入步骤的延迟为 0 且声明最早，因此总是排在本幻灯片首位。
//!
//! 步骤是派生数据：文档结构变化后整体重新生成，从不原地修改。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::deck::{SlideDeck, Trigger};

/// 步骤指向的内容
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepTarget {
    /// 进入幻灯片（不携带元素 / 交互）
    SlideEntry,
    /// 时间轴触发的交互
    Interaction {
        element_id: String,
        interaction_id: String,
        /// 元素在幻灯片中的位置
        ///
        /// 重复 id 时按位置区分，不会被合并。
        element_index: usize,
        /// 交互在元素中的位置
        interaction_index: usize,
    },
}

/// 时间轴步骤
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimelineStep {
    /// 全局步骤编号（从 1 开始，等于排序后的位置 + 1）
    pub step_number: u32,
    /// 所属幻灯片索引
    pub slide_index: usize,
    /// 所属幻灯片 id
    pub slide_id: String,
    /// 排序用的延迟（毫秒）
    pub delay_ms: u64,
    pub target: StepTarget,
}

impl TimelineStep {
    /// 元素 id（进入步骤为 `None`）
    pub fn element_id(&self) -> Option<&str> {
        match &self.target {
            StepTarget::SlideEntry => None,
            StepTarget::Interaction { element_id, .. } => Some(element_id),
        }
    }

    /// 交互 id（进入步骤为 `None`）
    pub fn interaction_id(&self) -> Option<&str> {
        match &self.target {
            StepTarget::SlideEntry => None,
            StepTarget::Interaction { interaction_id, .. } => Some(interaction_id),
        }
    }

    pub fn is_slide_entry(&self) -> bool {
        matches!(self.target, StepTarget::SlideEntry)
    }
}

impl fmt::Display for TimelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} slide[{}] ", self.step_number, self.slide_index)?;
        match &self.target {
            StepTarget::SlideEntry => write!(f, "{}", self.slide_id),
            StepTarget::Interaction {
                element_id,
                interaction_id,
                ..
            } => {
                write!(f, "{}/{}", element_id, interaction_id)?;
                if self.delay_ms > 0 {
                    write!(f, " +{}ms", self.delay_ms)?;
                }
                Ok(())
            }
        }
    }
}

/// 生成步骤列表
///
/// 纯函数：同一文档调用多次，结果（包括步骤编号）完全一致。
pub fn build_steps(deck: &SlideDeck) -> Vec<TimelineStep> {
    let mut steps = Vec::new();

    for (slide_index, slide) in deck.slides.iter().enumerate() {
        steps.push(TimelineStep {
            step_number: 0,
            slide_index,
            slide_id: slide.id.clone(),
            delay_ms: 0,
            target: StepTarget::SlideEntry,
        });

        for (element_index, element) in slide.elements.iter().enumerate() {
            for (interaction_index, interaction) in element.interactions.iter().enumerate() {
                if interaction.trigger != Trigger::Timeline {
                    continue;
                }
                steps.push(TimelineStep {
                    step_number: 0,
                    slide_index,
                    slide_id: slide.id.clone(),
                    delay_ms: interaction.effect.delay_ms(),
                    target: StepTarget::Interaction {
                        element_id: element.id.clone(),
                        interaction_id: interaction.id.clone(),
                        element_index,
                        interaction_index,
                    },
                });
            }
        }
    }

    // sort_by_key 是稳定排序，声明顺序即第三排序键
    steps.sort_by_key(|step| (step.slide_index, step.delay_ms));

    for (position, step) in steps.iter_mut().enumerate() {
        step.step_number = u32::try_from(position + 1).unwrap_or(u32::MAX);
    }

    tracing::debug!(count = steps.len(), deck = %deck.id, "时间轴步骤已生成");
    steps
}

/// 去重并升序的步骤编号（供步骤选择器使用）
pub fn unique_sorted_steps(steps: &[TimelineStep]) -> Vec<u32> {
    let mut numbers: Vec<u32> = steps.iter().map(|s| s.step_number).collect();
    numbers.sort_unstable();
    numbers.dedup();
    numbers
}
