//! # 诊断模块
//!
//! 文档静态检查：不运行时间轴，只遍历文档结构。
//!
//! - 诊断分级：Error（必须修复）、Warn（建议修复）、Info（信息提示）
//! - 引擎本身不会因为这些问题拒绝文档，重复 id 等问题在运行时按位置区分

use std::collections::HashSet;

use crate::deck::{SlideDeck, Trigger};
use crate::effect::EffectParams;

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    /// 文档 id
    pub deck_id: String,
    /// 文档内位置，如 `slide[0]/hs1/i1`
    pub location: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(deck_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, deck_id, message)
    }

    pub fn warn(deck_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warn, deck_id, message)
    }

    pub fn info(deck_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, deck_id, message)
    }

    fn new(level: DiagnosticLevel, deck_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            deck_id: deck_id.into(),
            location: None,
            message: message.into(),
        }
    }

    /// 设置文档内位置
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.deck_id)?;
        if let Some(location) = &self.location {
            write!(f, " {}", location)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    pub fn warn_count(&self) -> usize {
        self.count(DiagnosticLevel::Warn)
    }

    pub fn info_count(&self) -> usize {
        self.count(DiagnosticLevel::Info)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 按最低级别过滤
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }
}

/// 静态检查文档
///
/// | 问题 | 级别 |
/// |------|------|
/// | 幻灯片 id 重复 | Error |
/// | 同一幻灯片内元素 id 重复 | Error |
/// | 同一元素内交互 id 重复 | Error |
/// | 不支持的效果类型 | Warn |
/// | `target_id` / `target_slide_id` 指向不存在的对象 | Warn |
/// | 隐藏元素上的时间轴交互 | Info |
pub fn analyze_deck(deck: &SlideDeck) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();
    let deck_id = deck.id.as_str();

    let mut slide_ids = HashSet::new();
    for (slide_index, slide) in deck.slides.iter().enumerate() {
        let slide_loc = format!("slide[{}]", slide_index);
        if !slide_ids.insert(slide.id.as_str()) {
            result.push(
                Diagnostic::error(deck_id, format!("幻灯片 id '{}' 重复", slide.id)).at(&slide_loc),
            );
        }

        let mut element_ids = HashSet::new();
        for element in &slide.elements {
            let element_loc = format!("{}/{}", slide_loc, element.id);
            if !element_ids.insert(element.id.as_str()) {
                result.push(
                    Diagnostic::error(deck_id, format!("元素 id '{}' 在幻灯片内重复", element.id))
                        .at(&element_loc),
                );
            }

            let mut interaction_ids = HashSet::new();
            for interaction in &element.interactions {
                let loc = format!("{}/{}", element_loc, interaction.id);
                if !interaction_ids.insert(interaction.id.as_str()) {
                    result.push(
                        Diagnostic::error(
                            deck_id,
                            format!("交互 id '{}' 在元素内重复", interaction.id),
                        )
                        .at(&loc),
                    );
                }

                let params = &interaction.effect.params;
                if let EffectParams::Unsupported { kind } = params {
                    result.push(
                        Diagnostic::warn(deck_id, format!("不支持的效果类型 '{}'", kind)).at(&loc),
                    );
                }

                if let Some(target_id) = params.target_element_id()
                    && slide.find_element(target_id).is_none()
                {
                    result.push(
                        Diagnostic::warn(deck_id, format!("目标元素 '{}' 不存在", target_id))
                            .at(&loc),
                    );
                }

                if let EffectParams::Transition(transition) = params
                    && let Some(target) = &transition.target_slide_id
                    && deck.slide_index_of(target).is_none()
                {
                    result.push(
                        Diagnostic::warn(deck_id, format!("目标幻灯片 '{}' 不存在", target))
                            .at(&loc),
                    );
                }

                if interaction.trigger == Trigger::Timeline && !element.visible {
                    result.push(
                        Diagnostic::info(deck_id, "隐藏元素上的时间轴交互仍会执行").at(&loc),
                    );
                }
            }
        }
    }

    result
}
