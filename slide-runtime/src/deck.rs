//! # Deck 模块
//!
//! 幻灯片文档数据模型。
//!
//! ## 结构
//!
//! ```text
//! SlideDeck
//!   └─ Slide（有序）
//!        └─ Element（有序，hotspot / text / shape）
//!             └─ Interaction（有序，click / timeline / hover）
//!                  └─ Effect
//! ```
//!
//! ## 设计说明
//!
//! - 文档由持久化层提供，引擎只读（`metadata.modified_at` 由调用方更新）
//! - 所有类型可序列化，JSON 即持久化层的交换格式
//! - id 唯一性是上游约束，引擎不做检查；重复 id 按出现位置区分，不会被合并
//!   （静态检查见 [`crate::diagnostic`]）

use serde::{Deserialize, Serialize};

use crate::effect::Effect;
use crate::error::DeckError;
use crate::position::{ContainerBounds, Rect, ResponsivePosition};

/// 幻灯片文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideDeck {
    /// 文档 id
    pub id: String,
    /// 文档标题
    #[serde(default)]
    pub title: String,
    /// 幻灯片（有序）
    #[serde(default)]
    pub slides: Vec<Slide>,
    /// 文档级设置
    #[serde(default)]
    pub settings: DeckSettings,
    /// 元数据
    #[serde(default)]
    pub metadata: DeckMetadata,
}

impl SlideDeck {
    /// 创建新文档
    pub fn new(id: impl Into<String>, slides: Vec<Slide>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            slides,
            settings: DeckSettings::default(),
            metadata: DeckMetadata::default(),
        }
    }

    /// 从 JSON 文本解析
    pub fn from_json(text: &str) -> Result<Self, DeckError> {
        Ok(serde_json::from_str(text)?)
    }

    /// 序列化为格式化 JSON
    pub fn to_json_pretty(&self) -> Result<String, DeckError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 设置文档级选项
    pub fn with_settings(mut self, settings: DeckSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 按索引获取幻灯片
    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// 查找幻灯片索引（重复 id 取第一个）
    pub fn slide_index_of(&self, slide_id: &str) -> Option<usize> {
        self.slides.iter().position(|s| s.id == slide_id)
    }

    /// 幻灯片数量
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// 是否没有幻灯片
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// 文档级设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSettings {
    /// 加载后是否自动播放时间轴
    #[serde(default)]
    pub auto_advance: bool,

    /// 是否允许手动跳转步骤
    #[serde(default = "default_allow_navigation")]
    pub allow_navigation: bool,

    /// 作者配置的步骤间停顿（毫秒）
    ///
    /// 未设置时使用 [`EngineConfig::default_step_pause_ms`](crate::EngineConfig)。
    #[serde(default)]
    pub auto_progression_delay_ms: Option<f64>,
}

fn default_allow_navigation() -> bool {
    true
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            auto_advance: false,
            allow_navigation: default_allow_navigation(),
            auto_progression_delay_ms: None,
        }
    }
}

/// 文档元数据（Unix 毫秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeckMetadata {
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub modified_at: u64,
}

/// 幻灯片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// 幻灯片 id（文档内唯一）
    pub id: String,
    /// 标题
    #[serde(default)]
    pub title: Option<String>,
    /// 元素（有序）
    #[serde(default)]
    pub elements: Vec<Element>,
    /// 布局
    #[serde(default)]
    pub layout: SlideLayout,
}

impl Slide {
    /// 创建新幻灯片（默认布局）
    pub fn new(id: impl Into<String>, elements: Vec<Element>) -> Self {
        Self {
            id: id.into(),
            title: None,
            elements,
            layout: SlideLayout::default(),
        }
    }

    /// 设置布局
    pub fn with_layout(mut self, layout: SlideLayout) -> Self {
        self.layout = layout;
        self
    }

    /// 按 id 查找元素（重复 id 取第一个）
    pub fn find_element(&self, element_id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == element_id)
    }
}

/// 幻灯片布局
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideLayout {
    /// 宽高比描述，如 `"16:9"`
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    /// 容器宽度（像素）
    #[serde(default = "default_container_width")]
    pub container_width: f64,
    /// 容器高度（像素）
    #[serde(default = "default_container_height")]
    pub container_height: f64,
    /// 背景缩放策略
    #[serde(default)]
    pub background_size: BackgroundSize,
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

fn default_container_width() -> f64 {
    1280.0
}

fn default_container_height() -> f64 {
    720.0
}

impl Default for SlideLayout {
    fn default() -> Self {
        Self {
            aspect_ratio: default_aspect_ratio(),
            container_width: default_container_width(),
            container_height: default_container_height(),
            background_size: BackgroundSize::default(),
        }
    }
}

impl SlideLayout {
    /// 指定容器尺寸的布局
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            container_width: width,
            container_height: height,
            ..Self::default()
        }
    }

    /// 容器尺寸
    pub fn bounds(&self) -> ContainerBounds {
        ContainerBounds::new(self.container_width, self.container_height)
    }
}

/// 背景缩放策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundSize {
    #[default]
    Cover,
    Contain,
    Fill,
    Auto,
}

/// 元素类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// 交互热点（渲染尺寸来自尺寸预设）
    Hotspot,
    /// 文本块
    Text,
    /// 形状
    Shape,
}

/// 热点尺寸预设
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotspotSize {
    Small,
    #[default]
    Medium,
    Large,
    #[serde(alias = "x-large")]
    XLarge,
}

impl HotspotSize {
    /// 渲染直径（像素）
    pub fn diameter(&self) -> f64 {
        match self {
            Self::Small => 24.0,
            Self::Medium => 40.0,
            Self::Large => 56.0,
            Self::XLarge => 72.0,
        }
    }
}

/// 元素样式
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementStyle {
    /// 热点尺寸预设（仅 hotspot 使用）
    #[serde(default)]
    pub size: Option<HotspotSize>,
    /// 颜色（CSS 颜色字符串，原样透传给渲染层）
    #[serde(default)]
    pub color: Option<String>,
    /// 不透明度 (0.0 - 1.0)
    #[serde(default)]
    pub opacity: Option<f64>,
}

/// 幻灯片元素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// 元素 id（幻灯片内唯一）
    pub id: String,
    /// 元素类型
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// 标题（modal 效果的默认标题）
    #[serde(default)]
    pub title: Option<String>,
    /// 各设备的像素矩形
    pub position: ResponsivePosition,
    /// 样式
    #[serde(default)]
    pub style: ElementStyle,
    /// 是否可见
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// 交互（有序）
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

fn default_visible() -> bool {
    true
}

impl Element {
    /// 创建元素
    pub fn new(id: impl Into<String>, kind: ElementKind, position: ResponsivePosition) -> Self {
        Self {
            id: id.into(),
            kind,
            title: None,
            position,
            style: ElementStyle::default(),
            visible: true,
            interactions: Vec::new(),
        }
    }

    /// 创建热点
    pub fn hotspot(id: impl Into<String>, position: ResponsivePosition) -> Self {
        Self::new(id, ElementKind::Hotspot, position)
    }

    /// 创建文本元素
    pub fn text(id: impl Into<String>, position: ResponsivePosition) -> Self {
        Self::new(id, ElementKind::Text, position)
    }

    /// 创建形状元素
    pub fn shape(id: impl Into<String>, position: ResponsivePosition) -> Self {
        Self::new(id, ElementKind::Shape, position)
    }

    /// 所有设备相同矩形的热点
    pub fn hotspot_at(id: impl Into<String>, rect: Rect) -> Self {
        Self::hotspot(id, ResponsivePosition::uniform(rect))
    }

    /// 设置标题
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// 设置热点尺寸预设
    pub fn with_size(mut self, size: HotspotSize) -> Self {
        self.style.size = Some(size);
        self
    }

    /// 追加交互
    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interactions.push(interaction);
        self
    }
}

/// 交互触发方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// 点击
    Click,
    /// 时间轴驱动
    Timeline,
    /// 悬停
    Hover,
}

/// 交互
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// 交互 id（元素内唯一）
    pub id: String,
    /// 触发方式
    pub trigger: Trigger,
    /// 效果
    pub effect: Effect,
}

impl Interaction {
    pub fn new(id: impl Into<String>, trigger: Trigger, effect: Effect) -> Self {
        Self {
            id: id.into(),
            trigger,
            effect,
        }
    }

    /// 时间轴触发的交互
    pub fn timeline(id: impl Into<String>, effect: Effect) -> Self {
        Self::new(id, Trigger::Timeline, effect)
    }

    /// 点击触发的交互
    pub fn click(id: impl Into<String>, effect: Effect) -> Self {
        Self::new(id, Trigger::Click, effect)
    }
}
