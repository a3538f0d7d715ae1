//! # Effect 模块
//!
//! 交互效果的**文档形态**：作者在文档里写下的原始参数。
//!
//! 这里只做结构提取，不解释语义，也不填默认值；
//! 默认值填充、参数校验、目标定位都由 [`crate::effects::resolve`] 完成。
//!
//! ## 文档格式
//!
//! ```text
//! { "params": { "type": "spotlight", "shape": "circle" }, "duration": 800 }
//! { "params": { "type": "glow" } }      -> EffectParams::Unsupported { kind: "glow" }
//! ```
//!
//! 效果类型是封闭集合；集合外的 `type` 依然能被解析，落到 `Unsupported`，
//! 由 resolver 转成无操作效果。
//!
//! 集合内类型的个别字段格式错误（如 `"shape": "hexagon"`）只丢弃该字段，
//! 字段名记入 [`Effect::malformed`]，由 resolver 按默认值处理并上报。

use serde::{Deserialize, Serialize};

use crate::position::PercentPoint;

/// 效果（文档形态）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "params_repr::EffectRepr")]
pub struct Effect {
    /// 各类型专属参数
    #[serde(serialize_with = "params_repr::serialize")]
    pub params: EffectParams,
    /// 持续时间（毫秒），未设置时由 resolver 按类型取默认值
    #[serde(default)]
    pub duration: Option<f64>,
    /// 延迟（毫秒）
    #[serde(default)]
    pub delay: Option<f64>,
    /// 缓动标识，如 `"ease-in-out"`
    #[serde(default)]
    pub easing: Option<String>,
    /// 解析时因格式错误被丢弃的字段名
    #[serde(skip)]
    pub malformed: Vec<String>,
}

impl Effect {
    /// 创建只有参数的效果
    pub fn new(params: EffectParams) -> Self {
        Self {
            params,
            duration: None,
            delay: None,
            easing: None,
            malformed: Vec::new(),
        }
    }

    /// 设置持续时间
    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration = Some(duration_ms);
        self
    }

    /// 设置延迟
    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay = Some(delay_ms);
        self
    }

    /// 设置缓动
    pub fn with_easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    /// 规整后的延迟：未设置为 0，非法值（负数 / NaN / 无穷）也为 0
    pub fn delay_ms(&self) -> u64 {
        coerce_ms(self.delay).unwrap_or(0)
    }
}

/// 把文档里的毫秒数规整为非负整数
///
/// - `None` → `None`（交给调用方决定默认值）
/// - 负数、NaN、无穷 → `Some(0)`
pub fn coerce_ms(value: Option<f64>) -> Option<u64> {
    value.map(|v| {
        if v.is_finite() && v > 0.0 {
            v.round() as u64
        } else {
            0
        }
    })
}

/// 毫秒数是否需要被规整（用于上报参数问题）
pub(crate) fn is_invalid_ms(value: Option<f64>) -> bool {
    matches!(value, Some(v) if !v.is_finite() || v < 0.0)
}

/// 效果参数
///
/// 每个变体只携带本类型需要的参数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectParams {
    /// 聚光灯：压暗全屏，只留目标区域
    Spotlight(SpotlightParams),
    /// 平移缩放
    PanZoom(PanZoomParams),
    /// 显示文本
    ShowText(ShowTextParams),
    /// 模态框
    Modal(ModalParams),
    /// 提示气泡
    Tooltip(TooltipParams),
    /// 声音
    Sound(SoundParams),
    /// 切换幻灯片
    Transition(TransitionParams),
    /// 不认识的效果类型（保留原始名称）
    #[serde(skip)]
    Unsupported { kind: String },
}

impl EffectParams {
    /// 文档中的类型名
    pub fn type_name(&self) -> &str {
        match self {
            Self::Spotlight(_) => "spotlight",
            Self::PanZoom(_) => "pan_zoom",
            Self::ShowText(_) => "show_text",
            Self::Modal(_) => "modal",
            Self::Tooltip(_) => "tooltip",
            Self::Sound(_) => "sound",
            Self::Transition(_) => "transition",
            Self::Unsupported { kind } => kind,
        }
    }

    /// 引用的目标元素 id（如果有）
    pub fn target_element_id(&self) -> Option<&str> {
        match self {
            Self::Spotlight(p) => p.target_id.as_deref(),
            Self::PanZoom(p) => p.target_id.as_deref(),
            Self::Tooltip(p) => p.target_id.as_deref(),
            _ => None,
        }
    }
}

/// 聚光灯形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotlightShape {
    #[default]
    Circle,
    Rectangle,
    Oval,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotlightParams {
    pub shape: Option<SpotlightShape>,
    /// 压暗程度（0 - 100）
    pub dim_percentage: Option<f64>,
    /// 显式目标位置（百分比），未设置时以触发元素中心为目标
    pub position: Option<PercentPoint>,
    /// 光圈宽度（像素）
    pub width: Option<f64>,
    /// 光圈高度（像素）
    pub height: Option<f64>,
    /// 以同一幻灯片上的另一个元素为目标
    pub target_id: Option<String>,
    /// 附带说明文字
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanZoomParams {
    /// 缩放目标（百分比）
    pub target: Option<PercentPoint>,
    pub zoom_level: Option<f64>,
    pub smooth: Option<bool>,
    pub target_id: Option<String>,
}

/// 文本显示方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDisplayMode {
    #[default]
    Modal,
    Banner,
    Overlay,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowTextParams {
    pub text: Option<String>,
    pub display_mode: Option<TextDisplayMode>,
    pub font_size: Option<f64>,
    /// 是否自动关闭；未设置时一直显示直到被关闭
    pub auto_close: Option<bool>,
    pub position: Option<PercentPoint>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalParams {
    pub title: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipParams {
    pub text: Option<String>,
    /// 锚点（百分比），未设置时锚定触发元素
    pub anchor: Option<PercentPoint>,
    pub target_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundParams {
    pub url: Option<String>,
    /// 音量 (0.0 - 1.0)
    pub volume: Option<f64>,
}

/// 相对切换方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideDirection {
    Next,
    Previous,
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionParams {
    /// 目标幻灯片 id（优先于 `direction`）
    pub target_slide_id: Option<String>,
    pub direction: Option<SlideDirection>,
}

/// `Effect` 的文档表示
///
/// 先按 `serde_json::Value` 读入，再逐层宽松解析：
/// 集合外的类型只保留 `type` 字段；集合内类型的坏字段被丢弃并记录。
mod params_repr {
    use serde::{Deserialize, Serialize, Serializer};
    use serde_json::{Map, Value};

    use super::{Effect, EffectParams};

    const KNOWN_TYPES: [&str; 7] = [
        "spotlight",
        "pan_zoom",
        "show_text",
        "modal",
        "tooltip",
        "sound",
        "transition",
    ];

    #[derive(Deserialize)]
    pub struct EffectRepr {
        params: Value,
        #[serde(default)]
        duration: Option<Value>,
        #[serde(default)]
        delay: Option<Value>,
        #[serde(default)]
        easing: Option<Value>,
    }

    impl TryFrom<EffectRepr> for Effect {
        type Error = String;

        fn try_from(repr: EffectRepr) -> Result<Self, Self::Error> {
            let mut malformed = Vec::new();
            let params = parse_params(repr.params, &mut malformed)?;
            let duration = number_field("duration", repr.duration, &mut malformed);
            let delay = number_field("delay", repr.delay, &mut malformed);
            let easing = match repr.easing {
                None | Some(Value::Null) => None,
                Some(Value::String(id)) => Some(id),
                Some(_) => {
                    malformed.push("easing".to_string());
                    None
                }
            };
            Ok(Effect {
                params,
                duration,
                delay,
                easing,
                malformed,
            })
        }
    }

    fn number_field(name: &str, value: Option<Value>, malformed: &mut Vec<String>) -> Option<f64> {
        match value {
            None | Some(Value::Null) => None,
            Some(v) => {
                let number = v.as_f64();
                if number.is_none() {
                    malformed.push(name.to_string());
                }
                number
            }
        }
    }

    fn parse_params(value: Value, malformed: &mut Vec<String>) -> Result<EffectParams, String> {
        let Value::Object(fields) = value else {
            return Err("效果参数必须是对象".to_string());
        };
        let Some(kind) = fields.get("type").and_then(Value::as_str).map(str::to_string) else {
            return Err("效果参数缺少 type 字段".to_string());
        };
        if !KNOWN_TYPES.contains(&kind.as_str()) {
            return Ok(EffectParams::Unsupported { kind });
        }
        if let Ok(params) = serde_json::from_value(Value::Object(fields.clone())) {
            return Ok(params);
        }

        // 逐个字段尝试，只保留能通过解析的字段
        let mut kept = Map::new();
        kept.insert("type".to_string(), Value::String(kind));
        for (name, field) in fields {
            if name == "type" {
                continue;
            }
            let mut candidate = kept.clone();
            candidate.insert(name.clone(), field);
            if serde_json::from_value::<EffectParams>(Value::Object(candidate.clone())).is_ok() {
                kept = candidate;
            } else {
                malformed.push(name);
            }
        }
        serde_json::from_value(Value::Object(kept)).map_err(|e| e.to_string())
    }

    #[derive(Serialize)]
    struct OtherRef<'a> {
        #[serde(rename = "type")]
        kind: &'a str,
    }

    pub(super) fn serialize<S: Serializer>(
        params: &EffectParams,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match params {
            EffectParams::Unsupported { kind } => OtherRef { kind }.serialize(serializer),
            known => known.serialize(serializer),
        }
    }
}
