//! # Position 模块
//!
//! 元素坐标解析：设备类别 → 像素矩形，以及像素坐标与百分比坐标的互换。
//!
//! ## 设计原则
//!
//! - **唯一来源**：设备到像素、像素到百分比的换算只在本模块完成，其他模块不自行做坐标计算
//! - **无插值**：每个设备类别各自保存一个固定矩形，不在设备之间做百分比推算
//! - **永不产生 NaN**：容器尺寸非法（0、负数、非有限值）时返回确定的兜底值

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::deck::{Element, ElementKind};

/// 设备类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// 桌面端
    #[default]
    Desktop,
    /// 平板
    Tablet,
    /// 手机
    Mobile,
}

impl DeviceClass {
    /// 平板断点（像素，含）
    pub const TABLET_BREAKPOINT: f64 = 768.0;
    /// 桌面断点（像素，含）
    pub const DESKTOP_BREAKPOINT: f64 = 1024.0;

    /// 根据视口宽度推断设备类别
    ///
    /// 非有限宽度按桌面处理。
    pub fn from_viewport_width(width: f64) -> Self {
        if !width.is_finite() || width >= Self::DESKTOP_BREAKPOINT {
            Self::Desktop
        } else if width >= Self::TABLET_BREAKPOINT {
            Self::Tablet
        } else {
            Self::Mobile
        }
    }

    /// 名称（小写）
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        }
    }
}

impl FromStr for DeviceClass {
    type Err = ();

    /// 从字符串解析设备类别（不区分大小写）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "tablet" => Ok(Self::Tablet),
            "mobile" | "phone" => Ok(Self::Mobile),
            _ => Err(()),
        }
    }
}

/// 像素矩形
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 以中心点和尺寸构造矩形
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    /// 矩形中点
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }
}

/// 像素坐标点
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 百分比坐标点（0 - 100）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

impl PercentPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 容器中心
    pub fn center() -> Self {
        Self { x: 50.0, y: 50.0 }
    }

    /// 收敛到 [0, 100]，非有限分量视为 0
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_finite(self.x, 100.0),
            y: clamp_finite(self.y, 100.0),
        }
    }
}

/// 容器尺寸（像素）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerBounds {
    pub width: f64,
    pub height: f64,
}

impl ContainerBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// 宽高是否都是有限正数
    ///
    /// 幻灯片尺寸切换过程中可能短暂出现 0 尺寸，此时所有换算走兜底值。
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// 响应式位置
///
/// 每个设备类别一个固定像素矩形。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponsivePosition {
    pub desktop: Rect,
    pub tablet: Rect,
    pub mobile: Rect,
}

impl ResponsivePosition {
    /// 所有设备使用同一矩形
    pub fn uniform(rect: Rect) -> Self {
        Self {
            desktop: rect,
            tablet: rect,
            mobile: rect,
        }
    }

    /// 取指定设备的矩形
    pub fn get(&self, device: DeviceClass) -> Rect {
        match device {
            DeviceClass::Desktop => self.desktop,
            DeviceClass::Tablet => self.tablet,
            DeviceClass::Mobile => self.mobile,
        }
    }
}

/// 解析元素在指定设备上的像素矩形
///
/// 纯查表，不做任何插值。
pub fn resolve(element: &Element, device: DeviceClass) -> Rect {
    element.position.get(device)
}

/// 元素实际渲染区域
///
/// 热点的渲染尺寸来自尺寸预设（直径），而不是位置矩形的名义宽高，两者可能不一致。
/// 其他元素类型直接使用位置矩形。
pub fn rendered_rect(element: &Element, device: DeviceClass) -> Rect {
    let rect = resolve(element, device);
    match element.kind {
        ElementKind::Hotspot => {
            let diameter = element.style.size.unwrap_or_default().diameter();
            Rect::new(rect.x, rect.y, diameter, diameter)
        }
        ElementKind::Text | ElementKind::Shape => rect,
    }
}

/// 元素视觉中心（像素）
pub fn center_of(element: &Element, device: DeviceClass) -> Point {
    rendered_rect(element, device).center()
}

/// 像素坐标 → 百分比坐标
///
/// 结果收敛到 [0, 100]。容器尺寸非法时返回 `(0, 0)`。
pub fn to_percentage(point: Point, bounds: ContainerBounds) -> PercentPoint {
    if !bounds.is_valid() {
        return PercentPoint::default();
    }
    PercentPoint {
        x: clamp_finite(point.x * 100.0 / bounds.width, 100.0),
        y: clamp_finite(point.y * 100.0 / bounds.height, 100.0),
    }
}

/// 百分比坐标 → 像素坐标
///
/// 结果收敛到 [0, 容器边长]。容器尺寸非法时返回 `(0, 0)`。
pub fn to_pixels(percent: PercentPoint, bounds: ContainerBounds) -> Point {
    if !bounds.is_valid() {
        return Point::default();
    }
    let percent = percent.clamped();
    Point {
        x: percent.x * bounds.width / 100.0,
        y: percent.y * bounds.height / 100.0,
    }
}

fn clamp_finite(value: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{ElementStyle, HotspotSize};

    fn hotspot_at(rect: Rect) -> Element {
        Element::hotspot("hs", ResponsivePosition::uniform(rect))
    }

    #[test]
    fn test_resolve_is_pure_lookup() {
        let position = ResponsivePosition {
            desktop: Rect::new(10.0, 20.0, 100.0, 50.0),
            tablet: Rect::new(5.0, 10.0, 60.0, 30.0),
            mobile: Rect::new(1.0, 2.0, 30.0, 15.0),
        };
        let element = Element::shape("box", position);

        assert_eq!(resolve(&element, DeviceClass::Desktop), position.desktop);
        assert_eq!(resolve(&element, DeviceClass::Tablet), position.tablet);
        assert_eq!(resolve(&element, DeviceClass::Mobile), position.mobile);
    }

    #[test]
    fn test_to_percentage_basic() {
        let p = to_percentage(Point::new(120.0, 120.0), ContainerBounds::new(800.0, 600.0));
        assert_eq!(p, PercentPoint::new(15.0, 20.0));
    }

    #[test]
    fn test_to_percentage_clamps() {
        let bounds = ContainerBounds::new(100.0, 100.0);
        assert_eq!(
            to_percentage(Point::new(-50.0, 250.0), bounds),
            PercentPoint::new(0.0, 100.0)
        );
    }

    #[test]
    fn test_to_percentage_zero_bounds() {
        let p = to_percentage(Point::new(10.0, 10.0), ContainerBounds::new(0.0, 0.0));
        assert_eq!(p, PercentPoint::new(0.0, 0.0));
        assert!(p.x.is_finite() && p.y.is_finite());

        let p = to_percentage(Point::new(10.0, 10.0), ContainerBounds::new(f64::NAN, 600.0));
        assert_eq!(p, PercentPoint::new(0.0, 0.0));

        let p = to_percentage(Point::new(10.0, 10.0), ContainerBounds::new(-800.0, 600.0));
        assert_eq!(p, PercentPoint::new(0.0, 0.0));
    }

    #[test]
    fn test_to_percentage_non_finite_point() {
        let p = to_percentage(
            Point::new(f64::INFINITY, f64::NAN),
            ContainerBounds::new(800.0, 600.0),
        );
        assert_eq!(p, PercentPoint::new(0.0, 0.0));
    }

    #[test]
    fn test_to_pixels() {
        let bounds = ContainerBounds::new(800.0, 600.0);
        assert_eq!(to_pixels(PercentPoint::new(50.0, 50.0), bounds), Point::new(400.0, 300.0));
        assert_eq!(to_pixels(PercentPoint::new(150.0, -3.0), bounds), Point::new(800.0, 0.0));
        assert_eq!(
            to_pixels(PercentPoint::new(50.0, 50.0), ContainerBounds::new(0.0, 600.0)),
            Point::new(0.0, 0.0)
        );
    }

    #[test]
    fn test_center_of_hotspot_uses_preset_diameter() {
        // 位置矩形名义尺寸 100x20，但热点渲染直径由预设决定
        let mut element = hotspot_at(Rect::new(100.0, 100.0, 100.0, 20.0));
        element.style = ElementStyle {
            size: Some(HotspotSize::Small),
            ..ElementStyle::default()
        };
        let d = HotspotSize::Small.diameter();
        assert_eq!(
            center_of(&element, DeviceClass::Desktop),
            Point::new(100.0 + d / 2.0, 100.0 + d / 2.0)
        );
    }

    #[test]
    fn test_center_of_hotspot_default_medium() {
        let element = hotspot_at(Rect::new(100.0, 100.0, 40.0, 40.0));
        assert_eq!(center_of(&element, DeviceClass::Desktop), Point::new(120.0, 120.0));
    }

    #[test]
    fn test_center_of_shape_uses_rect() {
        let element = Element::shape(
            "box",
            ResponsivePosition::uniform(Rect::new(0.0, 0.0, 200.0, 100.0)),
        );
        assert_eq!(center_of(&element, DeviceClass::Mobile), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_device_class_from_width() {
        assert_eq!(DeviceClass::from_viewport_width(1440.0), DeviceClass::Desktop);
        assert_eq!(DeviceClass::from_viewport_width(800.0), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_viewport_width(375.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_viewport_width(f64::NAN), DeviceClass::Desktop);
        assert_eq!("Tablet".parse::<DeviceClass>(), Ok(DeviceClass::Tablet));
        assert!("watch".parse::<DeviceClass>().is_err());
    }
}
