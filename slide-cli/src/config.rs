//! # Config 模块
//!
//! 命令行宿主的配置管理。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (slide-cli.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use slide_runtime::{ContainerBounds, DeviceClass, EngineConfig};

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 引擎配置
    #[serde(default)]
    pub engine: EngineConfig,

    /// 默认设备类别
    #[serde(default)]
    pub device: DeviceClass,

    /// 容器宽度（像素）
    #[serde(default = "default_container_width")]
    pub container_width: f64,

    /// 容器高度（像素）
    #[serde(default = "default_container_height")]
    pub container_height: f64,

    /// `play` 命令默认运行时长（毫秒）
    #[serde(default = "default_run_ms")]
    pub run_ms: u64,

    /// 虚拟时钟步长（毫秒）
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_container_width() -> f64 {
    1280.0
}

fn default_container_height() -> f64 {
    720.0
}

fn default_run_ms() -> u64 {
    60_000
}

fn default_tick_ms() -> u64 {
    100
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            device: DeviceClass::default(),
            container_width: default_container_width(),
            container_height: default_container_height(),
            run_ms: default_run_ms(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录日志。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            tracing::info!(?path, "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    tracing::debug!(?path, "配置文件加载成功");
                    config
                }
                Err(e) => {
                    tracing::warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 容器尺寸
    pub fn bounds(&self) -> ContainerBounds {
        ContainerBounds::new(self.container_width, self.container_height)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bounds().is_valid() {
            return Err(ConfigError::ValidationFailed(format!(
                "容器尺寸必须为正数: {}x{}",
                self.container_width, self.container_height
            )));
        }

        if self.tick_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "tick_ms 必须大于 0".to_string(),
            ));
        }

        if self.tick_ms > self.run_ms {
            return Err(ConfigError::ValidationFailed(format!(
                "tick_ms ({}) 不能大于 run_ms ({})",
                self.tick_ms, self.run_ms
            )));
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(#[from] serde_json::Error),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(#[from] std::io::Error),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
