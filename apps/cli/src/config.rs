//! 应用配置
//!
//! 查找顺序：`--config <path>` → `<config_dir>/ikarm/config.toml` → 默认值。

use crate::world::WorldConfig;
use anyhow::{Context, Result};
use ikarm_control::ControllerConfig;
use ikarm_kinematics::SolverConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 应用配置（所有字段可省略）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub controller: ControllerConfig,
    pub solver: SolverConfig,
    pub world: WorldConfig,
}

/// 默认配置文件路径
pub fn default_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine config directory"))?;
    path.push("ikarm");
    path.push("config.toml");
    Ok(path)
}

impl AppConfig {
    /// 按查找顺序加载并校验配置
    ///
    /// 显式指定的文件必须存在；默认位置没有文件时使用默认值。
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_path() {
                Ok(path) if path.exists() => Self::from_file(&path)?,
                Ok(path) => {
                    debug!(path = %path.display(), "No config file, using defaults");
                    Self::default()
                },
                Err(e) => {
                    debug!("{e}, using defaults");
                    Self::default()
                },
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.controller.validate()?;
        self.world.validate()?;
        Ok(())
    }

    /// 写入配置文件（父目录不存在时创建）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let content = format!("# ikarm configuration\n\n{}", self.to_toml()?);
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }
}
