//! 配置管理命令

use anyhow::{Result, bail};
use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::config::{AppConfig, default_path};

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 打印生效的配置（TOML）
    Show,

    /// 写入默认配置文件
    Init {
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },

    /// 打印配置文件路径
    Path,
}

impl ConfigCommand {
    pub fn execute(self, explicit: Option<&Path>) -> Result<()> {
        match self {
            ConfigCommand::Show => {
                let config = AppConfig::load(explicit)?;
                print!("{}", config.to_toml()?);
            },

            ConfigCommand::Init { force } => {
                let path = Self::init_(explicit, force)?;
                println!("✅ Wrote default config to {}", path.display());
            },

            ConfigCommand::Path => {
                let path = resolve_path(explicit)?;
                let state = if path.exists() { "" } else { " (not created)" };
                println!("{}{}", path.display(), state);
            },
        }
        Ok(())
    }

    fn init_(explicit: Option<&Path>, force: bool) -> Result<PathBuf> {
        let path = resolve_path(explicit)?;
        if path.exists() && !force {
            bail!(
                "Config file {} already exists (use --force to overwrite)",
                path.display()
            );
        }
        AppConfig::default().save(&path)?;
        Ok(path)
    }
}

fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_path(),
    }
}
