//! # ikarm CLI
//!
//! 在内存仿真场景中运行目标跟随 IK 控制器。
//!
//! ```bash
//! # 运行 10 秒（默认时长），结束时打印统计
//! ikarm-cli run
//!
//! # 不放置初始目标，由控制器生成替代球体
//! ikarm-cli run --no-target --duration 5 --stats-json
//!
//! # 查看设备枚举结果
//! ikarm-cli devices
//!
//! # 配置管理
//! ikarm-cli config init
//! ikarm-cli config show
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod world;

use commands::{ConfigCommand, DevicesCommand, RunCommand};
use config::AppConfig;

/// 日志默认作用的 crate
const LOG_TARGETS: [&str; 4] = ["ikarm_cli", "ikarm_control", "ikarm_kinematics", "ikarm_sim"];

/// ikarm CLI - 机械臂目标跟随演示
#[derive(Parser, Debug)]
#[command(name = "ikarm-cli")]
#[command(about = "Drive a simulated arm towards a movable target with inverse kinematics", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 <config_dir>/ikarm/config.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 日志级别（RUST_LOG 中的指令优先）
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 运行控制循环直到仿真结束或 Ctrl+C
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 列出演示场景中的设备
    Devices {
        #[command(flatten)]
        args: DevicesCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Run { args } => {
            let config = AppConfig::load(cli.config.as_deref())?;
            args.execute(config)
        },

        Commands::Devices { args } => {
            let config = AppConfig::load(cli.config.as_deref())?;
            args.execute(&config)
        },

        Commands::Config(cmd) => cmd.execute(cli.config.as_deref()),
    }
}

fn init_logging(level: &str) -> Result<()> {
    let mut filter = EnvFilter::from_default_env();
    for target in LOG_TARGETS {
        filter = filter.add_directive(format!("{target}={level}").parse()?);
    }

    // stdout 留给统计输出
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
