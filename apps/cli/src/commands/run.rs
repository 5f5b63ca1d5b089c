//! run 命令
//!
//! 构建演示场景，打开 IK 求解器，运行控制循环直到仿真结束或 Ctrl+C。

use anyhow::{Context, Result};
use clap::Args;
use ikarm_control::{ArmController, LoopStats};
use ikarm_kinematics::open_solver;
use ikarm_sim::Supervisor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::world::build_world;

/// 控制循环运行参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 仿真时长（秒，覆盖配置）
    #[arg(long)]
    pub duration: Option<f64>,

    /// 以 JSON 输出统计
    #[arg(long)]
    pub stats_json: bool,

    /// 不放置初始目标（控制器会生成替代球体）
    #[arg(long)]
    pub no_target: bool,
}

impl RunCommand {
    /// 按命令行参数覆盖配置
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(duration) = self.duration {
            config.world.duration_secs = duration;
        }
        if self.no_target {
            config.world.spawn_initial_target = false;
        }
    }

    pub fn execute(&self, mut config: AppConfig) -> Result<()> {
        self.apply(&mut config);
        config.validate()?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })
        .context("Failed to install Ctrl+C handler")?;

        let stats = run_loop(&config, Some(shutdown))?;

        if self.stats_json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            print_stats(&stats);
        }
        Ok(())
    }
}

/// 构建场景并运行控制循环
pub fn run_loop(config: &AppConfig, shutdown: Option<Arc<AtomicBool>>) -> Result<LoopStats> {
    let sim = build_world(&config.world, &config.controller.target_def, shutdown)?;
    let urdf = sim.urdf()?;

    let solver = open_solver(&config.solver, &urdf).context("Failed to open IK solver")?;
    let mut controller = match ArmController::start(sim, solver, config.controller.clone()) {
        Ok(controller) => controller,
        Err(e) if e.is_solver_dependency() => {
            error!("{e}");
            return Err(e).context("IK solver check failed");
        },
        Err(e) => return Err(e).context("Controller startup failed"),
    };

    info!(
        motors = controller.motors().len(),
        target_spawned = controller.target().was_spawned(),
        "Controller started"
    );
    Ok(controller.run()?)
}

fn print_stats(stats: &LoopStats) {
    println!("Control loop finished");
    println!("  ticks:          {}", stats.ticks);
    println!("  solves:         {}", stats.solves);
    println!("  skipped:        {}", stats.skipped);
    println!("  failed solves:  {}", stats.failed_solves);
    println!("  motor commands: {}", stats.motor_commands);
}
