//! devices 命令
//!
//! 列出演示场景中的设备及其类型码，标出会被控制器驱动的电机。

use anyhow::Result;
use clap::Args;
use ikarm_sim::Supervisor;

use crate::config::AppConfig;
use crate::world::build_world;

/// 设备列表参数
#[derive(Args, Debug)]
pub struct DevicesCommand {
    /// 只显示电机
    #[arg(long)]
    pub motors_only: bool,
}

/// 设备列表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRow {
    pub index: usize,
    pub name: String,
    pub node_type: u16,
    pub is_motor: bool,
}

impl DevicesCommand {
    pub fn execute(&self, config: &AppConfig) -> Result<()> {
        let rows = self.list(config)?;

        println!("{:>5}  {:<20} {:>6}  motor", "index", "name", "type");
        for row in &rows {
            println!(
                "{:>5}  {:<20} {:>6}  {}",
                row.index,
                row.name,
                row.node_type,
                if row.is_motor { "yes" } else { "-" }
            );
        }
        let motors = rows.iter().filter(|r| r.is_motor).count();
        println!();
        println!("{} devices, {} motors (type {})", rows.len(), motors, config.controller.motor_node_type);
        Ok(())
    }

    pub fn list(&self, config: &AppConfig) -> Result<Vec<DeviceRow>> {
        let sim = build_world(&config.world, &config.controller.target_def, None)?;
        let motor_type = config.controller.motor_node_type;

        let mut rows = Vec::with_capacity(sim.device_count());
        for index in 0..sim.device_count() {
            let device = sim.device(index)?;
            let node_type = device.node_type.code();
            let is_motor = node_type == motor_type;
            if self.motors_only && !is_motor {
                continue;
            }
            rows.push(DeviceRow {
                index,
                name: device.name,
                node_type,
                is_motor,
            });
        }
        Ok(rows)
    }
}
