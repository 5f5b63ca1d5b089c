//! # ikarm Control
//!
//! 目标跟随控制循环：
//!
//! 1. 启动检查：求解器版本、`TARGET` 节点（缺失时生成一次）
//! 2. 设备发现：按类型码筛选旋转电机，使能配对的位置传感器
//! 3. 每 `ik_step_size` 个基础步长执行一次 tick：
//!    读取目标相对位姿 → 变化检测 → IK 求解 → 下发电机位置
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use ikarm_control::{ArmController, ControllerConfig};
//! use ikarm_kinematics::{SolverConfig, open_solver};
//! use ikarm_sim::{MockSupervisor, Supervisor};
//!
//! let sim = MockSupervisor::demo_arm(16, 2.0);
//! let solver = open_solver(&SolverConfig::default(), &sim.urdf()?)?;
//! let mut controller = ArmController::start(sim, solver, ControllerConfig::default())?;
//! let stats = controller.run()?;
//! ```

mod cache;
mod config;
mod controller;
mod devices;
mod error;
mod stats;
mod target;

pub use cache::PoseCache;
pub use config::{ControllerConfig, ROTATIONAL_MOTOR_TYPE, SpawnConfig};
pub use controller::{ArmController, TickOutcome};
pub use devices::{MotorChannel, discover_motors};
pub use error::ControlError;
pub use stats::LoopStats;
pub use target::{TargetStatus, ensure_target, spawn_target};
