//! 目标跟随控制器
//!
//! 每个 tick：读取目标相对基座的位姿，与上一 tick 比较，
//! 变化时以当前关节角为初值求解 IK，并把解（跳过基座元素）下发给电机。

use crate::cache::PoseCache;
use crate::config::ControllerConfig;
use crate::devices::{MotorChannel, discover_motors};
use crate::error::ControlError;
use crate::stats::LoopStats;
use crate::target::{TargetStatus, ensure_target};
use ikarm_kinematics::{
    IkSolver, JointSolution, KinematicsError, RelativePositions, TargetPose, check_solver_version,
};
use ikarm_sim::{StepOutcome, Supervisor};
use tracing::{debug, info, trace, warn};

/// 单个 tick 的结果
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// 目标未变化，未求解
    Unchanged,
    /// 已求解并下发电机命令
    Commanded { joints: Vec<f64> },
    /// 求解器未收敛，本 tick 不下发命令
    NotConverged,
}

/// 目标跟随控制器
///
/// 持有仿真器句柄与求解器，控制循环单线程运行。
pub struct ArmController<S: Supervisor, K: IkSolver> {
    supervisor: S,
    solver: K,
    config: ControllerConfig,
    positions: RelativePositions,
    target: TargetStatus,
    motors: Vec<MotorChannel>,
    cache: PoseCache,
    stats: LoopStats,
    step_ms: u32,
}

impl<S: Supervisor, K: IkSolver> ArmController<S, K> {
    /// 启动检查并初始化控制器
    ///
    /// 顺序：配置校验 → 求解器版本 → 目标节点（缺失时生成）→ 电机发现。
    /// 求解器缺失或版本过旧时立即返回错误，不会触碰场景。
    pub fn start(mut supervisor: S, solver: K, config: ControllerConfig) -> Result<Self, ControlError> {
        config.validate()?;

        let info = solver.info();
        check_solver_version(&info, &config.min_solver_version)?;
        info!(
            backend = %info.name,
            version = %info.version,
            required = %config.min_solver_version,
            "IK solver ready"
        );

        let target = ensure_target(&mut supervisor, &config.target_def, &config.spawn)?;
        let positions = RelativePositions::new(&supervisor);

        let time_step = supervisor.basic_time_step();
        let motors = discover_motors(&mut supervisor, config.motor_node_type, time_step)?;
        if motors.is_empty() {
            warn!(
                node_type = config.motor_node_type,
                "No motors found, IK solutions will not be applied"
            );
        }
        if let Some(dof) = solver.dof()
            && dof != motors.len()
        {
            warn!(
                chain_joints = dof,
                motors = motors.len(),
                "Kinematic chain and motor count differ"
            );
        }

        let step_ms = config.ik_step_size.checked_mul(time_step).ok_or_else(|| {
            ControlError::InvalidConfig(format!(
                "ik_step_size {} x basic time step {} ms overflows",
                config.ik_step_size, time_step
            ))
        })?;
        if step_ms == 0 {
            return Err(ControlError::InvalidConfig(
                "simulator basic time step must be > 0 ms".to_string(),
            ));
        }

        info!(
            step_ms,
            motors = motors.len(),
            "Move or rotate the {} to move the arm",
            config.target_def
        );

        let cache = PoseCache::new(config.change_tolerance);
        Ok(Self {
            supervisor,
            solver,
            config,
            positions,
            target,
            motors,
            cache,
            stats: LoopStats::default(),
            step_ms,
        })
    }

    /// 运行控制循环直到仿真器返回终止哨兵
    pub fn run(&mut self) -> Result<LoopStats, ControlError> {
        while self.supervisor.step(self.step_ms) == StepOutcome::Continue {
            self.tick()?;
        }

        info!(
            ticks = self.stats.ticks,
            solves = self.stats.solves,
            skipped = self.stats.skipped,
            failed_solves = self.stats.failed_solves,
            motor_commands = self.stats.motor_commands,
            "Simulation terminated, control loop stopped"
        );
        Ok(self.stats.clone())
    }

    /// 执行一次控制迭代（不推进仿真时间）
    pub fn tick(&mut self) -> Result<TickOutcome, ControlError> {
        self.stats.ticks += 1;
        let pose = self.positions.get_pose(&self.supervisor, &self.config.target_def)?;

        let changed = self.cache.changed(&pose);
        let outcome = if changed {
            self.solve_and_command(&pose)?
        } else {
            self.stats.skipped += 1;
            trace!("Target unchanged, skipping IK");
            TickOutcome::Unchanged
        };

        self.cache.observe(pose, changed);
        Ok(outcome)
    }

    fn solve_and_command(&mut self, pose: &TargetPose) -> Result<TickOutcome, ControlError> {
        let seed = self.joint_seed()?;
        debug!(position = ?pose.position, "Target moved, solving IK");

        let solution = match self.solver.solve(pose, &seed) {
            Ok(solution) => solution,
            Err(KinematicsError::NotConverged(reason)) => {
                self.stats.failed_solves += 1;
                warn!("IK did not converge, keeping previous motor targets: {}", reason);
                return Ok(TickOutcome::NotConverged);
            },
            Err(e) => return Err(e.into()),
        };
        self.command_motors(&solution)?;
        self.stats.solves += 1;
        Ok(TickOutcome::Commanded {
            joints: solution.actuated()[..self.motors.len()].to_vec(),
        })
    }

    /// 当前关节角，缺失或非有限的读数按 0.0 处理
    fn joint_seed(&self) -> Result<Vec<f64>, ControlError> {
        self.motors
            .iter()
            .map(|channel| -> Result<f64, ControlError> {
                match channel.sensor {
                    Some(sensor) => {
                        let value = self.supervisor.sensor_value(sensor)?;
                        Ok(if value.is_finite() { value } else { 0.0 })
                    },
                    None => Ok(0.0),
                }
            })
            .collect()
    }

    fn command_motors(&mut self, solution: &JointSolution) -> Result<(), ControlError> {
        let joints = solution.actuated();
        if joints.len() < self.motors.len() {
            return Err(ControlError::SolutionTooShort {
                expected: self.motors.len(),
                actual: joints.len(),
            });
        }

        for (channel, &angle) in self.motors.iter().zip(joints) {
            self.supervisor.set_motor_position(channel.motor.id, angle)?;
            self.stats.motor_commands += 1;
        }
        Ok(())
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn motors(&self) -> &[MotorChannel] {
        &self.motors
    }

    /// 启动时目标节点的来源
    pub fn target(&self) -> TargetStatus {
        self.target
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn supervisor(&self) -> &S {
        &self.supervisor
    }

    pub fn supervisor_mut(&mut self) -> &mut S {
        &mut self.supervisor
    }

    /// 每个 tick 推进的仿真时间（毫秒）
    pub fn step_ms(&self) -> u32 {
        self.step_ms
    }

    /// 取回仿真器与求解器
    pub fn into_parts(self) -> (S, K) {
        (self.supervisor, self.solver)
    }
}
