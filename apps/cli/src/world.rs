//! 演示场景
//!
//! 基于 [`MockSupervisor`] 构建：6 自由度演示机械臂、若干非电机设备、
//! 可选的初始目标，以及驱动目标做圆周运动的轨迹。

use anyhow::{Context, Result, bail};
use ikarm_sim::{MockSupervisor, NodeType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tracing::info;

const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// 与机械臂无关的设备（类型码, 名称），用来验证电机筛选
const DISTRACTOR_DEVICES: [(u16, &str); 2] = [(38, "camera"), (41, "display")];

/// 演示场景配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// 基础仿真步长（毫秒）
    pub basic_time_step_ms: u32,

    /// 仿真时长（秒），到达后 `step()` 返回终止哨兵
    pub duration_secs: f64,

    /// 启动时是否已放置目标
    pub spawn_initial_target: bool,

    /// 电机速度上限（rad/s）
    pub motor_max_velocity: f64,

    /// 是否添加非电机设备
    pub distractor_devices: bool,

    /// 目标运动
    pub motion: TargetMotion,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            basic_time_step_ms: 16,
            duration_secs: 10.0,
            spawn_initial_target: true,
            motor_max_velocity: 2.0,
            distractor_devices: true,
            motion: TargetMotion::default(),
        }
    }
}

/// 目标圆周运动（水平面内绕 `center` 旋转）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetMotion {
    /// 为 false 时目标静止于 `center`
    pub enabled: bool,
    pub center: [f64; 3],
    /// 半径（米）
    pub radius: f64,
    /// 角速度（rad/s）
    pub angular_speed: f64,
    /// 每步叠加的均匀随机抖动幅值（米），0 表示无抖动
    pub jitter: f64,
    pub seed: u64,
}

impl Default for TargetMotion {
    fn default() -> Self {
        Self {
            enabled: true,
            center: [0.35, 0.0, 0.45],
            radius: 0.1,
            angular_speed: 0.5,
            jitter: 0.0,
            seed: 42,
        }
    }
}

impl TargetMotion {
    /// `t` 秒时的目标位置
    pub fn position_at(&self, t: f64) -> [f64; 3] {
        if !self.enabled {
            return self.center;
        }
        let angle = (self.angular_speed * t) % TAU;
        let (s, c) = angle.sin_cos();
        [
            self.center[0] + self.radius * c,
            self.center[1] + self.radius * s,
            self.center[2],
        ]
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.basic_time_step_ms == 0 {
            bail!("world.basic_time_step_ms must be > 0");
        }
        if !self.duration_secs.is_finite() || self.duration_secs < 0.0 {
            bail!(
                "world.duration_secs must be finite and >= 0, got {}",
                self.duration_secs
            );
        }
        if !self.motor_max_velocity.is_finite() || self.motor_max_velocity <= 0.0 {
            bail!(
                "world.motor_max_velocity must be > 0, got {}",
                self.motor_max_velocity
            );
        }
        let m = &self.motion;
        if !m.center.iter().all(|v| v.is_finite())
            || !m.radius.is_finite()
            || !m.angular_speed.is_finite()
        {
            bail!("world.motion values must be finite");
        }
        if !m.jitter.is_finite() || m.jitter < 0.0 {
            bail!("world.motion.jitter must be finite and >= 0, got {}", m.jitter);
        }
        Ok(())
    }
}

/// 按配置构建场景
///
/// `target_def` 为控制器查找的目标名称；轨迹按名称挂载，
/// 因此控制器稍后生成的替代目标也会跟随运动。
pub fn build_world(
    config: &WorldConfig,
    target_def: &str,
    shutdown: Option<Arc<AtomicBool>>,
) -> Result<MockSupervisor> {
    config.validate()?;
    let duration_limit = Duration::try_from_secs_f64(config.duration_secs).with_context(|| {
        format!(
            "world.duration_secs = {} is out of range",
            config.duration_secs
        )
    })?;

    let mut sim = MockSupervisor::new(config.basic_time_step_ms)
        .with_urdf(ikarm_sim::DEMO_ARM_URDF)
        .with_duration_limit(duration_limit);
    if let Some(flag) = shutdown {
        sim = sim.with_shutdown_flag(flag);
    }

    if config.distractor_devices {
        let (code, name) = DISTRACTOR_DEVICES[0];
        sim.add_device(name, NodeType::from(code));
    }
    for joint in ikarm_sim::DEMO_ARM_JOINTS {
        sim.add_motor(joint, config.motor_max_velocity);
    }
    if config.distractor_devices {
        let (code, name) = DISTRACTOR_DEVICES[1];
        sim.add_device(name, NodeType::from(code));
    }

    let motion = config.motion.clone();
    if config.spawn_initial_target {
        sim.add_node(target_def, motion.position_at(0.0), IDENTITY);
    }

    if motion.enabled || motion.jitter > 0.0 {
        let mut rng = StdRng::seed_from_u64(motion.seed);
        sim.set_trajectory(target_def, move |t| {
            let mut position = motion.position_at(t);
            if motion.jitter > 0.0 {
                for v in &mut position {
                    *v += rng.gen_range(-motion.jitter..=motion.jitter);
                }
            }
            (position, IDENTITY)
        });
    }

    info!(
        time_step_ms = config.basic_time_step_ms,
        duration_secs = config.duration_secs,
        initial_target = config.spawn_initial_target,
        moving = config.motion.enabled,
        "Demo world ready"
    );
    Ok(sim)
}
