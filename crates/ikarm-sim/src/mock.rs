//! Mock 仿真后端
//!
//! 纯内存实现的 [`Supervisor`]，不依赖任何仿真引擎：
//! - 电机按速度上限向目标位置移动（每步积分一次）
//! - 位置传感器使能后每步采样对应电机位置，未使能时读数为 NaN
//! - 场景节点只保存位姿，可挂载按仿真时间驱动的轨迹
//! - 支持仿真时长上限和外部关闭标志（如 Ctrl+C）作为终止条件

use crate::node::{DeviceId, DeviceInfo, NodeId, NodeSpec, NodeType, StepOutcome};
use crate::{SimError, Supervisor};
use nalgebra::{Rotation3, Unit, Vector3};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// 演示机械臂的 URDF 描述（6 个旋转关节）
pub const DEMO_ARM_URDF: &str = include_str!("../assets/demo_arm.urdf");

/// 演示机械臂的关节名称（与 URDF 中的关节顺序一致）
pub const DEMO_ARM_JOINTS: [&str; 6] = [
    "shoulder_pan",
    "shoulder_lift",
    "elbow",
    "wrist_1",
    "wrist_2",
    "wrist_3",
];

/// Mock 后端为位置传感器分配的类型码
pub const POSITION_SENSOR_TYPE: u16 = 49;

const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// 节点轨迹：输入仿真时间（秒），输出位置和行优先旋转矩阵
pub type Trajectory = Box<dyn FnMut(f64) -> ([f64; 3], [f64; 9])>;

enum DeviceKind {
    Motor {
        position: f64,
        target: Option<f64>,
        max_velocity: f64,
        sensor: Option<usize>,
        commands: usize,
    },
    PositionSensor {
        motor: usize,
        sampling_ms: Option<u32>,
        value: f64,
    },
    Other,
}

struct MockDevice {
    name: String,
    node_type: NodeType,
    kind: DeviceKind,
}

struct MockNode {
    def: Option<String>,
    pose: Option<([f64; 3], [f64; 9])>,
}

/// 内存仿真器
pub struct MockSupervisor {
    basic_time_step: u32,
    time_ms: u64,
    steps: u64,
    duration_limit_ms: Option<u64>,
    shutdown: Option<Arc<AtomicBool>>,
    devices: Vec<MockDevice>,
    nodes: Vec<MockNode>,
    urdf: Option<String>,
    trajectories: HashMap<String, Trajectory>,
    spawned: Vec<NodeSpec>,
}

impl MockSupervisor {
    /// 创建空场景，机器人节点（`self_node`）位于原点
    pub fn new(basic_time_step: u32) -> Self {
        Self {
            basic_time_step,
            time_ms: 0,
            steps: 0,
            duration_limit_ms: None,
            shutdown: None,
            devices: Vec::new(),
            nodes: vec![MockNode {
                def: None,
                pose: Some(([0.0; 3], IDENTITY)),
            }],
            urdf: None,
            trajectories: HashMap::new(),
            spawned: Vec::new(),
        }
    }

    /// 创建带演示机械臂的场景
    ///
    /// 按 [`DEMO_ARM_JOINTS`] 顺序添加 6 个旋转电机（每个带位置传感器），
    /// 并挂载 [`DEMO_ARM_URDF`]。
    pub fn demo_arm(basic_time_step: u32, max_velocity: f64) -> Self {
        let mut sim = Self::new(basic_time_step).with_urdf(DEMO_ARM_URDF);
        for joint in DEMO_ARM_JOINTS {
            sim.add_motor(joint, max_velocity);
        }
        sim
    }

    pub fn with_urdf(mut self, urdf: impl Into<String>) -> Self {
        self.urdf = Some(urdf.into());
        self
    }

    /// 设置机器人节点（机械臂基座）的世界位姿
    pub fn with_self_pose(mut self, position: [f64; 3], orientation: [f64; 9]) -> Self {
        self.nodes[0].pose = Some((position, orientation));
        self
    }

    /// 仿真时间达到上限后 `step()` 返回终止哨兵
    pub fn with_duration_limit(mut self, limit: Duration) -> Self {
        self.duration_limit_ms = Some(u64::try_from(limit.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// 标志置位后 `step()` 返回终止哨兵
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    /// 添加旋转电机及其位置传感器（传感器名为 `<name>_sensor`）
    pub fn add_motor(&mut self, name: impl Into<String>, max_velocity: f64) -> DeviceId {
        let name = name.into();
        let motor = self.push_motor(name.clone(), max_velocity);
        let sensor = self.devices.len();
        self.devices.push(MockDevice {
            name: format!("{name}_sensor"),
            node_type: NodeType::Other(POSITION_SENSOR_TYPE),
            kind: DeviceKind::PositionSensor {
                motor: motor.0,
                sampling_ms: None,
                value: f64::NAN,
            },
        });
        if let DeviceKind::Motor { sensor: slot, .. } = &mut self.devices[motor.0].kind {
            *slot = Some(sensor);
        }
        motor
    }

    /// 添加不带位置传感器的旋转电机
    pub fn add_motor_without_sensor(
        &mut self,
        name: impl Into<String>,
        max_velocity: f64,
    ) -> DeviceId {
        self.push_motor(name.into(), max_velocity)
    }

    /// 添加非电机设备（只参与枚举）
    pub fn add_device(&mut self, name: impl Into<String>, node_type: NodeType) -> DeviceId {
        let id = DeviceId(self.devices.len());
        self.devices.push(MockDevice {
            name: name.into(),
            node_type,
            kind: DeviceKind::Other,
        });
        id
    }

    /// 添加带位姿的场景节点
    pub fn add_node(
        &mut self,
        def: impl Into<String>,
        position: [f64; 3],
        orientation: [f64; 9],
    ) -> NodeId {
        self.nodes.push(MockNode {
            def: Some(def.into()),
            pose: Some((position, orientation)),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// 添加无法提供位姿的场景节点
    pub fn add_node_without_pose(&mut self, def: impl Into<String>) -> NodeId {
        self.nodes.push(MockNode {
            def: Some(def.into()),
            pose: None,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// 直接设置节点位姿（模拟用户拖动场景中的物体）
    pub fn set_node_pose(
        &mut self,
        node: NodeId,
        position: [f64; 3],
        orientation: [f64; 9],
    ) -> Result<(), SimError> {
        let entry = self.nodes.get_mut(node.0).ok_or(SimError::NoSuchNode(node))?;
        entry.pose = Some((position, orientation));
        Ok(())
    }

    /// 为指定 DEF 名称的节点挂载轨迹
    ///
    /// 每次步进后按当前仿真时间更新该节点位姿；
    /// 节点可以稍后才生成，轨迹从它出现的那一步开始生效。
    pub fn set_trajectory<F>(&mut self, def: impl Into<String>, trajectory: F)
    where
        F: FnMut(f64) -> ([f64; 3], [f64; 9]) + 'static,
    {
        self.trajectories.insert(def.into(), Box::new(trajectory));
    }

    /// 当前仿真时间（毫秒）
    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    /// 已完成的步进次数
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// 通过 `spawn_node` 生成过的节点
    pub fn spawned_nodes(&self) -> &[NodeSpec] {
        &self.spawned
    }

    /// 电机当前位置
    pub fn motor_position(&self, motor: DeviceId) -> Option<f64> {
        match self.devices.get(motor.0)?.kind {
            DeviceKind::Motor { position, .. } => Some(position),
            _ => None,
        }
    }

    /// 电机最近一次收到的目标位置
    pub fn motor_target(&self, motor: DeviceId) -> Option<f64> {
        match self.devices.get(motor.0)?.kind {
            DeviceKind::Motor { target, .. } => target,
            _ => None,
        }
    }

    /// 单个电机收到的位置命令数
    pub fn motor_command_count(&self, motor: DeviceId) -> usize {
        match self.devices.get(motor.0).map(|d| &d.kind) {
            Some(DeviceKind::Motor { commands, .. }) => *commands,
            _ => 0,
        }
    }

    /// 所有电机收到的位置命令总数
    pub fn total_motor_commands(&self) -> usize {
        self.devices
            .iter()
            .map(|d| match d.kind {
                DeviceKind::Motor { commands, .. } => commands,
                _ => 0,
            })
            .sum()
    }

    fn push_motor(&mut self, name: String, max_velocity: f64) -> DeviceId {
        let id = DeviceId(self.devices.len());
        self.devices.push(MockDevice {
            name,
            node_type: NodeType::RotationalMotor,
            kind: DeviceKind::Motor {
                position: 0.0,
                target: None,
                // NaN 也落到 0（max 会忽略 NaN）
                max_velocity: max_velocity.max(0.0),
                sensor: None,
                commands: 0,
            },
        });
        id
    }

    fn advance_motors(&mut self, dt: f64) {
        for device in &mut self.devices {
            if let DeviceKind::Motor {
                position,
                target: Some(target),
                max_velocity,
                ..
            } = &mut device.kind
            {
                let max_delta = *max_velocity * dt;
                *position += (*target - *position).clamp(-max_delta, max_delta);
            }
        }
    }

    fn advance_trajectories(&mut self) {
        let t = self.time_ms as f64 / 1000.0;
        for (def, trajectory) in self.trajectories.iter_mut() {
            if let Some(node) = self
                .nodes
                .iter_mut()
                .rev()
                .find(|n| n.def.as_deref() == Some(def.as_str()))
            {
                node.pose = Some(trajectory(t));
            }
        }
    }

    fn sample_sensors(&mut self) {
        let positions: Vec<Option<f64>> = self
            .devices
            .iter()
            .map(|d| match d.kind {
                DeviceKind::Motor { position, .. } => Some(position),
                _ => None,
            })
            .collect();

        for device in &mut self.devices {
            if let DeviceKind::PositionSensor {
                motor,
                sampling_ms: Some(_),
                value,
            } = &mut device.kind
                && let Some(Some(position)) = positions.get(*motor)
            {
                *value = *position;
            }
        }
    }

    fn node(&self, node: NodeId) -> Result<&MockNode, SimError> {
        self.nodes.get(node.0).ok_or(SimError::NoSuchNode(node))
    }
}

impl Supervisor for MockSupervisor {
    fn basic_time_step(&self) -> u32 {
        self.basic_time_step
    }

    fn step(&mut self, duration_ms: u32) -> StepOutcome {
        if let Some(flag) = &self.shutdown
            && flag.load(Ordering::SeqCst)
        {
            info!("Shutdown requested, terminating simulation");
            return StepOutcome::Terminated;
        }
        if let Some(limit) = self.duration_limit_ms
            && self.time_ms >= limit
        {
            debug!(time_ms = self.time_ms, "Simulation duration limit reached");
            return StepOutcome::Terminated;
        }

        self.time_ms += u64::from(duration_ms);
        self.steps += 1;
        self.advance_motors(f64::from(duration_ms) / 1000.0);
        self.advance_trajectories();
        self.sample_sensors();
        StepOutcome::Continue
    }

    fn device_count(&self) -> usize {
        self.devices.len()
    }

    fn device(&self, index: usize) -> Result<DeviceInfo, SimError> {
        let device = self.devices.get(index).ok_or(SimError::NoSuchDevice {
            index,
            count: self.devices.len(),
        })?;
        Ok(DeviceInfo {
            id: DeviceId(index),
            name: device.name.clone(),
            node_type: device.node_type,
        })
    }

    fn position_sensor(&self, motor: DeviceId) -> Option<DeviceId> {
        match self.devices.get(motor.0)?.kind {
            DeviceKind::Motor { sensor, .. } => sensor.map(DeviceId),
            _ => None,
        }
    }

    fn enable_sensor(&mut self, sensor: DeviceId, sampling_ms: u32) -> Result<(), SimError> {
        if sampling_ms == 0 {
            return Err(SimError::InvalidInput(
                "sensor sampling period must be > 0 ms".to_string(),
            ));
        }
        let count = self.devices.len();
        let device = self.devices.get_mut(sensor.0).ok_or(SimError::NoSuchDevice {
            index: sensor.0,
            count,
        })?;
        match &mut device.kind {
            DeviceKind::PositionSensor { sampling_ms: slot, .. } => {
                *slot = Some(sampling_ms);
                Ok(())
            },
            _ => Err(SimError::WrongDeviceKind {
                name: device.name.clone(),
                expected: "position sensor",
            }),
        }
    }

    fn sensor_value(&self, sensor: DeviceId) -> Result<f64, SimError> {
        let device = self.devices.get(sensor.0).ok_or(SimError::NoSuchDevice {
            index: sensor.0,
            count: self.devices.len(),
        })?;
        match device.kind {
            DeviceKind::PositionSensor {
                sampling_ms: Some(_),
                value,
                ..
            } => Ok(value),
            DeviceKind::PositionSensor { sampling_ms: None, .. } => Ok(f64::NAN),
            _ => Err(SimError::WrongDeviceKind {
                name: device.name.clone(),
                expected: "position sensor",
            }),
        }
    }

    fn set_motor_position(&mut self, motor: DeviceId, position: f64) -> Result<(), SimError> {
        if !position.is_finite() {
            return Err(SimError::InvalidInput(format!(
                "motor position must be finite, got {position}"
            )));
        }
        let count = self.devices.len();
        let device = self.devices.get_mut(motor.0).ok_or(SimError::NoSuchDevice {
            index: motor.0,
            count,
        })?;
        match &mut device.kind {
            DeviceKind::Motor {
                target, commands, ..
            } => {
                *target = Some(position);
                *commands += 1;
                Ok(())
            },
            _ => Err(SimError::WrongDeviceKind {
                name: device.name.clone(),
                expected: "rotational motor",
            }),
        }
    }

    fn self_node(&self) -> NodeId {
        NodeId(0)
    }

    fn node_by_def(&self, def: &str) -> Option<NodeId> {
        // 同名节点以最后生成的为准
        self.nodes
            .iter()
            .rposition(|n| n.def.as_deref() == Some(def))
            .map(NodeId)
    }

    fn node_position(&self, node: NodeId) -> Result<[f64; 3], SimError> {
        self.node(node)?
            .pose
            .map(|(position, _)| position)
            .ok_or(SimError::PoseUnavailable(node))
    }

    fn node_orientation(&self, node: NodeId) -> Result<[f64; 9], SimError> {
        self.node(node)?
            .pose
            .map(|(_, orientation)| orientation)
            .ok_or(SimError::PoseUnavailable(node))
    }

    fn spawn_node(&mut self, spec: &NodeSpec) -> Result<NodeId, SimError> {
        if !spec.translation.iter().all(|v| v.is_finite()) {
            return Err(SimError::InvalidInput(format!(
                "node translation must be finite, got {:?}",
                spec.translation
            )));
        }
        debug!(node = %spec.to_vrml(), "Importing node");
        self.nodes.push(MockNode {
            def: Some(spec.def_name.clone()),
            pose: Some((spec.translation, axis_angle_to_matrix(spec.rotation))),
        });
        self.spawned.push(spec.clone());
        Ok(NodeId(self.nodes.len() - 1))
    }

    fn urdf(&self) -> Result<String, SimError> {
        self.urdf.clone().ok_or_else(|| {
            SimError::UrdfUnavailable("no robot description attached to mock supervisor".into())
        })
    }
}

/// 轴角 `[x, y, z, angle]` 转行优先旋转矩阵
///
/// 零轴或非有限输入退化为单位旋转。
fn axis_angle_to_matrix(rotation: [f64; 4]) -> [f64; 9] {
    let [x, y, z, angle] = rotation;
    if !rotation.iter().all(|v| v.is_finite()) {
        return IDENTITY;
    }
    let Some(axis) = Unit::try_new(Vector3::new(x, y, z), f64::EPSILON) else {
        return IDENTITY;
    };
    let m = Rotation3::from_axis_angle(&axis, angle).into_inner();
    let mut row_major = [0.0; 9];
    row_major.copy_from_slice(m.transpose().as_slice());
    row_major
}
