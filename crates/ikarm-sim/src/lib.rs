//! # ikarm Simulator Layer
//!
//! 仿真器抽象层，提供统一的 Supervisor 接口：
//! - 设备枚举（电机、位置传感器等，按节点类型码区分）
//! - 电机位置命令与传感器读数
//! - 场景节点查询（按 DEF 名称）与节点生成
//! - 阻塞式仿真步进（`step()` 返回终止哨兵）
//!
//! 真实仿真器后端只需实现 [`Supervisor`] trait；
//! [`mock::MockSupervisor`] 是无外部依赖的内存实现，用于测试和演示。

use thiserror::Error;

pub mod mock;
pub mod node;

pub use mock::{DEMO_ARM_JOINTS, DEMO_ARM_URDF, MockSupervisor};
pub use node::{DeviceId, DeviceInfo, NodeId, NodeSpec, NodeType, StepOutcome};

/// 仿真层统一错误类型
#[derive(Error, Debug)]
pub enum SimError {
    /// 设备索引越界
    #[error("No device at index {index} (device count: {count})")]
    NoSuchDevice { index: usize, count: usize },

    /// 设备类型不匹配（如对传感器发送电机命令）
    #[error("Device {name:?} is not a {expected}")]
    WrongDeviceKind { name: String, expected: &'static str },

    /// 场景节点不存在
    #[error("Node not found: {0:?}")]
    NoSuchNode(NodeId),

    /// 节点存在但无法提供位姿
    #[error("Node {0:?} does not expose a pose")]
    PoseUnavailable(NodeId),

    /// 后端无法导出机器人 URDF
    #[error("URDF export unavailable: {0}")]
    UrdfUnavailable(String),

    /// 无效输入（如 NaN 位置命令）
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// 仿真器 Supervisor 接口
///
/// 所有方法都是同步的；控制循环与仿真器锁步运行，
/// 唯一的阻塞点是 [`Supervisor::step`]。
pub trait Supervisor {
    /// 基础仿真步长（毫秒）
    fn basic_time_step(&self) -> u32;

    /// 推进仿真 `duration_ms` 毫秒
    ///
    /// 返回 [`StepOutcome::Terminated`] 表示仿真已结束，调用方应退出循环。
    fn step(&mut self, duration_ms: u32) -> StepOutcome;

    /// 设备数量
    fn device_count(&self) -> usize;

    /// 按索引获取设备信息
    fn device(&self, index: usize) -> Result<DeviceInfo, SimError>;

    /// 获取电机关联的位置传感器（没有则返回 `None`）
    fn position_sensor(&self, motor: DeviceId) -> Option<DeviceId>;

    /// 以给定采样周期（毫秒）使能传感器
    fn enable_sensor(&mut self, sensor: DeviceId, sampling_ms: u32) -> Result<(), SimError>;

    /// 读取传感器当前值
    ///
    /// 传感器未使能或尚未采样时返回 NaN。
    fn sensor_value(&self, sensor: DeviceId) -> Result<f64, SimError>;

    /// 设置电机目标位置（弧度）
    fn set_motor_position(&mut self, motor: DeviceId, position: f64) -> Result<(), SimError>;

    /// 控制器所在机器人节点（机械臂基座）
    fn self_node(&self) -> NodeId;

    /// 按 DEF 名称查找场景节点
    fn node_by_def(&self, def: &str) -> Option<NodeId>;

    /// 节点世界坐标位置
    fn node_position(&self, node: NodeId) -> Result<[f64; 3], SimError>;

    /// 节点世界坐标姿态（3x3 旋转矩阵，行优先）
    fn node_orientation(&self, node: NodeId) -> Result<[f64; 9], SimError>;

    /// 在场景根节点下生成新节点
    fn spawn_node(&mut self, spec: &NodeSpec) -> Result<NodeId, SimError>;

    /// 导出控制器所在机器人的 URDF 描述
    fn urdf(&self) -> Result<String, SimError>;
}
