//! 目标节点检查与替代标记生成

use crate::config::SpawnConfig;
use crate::error::ControlError;
use ikarm_kinematics::RelativePositions;
use ikarm_sim::{NodeId, NodeSpec, Supervisor};
use nalgebra::Vector3;
use tracing::{info, warn};

/// 目标节点来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// 场景中已有目标
    Found(NodeId),
    /// 目标缺失，已生成替代标记
    Spawned(NodeId),
}

impl TargetStatus {
    pub fn node(self) -> NodeId {
        match self {
            TargetStatus::Found(node) | TargetStatus::Spawned(node) => node,
        }
    }

    pub fn was_spawned(self) -> bool {
        matches!(self, TargetStatus::Spawned(_))
    }
}

/// 确保场景中存在可读位姿的目标节点
///
/// 节点不存在或无法提供位姿时生成一次替代球体，然后重新检查；
/// 仍不可用则返回 [`ControlError::TargetUnavailable`]。
pub fn ensure_target<S: Supervisor + ?Sized>(
    supervisor: &mut S,
    def: &str,
    spawn: &SpawnConfig,
) -> Result<TargetStatus, ControlError> {
    if let Some(node) = readable_node(supervisor, def) {
        info!(target = def, node = node.0, "Found target node");
        return Ok(TargetStatus::Found(node));
    }

    warn!("No {def} defined. Spawning {def} sphere");
    spawn_target(supervisor, def, spawn)?;

    readable_node(supervisor, def)
        .map(TargetStatus::Spawned)
        .ok_or_else(|| ControlError::TargetUnavailable(def.to_string()))
}

/// 在机械臂前方生成目标球体
///
/// `spawn.offset` 为基座坐标系下的偏移，换算到世界坐标系后作为球心。
pub fn spawn_target<S: Supervisor + ?Sized>(
    supervisor: &mut S,
    def: &str,
    spawn: &SpawnConfig,
) -> Result<NodeId, ControlError> {
    let base = RelativePositions::new(supervisor).base_pose(supervisor)?;
    let center = base.transform_point(&Vector3::from(spawn.offset));

    let spec = NodeSpec::sphere(def, [center.x, center.y, center.z], spawn.radius)
        .with_color(spawn.color)
        .with_transparency(spawn.transparency);
    let node = supervisor.spawn_node(&spec)?;
    info!(
        target = def,
        node = node.0,
        position = ?[center.x, center.y, center.z],
        "Spawned target sphere"
    );
    Ok(node)
}

fn readable_node<S: Supervisor + ?Sized>(supervisor: &S, def: &str) -> Option<NodeId> {
    let node = supervisor.node_by_def(def)?;
    match supervisor.node_position(node) {
        Ok(_) => Some(node),
        Err(e) => {
            warn!(target = def, "Target node exists but has no readable pose: {}", e);
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ikarm_sim::MockSupervisor;

    const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    // 绕 z 轴 90°
    const ROT_Z_90: [f64; 9] = [0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_existing_target_is_found() {
        let mut sim = MockSupervisor::new(16);
        let node = sim.add_node("TARGET", [0.4, 0.0, 0.3], IDENTITY);

        let status = ensure_target(&mut sim, "TARGET", &SpawnConfig::default()).unwrap();
        assert_eq!(status, TargetStatus::Found(node));
        assert!(!status.was_spawned());
        assert!(sim.spawned_nodes().is_empty());
    }

    #[test]
    fn test_missing_target_spawns_once() {
        let mut sim = MockSupervisor::new(16);
        let status = ensure_target(&mut sim, "TARGET", &SpawnConfig::default()).unwrap();

        assert!(status.was_spawned());
        assert_eq!(sim.spawned_nodes().len(), 1);
        let spec = &sim.spawned_nodes()[0];
        assert_eq!(spec.def_name, "TARGET");
        assert_eq!(spec.translation, [0.3, 0.0, 0.4]);
        assert_eq!(sim.node_by_def("TARGET"), Some(status.node()));
    }

    #[test]
    fn test_target_without_pose_triggers_spawn() {
        let mut sim = MockSupervisor::new(16);
        let stale = sim.add_node_without_pose("TARGET");

        let status = ensure_target(&mut sim, "TARGET", &SpawnConfig::default()).unwrap();
        assert!(status.was_spawned());
        assert_ne!(status.node(), stale);
        assert_eq!(sim.spawned_nodes().len(), 1);
    }

    #[test]
    fn test_spawn_offset_follows_base_frame() {
        let mut sim = MockSupervisor::new(16).with_self_pose([1.0, 2.0, 0.0], ROT_Z_90);
        spawn_target(&mut sim, "GOAL", &SpawnConfig::default()).unwrap();

        // 基座坐标系 x 方向 0.3 米对应世界坐标系 y 方向
        let t = sim.spawned_nodes()[0].translation;
        assert!((t[0] - 1.0).abs() < 1e-12);
        assert!((t[1] - 2.3).abs() < 1e-12);
        assert!((t[2] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_spawn_rejected_by_simulator() {
        let mut sim = MockSupervisor::new(16);
        sim.add_node_without_pose("TARGET");
        // 非有限的生成位置会被仿真器拒绝
        let spawn = SpawnConfig {
            offset: [f64::NAN, 0.0, 0.0],
            ..SpawnConfig::default()
        };
        let err = ensure_target(&mut sim, "TARGET", &spawn).unwrap_err();
        assert!(matches!(err, ControlError::Sim(_)));
    }
}
