//! 目标相对位姿查询
//!
//! IK 运动链以机械臂基座为根，因此目标位姿需要从世界坐标系
//! 换算到基座坐标系后才能交给求解器。

use crate::error::KinematicsError;
use crate::pose::{Pose, TargetPose};
use ikarm_sim::{NodeId, Supervisor};
use tracing::trace;

/// 相对机械臂基座的位姿查询器
#[derive(Debug, Clone, Copy)]
pub struct RelativePositions {
    base: NodeId,
}

impl RelativePositions {
    /// 以控制器所在机器人节点为基座
    pub fn new<S: Supervisor + ?Sized>(supervisor: &S) -> Self {
        Self {
            base: supervisor.self_node(),
        }
    }

    /// 以任意节点为基座
    pub fn with_base(base: NodeId) -> Self {
        Self { base }
    }

    pub fn base(&self) -> NodeId {
        self.base
    }

    /// 基座世界位姿
    pub fn base_pose<S: Supervisor + ?Sized>(&self, supervisor: &S) -> Result<Pose, KinematicsError> {
        node_pose(supervisor, self.base)
    }

    /// 查询 DEF 名为 `def` 的节点相对基座的位姿
    pub fn get_pose<S: Supervisor + ?Sized>(
        &self,
        supervisor: &S,
        def: &str,
    ) -> Result<TargetPose, KinematicsError> {
        let target = supervisor
            .node_by_def(def)
            .ok_or_else(|| KinematicsError::TargetNotFound(def.to_string()))?;
        let base = self.base_pose(supervisor)?;
        let relative = node_pose(supervisor, target)?.relative_to(&base);
        trace!(target = def, position = ?relative.position, "Relative target pose");
        Ok(relative)
    }
}

fn node_pose<S: Supervisor + ?Sized>(supervisor: &S, node: NodeId) -> Result<Pose, KinematicsError> {
    Ok(Pose::from_raw(
        supervisor.node_position(node)?,
        supervisor.node_orientation(node)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ikarm_sim::{MockSupervisor, SimError};
    use nalgebra::{Matrix3, Vector3};

    const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    // 绕 z 轴 90°
    const ROT_Z_90: [f64; 9] = [0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_get_pose_relative_to_self() {
        let mut sim = MockSupervisor::new(16).with_self_pose([0.0, 0.0, 0.5], ROT_Z_90);
        sim.add_node("TARGET", [0.0, 1.0, 0.5], ROT_Z_90);

        let positions = RelativePositions::new(&sim);
        let pose = positions.get_pose(&sim, "TARGET").unwrap();
        assert_relative_eq!(pose.position, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(pose.rotation, Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_get_pose_missing_target() {
        let sim = MockSupervisor::new(16);
        let positions = RelativePositions::new(&sim);
        assert!(matches!(
            positions.get_pose(&sim, "TARGET"),
            Err(KinematicsError::TargetNotFound(name)) if name == "TARGET"
        ));
    }

    #[test]
    fn test_get_pose_without_pose() {
        let mut sim = MockSupervisor::new(16);
        sim.add_node_without_pose("TARGET");
        let positions = RelativePositions::new(&sim);
        assert!(matches!(
            positions.get_pose(&sim, "TARGET"),
            Err(KinematicsError::Sim(SimError::PoseUnavailable(_)))
        ));
    }

    #[test]
    fn test_custom_base() {
        let mut sim = MockSupervisor::new(16);
        let base = sim.add_node("BASE", [1.0, 1.0, 0.0], IDENTITY);
        sim.add_node("TARGET", [1.5, 1.0, 0.0], IDENTITY);

        let positions = RelativePositions::with_base(base);
        assert_eq!(positions.base(), base);
        let pose = positions.get_pose(&sim, "TARGET").unwrap();
        assert_relative_eq!(pose.position, Vector3::new(0.5, 0.0, 0.0), epsilon = 1e-12);
    }
}
