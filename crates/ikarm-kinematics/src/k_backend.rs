//! `k` crate 后端
//!
//! 从 URDF 构建串联运动链，使用 `k::JacobianIkSolver` 迭代求解。
//! `k` 的运动链只能从文件加载，URDF 字符串先写入临时文件。

use crate::error::KinematicsError;
use crate::pose::TargetPose;
use crate::solution::JointSolution;
use crate::solver::{IkSolver, K_BACKEND, SolverConfig, SolverInfo};
use k::InverseKinematicsSolver;
use k::nalgebra as kna;
use std::io::Write;
use tracing::{debug, info};

/// 构建时锁定的 `k` crate 版本
pub const K_VERSION: semver::Version = semver::Version::new(0, 32, 0);

/// 基于 `k` crate 的 IK 求解器
pub struct KChainSolver {
    arm: k::SerialChain<f64>,
    solver: k::JacobianIkSolver<f64>,
    constraints: k::Constraints,
}

impl KChainSolver {
    /// 从 URDF 字符串构建
    ///
    /// # Errors
    /// - `KinematicsError::Io`: 临时文件写入失败
    /// - `KinematicsError::Chain`: URDF 解析失败或末端连杆不存在
    pub fn from_urdf(urdf: &str, config: &SolverConfig) -> Result<Self, KinematicsError> {
        let mut file = tempfile::Builder::new()
            .prefix("ikarm-")
            .suffix(".urdf")
            .tempfile()?;
        file.write_all(urdf.as_bytes())?;
        file.flush()?;

        let chain = k::Chain::<f64>::from_urdf_file(file.path())
            .map_err(|e| KinematicsError::Chain(e.to_string()))?;

        let end = match config.end_link.as_deref() {
            Some(link) => chain
                .find_link(link)
                .ok_or_else(|| KinematicsError::Chain(format!("end link {link:?} not found")))?,
            None => chain
                .iter()
                .last()
                .ok_or_else(|| KinematicsError::Chain("URDF contains no joints".to_string()))?,
        };
        let arm = k::SerialChain::from_end(end);

        let solver = k::JacobianIkSolver::new(
            config.allowable_distance,
            config.allowable_angle,
            config.jacobian_multiplier,
            config.max_iterations,
        );
        let constraints = if config.orientation {
            k::Constraints::default()
        } else {
            k::Constraints {
                rotation_x: false,
                rotation_y: false,
                rotation_z: false,
                ..Default::default()
            }
        };

        info!(
            dof = arm.dof(),
            orientation = config.orientation,
            "Built kinematic chain from URDF"
        );
        Ok(Self {
            arm,
            solver,
            constraints,
        })
    }

    /// 正运动学：给定关节角，返回末端在基座坐标系中的位姿
    pub fn forward(&self, joints: &[f64]) -> Result<TargetPose, KinematicsError> {
        self.arm
            .set_joint_positions(joints)
            .map_err(|e| KinematicsError::Solver(e.to_string()))?;
        Ok(from_isometry(&self.arm.end_transform()))
    }
}

impl IkSolver for KChainSolver {
    fn info(&self) -> SolverInfo {
        SolverInfo {
            name: K_BACKEND.to_string(),
            version: K_VERSION,
        }
    }

    fn dof(&self) -> Option<usize> {
        Some(self.arm.dof())
    }

    fn solve(&mut self, target: &TargetPose, seed: &[f64]) -> Result<JointSolution, KinematicsError> {
        let dof = self.arm.dof();
        if seed.len() != dof {
            return Err(KinematicsError::SeedLength {
                expected: dof,
                actual: seed.len(),
            });
        }

        self.arm.set_joint_positions_clamped(seed);
        self.arm.update_transforms();

        let goal = to_isometry(target);
        match self
            .solver
            .solve_with_constraints(&self.arm, &goal, &self.constraints)
        {
            Ok(()) => {
                let joints = self.arm.joint_positions();
                debug!(?joints, "IK converged");
                // 运动链以固定基座为根，基座帧取 0
                Ok(JointSolution::with_base(0.0, joints))
            },
            // 奇异位形下雅可比不可逆，同样按未收敛处理
            Err(e @ (k::Error::NotConvergedError { .. } | k::Error::InverseMatrixError)) => {
                Err(KinematicsError::NotConverged(e.to_string()))
            },
            Err(e) => Err(KinematicsError::Solver(e.to_string())),
        }
    }
}

fn to_isometry(pose: &TargetPose) -> kna::Isometry3<f64> {
    let (p, r) = pose.to_raw();
    let matrix = kna::Matrix3::from_row_slice(&r);
    let rotation = kna::UnitQuaternion::from_rotation_matrix(&kna::Rotation3::from_matrix(&matrix));
    kna::Isometry3::from_parts(kna::Translation3::new(p[0], p[1], p[2]), rotation)
}

fn from_isometry(iso: &kna::Isometry3<f64>) -> TargetPose {
    let t = &iso.translation.vector;
    let m = iso.rotation.to_rotation_matrix().into_inner();
    TargetPose::from_raw(
        [t.x, t.y, t.z],
        [
            m[(0, 0)],
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 0)],
            m[(1, 1)],
            m[(1, 2)],
            m[(2, 0)],
            m[(2, 1)],
            m[(2, 2)],
        ],
    )
}
