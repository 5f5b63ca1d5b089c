//! # ikarm Kinematics
//!
//! 目标位姿与逆运动学求解器接口层：
//!
//! - [`pose`] - 位姿类型（位置 + 3x3 旋转矩阵）及相对变换
//! - [`relative`] - 目标相对机械臂基座的位姿查询
//! - [`solution`] - IK 解（首元素为基座帧，其余为关节角）
//! - [`solver`] - [`IkSolver`] trait、求解器版本检查、后端选择
//!
//! ## Feature Flags
//!
//! - `kinematics` - 启用基于 `k` crate 的雅可比 IK 后端（[`KChainSolver`]）
//!
//! 不启用任何后端时，[`open_solver`] 返回 [`KinematicsError::BackendUnavailable`]，
//! 控制器仍可搭配自定义 [`IkSolver`] 实现使用。

mod error;
pub mod pose;
pub mod relative;
pub mod solution;
pub mod solver;

#[cfg(feature = "kinematics")]
mod k_backend;

pub use error::KinematicsError;
pub use pose::{Pose, TargetPose};
pub use relative::RelativePositions;
pub use solution::JointSolution;
pub use solver::{IkSolver, K_BACKEND, SolverConfig, SolverInfo, check_solver_version, open_solver};

#[cfg(feature = "kinematics")]
pub use k_backend::{K_VERSION, KChainSolver};
