//! IK 求解器接口
//!
//! 数值求解方法本身由外部 crate 提供，这里只定义：
//! - [`IkSolver`] trait：控制循环与求解器之间的接缝
//! - [`check_solver_version`]：启动时的求解器版本检查
//! - [`open_solver`]：按名称选择后端

use crate::error::KinematicsError;
use crate::pose::TargetPose;
use crate::solution::JointSolution;
use serde::{Deserialize, Serialize};

/// `k` crate 后端名称
pub const K_BACKEND: &str = "k";

/// 求解器标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverInfo {
    /// 后端名称
    pub name: String,
    /// 后端版本
    pub version: semver::Version,
}

/// IK 求解器
pub trait IkSolver {
    /// 后端名称与版本
    fn info(&self) -> SolverInfo;

    /// 运动链的驱动关节数（未知时返回 `None`）
    fn dof(&self) -> Option<usize> {
        None
    }

    /// 求解到达 `target`（基座坐标系）的关节角
    ///
    /// `seed` 为当前关节角，用作迭代初值。
    fn solve(&mut self, target: &TargetPose, seed: &[f64]) -> Result<JointSolution, KinematicsError>;
}

impl<T: IkSolver + ?Sized> IkSolver for Box<T> {
    fn info(&self) -> SolverInfo {
        (**self).info()
    }

    fn dof(&self) -> Option<usize> {
        (**self).dof()
    }

    fn solve(&mut self, target: &TargetPose, seed: &[f64]) -> Result<JointSolution, KinematicsError> {
        (**self).solve(target, seed)
    }
}

/// 求解器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// 后端名称（当前支持 `"k"`）
    pub backend: String,

    /// 末端连杆名称（`None` 表示 URDF 中最后一个连杆）
    pub end_link: Option<String>,

    /// 允许的位置误差（米）
    pub allowable_distance: f64,

    /// 允许的姿态误差（弧度）
    pub allowable_angle: f64,

    /// 雅可比步长系数
    pub jacobian_multiplier: f64,

    /// 最大迭代次数
    pub max_iterations: usize,

    /// 是否约束末端姿态（`false` 时只求解位置）
    pub orientation: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: K_BACKEND.to_string(),
            end_link: None,
            allowable_distance: 0.001,
            allowable_angle: 0.005,
            jacobian_multiplier: 0.5,
            max_iterations: 100,
            orientation: true,
        }
    }
}

/// 检查求解器版本不低于 `min_version`
///
/// `min_version` 支持省略次版本号和修订号（如 `"3"`、`"0.32"`）。
pub fn check_solver_version(info: &SolverInfo, min_version: &str) -> Result<(), KinematicsError> {
    let required = parse_version(min_version)?;
    if info.version < required {
        return Err(KinematicsError::SolverOutdated {
            name: info.name.clone(),
            found: info.version.clone(),
            required,
        });
    }
    Ok(())
}

fn parse_version(input: &str) -> Result<semver::Version, KinematicsError> {
    let trimmed = input.trim();
    let padded = match trimmed.split('.').count() {
        1 => format!("{trimmed}.0.0"),
        2 => format!("{trimmed}.0"),
        _ => trimmed.to_string(),
    };
    semver::Version::parse(&padded).map_err(|source| KinematicsError::InvalidVersion {
        input: input.to_string(),
        source,
    })
}

/// 按配置打开求解器后端
///
/// `urdf` 是机器人描述（通常由仿真器导出）。
pub fn open_solver(
    config: &SolverConfig,
    urdf: &str,
) -> Result<Box<dyn IkSolver>, KinematicsError> {
    match config.backend.as_str() {
        #[cfg(feature = "kinematics")]
        K_BACKEND => Ok(Box::new(crate::k_backend::KChainSolver::from_urdf(
            urdf, config,
        )?)),
        #[cfg(not(feature = "kinematics"))]
        K_BACKEND => {
            let _ = urdf;
            Err(KinematicsError::BackendUnavailable {
                name: K_BACKEND.to_string(),
                hint: "this build does not include the `kinematics` feature; \
                       rebuild with `--features kinematics`"
                    .to_string(),
            })
        },
        other => Err(KinematicsError::BackendUnavailable {
            name: other.to_string(),
            hint: format!("unknown backend, supported backends: {K_BACKEND:?}"),
        }),
    }
}
