//! 运动学层错误类型定义

use ikarm_sim::SimError;
use thiserror::Error;

/// 运动学层错误类型
#[derive(Error, Debug)]
pub enum KinematicsError {
    /// 仿真层错误
    #[error("Simulator error: {0}")]
    Sim(#[from] SimError),

    /// 场景中找不到目标节点
    #[error("Target node {0:?} not found")]
    TargetNotFound(String),

    /// 求解器后端不可用（未编译或名称未知）
    #[error("IK solver backend {name:?} is not available: {hint}")]
    BackendUnavailable { name: String, hint: String },

    /// 求解器版本过旧
    #[error(
        "IK solver {name} version {found} is too old. Please upgrade to version {required} or newer"
    )]
    SolverOutdated {
        name: String,
        found: semver::Version,
        required: semver::Version,
    },

    /// 版本要求无法解析
    #[error("Invalid solver version requirement {input:?}: {source}")]
    InvalidVersion {
        input: String,
        #[source]
        source: semver::Error,
    },

    /// 运动链构建失败（URDF 解析、末端连杆不存在等）
    #[error("Failed to build kinematic chain: {0}")]
    Chain(String),

    /// 种子关节数与运动链自由度不一致
    #[error("Seed length mismatch: expected {expected}, got {actual}")]
    SeedLength { expected: usize, actual: usize },

    /// IK 未收敛（目标不可达或迭代次数不足）
    #[error("IK did not converge: {0}")]
    NotConverged(String),

    /// 其他求解器错误
    #[error("IK solver error: {0}")]
    Solver(String),

    /// IO 错误（临时 URDF 文件）
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
