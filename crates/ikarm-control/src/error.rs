//! 控制层错误类型定义

use ikarm_kinematics::KinematicsError;
use ikarm_sim::SimError;
use thiserror::Error;

/// 控制层错误类型
#[derive(Error, Debug)]
pub enum ControlError {
    /// 仿真层错误
    #[error("Simulator error: {0}")]
    Sim(#[from] SimError),

    /// 运动学层错误（含求解器缺失/版本过旧）
    #[error("Kinematics error: {0}")]
    Kinematics(#[from] KinematicsError),

    /// 配置无效
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// 生成后仍找不到目标节点
    #[error("Target {0:?} is unavailable even after spawning a fallback")]
    TargetUnavailable(String),

    /// IK 解的关节数少于电机数
    #[error("IK solution has {actual} joint angles but {expected} motors were discovered")]
    SolutionTooShort { expected: usize, actual: usize },
}

impl ControlError {
    /// 是否为启动时的求解器依赖检查失败
    pub fn is_solver_dependency(&self) -> bool {
        matches!(
            self,
            ControlError::Kinematics(
                KinematicsError::BackendUnavailable { .. } | KinematicsError::SolverOutdated { .. }
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_error_display() {
        let err = ControlError::SolutionTooShort {
            expected: 6,
            actual: 4,
        };
        assert_eq!(
            format!("{}", err),
            "IK solution has 4 joint angles but 6 motors were discovered"
        );

        let err = ControlError::InvalidConfig("ik_step_size must be > 0".to_string());
        assert!(format!("{}", err).contains("ik_step_size"));
    }

    #[test]
    fn test_solver_dependency_classification() {
        let err: ControlError = KinematicsError::BackendUnavailable {
            name: "k".to_string(),
            hint: "missing".to_string(),
        }
        .into();
        assert!(err.is_solver_dependency());

        let err: ControlError = KinematicsError::NotConverged("far".to_string()).into();
        assert!(!err.is_solver_dependency());

        let err: ControlError = SimError::InvalidInput("x".to_string()).into();
        assert!(!err.is_solver_dependency());
    }
}
