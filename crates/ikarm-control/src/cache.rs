//! 目标位姿变化检测

use ikarm_kinematics::TargetPose;

/// 目标位姿缓存
///
/// 初值为全零位姿（旋转矩阵也为零），因此第一次 tick 必定触发求解。
///
/// 精确模式下缓存每个 tick 观测到的位姿；阈值模式下只缓存触发求解的位姿，
/// 缓慢漂移累积超过阈值后仍会重新求解。
#[derive(Debug, Clone)]
pub struct PoseCache {
    old: TargetPose,
    tolerance: f64,
}

impl PoseCache {
    /// `tolerance == 0.0` 时精确比较
    pub fn new(tolerance: f64) -> Self {
        Self {
            old: TargetPose::zeros(),
            tolerance,
        }
    }

    /// 新位姿与缓存相比是否变化（位置或旋转任一分量）
    pub fn changed(&self, pose: &TargetPose) -> bool {
        if self.tolerance > 0.0 {
            pose.differs_from(&self.old, self.tolerance)
        } else {
            pose.position != self.old.position || pose.rotation != self.old.rotation
        }
    }

    /// 记录本 tick 的位姿
    ///
    /// `solve_attempted` 为本 tick 是否调用了求解器。
    pub fn observe(&mut self, pose: TargetPose, solve_attempted: bool) {
        if self.tolerance == 0.0 || solve_attempted {
            self.old = pose;
        }
    }

    pub fn last(&self) -> &TargetPose {
        &self.old
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}
