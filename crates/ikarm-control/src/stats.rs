//! 控制循环统计

use serde::Serialize;

/// 控制循环计数器
///
/// 单线程控制循环直接持有，无需原子操作。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    /// 执行过的 tick 数
    pub ticks: u64,
    /// 成功的 IK 求解次数
    pub solves: u64,
    /// 因目标未变化而跳过的 tick 数
    pub skipped: u64,
    /// 未收敛的求解次数
    pub failed_solves: u64,
    /// 下发的电机位置命令总数
    pub motor_commands: u64,
}

impl LoopStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 实际调用求解器的次数（成功 + 未收敛）
    pub fn solver_calls(&self) -> u64 {
        self.solves + self.failed_solves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_calls() {
        let stats = LoopStats {
            ticks: 10,
            solves: 3,
            skipped: 6,
            failed_solves: 1,
            motor_commands: 18,
        };
        assert_eq!(stats.solver_calls(), 4);
        assert_eq!(LoopStats::new(), LoopStats::default());
    }
}
