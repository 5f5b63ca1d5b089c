//! 仿真器 → 相对位姿 → IK 求解的端到端测试
//!
//! 需要 `kinematics` feature：
//! ```bash
//! cargo test -p ikarm-kinematics --features kinematics --test solver_pipeline
//! ```

#![cfg(feature = "kinematics")]

use ikarm_kinematics::{
    IkSolver, KChainSolver, RelativePositions, SolverConfig, check_solver_version, open_solver,
};
use ikarm_sim::{MockSupervisor, Supervisor};

const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// 把机械臂在某个关节构型下的末端位姿放到场景里作为目标
fn scene_with_reachable_target(base: [f64; 3], joints: &[f64]) -> MockSupervisor {
    let fk = KChainSolver::from_urdf(ikarm_sim::mock::DEMO_ARM_URDF, &SolverConfig::default())
        .unwrap();
    let local = fk.forward(joints).unwrap();
    let (mut position, orientation) = local.to_raw();
    for (p, b) in position.iter_mut().zip(base.iter()) {
        *p += b;
    }

    let mut sim = MockSupervisor::demo_arm(16, 2.0).with_self_pose(base, IDENTITY);
    sim.add_node("TARGET", position, orientation);
    sim
}

#[test]
fn test_open_solver_from_exported_urdf() {
    let sim = MockSupervisor::demo_arm(16, 2.0);
    let urdf = sim.urdf().unwrap();

    let solver = open_solver(&SolverConfig::default(), &urdf).unwrap();
    let info = solver.info();
    assert_eq!(info.name, "k");
    assert!(check_solver_version(&info, "0.32").is_ok());
    assert!(check_solver_version(&info, "3").is_err());
    assert_eq!(solver.dof(), Some(6));
}

#[test]
fn test_solve_target_relative_to_offset_base() {
    let joints = [0.2, 0.5, 0.7, -0.3, 0.1, 0.0];
    let sim = scene_with_reachable_target([1.0, -2.0, 0.5], &joints);

    let positions = RelativePositions::new(&sim);
    let target = positions.get_pose(&sim, "TARGET").unwrap();

    let mut solver = open_solver(&SolverConfig::default(), &sim.urdf().unwrap()).unwrap();
    let solution = solver.solve(&target, &joints).unwrap();
    assert_eq!(solution.actuated().len(), 6);
    for (solved, expected) in solution.actuated().iter().zip(joints.iter()) {
        assert!((solved - expected).abs() < 1e-6, "{solved} vs {expected}");
    }
}
