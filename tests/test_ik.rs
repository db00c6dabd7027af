mod common;

use hinge_ik::*;
use nalgebra as na;
use rand::SeedableRng;

#[test]
fn test_planar_arm_reaches_target() {
    let (mut robot, link2) = common::create_planar_arm();
    let mut solver = IkSolver::default();
    let local = na::Point3::new(1.0, 0.0, 0.0);
    let target = na::Point3::new(1.0, 1.0, 0.0);
    let mut residual = f64::MAX;
    for _ in 0..20 {
        solver.add_end_effector_target(link2, local, target);
        let next = solver.solve(&mut robot, IkSolver::<f64>::DEFAULT_NUM_STEPS).unwrap();
        assert!(next <= residual + 1e-12);
        residual = next;
    }
    assert!(residual < 1e-2);
    assert!((robot.world_point(link2, &local) - target).norm() < 1e-2);
}

#[test]
fn test_planar_arm_single_solve() {
    // one solve of 10 steps with the default gain only gets part of the way
    let (mut robot, link2) = common::create_planar_arm();
    let mut solver = IkSolver::default();
    let local = na::Point3::new(1.0, 0.0, 0.0);
    let target = na::Point3::new(1.0, 1.0, 0.0);
    solver.add_end_effector_target(link2, local, target);
    let residual = solver.solve(&mut robot, IkSolver::<f64>::DEFAULT_NUM_STEPS).unwrap();
    assert!((residual - 0.582).abs() < 1e-3, "{}", residual);
    assert!((robot.world_point(link2, &local) - target).norm() > 1e-2);
}

#[test]
fn test_root_is_not_moved() {
    let (mut robot, link2) = common::create_planar_arm();
    let mut state = RobotState::new(2);
    state.set_position(na::Point3::new(0.3, -1.0, 2.0));
    state.set_orientation(na::UnitQuaternion::from_euler_angles(0.2, -0.4, 1.1));
    state
        .set_joint_relative_orientation(0, robot.joint(robot.find_joint("shoulder").unwrap()).rotation(0.8))
        .unwrap();
    state
        .set_joint_relative_orientation(1, robot.joint(robot.find_joint("elbow").unwrap()).rotation(-1.2))
        .unwrap();
    robot.set_state(&state).unwrap();
    let local = na::Point3::new(1.0, 0.0, 0.0);
    let target = robot.world_point(link2, &local);

    let mut start = state.clone();
    start
        .set_joint_relative_orientation(0, robot.joint(robot.find_joint("shoulder").unwrap()).rotation(0.3))
        .unwrap();
    start
        .set_joint_relative_orientation(1, robot.joint(robot.find_joint("elbow").unwrap()).rotation(-0.5))
        .unwrap();
    robot.set_state(&start).unwrap();

    let mut solver = IkSolverBuilder::new().gain(0.5).finalize();
    for _ in 0..10 {
        solver.add_end_effector_target(link2, local, target);
        solver.solve(&mut robot, 10).unwrap();
    }
    assert!((robot.world_point(link2, &local) - target).norm() < 1e-6);
    assert!((robot.state().position() - state.position()).norm() < 1e-10);
    common::assert_same_rotation(robot.state().orientation(), state.orientation(), 1e-10);
}

#[test]
fn test_solve_without_targets() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(4);
    let mut robot = common::create_legged_robot();
    let state = common::random_state(&robot, &mut rng);
    robot.set_state(&state).unwrap();
    let mut solver = IkSolver::default();
    assert_eq!(solver.solve(&mut robot, 10).unwrap(), 0.0);
    common::assert_same_state(robot.state(), &state, 1e-10);
}

#[test]
fn test_robot_without_joints() {
    let mut robot = RobotBuilder::<f64>::new("alone").finalize().unwrap();
    let root = robot.root();
    let mut solver = IkSolver::default();
    solver.add_end_effector_target(root, na::Point3::origin(), na::Point3::new(0.0, 3.0, 4.0));
    let residual = solver.solve(&mut robot, 10).unwrap();
    assert!((residual - 5.0).abs() < 1e-12);
    assert_eq!(robot.state().position(), &na::Point3::origin());
}

#[test]
fn test_targets_are_consumed() {
    let (mut robot, link2) = common::create_planar_arm();
    let mut solver = IkSolver::default();
    solver.add_end_effector_target(link2, na::Point3::origin(), na::Point3::new(0.0, 1.0, 0.0));
    solver.add_end_effector_target(link2, na::Point3::origin(), na::Point3::new(0.0, 1.0, 0.0));
    assert_eq!(solver.targets().len(), 2);
    solver.solve(&mut robot, 1).unwrap();
    assert!(solver.targets().is_empty());
    let before = robot.state().clone();
    // nothing queued, nothing moves
    assert_eq!(solver.solve(&mut robot, 10).unwrap(), 0.0);
    common::assert_same_state(robot.state(), &before, 1e-10);

    solver.add_end_effector_target(link2, na::Point3::origin(), na::Point3::new(0.0, 1.0, 0.0));
    solver.clear_targets();
    assert!(solver.targets().is_empty());
}

fn set_leg_angles(robot: &mut Robot<f64>, angles: &[f64; 3]) {
    let mut state = robot.state().clone();
    for side in ["l", "r"] {
        for (name, angle) in ["hip", "knee", "ankle"].iter().zip(angles) {
            let joint = robot.joint(robot.find_joint(&format!("{}_{}", side, name)).unwrap());
            state
                .set_joint_relative_orientation(joint.index(), joint.rotation(*angle))
                .unwrap();
        }
    }
    robot.set_state(&state).unwrap();
}

fn solve_feet(strategy: UpdateStrategy) {
    let mut robot = common::create_legged_robot();
    let l_foot = robot.find_body("l_foot").unwrap();
    let r_foot = robot.find_body("r_foot").unwrap();
    let local = na::Point3::new(0.0, -0.05, 0.1);
    let mut state = robot.state().clone();
    state.set_position(na::Point3::new(0.0, 1.0, 0.0));
    state.set_orientation(na::UnitQuaternion::from_euler_angles(0.0, 0.3, 0.1));
    robot.set_state(&state).unwrap();

    set_leg_angles(&mut robot, &[0.7, -0.6, 0.4]);
    let l_target = robot.world_point(l_foot, &local);
    let r_target = robot.world_point(r_foot, &local);
    set_leg_angles(&mut robot, &[0.5, -0.8, 0.2]);

    let mut solver = IkSolverBuilder::new().gain(0.5).strategy(strategy).finalize();
    let mut residual = f64::MAX;
    for _ in 0..20 {
        solver.add_end_effector_target(l_foot, local, l_target);
        solver.add_end_effector_target(r_foot, local, r_target);
        residual = solver.solve(&mut robot, 10).unwrap();
    }
    assert!(residual < 1e-3, "{:?}: {}", strategy, residual);
    assert!((robot.world_point(l_foot, &local) - l_target).norm() < 1e-3);
    assert!((robot.world_point(r_foot, &local) - r_target).norm() < 1e-3);
    // the head is not on the path of any target
    let neck = robot.find_joint("neck").unwrap();
    common::assert_same_rotation(
        robot.state().joint_relative_orientation(neck.index()).unwrap(),
        &na::UnitQuaternion::identity(),
        1e-10,
    );
}

#[test]
fn test_two_targets_sequential() {
    solve_feet(UpdateStrategy::Sequential);
}

#[test]
fn test_two_targets_stacked() {
    solve_feet(UpdateStrategy::Stacked);
}

#[test]
fn test_finite_difference_jacobian() {
    let (mut robot, link2) = common::create_planar_arm();
    let mut solver = IkSolverBuilder::new()
        .gain(0.5)
        .jacobian(JacobianMethod::FiniteDifference(FiniteDifferenceJacobian::new(1e-3)))
        .finalize();
    let local = na::Point3::new(1.0, 0.0, 0.0);
    let target = na::Point3::new(0.5, 1.2, 0.0);
    for _ in 0..10 {
        solver.add_end_effector_target(link2, local, target);
        solver.solve(&mut robot, 10).unwrap();
    }
    assert!((robot.world_point(link2, &local) - target).norm() < 1e-4);
}

#[test]
fn test_f32() {
    let mut builder = RobotBuilder::<f32>::new("base");
    let base = builder.root();
    let upper = builder.add_body("upper");
    let lower = builder.add_body("lower");
    builder
        .add_joint(HingeJointBuilder::new().name("shoulder"), base, upper)
        .unwrap();
    builder
        .add_joint(
            HingeJointBuilder::new()
                .name("elbow")
                .parent_anchor(na::Vector3::new(1.0, 0.0, 0.0)),
            upper,
            lower,
        )
        .unwrap();
    let mut robot = builder.finalize().unwrap();
    let mut solver = IkSolverBuilder::<f32>::new().gain(0.5).finalize();
    let local = na::Point3::new(1.0, 0.0, 0.0);
    let target = na::Point3::new(-0.3, 1.5, 0.0);
    for _ in 0..10 {
        solver.add_end_effector_target(lower, local, target);
        solver.solve(&mut robot, 10).unwrap();
    }
    assert!((robot.world_point(lower, &local) - target).norm() < 1e-3);
}
