#![allow(dead_code)]
use hinge_ik::*;
use nalgebra as na;
use rand::Rng;

/// Two links of length 1.0 turning around Z, stretched along +X at zero
pub fn create_planar_arm() -> (Robot<f64>, BodyId) {
    let mut builder = RobotBuilder::new("base");
    let base = builder.root();
    let link1 = builder.add_body("link1");
    let link2 = builder.add_body("link2");
    builder
        .add_joint(
            HingeJointBuilder::new()
                .name("shoulder")
                .axis(na::Vector3::z()),
            base,
            link1,
        )
        .unwrap();
    builder
        .add_joint(
            HingeJointBuilder::new()
                .name("elbow")
                .axis(na::Vector3::z())
                .parent_anchor(na::Vector3::new(1.0, 0.0, 0.0)),
            link1,
            link2,
        )
        .unwrap();
    (builder.finalize().unwrap(), link2)
}

/// Torso with two legs and a head, with tilted axes and offset anchors
pub fn create_legged_robot() -> Robot<f64> {
    let mut builder = RobotBuilder::new("torso");
    let torso = builder.root();
    let head = builder.add_body("head");
    builder
        .add_joint(
            HingeJointBuilder::new()
                .name("neck")
                .axis(na::Vector3::new(0.0, 1.0, 0.1))
                .parent_anchor(na::Vector3::new(0.0, 0.4, 0.0))
                .child_anchor(na::Vector3::new(0.0, -0.1, 0.0)),
            torso,
            head,
        )
        .unwrap();
    for (side, sign) in [("l", 1.0), ("r", -1.0)] {
        let upper = builder.add_body(&format!("{}_upper_leg", side));
        let lower = builder.add_body(&format!("{}_lower_leg", side));
        let foot = builder.add_body(&format!("{}_foot", side));
        builder
            .add_joint(
                HingeJointBuilder::new()
                    .name(&format!("{}_hip", side))
                    .axis(na::Vector3::new(1.0, 0.2 * sign, 0.3))
                    .parent_anchor(na::Vector3::new(0.2 * sign, -0.1, 0.05))
                    .child_anchor(na::Vector3::new(0.0, 0.3, 0.0)),
                torso,
                upper,
            )
            .unwrap();
        builder
            .add_joint(
                HingeJointBuilder::new()
                    .name(&format!("{}_knee", side))
                    .axis(na::Vector3::x())
                    .parent_anchor(na::Vector3::new(0.0, -0.3, 0.0))
                    .child_anchor(na::Vector3::new(0.0, 0.25, 0.02)),
                upper,
                lower,
            )
            .unwrap();
        builder
            .add_joint(
                HingeJointBuilder::new()
                    .name(&format!("{}_ankle", side))
                    .axis(na::Vector3::new(0.1 * sign, 0.0, 1.0))
                    .parent_anchor(na::Vector3::new(0.0, -0.25, 0.0))
                    .child_anchor(na::Vector3::new(0.05, 0.02, 0.0)),
                lower,
                foot,
            )
            .unwrap();
    }
    builder.finalize().unwrap()
}

/// Random root pose and random hinge angles in `(-pi, pi)`
pub fn random_state<R: Rng>(robot: &Robot<f64>, rng: &mut R) -> RobotState<f64> {
    let mut state = RobotState::new(robot.joint_count());
    state.set_position(na::Point3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    ));
    state.set_orientation(na::UnitQuaternion::from_euler_angles(
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-1.5..1.5),
        rng.gen_range(-3.0..3.0),
    ));
    for joint in robot.joints() {
        let angle = rng.gen_range(-3.1..3.1);
        state
            .set_joint_relative_orientation(joint.index(), joint.rotation(angle))
            .unwrap();
    }
    state
}

/// Compare rotations, `q` and `-q` are the same
pub fn assert_same_rotation(
    a: &na::UnitQuaternion<f64>,
    b: &na::UnitQuaternion<f64>,
    epsilon: f64,
) {
    let a = a.quaternion().coords;
    let b = b.quaternion().coords;
    assert!(
        (a - b).norm() < epsilon || (a + b).norm() < epsilon,
        "{} != {}",
        a,
        b
    );
}

pub fn assert_same_state(a: &RobotState<f64>, b: &RobotState<f64>, epsilon: f64) {
    assert!((a.position() - b.position()).norm() < epsilon);
    assert_same_rotation(a.orientation(), b.orientation(), epsilon);
    assert_eq!(a.joint_count(), b.joint_count());
    for (ra, rb) in a
        .joint_relative_orientations()
        .iter()
        .zip(b.joint_relative_orientations())
    {
        assert_same_rotation(ra, rb, epsilon);
    }
}
