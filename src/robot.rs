/*
  Copyright 2017 Takashi Ogura

  Licensed under the Apache License, Version 2.0 (the "License");
  you may not use this file except in compliance with the License.
  You may obtain a copy of the License at

      http://www.apache.org/licenses/LICENSE-2.0

  Unless required by applicable law or agreed to in writing, software
  distributed under the License is distributed on an "AS IS" BASIS,
  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
  See the License for the specific language governing permissions and
  limitations under the License.
*/
//! Kinematic tree of rigid bodies connected by hinge joints
use crate::body::{BodyId, RigidBody};
use crate::errors::*;
use crate::iterator::*;
use crate::joint::{HingeJoint, HingeJointBuilder, JointId};
use crate::state::RobotState;
use na::{Isometry3, Point3, RealField, Translation3, Unit, Vector3};
use nalgebra as na;
use std::fmt::{self, Display};
use tracing::{debug, trace};

/// Rigid bodies and hinge joints stored in flat arrays
///
/// Bodies and joints refer to each other by `BodyId` / `JointId`.
/// Body 0 is the root, which has no parent joint. The robot also holds its
/// current maximal state.
///
/// # Examples
///
/// ```
/// use nalgebra as na;
/// use hinge_ik::{HingeJointBuilder, RobotBuilder};
///
/// let mut builder = RobotBuilder::<f64>::new("base");
/// let base = builder.root();
/// let upper = builder.add_body("upper_arm");
/// let lower = builder.add_body("lower_arm");
/// builder
///     .add_joint(HingeJointBuilder::new().name("shoulder"), base, upper)
///     .unwrap();
/// builder
///     .add_joint(
///         HingeJointBuilder::new()
///             .name("elbow")
///             .parent_anchor(na::Vector3::new(1.0, 0.0, 0.0)),
///         upper,
///         lower,
///     )
///     .unwrap();
/// let robot = builder.finalize().unwrap();
/// assert_eq!(robot.joint_count(), 2);
///
/// let names = robot
///     .iter_ancestors(lower)
///     .map(|joint| joint.name.clone())
///     .collect::<Vec<_>>();
/// assert_eq!(names, ["elbow", "shoulder"]);
///
/// let tip = robot.world_point(lower, &na::Point3::new(1.0, 0.0, 0.0));
/// assert!((tip.x - 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct Robot<T: RealField> {
    bodies: Vec<RigidBody>,
    joints: Vec<HingeJoint<T>>,
    up: Unit<Vector3<T>>,
    forward: Unit<Vector3<T>>,
    pitch_axis: Unit<Vector3<T>>,
    state: RobotState<T>,
}

impl<T> Robot<T>
where
    T: RealField + Copy,
{
    #[inline]
    pub fn root(&self) -> BodyId {
        BodyId(0)
    }
    /// Panics if `id` does not belong to this robot
    #[inline]
    pub fn body(&self, id: BodyId) -> &RigidBody {
        &self.bodies[id.0]
    }
    /// Panics if `id` does not belong to this robot
    #[inline]
    pub fn joint(&self, id: JointId) -> &HingeJoint<T> {
        &self.joints[id.0]
    }
    #[inline]
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }
    /// All joints, ordered by their index
    #[inline]
    pub fn joints(&self) -> &[HingeJoint<T>] {
        &self.joints
    }
    #[inline]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
    #[inline]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }
    pub fn find_body(&self, name: &str) -> Option<BodyId> {
        self.bodies
            .iter()
            .position(|body| body.name == name)
            .map(BodyId)
    }
    pub fn find_joint(&self, name: &str) -> Option<JointId> {
        self.joints
            .iter()
            .find(|joint| joint.name == name)
            .map(|joint| joint.id())
    }
    /// World up direction, the yaw axis of the root
    #[inline]
    pub fn up(&self) -> &Unit<Vector3<T>> {
        &self.up
    }
    /// Nominal forward direction of the robot, the roll axis of the root
    #[inline]
    pub fn forward(&self) -> &Unit<Vector3<T>> {
        &self.forward
    }
    /// `up x forward`, the pitch axis of the root
    #[inline]
    pub fn pitch_axis(&self) -> &Unit<Vector3<T>> {
        &self.pitch_axis
    }
    /// Joints from `body` up to the root
    #[inline]
    pub fn iter_ancestors(&self, body: BodyId) -> Ancestors<'_, T> {
        Ancestors::new(self, body)
    }
    /// Joints below `body`, parents first
    #[inline]
    pub fn iter_descendants(&self, body: BodyId) -> Descendants<'_, T> {
        Descendants::new(self, body)
    }
    #[inline]
    pub fn state(&self) -> &RobotState<T> {
        &self.state
    }
    /// Replace the maximal state
    ///
    /// It fails if the state was made for a different number of joints.
    pub fn set_state(&mut self, state: &RobotState<T>) -> Result<()> {
        if state.joint_count() != self.joints.len() {
            return Err(Error::SizeMismatchError {
                input: state.joint_count(),
                required: self.joints.len(),
            });
        }
        self.replace_state(state.clone());
        Ok(())
    }
    pub(crate) fn replace_state(&mut self, state: RobotState<T>) {
        trace!(joints = self.joints.len(), "robot state updated");
        self.state = state;
    }
    /// World transform of every body, indexed like `bodies()`
    ///
    /// Computed from the maximal state by composing the joints from the
    /// root to the leaves.
    pub fn update_transforms(&self) -> Vec<Isometry3<T>> {
        let mut transforms = vec![Isometry3::identity(); self.bodies.len()];
        transforms[0] = Isometry3::from_parts(
            Translation3::from(self.state.position().coords),
            *self.state.orientation(),
        );
        for joint in self.iter_descendants(self.root()) {
            let relative = &self.state.joint_relative_orientations()[joint.index()];
            transforms[joint.child().0] =
                transforms[joint.parent().0] * joint.local_transform(relative);
        }
        transforms
    }
    /// World position of a point given in the frame of `body`
    pub fn world_point(&self, body: BodyId, local: &Point3<T>) -> Point3<T> {
        let mut trans = Isometry3::identity();
        let mut current = body;
        for joint in self.iter_ancestors(body) {
            let relative = &self.state.joint_relative_orientations()[joint.index()];
            trans = joint.local_transform(relative) * trans;
            current = joint.parent();
        }
        debug_assert_eq!(current, self.root());
        let root = Isometry3::from_parts(
            Translation3::from(self.state.position().coords),
            *self.state.orientation(),
        );
        root * trans * local
    }
}

impl<T> Display for Robot<T>
where
    T: RealField + Copy,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.body(self.root()))?;
        for joint in self.iter_descendants(self.root()) {
            let level = self.iter_ancestors(joint.child()).count();
            writeln!(
                f,
                "{}{} -> {}",
                "    ".repeat(level),
                joint,
                self.body(joint.child())
            )?;
        }
        Ok(())
    }
}

/// Build a `Robot` body by body
///
/// The default up direction is +Y and the default forward direction is +Z.
#[derive(Debug, Clone)]
pub struct RobotBuilder<T: RealField> {
    bodies: Vec<RigidBody>,
    joints: Vec<HingeJoint<T>>,
    up: Vector3<T>,
    forward: Vector3<T>,
}

impl<T> RobotBuilder<T>
where
    T: RealField + Copy,
{
    pub fn new(root_name: &str) -> Self {
        RobotBuilder {
            bodies: vec![RigidBody::new(root_name)],
            joints: Vec::new(),
            up: Vector3::y(),
            forward: Vector3::z(),
        }
    }
    #[inline]
    pub fn root(&self) -> BodyId {
        BodyId(0)
    }
    pub fn add_body(&mut self, name: &str) -> BodyId {
        self.bodies.push(RigidBody::new(name));
        BodyId(self.bodies.len() - 1)
    }
    /// Connect `child` to `parent` with a hinge joint
    ///
    /// The joint index is the number of joints added before it.
    pub fn add_joint(
        &mut self,
        joint: HingeJointBuilder<T>,
        parent: BodyId,
        child: BodyId,
    ) -> Result<JointId> {
        for id in [parent, child] {
            if id.0 >= self.bodies.len() {
                return Err(Error::InvalidBodyError { index: id.0 });
            }
        }
        if child == self.root() {
            return Err(Error::RootAsChildError);
        }
        if self.bodies[child.0].parent_joint.is_some() {
            return Err(Error::AlreadyAttachedError {
                body: self.bodies[child.0].name.clone(),
            });
        }
        // walk up from the parent, reaching the child means a loop
        let mut current = Some(parent);
        while let Some(body) = current {
            if body == child {
                return Err(Error::CycleError {
                    parent: self.bodies[parent.0].name.clone(),
                    child: self.bodies[child.0].name.clone(),
                });
            }
            current = self.bodies[body.0]
                .parent_joint
                .map(|joint| self.joints[joint.0].parent());
        }
        let id = JointId(self.joints.len());
        let joint = joint.finalize(id, parent, child)?;
        self.joints.push(joint);
        self.bodies[parent.0].child_joints.push(id);
        self.bodies[child.0].parent_joint = Some(id);
        Ok(id)
    }
    pub fn up(&mut self, up: Vector3<T>) -> &mut Self {
        self.up = up;
        self
    }
    pub fn forward(&mut self, forward: Vector3<T>) -> &mut Self {
        self.forward = forward;
        self
    }
    /// Check the tree and create the `Robot` with all joints at zero
    pub fn finalize(self) -> Result<Robot<T>> {
        if let Some(body) = self.bodies[1..].iter().find(|body| body.is_root()) {
            return Err(Error::DetachedBodyError {
                body: body.name.clone(),
            });
        }
        let up = Unit::try_new(self.up, T::default_epsilon()).ok_or(Error::InvalidAxisError)?;
        let forward =
            Unit::try_new(self.forward, T::default_epsilon()).ok_or(Error::InvalidAxisError)?;
        if up.dot(&forward.into_inner()).abs() > T::default_epsilon().sqrt() {
            return Err(Error::InvalidFrameError);
        }
        let pitch_axis = Unit::new_normalize(up.cross(&forward.into_inner()));
        debug!(
            bodies = self.bodies.len(),
            joints = self.joints.len(),
            "robot created"
        );
        let state = RobotState::new(self.joints.len());
        Ok(Robot {
            bodies: self.bodies,
            joints: self.joints,
            up,
            forward,
            pitch_axis,
            state,
        })
    }
}

#[test]
fn test_add_joint_errors() {
    let mut builder = RobotBuilder::<f64>::new("root");
    let root = builder.root();
    let a = builder.add_body("a");
    let b = builder.add_body("b");
    builder
        .add_joint(HingeJointBuilder::new().name("j0"), root, a)
        .unwrap();
    builder
        .add_joint(HingeJointBuilder::new().name("j1"), a, b)
        .unwrap();
    assert!(matches!(
        builder.add_joint(HingeJointBuilder::new(), a, root),
        Err(Error::RootAsChildError)
    ));
    assert!(matches!(
        builder.add_joint(HingeJointBuilder::new(), root, b),
        Err(Error::AlreadyAttachedError { .. })
    ));
    assert!(matches!(
        builder.add_joint(HingeJointBuilder::new(), root, BodyId(10)),
        Err(Error::InvalidBodyError { index: 10 })
    ));
    let c = builder.add_body("c");
    let d = builder.add_body("d");
    builder
        .add_joint(HingeJointBuilder::new().name("j2"), c, d)
        .unwrap();
    assert!(matches!(
        builder.add_joint(HingeJointBuilder::new(), d, c),
        Err(Error::CycleError { .. })
    ));
    assert!(matches!(
        builder.finalize(),
        Err(Error::DetachedBodyError { .. })
    ));
}

#[test]
fn test_frame_must_be_perpendicular() {
    let mut builder = RobotBuilder::<f64>::new("root");
    builder.up(Vector3::z()).forward(Vector3::new(1.0, 0.0, 0.5));
    assert!(matches!(builder.finalize(), Err(Error::InvalidFrameError)));
    let mut builder = RobotBuilder::<f64>::new("root");
    builder.up(Vector3::z()).forward(Vector3::new(2.0, 0.0, 0.0));
    let robot = builder.finalize().unwrap();
    assert!((robot.pitch_axis().into_inner() - Vector3::y()).norm() < 1e-12);
}
