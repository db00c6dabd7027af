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
//! Hinge joints connecting the rigid bodies
use crate::body::BodyId;
use crate::errors::*;
use na::{Isometry3, RealField, Translation3, Unit, UnitQuaternion, Vector3};
use nalgebra as na;
use std::fmt::{self, Display};

/// Stable handle of a joint inside a `Robot`
///
/// The index is also the position of the joint in `Robot::joints()`
/// and in `RobotState`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(pub(crate) usize);

impl JointId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "joint#{}", self.0)
    }
}

/// Joint with one rotational degree of freedom
#[derive(Debug, Clone)]
pub struct HingeJoint<T: RealField> {
    /// Name of this joint
    pub name: String,
    id: JointId,
    parent: BodyId,
    child: BodyId,
    /// rotation axis, the same in the parent and the child frame
    axis: Unit<Vector3<T>>,
    /// pivot in the frame of the parent body
    parent_anchor: Vector3<T>,
    /// pivot in the frame of the child body
    child_anchor: Vector3<T>,
}

impl<T> HingeJoint<T>
where
    T: RealField + Copy,
{
    #[inline]
    pub fn id(&self) -> JointId {
        self.id
    }
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0
    }
    #[inline]
    pub fn parent(&self) -> BodyId {
        self.parent
    }
    #[inline]
    pub fn child(&self) -> BodyId {
        self.child
    }
    #[inline]
    pub fn axis(&self) -> &Unit<Vector3<T>> {
        &self.axis
    }
    #[inline]
    pub fn parent_anchor(&self) -> &Vector3<T> {
        &self.parent_anchor
    }
    #[inline]
    pub fn child_anchor(&self) -> &Vector3<T> {
        &self.child_anchor
    }
    /// Relative orientation of the child body for the given angle
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra as na;
    /// use hinge_ik::{HingeJointBuilder, RobotBuilder};
    ///
    /// let mut builder = RobotBuilder::<f64>::new("base");
    /// let root = builder.root();
    /// let arm = builder.add_body("arm");
    /// let j0 = builder
    ///     .add_joint(HingeJointBuilder::new().name("j0").axis(na::Vector3::z()), root, arm)
    ///     .unwrap();
    /// let robot = builder.finalize().unwrap();
    /// let rot = robot.joint(j0).rotation(0.5);
    /// assert!((rot.angle() - 0.5).abs() < 1e-10);
    /// ```
    pub fn rotation(&self, angle: T) -> UnitQuaternion<T> {
        UnitQuaternion::from_axis_angle(&self.axis, angle)
    }
    /// Transform from the child body frame into the parent body frame
    ///
    /// The two anchors are kept on top of each other.
    pub fn local_transform(&self, relative: &UnitQuaternion<T>) -> Isometry3<T> {
        Isometry3::from_parts(
            Translation3::from(self.parent_anchor - relative * self.child_anchor),
            *relative,
        )
    }
}

fn axis_to_string<T: RealField>(axis: &Unit<Vector3<T>>) -> &str {
    if *axis == Vector3::x_axis() {
        "+X"
    } else if *axis == Vector3::y_axis() {
        "+Y"
    } else if *axis == Vector3::z_axis() {
        "+Z"
    } else if *axis == -Vector3::x_axis() {
        "-X"
    } else if *axis == -Vector3::y_axis() {
        "-Y"
    } else if *axis == -Vector3::z_axis() {
        "-Z"
    } else {
        ""
    }
}

impl<T: RealField> Display for HingeJoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} [⚙{}]", self.name, axis_to_string(&self.axis))
    }
}

/// Build a `HingeJoint` to hand to `RobotBuilder::add_joint`
///
/// The default axis is +Z and both anchors are at the body origins.
#[derive(Debug, Clone)]
pub struct HingeJointBuilder<T: RealField> {
    name: String,
    axis: Vector3<T>,
    parent_anchor: Vector3<T>,
    child_anchor: Vector3<T>,
}

impl<T> Default for HingeJointBuilder<T>
where
    T: RealField + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HingeJointBuilder<T>
where
    T: RealField + Copy,
{
    pub fn new() -> HingeJointBuilder<T> {
        HingeJointBuilder {
            name: "".to_string(),
            axis: Vector3::z(),
            parent_anchor: Vector3::zeros(),
            child_anchor: Vector3::zeros(),
        }
    }
    pub fn name(mut self, name: &str) -> HingeJointBuilder<T> {
        self.name = name.to_string();
        self
    }
    /// Rotation axis, normalized when the joint is added
    pub fn axis(mut self, axis: Vector3<T>) -> HingeJointBuilder<T> {
        self.axis = axis;
        self
    }
    /// Pivot expressed in the parent body frame
    pub fn parent_anchor(mut self, anchor: Vector3<T>) -> HingeJointBuilder<T> {
        self.parent_anchor = anchor;
        self
    }
    /// Pivot expressed in the child body frame
    pub fn child_anchor(mut self, anchor: Vector3<T>) -> HingeJointBuilder<T> {
        self.child_anchor = anchor;
        self
    }
    pub(crate) fn finalize(self, id: JointId, parent: BodyId, child: BodyId) -> Result<HingeJoint<T>> {
        let axis = Unit::try_new(self.axis, T::default_epsilon()).ok_or(Error::InvalidAxisError)?;
        Ok(HingeJoint {
            name: self.name,
            id,
            parent,
            child,
            axis,
            parent_anchor: self.parent_anchor,
            child_anchor: self.child_anchor,
        })
    }
}

#[test]
fn test_local_transform_keeps_anchors_together() {
    let joint = HingeJointBuilder::<f64>::new()
        .axis(Vector3::new(0.0, 0.0, 2.0))
        .parent_anchor(Vector3::new(1.0, 0.0, 0.0))
        .child_anchor(Vector3::new(-0.5, 0.0, 0.0))
        .finalize(JointId(0), BodyId(0), BodyId(1))
        .unwrap();
    assert_eq!(format!("{}", joint), " [⚙+Z]");
    let trans = joint.local_transform(&joint.rotation(0.7));
    let pivot = trans * na::Point3::from(*joint.child_anchor());
    assert!((pivot.coords - joint.parent_anchor()).norm() < 1e-12);
}

#[test]
fn test_zero_axis_is_error() {
    let result = HingeJointBuilder::<f64>::new()
        .axis(Vector3::zeros())
        .finalize(JointId(0), BodyId(0), BodyId(1));
    assert!(matches!(result, Err(Error::InvalidAxisError)));
}
