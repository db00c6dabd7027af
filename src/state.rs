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
//! Maximal (per body) state of a robot
use crate::errors::*;
use crate::robot::Robot;
use na::{Point3, RealField, UnitQuaternion};
use nalgebra as na;

/// Pose of the root and relative orientation of every joint
///
/// This is the representation consumed by simulators and renderers.
/// Use `GeneralizedCoordinates` to convert it into joint angles.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotState<T: RealField> {
    position: Point3<T>,
    orientation: UnitQuaternion<T>,
    joint_orientations: Vec<UnitQuaternion<T>>,
}

impl<T> RobotState<T>
where
    T: RealField + Copy,
{
    /// Root at the origin and every joint at its zero angle
    pub fn new(joint_count: usize) -> Self {
        RobotState {
            position: Point3::origin(),
            orientation: UnitQuaternion::identity(),
            joint_orientations: vec![UnitQuaternion::identity(); joint_count],
        }
    }
    pub fn from_parts(
        position: Point3<T>,
        orientation: UnitQuaternion<T>,
        joint_orientations: Vec<UnitQuaternion<T>>,
    ) -> Self {
        RobotState {
            position,
            orientation,
            joint_orientations,
        }
    }
    /// Copy the current state out of the robot
    pub fn from_robot(robot: &Robot<T>) -> Self {
        robot.state().clone()
    }
    /// Write this state into the robot
    ///
    /// It fails if the number of joints differs.
    pub fn apply_to(&self, robot: &mut Robot<T>) -> Result<()> {
        robot.set_state(self)
    }
    #[inline]
    pub fn position(&self) -> &Point3<T> {
        &self.position
    }
    #[inline]
    pub fn set_position(&mut self, position: Point3<T>) {
        self.position = position;
    }
    #[inline]
    pub fn orientation(&self) -> &UnitQuaternion<T> {
        &self.orientation
    }
    #[inline]
    pub fn set_orientation(&mut self, orientation: UnitQuaternion<T>) {
        self.orientation = orientation;
    }
    #[inline]
    pub fn joint_count(&self) -> usize {
        self.joint_orientations.len()
    }
    /// Orientation of the child body of the joint relative to its parent body
    pub fn joint_relative_orientation(&self, joint_index: usize) -> Option<&UnitQuaternion<T>> {
        self.joint_orientations.get(joint_index)
    }
    pub fn set_joint_relative_orientation(
        &mut self,
        joint_index: usize,
        orientation: UnitQuaternion<T>,
    ) -> Result<()> {
        match self.joint_orientations.get_mut(joint_index) {
            Some(slot) => {
                *slot = orientation;
                Ok(())
            }
            None => Err(Error::InvalidJointError { index: joint_index }),
        }
    }
    #[inline]
    pub fn joint_relative_orientations(&self) -> &[UnitQuaternion<T>] {
        &self.joint_orientations
    }
}

#[test]
fn test_joint_orientation_out_of_range() {
    let mut state = RobotState::<f64>::new(2);
    assert!(state.joint_relative_orientation(1).is_some());
    assert!(state.joint_relative_orientation(2).is_none());
    let rot = UnitQuaternion::from_axis_angle(&na::Vector3::x_axis(), 0.2);
    assert!(state.set_joint_relative_orientation(1, rot).is_ok());
    assert_eq!(state.joint_relative_orientation(1), Some(&rot));
    assert!(matches!(
        state.set_joint_relative_orientation(5, rot),
        Err(Error::InvalidJointError { index: 5 })
    ));
}
