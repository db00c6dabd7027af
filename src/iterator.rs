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
//! Iterators to walk the joints of a `Robot` upward and downward
use crate::body::BodyId;
use crate::joint::{HingeJoint, JointId};
use crate::robot::Robot;
use na::RealField;
use nalgebra as na;

#[derive(Debug)]
/// Iterator over the joints from a body up to the root
///
/// The first item is the parent joint of the body.
pub struct Ancestors<'a, T>
where
    T: RealField,
{
    robot: &'a Robot<T>,
    parent: Option<JointId>,
}

impl<'a, T> Ancestors<'a, T>
where
    T: RealField + Copy,
{
    pub fn new(robot: &'a Robot<T>, body: BodyId) -> Self {
        Self {
            robot,
            parent: robot.body(body).parent_joint(),
        }
    }
}

impl<'a, T> Iterator for Ancestors<'a, T>
where
    T: RealField + Copy,
{
    type Item = &'a HingeJoint<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let joint = self.robot.joint(self.parent?);
        self.parent = self.robot.body(joint.parent()).parent_joint();
        Some(joint)
    }
}

#[derive(Debug)]
/// Iterator over all the joints below a body
///
/// Depth first, in insertion order. A joint is always visited before the
/// joints of its child body.
pub struct Descendants<'a, T>
where
    T: RealField,
{
    robot: &'a Robot<T>,
    stack: Vec<JointId>,
}

impl<'a, T> Descendants<'a, T>
where
    T: RealField + Copy,
{
    pub fn new(robot: &'a Robot<T>, body: BodyId) -> Self {
        Self {
            robot,
            stack: robot.body(body).child_joints().iter().rev().copied().collect(),
        }
    }
}

impl<'a, T> Iterator for Descendants<'a, T>
where
    T: RealField + Copy,
{
    type Item = &'a HingeJoint<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let joint = self.robot.joint(self.stack.pop()?);
        self.stack
            .extend(self.robot.body(joint.child()).child_joints().iter().rev());
        Some(joint)
    }
}
