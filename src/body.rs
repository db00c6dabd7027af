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
use crate::joint::JointId;
use std::fmt::{self, Display};

/// Stable handle of a rigid body inside a `Robot`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub(crate) usize);

impl BodyId {
    /// Position of the body in `Robot::bodies()`
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Rigid body of the kinematic tree
///
/// The body only knows its place in the tree, poses live in `RobotState`.
#[derive(Debug, Clone)]
pub struct RigidBody {
    /// Name of this body
    pub name: String,
    pub(crate) parent_joint: Option<JointId>,
    pub(crate) child_joints: Vec<JointId>,
}

impl RigidBody {
    pub(crate) fn new(name: &str) -> Self {
        RigidBody {
            name: name.to_string(),
            parent_joint: None,
            child_joints: Vec::new(),
        }
    }
    /// Joint which connects this body to its parent, `None` for the root
    #[inline]
    pub fn parent_joint(&self) -> Option<JointId> {
        self.parent_joint
    }
    #[inline]
    pub fn child_joints(&self) -> &[JointId] {
        &self.child_joints
    }
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_joint.is_none()
    }
    #[inline]
    pub fn is_end(&self) -> bool {
        self.child_joints.is_empty()
    }
}

impl Display for RigidBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
