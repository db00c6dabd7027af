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
//! # Generalized coordinates and inverse kinematics for hinge joint trees using [nalgebra](http://nalgebra.org).
//!
//! `hinge_ik` has below functionalities
//!
//! 1. Conversion between the maximal state of a robot (root pose and relative
//!    orientation of every joint) and its generalized coordinates `q`
//! 1. Forward kinematics and jacobians (analytic and finite difference) of
//!    body points with respect to `q`
//! 1. Inverse kinematics for position targets on any body
//!
//! See `GeneralizedCoordinates` and `IkSolver` as the top level interfaces.
//!
mod body;
mod coords;
mod errors;
mod ik;
pub mod iterator;
pub mod jacobian;
pub mod joint;
pub mod math;
pub mod prelude;
mod robot;
mod state;
mod traits;

pub use self::body::*;
pub use self::coords::*;
pub use self::errors::*;
pub use self::ik::*;
pub use self::jacobian::{AnalyticJacobian, FiniteDifferenceJacobian, RootOrientationColumns};
pub use self::joint::{HingeJoint, HingeJointBuilder, JointId};
pub use self::robot::*;
pub use self::state::*;
pub use self::traits::*;

// re-export from nalgebra
pub use nalgebra::{
    DVector, Isometry3, Matrix3xX, Point3, RealField, Unit, UnitQuaternion, Vector3,
};
pub use simba::scalar::{SubsetOf, SupersetOf};
