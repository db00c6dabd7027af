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
//! Jacobians of world point positions with respect to the generalized coordinates
use crate::body::BodyId;
use crate::coords::{GeneralizedCoordinates, ROOT_DOF};
use crate::traits::PositionJacobian;
use na::{Matrix3xX, Point3, RealField};
use nalgebra as na;
use simba::scalar::SubsetOf;

/// Which root orientation columns `AnalyticJacobian` fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootOrientationColumns {
    /// Yaw, pitch and roll columns
    #[default]
    All,
    /// Only the yaw column, pitch and roll stay zero
    ///
    /// Kept for callers which depend on the older, incomplete output.
    YawOnly,
}

/// Geometric jacobian of a point
///
/// * translation columns: identity
/// * rotational columns (root orientation and joints on the path to the
///   root): `world_axis x (p - pivot)`
/// * joints which do not move the point: zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalyticJacobian {
    pub root_orientation: RootOrientationColumns,
}

impl AnalyticJacobian {
    pub fn new(root_orientation: RootOrientationColumns) -> Self {
        Self { root_orientation }
    }
}

impl<T> PositionJacobian<T> for AnalyticJacobian
where
    T: RealField + Copy + SubsetOf<f64>,
{
    fn position_jacobian(
        &self,
        coords: &GeneralizedCoordinates<'_, T>,
        local: &Point3<T>,
        body: BodyId,
    ) -> Matrix3xX<T> {
        let mut jacobian = Matrix3xX::zeros(coords.dof());
        let p_n = coords.world_coordinates(local, body);
        for i in 0..3 {
            jacobian.set_column(i, &coords.q_axis(i).into_inner());
        }
        let root_columns = match self.root_orientation {
            RootOrientationColumns::All => 3..ROOT_DOF,
            RootOrientationColumns::YawOnly => 3..4,
        };
        let root_position = coords.root_position();
        for i in root_columns {
            let a_i = coords.world_axis_for_q(i);
            jacobian.set_column(i, &a_i.cross(&(p_n - root_position)));
        }
        for joint in coords.robot().iter_ancestors(body) {
            let i = coords.q_index_for_joint(Some(joint.id()));
            let p_i = coords.joint_pivot(joint.id());
            let a_i = coords.world_axis_for_q(i);
            jacobian.set_column(i, &a_i.cross(&(p_n - p_i)));
        }
        jacobian
    }
}

/// Central difference estimate of the jacobian
///
/// Each coordinate is moved by `+step` and `-step` on a copy of `q`, the
/// coordinates of the engine are never touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiniteDifferenceJacobian<T: RealField> {
    pub step: T,
}

impl<T> FiniteDifferenceJacobian<T>
where
    T: RealField + Copy,
{
    pub fn new(step: T) -> Self {
        Self { step }
    }
}

impl<T> Default for FiniteDifferenceJacobian<T>
where
    T: RealField + Copy,
{
    fn default() -> Self {
        Self {
            step: na::convert(1.0e-4),
        }
    }
}

impl<T> PositionJacobian<T> for FiniteDifferenceJacobian<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    fn position_jacobian(
        &self,
        coords: &GeneralizedCoordinates<'_, T>,
        local: &Point3<T>,
        body: BodyId,
    ) -> Matrix3xX<T> {
        let mut q = coords.q().clone();
        let mut jacobian = Matrix3xX::zeros(q.len());
        let two_step = self.step + self.step;
        for i in 0..q.len() {
            let orig = q[i];
            q[i] = orig + self.step;
            let p_plus = coords.world_coordinates_at(&q, local, body);
            q[i] = orig - self.step;
            let p_minus = coords.world_coordinates_at(&q, local, body);
            q[i] = orig;
            jacobian.set_column(i, &((p_plus - p_minus) / two_step));
        }
        jacobian
    }
}
