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
use crate::body::BodyId;
use crate::coords::GeneralizedCoordinates;
use na::{Matrix3xX, Point3, RealField};
use nalgebra as na;
use simba::scalar::SubsetOf;

/// Jacobian of the world position of a body point with respect to `q`
///
/// Implemented analytically by `AnalyticJacobian` and numerically by
/// `FiniteDifferenceJacobian`, so that one can be checked against the other.
pub trait PositionJacobian<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    /// Returns the `3 x dof` matrix `dp/dq` for the point `local` of `body`
    fn position_jacobian(
        &self,
        coords: &GeneralizedCoordinates<'_, T>,
        local: &Point3<T>,
        body: BodyId,
    ) -> Matrix3xX<T>;
}
