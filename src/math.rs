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
//! Rotation helpers used to move between quaternions and joint angles
use na::{Matrix3, RealField, Unit, UnitQuaternion, Vector3};
use nalgebra as na;

/// Decompose a rotation into three sequential angles around fixed axes
///
/// The returned `(yaw, pitch, roll)` satisfies
/// `rotation = R(up, yaw) * R(up x forward, pitch) * R(forward, roll)`.
/// `up` and `forward` must be perpendicular unit vectors.
///
/// # Examples
///
/// ```
/// use nalgebra as na;
/// use hinge_ik::math::to_sequential_angles;
///
/// let up = na::Vector3::<f64>::y_axis();
/// let forward = na::Vector3::z_axis();
/// let rot = na::UnitQuaternion::from_axis_angle(&up, 0.3)
///     * na::UnitQuaternion::from_axis_angle(&na::Vector3::x_axis(), 0.2)
///     * na::UnitQuaternion::from_axis_angle(&forward, -0.1);
/// let angles = to_sequential_angles(&rot, &up, &forward);
/// assert!((angles[0] - 0.3).abs() < 1e-10);
/// assert!((angles[1] - 0.2).abs() < 1e-10);
/// assert!((angles[2] + 0.1).abs() < 1e-10);
/// ```
pub fn to_sequential_angles<T>(
    rotation: &UnitQuaternion<T>,
    up: &Unit<Vector3<T>>,
    forward: &Unit<Vector3<T>>,
) -> Vector3<T>
where
    T: RealField + Copy,
{
    let up = up.into_inner();
    let forward = forward.into_inner();
    let pitch_axis = up.cross(&forward);
    // in this basis the sequence is a plain Y-X-Z rotation
    let basis = Matrix3::from_columns(&[pitch_axis, up, forward]);
    let m = basis.transpose() * rotation.to_rotation_matrix().matrix() * basis;

    let cos_pitch = m[(1, 0)].hypot(m[(1, 1)]);
    let pitch = (-m[(1, 2)]).atan2(cos_pitch);
    let (yaw, roll) = if cos_pitch > T::default_epsilon() {
        (m[(0, 2)].atan2(m[(2, 2)]), m[(1, 0)].atan2(m[(1, 1)]))
    } else {
        // gimbal lock: yaw and roll turn around the same axis
        ((-m[(2, 0)]).atan2(m[(0, 0)]), T::zero())
    };
    Vector3::new(yaw, pitch, roll)
}

/// Build the rotation `R(up, yaw) * R(up x forward, pitch) * R(forward, roll)`
pub fn from_sequential_angles<T>(
    angles: &Vector3<T>,
    up: &Unit<Vector3<T>>,
    forward: &Unit<Vector3<T>>,
) -> UnitQuaternion<T>
where
    T: RealField + Copy,
{
    let pitch_axis = Unit::new_normalize(up.cross(&forward.into_inner()));
    UnitQuaternion::from_axis_angle(up, angles[0])
        * UnitQuaternion::from_axis_angle(&pitch_axis, angles[1])
        * UnitQuaternion::from_axis_angle(forward, angles[2])
}

/// Angle of the rotation around `axis`, in `[-pi, pi]`
///
/// Only the twist around `axis` is kept; any swing component is dropped.
///
/// # Examples
///
/// ```
/// use nalgebra as na;
/// use hinge_ik::math::to_twist_angle;
///
/// let axis = na::Vector3::<f64>::z_axis();
/// let rot = na::UnitQuaternion::from_axis_angle(&axis, -2.0);
/// assert!((to_twist_angle(&rot, &axis) + 2.0).abs() < 1e-10);
/// ```
pub fn to_twist_angle<T>(rotation: &UnitQuaternion<T>, axis: &Unit<Vector3<T>>) -> T
where
    T: RealField + Copy,
{
    let quat = rotation.quaternion();
    let projection = quat.imag().dot(&axis.into_inner());
    let w = quat.scalar();
    // q and -q are the same rotation, keep w positive to stay in [-pi, pi]
    let (projection, w) = if w < T::zero() {
        (-projection, -w)
    } else {
        (projection, w)
    };
    projection.atan2(w) * na::convert::<_, T>(2.0)
}

/// Angle of the part of `rotation` which is not a rotation around `axis`
pub fn swing_angle<T>(rotation: &UnitQuaternion<T>, axis: &Unit<Vector3<T>>) -> T
where
    T: RealField + Copy,
{
    let twist = UnitQuaternion::from_axis_angle(axis, to_twist_angle(rotation, axis));
    let swing = twist.inverse() * rotation;
    let quat = swing.quaternion();
    quat.imag().norm().atan2(quat.scalar().abs()) * na::convert::<_, T>(2.0)
}

#[test]
fn test_sequential_angles_gimbal_lock() {
    let up = Vector3::<f64>::y_axis();
    let forward = Vector3::<f64>::z_axis();
    let rot = from_sequential_angles(&Vector3::new(0.4, std::f64::consts::FRAC_PI_2, 0.0), &up, &forward);
    let angles = to_sequential_angles(&rot, &up, &forward);
    assert!((angles[1] - std::f64::consts::FRAC_PI_2).abs() < 1e-6);
    let rebuilt = from_sequential_angles(&angles, &up, &forward);
    assert!(rot.angle_to(&rebuilt) < 1e-6);
}

#[test]
fn test_twist_of_negated_quaternion() {
    let axis = Unit::new_normalize(Vector3::new(1.0_f64, 1.0, 0.0));
    let rot = UnitQuaternion::from_axis_angle(&axis, 3.0);
    let negated = UnitQuaternion::new_unchecked(-rot.into_inner());
    assert!((to_twist_angle(&negated, &axis) - 3.0).abs() < 1e-10);
    assert!(swing_angle(&negated, &axis) < 1e-10);
}
