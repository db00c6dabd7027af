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
//! Reduced (generalized) coordinates of a robot
use crate::body::BodyId;
use crate::errors::*;
use crate::jacobian::{AnalyticJacobian, FiniteDifferenceJacobian};
use crate::joint::JointId;
use crate::math::*;
use crate::robot::Robot;
use crate::state::RobotState;
use crate::traits::PositionJacobian;
use na::{DVector, Matrix3xX, Point3, RealField, Unit, UnitQuaternion, Vector3};
use nalgebra as na;
use simba::scalar::SubsetOf;
use tracing::{trace, warn};

/// Number of coordinates of the root: three for the position, three for the
/// orientation
pub const ROOT_DOF: usize = 6;

/// Generalized coordinates `q` of a robot made of hinge joints
///
/// * `q[0..3]`: root position along the world X, Y and Z axes
/// * `q[3]`: root yaw around `up`
/// * `q[4]`: root pitch around `up x forward`
/// * `q[5]`: root roll around `forward`
/// * `q[6 + j]`: angle of the joint with index `j`
///
/// The root orientation is `R(up, q[3]) * R(up x forward, q[4]) * R(forward, q[5])`.
///
/// The coordinates form a tree: the parent of a joint coordinate is the
/// coordinate of the parent joint of its parent body, the root coordinates
/// are chained `0 <- 1 <- ... <- 5`.
///
/// It borrows the robot mutably for its whole life, the maximal state of the
/// robot is read when it is created and written by `sync_robot_state`.
///
/// # Examples
///
/// ```
/// use nalgebra as na;
/// use hinge_ik::{GeneralizedCoordinates, HingeJointBuilder, RobotBuilder, RobotState};
///
/// let mut builder = RobotBuilder::<f64>::new("base");
/// let base = builder.root();
/// let arm = builder.add_body("arm");
/// builder
///     .add_joint(HingeJointBuilder::new().name("j0"), base, arm)
///     .unwrap();
/// let mut robot = builder.finalize().unwrap();
///
/// let mut state = RobotState::new(1);
/// state.set_position(na::Point3::new(0.0, 0.0, 1.0));
/// state
///     .set_joint_relative_orientation(0, na::UnitQuaternion::from_axis_angle(&na::Vector3::z_axis(), 0.5))
///     .unwrap();
/// robot.set_state(&state).unwrap();
///
/// let mut coords = GeneralizedCoordinates::new(&mut robot);
/// assert_eq!(coords.dof(), 7);
/// assert!((coords.q()[2] - 1.0).abs() < 1e-10);
/// assert!((coords.q()[6] - 0.5).abs() < 1e-10);
///
/// let mut q = coords.q().clone();
/// q[6] = std::f64::consts::FRAC_PI_2;
/// coords.set_q(&q).unwrap();
/// let p = coords.world_coordinates(&na::Point3::new(1.0, 0.0, 0.0), arm);
/// assert!((p - na::Point3::new(0.0, 1.0, 1.0)).norm() < 1e-10);
/// coords.sync_robot_state();
/// ```
#[derive(Debug)]
pub struct GeneralizedCoordinates<'a, T: RealField> {
    robot: &'a mut Robot<T>,
    q: DVector<T>,
}

impl<'a, T> GeneralizedCoordinates<'a, T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    /// Bind to the robot and read its current maximal state
    pub fn new(robot: &'a mut Robot<T>) -> Self {
        let q = DVector::zeros(ROOT_DOF + robot.joint_count());
        let mut coords = GeneralizedCoordinates { robot, q };
        coords.q = coords.decompose(coords.robot.state());
        coords
    }
    #[inline]
    pub fn robot(&self) -> &Robot<T> {
        &*self.robot
    }
    /// Number of coordinates, `6 + joint_count`
    #[inline]
    pub fn dof(&self) -> usize {
        self.q.len()
    }
    #[inline]
    pub fn q(&self) -> &DVector<T> {
        &self.q
    }
    /// Replace all the coordinates
    ///
    /// It fails if the length is not `dof()`.
    pub fn set_q(&mut self, q: &DVector<T>) -> Result<()> {
        if q.len() != self.q.len() {
            return Err(Error::SizeMismatchError {
                input: q.len(),
                required: self.q.len(),
            });
        }
        self.q.copy_from(q);
        Ok(())
    }
    /// Add `delta` to the joint coordinates, leaving the root untouched
    pub(crate) fn add_to_joint_coordinates(&mut self, delta: &DVector<T>) {
        debug_assert_eq!(delta.len() + ROOT_DOF, self.q.len());
        for (i, d) in delta.iter().enumerate() {
            self.q[ROOT_DOF + i] += *d;
        }
    }

    /// Coordinate driven by the joint, `5` (root roll) for `None`
    #[inline]
    pub fn q_index_for_joint(&self, joint: Option<JointId>) -> usize {
        match joint {
            Some(joint) => self.q_index_for_joint_index(joint.index()),
            None => ROOT_DOF - 1,
        }
    }
    #[inline]
    pub fn q_index_for_joint_index(&self, joint_index: usize) -> usize {
        ROOT_DOF + joint_index
    }
    /// Joint driven by the coordinate, `None` for the root coordinates
    pub fn joint_for_q_index(&self, q_index: usize) -> Option<JointId> {
        if q_index < ROOT_DOF {
            return None;
        }
        Some(self.robot.joints()[q_index - ROOT_DOF].id())
    }
    /// Predecessor of the coordinate in the coordinate tree, `None` for `0`
    pub fn parent_q_index(&self, q_index: usize) -> Option<usize> {
        if q_index < ROOT_DOF {
            return q_index.checked_sub(1);
        }
        let joint = &self.robot.joints()[q_index - ROOT_DOF];
        let parent_joint = self.robot.body(joint.parent()).parent_joint();
        Some(self.q_index_for_joint(parent_joint))
    }
    /// Axis of the coordinate, in the frame it rotates (or moves) within
    pub fn q_axis(&self, q_index: usize) -> Unit<Vector3<T>> {
        match q_index {
            0 => Vector3::x_axis(),
            1 => Vector3::y_axis(),
            2 => Vector3::z_axis(),
            3 => *self.robot.up(),
            4 => *self.robot.pitch_axis(),
            5 => *self.robot.forward(),
            _ => *self.robot.joints()[q_index - ROOT_DOF].axis(),
        }
    }

    /// Read the coordinates from a maximal state (tree to q)
    ///
    /// It fails if the state has a different number of joints.
    pub fn sync_with_state(&mut self, state: &RobotState<T>) -> Result<()> {
        self.q = self.q_from_state(state)?;
        Ok(())
    }
    /// Re-read the coordinates from the current state of the robot
    pub fn sync_with_robot_state(&mut self) {
        self.q = self.decompose(self.robot.state());
    }
    /// Coordinates of another maximal state, `q()` is left as is
    pub fn q_from_state(&self, state: &RobotState<T>) -> Result<DVector<T>> {
        if state.joint_count() != self.robot.joint_count() {
            return Err(Error::SizeMismatchError {
                input: state.joint_count(),
                required: self.robot.joint_count(),
            });
        }
        Ok(self.decompose(state))
    }
    fn decompose(&self, state: &RobotState<T>) -> DVector<T> {
        let mut q = DVector::zeros(self.q.len());
        let position = state.position();
        q[0] = position.x;
        q[1] = position.y;
        q[2] = position.z;
        let angles = to_sequential_angles(state.orientation(), self.robot.up(), self.robot.forward());
        q[3] = angles[0];
        q[4] = angles[1];
        q[5] = angles[2];
        for (joint, relative) in self
            .robot
            .joints()
            .iter()
            .zip(state.joint_relative_orientations())
        {
            let swing = swing_angle(relative, joint.axis());
            if swing > na::convert::<_, T>(1.0e-6) {
                warn!(
                    joint = %joint.name,
                    swing = na::convert::<T, f64>(swing),
                    "dropping rotation which is not around the hinge axis"
                );
            }
            q[self.q_index_for_joint_index(joint.index())] = to_twist_angle(relative, joint.axis());
        }
        trace!(dof = q.len(), "generalized coordinates synced from state");
        q
    }
    /// Maximal state described by the current coordinates (q to tree)
    pub fn reduced_state(&self) -> RobotState<T> {
        let joint_orientations = self
            .robot
            .joints()
            .iter()
            .map(|joint| joint.rotation(self.q[self.q_index_for_joint_index(joint.index())]))
            .collect();
        RobotState::from_parts(self.root_position(), self.root_orientation(), joint_orientations)
    }
    /// Push the current coordinates into the robot
    pub fn sync_robot_state(&mut self) {
        let state = self.reduced_state();
        self.robot.replace_state(state);
    }

    /// World position of the root, `sum(q[i] * axis(i))` for `i` in `0..3`
    pub fn root_position(&self) -> Point3<T> {
        self.root_position_at(&self.q)
    }
    fn root_position_at(&self, q: &DVector<T>) -> Point3<T> {
        (0..3).fold(Point3::origin(), |position, i| {
            position + self.q_axis(i).into_inner() * q[i]
        })
    }
    /// World orientation of the root, `yaw * pitch * roll`
    pub fn root_orientation(&self) -> UnitQuaternion<T> {
        self.world_rotation_for_q(ROOT_DOF - 1)
    }
    /// Rotation of the coordinate alone, identity for the translations
    pub fn relative_rotation_for_q(&self, q_index: usize) -> UnitQuaternion<T> {
        self.relative_rotation_for_q_at(&self.q, q_index)
    }
    fn relative_rotation_for_q_at(&self, q: &DVector<T>, q_index: usize) -> UnitQuaternion<T> {
        if q_index < 3 {
            return UnitQuaternion::identity();
        }
        UnitQuaternion::from_axis_angle(&self.q_axis(q_index), q[q_index])
    }
    /// World orientation of the frame driven by the coordinate
    ///
    /// All the rotations from the coordinate up to the root yaw are composed,
    /// the root translations do not contribute.
    pub fn world_rotation_for_q(&self, q_index: usize) -> UnitQuaternion<T> {
        self.world_rotation_for_q_at(&self.q, q_index)
    }
    fn world_rotation_for_q_at(&self, q: &DVector<T>, q_index: usize) -> UnitQuaternion<T> {
        let mut rotation = UnitQuaternion::identity();
        let mut current = Some(q_index);
        while let Some(index) = current {
            if index < 3 {
                break;
            }
            rotation = self.relative_rotation_for_q_at(q, index) * rotation;
            current = self.parent_q_index(index);
        }
        rotation
    }
    /// Axis of the coordinate expressed in the world frame
    pub fn world_axis_for_q(&self, q_index: usize) -> Unit<Vector3<T>> {
        let axis = self.q_axis(q_index);
        match self.parent_q_index(q_index) {
            Some(parent) if q_index >= 3 => self.world_rotation_for_q(parent) * axis,
            _ => axis,
        }
    }
    /// World orientation of a body
    pub fn orientation_for(&self, body: BodyId) -> UnitQuaternion<T> {
        let q_index = self.q_index_for_joint(self.robot.body(body).parent_joint());
        self.world_rotation_for_q(q_index)
    }

    /// World position of a point given in the frame of `body` (forward kinematics)
    ///
    /// The point is carried from frame to frame along the coordinate tree,
    /// then the root position is added.
    pub fn world_coordinates(&self, local: &Point3<T>, body: BodyId) -> Point3<T> {
        self.world_coordinates_at(&self.q, local, body)
    }
    pub(crate) fn world_coordinates_at(
        &self,
        q: &DVector<T>,
        local: &Point3<T>,
        body: BodyId,
    ) -> Point3<T> {
        let mut point = *local;
        let mut current = Some(self.q_index_for_joint(self.robot.body(body).parent_joint()));
        while let Some(index) = current {
            if index < 3 {
                break;
            }
            point = self.coords_in_parent_frame_at(q, index, &point);
            current = self.parent_q_index(index);
        }
        point + self.root_position_at(q).coords
    }
    /// Move a point of the frame rotated by the coordinate into the frame of
    /// its parent coordinate
    fn coords_in_parent_frame_at(&self, q: &DVector<T>, q_index: usize, local: &Point3<T>) -> Point3<T> {
        let rotation = self.relative_rotation_for_q_at(q, q_index);
        match self.joint_for_q_index(q_index) {
            Some(id) => {
                let joint = self.robot.joint(id);
                Point3::from(joint.parent_anchor() + rotation * (local.coords - joint.child_anchor()))
            }
            None => rotation * local,
        }
    }
    /// World position of the pivot of a joint
    pub fn joint_pivot(&self, joint: JointId) -> Point3<T> {
        let joint = self.robot.joint(joint);
        self.world_coordinates(&Point3::from(*joint.child_anchor()), joint.child())
    }

    /// Jacobian `dp/dq` of the world position of a point of `body`
    ///
    /// All six root columns are filled. See `AnalyticJacobian` for the other
    /// options.
    pub fn jacobian(&self, local: &Point3<T>, body: BodyId) -> Matrix3xX<T> {
        AnalyticJacobian::default().position_jacobian(self, local, body)
    }
    /// Jacobian `dp/dq` estimated by central differences
    pub fn numerical_jacobian(&self, local: &Point3<T>, body: BodyId) -> Matrix3xX<T> {
        FiniteDifferenceJacobian::default().position_jacobian(self, local, body)
    }
}
