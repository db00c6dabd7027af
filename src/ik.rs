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
use crate::coords::{GeneralizedCoordinates, ROOT_DOF};
use crate::errors::*;
use crate::jacobian::{AnalyticJacobian, FiniteDifferenceJacobian};
use crate::robot::Robot;
use crate::traits::PositionJacobian;
use na::{DMatrix, DVector, Matrix3xX, Point3, RealField};
use nalgebra as na;
use simba::scalar::SubsetOf;
use tracing::{debug, trace};

/// A point of a body and where it should go
#[derive(Debug, Clone)]
pub struct EndEffectorTarget<T: RealField> {
    pub body: BodyId,
    /// point in the frame of `body`
    pub local: Point3<T>,
    /// target in the world frame
    pub target: Point3<T>,
}

/// How several targets are combined in one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateStrategy {
    /// One step per target, in the order they were added. Later targets see
    /// the coordinates already moved by the earlier ones.
    #[default]
    Sequential,
    /// The jacobians of all targets are stacked and solved as one system.
    Stacked,
}

/// Jacobian used by the solver
///
/// Each variant carries its own settings, e.g. the difference step or the
/// root orientation columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JacobianMethod<T: RealField> {
    Analytic(AnalyticJacobian),
    FiniteDifference(FiniteDifferenceJacobian<T>),
}

impl<T> Default for JacobianMethod<T>
where
    T: RealField + Copy,
{
    fn default() -> Self {
        JacobianMethod::Analytic(AnalyticJacobian::default())
    }
}

impl<T> PositionJacobian<T> for JacobianMethod<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    fn position_jacobian(
        &self,
        coords: &GeneralizedCoordinates<'_, T>,
        local: &Point3<T>,
        body: BodyId,
    ) -> Matrix3xX<T> {
        match self {
            JacobianMethod::Analytic(jacobian) => jacobian.position_jacobian(coords, local, body),
            JacobianMethod::FiniteDifference(jacobian) => {
                jacobian.position_jacobian(coords, local, body)
            }
        }
    }
}

/// Inverse kinematics solver for position targets
///
/// Each iteration moves the joint coordinates by the damped Gauss-Newton step
/// `gain * (J^T J)^-1 J^T e`, where `J` is the jacobian without the root
/// columns and `e` is the position error. The root is never moved.
///
/// Targets are queued by `add_end_effector_target` and consumed by `solve`,
/// they have to be added again before every solve.
///
/// # Examples
///
/// ```
/// use nalgebra as na;
/// use hinge_ik::{HingeJointBuilder, IkSolverBuilder, RobotBuilder};
///
/// let mut builder = RobotBuilder::<f64>::new("base");
/// let base = builder.root();
/// let upper = builder.add_body("upper");
/// let lower = builder.add_body("lower");
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
/// let mut robot = builder.finalize().unwrap();
///
/// let mut solver = IkSolverBuilder::new().gain(0.5).finalize();
/// let tip = na::Point3::new(1.0, 0.0, 0.0);
/// let target = na::Point3::new(0.5, 1.2, 0.0);
/// for _ in 0..10 {
///     solver.add_end_effector_target(lower, tip, target);
///     solver.solve(&mut robot, 10).unwrap();
/// }
/// assert!((robot.world_point(lower, &tip) - target).norm() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct IkSolver<T: RealField> {
    /// step size of every update
    pub gain: T,
    pub strategy: UpdateStrategy,
    pub jacobian: JacobianMethod<T>,
    /// singular values of `J^T J` below `tolerance * largest` are ignored
    pub singular_value_tolerance: T,
    targets: Vec<EndEffectorTarget<T>>,
}

impl<T> IkSolver<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    pub const DEFAULT_NUM_STEPS: usize = 10;

    pub fn new(
        gain: T,
        strategy: UpdateStrategy,
        jacobian: JacobianMethod<T>,
        singular_value_tolerance: T,
    ) -> IkSolver<T> {
        IkSolver {
            gain,
            strategy,
            jacobian,
            singular_value_tolerance,
            targets: Vec::new(),
        }
    }
    /// Queue a target for the next `solve`
    pub fn add_end_effector_target(&mut self, body: BodyId, local: Point3<T>, target: Point3<T>) {
        self.targets.push(EndEffectorTarget {
            body,
            local,
            target,
        });
    }
    #[inline]
    pub fn targets(&self) -> &[EndEffectorTarget<T>] {
        &self.targets
    }
    #[inline]
    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }
    /// Run `num_steps` iterations and write the result into the robot state
    ///
    /// The queued targets are consumed. Returns the largest distance between
    /// a target and its point after the solve, zero if nothing was queued.
    /// The root coordinates are kept as they are.
    pub fn solve(&mut self, robot: &mut Robot<T>, num_steps: usize) -> Result<T> {
        let targets = std::mem::take(&mut self.targets);
        let mut coords = GeneralizedCoordinates::new(robot);
        if coords.dof() > ROOT_DOF && !targets.is_empty() {
            for step in 0..num_steps {
                match self.strategy {
                    UpdateStrategy::Sequential => {
                        for target in &targets {
                            let delta = self.sequential_update(&coords, target)?;
                            coords.add_to_joint_coordinates(&delta);
                        }
                    }
                    UpdateStrategy::Stacked => {
                        let delta = self.stacked_update(&coords, &targets)?;
                        coords.add_to_joint_coordinates(&delta);
                    }
                }
                trace!(
                    step,
                    residual = na::convert::<T, f64>(max_distance(&coords, &targets)),
                    "ik iteration"
                );
            }
        }
        let residual = max_distance(&coords, &targets);
        coords.sync_robot_state();
        debug!(
            steps = num_steps,
            targets = targets.len(),
            residual = na::convert::<T, f64>(residual),
            "ik solved"
        );
        Ok(residual)
    }

    fn sequential_update(
        &self,
        coords: &GeneralizedCoordinates<'_, T>,
        target: &EndEffectorTarget<T>,
    ) -> Result<DVector<T>> {
        let current = coords.world_coordinates(&target.local, target.body);
        let dpdq = self.jacobian.position_jacobian(coords, &target.local, target.body);
        let num_joints = coords.dof() - ROOT_DOF;
        let jacobian = DMatrix::from_fn(3, num_joints, |r, c| dpdq[(r, c + ROOT_DOF)]);
        let error = target.target - current;
        self.damped_step(&jacobian, &DVector::from_column_slice(error.as_slice()))
    }

    fn stacked_update(
        &self,
        coords: &GeneralizedCoordinates<'_, T>,
        targets: &[EndEffectorTarget<T>],
    ) -> Result<DVector<T>> {
        let num_joints = coords.dof() - ROOT_DOF;
        let mut jacobian = DMatrix::zeros(3 * targets.len(), num_joints);
        let mut error = DVector::zeros(3 * targets.len());
        for (t, target) in targets.iter().enumerate() {
            let current = coords.world_coordinates(&target.local, target.body);
            let dpdq = self.jacobian.position_jacobian(coords, &target.local, target.body);
            let e = target.target - current;
            for r in 0..3 {
                error[3 * t + r] = e[r];
                for c in 0..num_joints {
                    jacobian[(3 * t + r, c)] = dpdq[(r, c + ROOT_DOF)];
                }
            }
        }
        self.damped_step(&jacobian, &error)
    }

    /// `gain * (J^T J)^-1 J^T e`, solved by SVD so that singular `J^T J`
    /// gives the minimum norm step instead of failing
    fn damped_step(&self, jacobian: &DMatrix<T>, error: &DVector<T>) -> Result<DVector<T>> {
        let jacobian_t = jacobian.transpose();
        let normal = &jacobian_t * jacobian;
        let rhs = &jacobian_t * error;
        let svd = normal.svd(true, true);
        let largest = svd
            .singular_values
            .iter()
            .fold(T::zero(), |acc, s| acc.max(*s));
        let step = svd
            .solve(&rhs, largest * self.singular_value_tolerance)
            .map_err(|message| Error::InverseMatrixError {
                message: message.to_string(),
            })?;
        Ok(step * self.gain)
    }
}

impl<T> Default for IkSolver<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    fn default() -> Self {
        IkSolverBuilder::new().finalize()
    }
}

fn max_distance<T>(coords: &GeneralizedCoordinates<'_, T>, targets: &[EndEffectorTarget<T>]) -> T
where
    T: RealField + Copy + SubsetOf<f64>,
{
    targets
        .iter()
        .map(|target| (target.target - coords.world_coordinates(&target.local, target.body)).norm())
        .fold(T::zero(), |acc, d| acc.max(d))
}

/// Build `IkSolver`
///
/// This builder allows initialization of `IkSolver` without any parameters.
/// The defaults are `gain = 0.1`, sequential updates, the analytic jacobian
/// and `sqrt(epsilon)` as singular value tolerance.
#[derive(Debug, Clone)]
pub struct IkSolverBuilder<T>
where
    T: RealField,
{
    pub gain: T,
    pub strategy: UpdateStrategy,
    pub jacobian: JacobianMethod<T>,
    pub singular_value_tolerance: T,
}

impl<T> Default for IkSolverBuilder<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IkSolverBuilder<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    pub fn new() -> Self {
        IkSolverBuilder {
            gain: na::convert(0.1),
            strategy: UpdateStrategy::default(),
            jacobian: JacobianMethod::default(),
            singular_value_tolerance: T::default_epsilon().sqrt(),
        }
    }
    pub fn gain(&mut self, gain: T) -> &mut Self {
        self.gain = gain;
        self
    }
    pub fn strategy(&mut self, strategy: UpdateStrategy) -> &mut Self {
        self.strategy = strategy;
        self
    }
    pub fn jacobian(&mut self, jacobian: JacobianMethod<T>) -> &mut Self {
        self.jacobian = jacobian;
        self
    }
    pub fn singular_value_tolerance(&mut self, tolerance: T) -> &mut Self {
        self.singular_value_tolerance = tolerance;
        self
    }
    pub fn finalize(&self) -> IkSolver<T> {
        IkSolver::new(
            self.gain,
            self.strategy,
            self.jacobian,
            self.singular_value_tolerance,
        )
    }
}
