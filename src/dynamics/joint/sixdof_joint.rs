use crate::dynamics::joint::{
    AngularLimitMotor, JointAxesMask, JointAxis, LimitState, LinearLimitMotor, RelativeFrames,
};
use crate::dynamics::solver::{ConstraintRow, ConstraintRows, JacobianEntry, RowCount, SolverBody};
use crate::dynamics::{IntegrationParameters, RigidBody};
use crate::math::{Isometry, Point, Real, Vector, ANG_DIM, DIM};
use crate::utils;

/// The solve strategy of a [`SixDofJoint`], fixed at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum SolveMode {
    /// The constraint mutates the solver-body velocities directly, one axis at
    /// a time, across solver sub-iterations.
    SequentialImpulse,
    /// The constraint emits generic constraint rows consumed by an external
    /// iterative solver.
    ConstraintRows,
}

/// Whose basis defines the primary linear axes of the sequential-impulse path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum ReferenceFrame {
    /// Use body A's joint frame.
    BodyA,
    /// Use body B's joint frame.
    BodyB,
}

/// A generic six-degrees-of-freedom joint between two rigid-bodies.
///
/// Given two local reference frames, one per body, the joint restricts the
/// relative linear and angular motion of the bodies to per-axis ranges. Each
/// of the six degrees of freedom can be free (`lo > hi`), limited
/// (`lo <= hi`), or rigidly locked (`lo == hi`); the three rotational axes can
/// additionally be driven by a velocity motor.
///
/// The relative rotation is measured as XYZ Euler angles of
/// `world_frame_a⁻¹ · world_frame_b` (see
/// [`matrix_to_euler_xyz`](crate::dynamics::joint::matrix_to_euler_xyz)).
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SixDofJoint {
    /// The joint frame, expressed in the local frame of the first body.
    pub local_frame_a: Isometry,
    /// The joint frame, expressed in the local frame of the second body.
    pub local_frame_b: Isometry,
    /// The limits of the three translational degrees of freedom.
    pub linear_limit: LinearLimitMotor,
    /// The limit/motor units of the three rotational degrees of freedom.
    pub angular_limits: [AngularLimitMotor; ANG_DIM],
    /// Whose basis defines the primary linear axes when solving the
    /// translational limits.
    pub linear_reference_frame: ReferenceFrame,
    solve_mode: SolveMode,
    frames: RelativeFrames,
    jac_linear: [JacobianEntry; DIM],
    jac_angular: [JacobianEntry; ANG_DIM],
}

impl SixDofJoint {
    /// Creates a new 6-DoF joint from the two local joint frames.
    ///
    /// All translational axes start rigidly locked (`lo == hi == 0`) and all
    /// rotational axes start free, matching the default limit-motor
    /// configurations.
    pub fn new(local_frame_a: Isometry, local_frame_b: Isometry, solve_mode: SolveMode) -> Self {
        Self {
            local_frame_a,
            local_frame_b,
            linear_limit: LinearLimitMotor::default(),
            angular_limits: [AngularLimitMotor::default(); ANG_DIM],
            linear_reference_frame: ReferenceFrame::BodyA,
            solve_mode,
            frames: RelativeFrames::default(),
            jac_linear: [JacobianEntry::default(); DIM],
            jac_angular: [JacobianEntry::default(); ANG_DIM],
        }
    }

    /// The solve strategy of this joint.
    #[inline]
    pub fn solve_mode(&self) -> SolveMode {
        self.solve_mode
    }

    /// The world-space geometry computed by the last frame refresh.
    #[inline]
    pub fn frames(&self) -> &RelativeFrames {
        &self.frames
    }

    /// The `axis_index`-th angular constraint axis, in world space.
    #[inline]
    pub fn axis(&self, axis_index: usize) -> Vector {
        self.frames.axes[axis_index]
    }

    /// The relative Euler angle of the `axis_index`-th rotational degree of freedom.
    #[inline]
    pub fn angle(&self, axis_index: usize) -> Real {
        self.frames.euler_angles[axis_index]
    }

    /// The limit/motor unit of the `axis_index`-th rotational degree of freedom.
    pub fn angular_limit_motor(&self, axis_index: usize) -> &AngularLimitMotor {
        &self.angular_limits[axis_index]
    }

    /// The mutable limit/motor unit of the `axis_index`-th rotational degree of freedom.
    pub fn angular_limit_motor_mut(&mut self, axis_index: usize) -> &mut AngularLimitMotor {
        &mut self.angular_limits[axis_index]
    }

    /// Sets the `[lo, hi]` bounds of one degree of freedom. `lo > hi` frees
    /// the axis, `lo == hi` locks it rigidly.
    pub fn set_limit(&mut self, axis: JointAxis, lo: Real, hi: Real) -> &mut Self {
        let i = axis.local_index();
        if axis.is_angular() {
            let motor = &mut self.angular_limits[i];
            motor.lo_limit = lo;
            motor.hi_limit = hi;
            motor.invalidate_limit_state();
        } else {
            self.linear_limit.lower_limit[i] = lo;
            self.linear_limit.upper_limit[i] = hi;
        }
        self
    }

    /// Enables the motor of a rotational degree of freedom and sets its target
    /// velocity and force cap.
    ///
    /// Panics if `axis` is not one of the rotational degrees of freedom.
    pub fn set_motor_velocity(
        &mut self,
        axis: JointAxis,
        target_velocity: Real,
        max_motor_force: Real,
    ) -> &mut Self {
        assert!(axis.is_angular(), "only the rotational axes are powered");
        let motor = &mut self.angular_limits[axis.local_index()];
        motor.enable_motor = true;
        motor.target_velocity = target_velocity;
        motor.max_motor_force = max_motor_force;
        self
    }

    /// Enables or disables the motor of a rotational degree of freedom.
    ///
    /// Panics if `axis` is not one of the rotational degrees of freedom.
    pub fn set_motor_enabled(&mut self, axis: JointAxis, enabled: bool) -> &mut Self {
        assert!(axis.is_angular(), "only the rotational axes are powered");
        self.angular_limits[axis.local_index()].enable_motor = enabled;
        self
    }

    /// The set of degrees of freedom currently carrying a limit.
    pub fn limited_axes(&self) -> JointAxesMask {
        let mut mask = JointAxesMask::empty();
        for i in 0..DIM {
            if self.linear_limit.is_limited(i) {
                mask |= JointAxesMask::from_bits(1 << i).unwrap();
            }
        }
        for i in 0..ANG_DIM {
            if self.angular_limits[i].is_limited() {
                mask |= JointAxesMask::from_bits(1 << (DIM + i)).unwrap();
            }
        }
        mask
    }

    /// Refreshes the world frames, Euler angles, constraint axes and anchor
    /// point from the bodies' current transforms.
    ///
    /// This invalidates the cached angular limit states: they must be
    /// recomputed through [`test_angular_limit_motor`](Self::test_angular_limit_motor)
    /// before the next solve.
    pub fn update_frames(&mut self, rb_a: &RigidBody, rb_b: &RigidBody) {
        for motor in &mut self.angular_limits {
            motor.invalidate_limit_state();
        }
        self.frames
            .update(&self.local_frame_a, &self.local_frame_b, rb_a, rb_b);
    }

    /// Tests the current Euler angle of one rotational axis against its
    /// limits, arming or disarming the axis. Returns whether the axis needs
    /// torques applied.
    pub fn test_angular_limit_motor(&mut self, axis_index: usize) -> bool {
        let angle = self.frames.euler_angles[axis_index];
        self.angular_limits[axis_index].test_limit_value(angle);
        self.angular_limits[axis_index].needs_torque()
    }

    /// The world direction of the `i`-th primary linear axis, taken from the
    /// configured reference frame.
    fn linear_axis(&self, i: usize) -> Vector {
        let frame = match self.linear_reference_frame {
            ReferenceFrame::BodyA => &self.frames.frame_a,
            ReferenceFrame::BodyB => &self.frames.frame_b,
        };
        frame
            .rotation
            .to_rotation_matrix()
            .into_inner()
            .column(i)
            .into_owned()
    }

    /*
     * Sequential-impulse path.
     */

    /// Prepares one sequential-impulse step: clears the accumulated impulses,
    /// refreshes the frames, tests the angular limits, and rebuilds the
    /// per-axis effective-mass entries.
    ///
    /// Must be called exactly once before the [`solve_velocities`](Self::solve_velocities)
    /// sub-iterations of a step.
    #[profiling::function]
    pub fn prepare(&mut self, rb_a: &RigidBody, rb_b: &RigidBody) {
        debug_assert_eq!(self.solve_mode, SolveMode::SequentialImpulse);

        // Clear the impulses accumulated during the previous step.
        self.linear_limit.accumulated_impulse = na::zero();
        for motor in &mut self.angular_limits {
            motor.accumulated_impulse = 0.0;
        }

        self.update_frames(rb_a, rb_b);

        let pivot = self.frames.anchor;
        let rot_a_t = rb_a
            .position
            .rotation
            .to_rotation_matrix()
            .into_inner()
            .transpose();
        let rot_b_t = rb_b
            .position
            .rotation
            .to_rotation_matrix()
            .into_inner()
            .transpose();

        for i in 0..DIM {
            if self.linear_limit.is_limited(i) {
                let normal = self.linear_axis(i);
                self.jac_linear[i] = JacobianEntry::linear(
                    &rot_a_t,
                    &rot_b_t,
                    &(pivot - rb_a.center_of_mass()),
                    &(pivot - rb_b.center_of_mass()),
                    &normal,
                    &rb_a.inv_inertia_local_diag,
                    rb_a.inv_mass,
                    &rb_b.inv_inertia_local_diag,
                    rb_b.inv_mass,
                );
            }
        }

        for i in 0..ANG_DIM {
            if self.test_angular_limit_motor(i) {
                let axis = self.frames.axes[i];
                self.jac_angular[i] = JacobianEntry::angular(
                    &axis,
                    &rot_a_t,
                    &rot_b_t,
                    &rb_a.inv_inertia_local_diag,
                    &rb_b.inv_inertia_local_diag,
                );
            }
        }
    }

    /// Runs one sequential-impulse sub-iteration, mutating the solver-body
    /// velocities in place. [`prepare`](Self::prepare) must have been called
    /// once for the current step.
    #[profiling::function]
    pub fn solve_velocities(
        &mut self,
        dt: Real,
        rb_a: &RigidBody,
        body_a: &mut SolverBody,
        rb_b: &RigidBody,
        body_b: &mut SolverBody,
    ) {
        debug_assert_eq!(self.solve_mode, SolveMode::SequentialImpulse);

        let point_a = Point::from(self.frames.frame_a.translation.vector);
        let point_b = Point::from(self.frames.frame_b.translation.vector);
        let anchor = self.frames.anchor;

        for i in 0..DIM {
            if self.linear_limit.is_limited(i) {
                let jac_diag_inv = utils::inv(self.jac_linear[i].diagonal());
                let axis = self.linear_axis(i);
                self.linear_limit.solve_linear_axis(
                    dt,
                    jac_diag_inv,
                    rb_a,
                    body_a,
                    &point_a,
                    rb_b,
                    body_b,
                    &point_b,
                    i,
                    &axis,
                    &anchor,
                );
            }
        }

        for i in 0..ANG_DIM {
            if self.angular_limits[i].needs_torque() {
                let jac_diag_inv = utils::inv(self.jac_angular[i].diagonal());
                let axis = self.frames.axes[i];
                self.angular_limits[i]
                    .solve_angular_limit(dt, &axis, jac_diag_inv, rb_a, body_a, rb_b, body_b);
            }
        }
    }

    /*
     * Constraint-row path.
     */

    /// Refreshes the frames, arms the angular limits, and returns the number
    /// of rows [`fill_rows`](Self::fill_rows) will emit for this step: three
    /// hard linear locks plus one row per armed rotational axis.
    #[profiling::function]
    pub fn row_count(&mut self, rb_a: &RigidBody, rb_b: &RigidBody) -> RowCount {
        debug_assert_eq!(self.solve_mode, SolveMode::ConstraintRows);

        self.update_frames(rb_a, rb_b);

        let mut rows = DIM;
        for i in 0..ANG_DIM {
            if self.test_angular_limit_motor(i) {
                rows += 1;
            }
        }
        RowCount { rows, nub: DIM }
    }

    /// Emits the constraint rows of this step into `rows`.
    ///
    /// [`row_count`](Self::row_count) must have been called first for the
    /// current step: the angular rows read the limit states it cached.
    #[profiling::function]
    pub fn fill_rows(
        &self,
        params: &IntegrationParameters,
        rb_a: &RigidBody,
        rb_b: &RigidBody,
        rows: &mut ConstraintRows,
    ) {
        debug_assert_eq!(self.solve_mode, SolveMode::ConstraintRows);

        self.fill_linear_lock_rows(params, rb_a, rb_b, rows);

        for i in 0..ANG_DIM {
            if self.angular_limits[i].needs_torque() {
                let axis = self.frames.axes[i];
                push_limit_motor_row(&self.angular_limits[i], params, &axis, rb_a, rb_b, rows);
            }
        }
    }

    /// The three rows locking the linear degrees of freedom together: they
    /// force the two anchor points to coincide, with a Baumgarte term
    /// correcting the current offset.
    fn fill_linear_lock_rows(
        &self,
        params: &IntegrationParameters,
        rb_a: &RigidBody,
        rb_b: &RigidBody,
        rows: &mut ConstraintRows,
    ) {
        let k = params.inv_dt() * params.erp;

        let a1 = rb_a.position.rotation * self.local_frame_a.translation.vector;
        let a2 = rb_b.position.rotation * self.local_frame_b.translation.vector;
        let origin_a = rb_a.position.translation.vector;
        let origin_b = rb_b.position.translation.vector;

        let skew_a1_neg = (-a1).cross_matrix();
        let skew_a2 = a2.cross_matrix();
        let err = a2 + origin_b - a1 - origin_a;

        for i in 0..DIM {
            let mut j1_linear = Vector::zeros();
            j1_linear[i] = 1.0;

            rows.push(ConstraintRow {
                j1_linear,
                j1_angular: skew_a1_neg.row(i).transpose(),
                j2_angular: skew_a2.row(i).transpose(),
                rhs: k * err[i],
                ..Default::default()
            });
        }
    }
}

/// Emits the extra row of one powered or limited rotational axis.
///
/// The axis's limit state must have been recomputed for the current step (see
/// [`AngularLimitMotor::test_limit_value`]); this is debug-asserted.
fn push_limit_motor_row(
    motor: &AngularLimitMotor,
    params: &IntegrationParameters,
    axis: &Vector,
    rb_a: &RigidBody,
    rb_b: &RigidBody,
    rows: &mut ConstraintRows,
) -> usize {
    let mut powered = motor.enable_motor;
    let limited = motor.limit_state != LimitState::Free;
    if !powered && !limited {
        return 0;
    }
    debug_assert!(
        motor.limit_checked,
        "stale limit state: call test_limit_value first"
    );

    let mut row = ConstraintRow {
        j1_angular: *axis,
        j2_angular: -axis,
        ..Default::default()
    };

    // A motor fighting a rigidly locked limit is ineffective: the limit wins.
    if limited && motor.lo_limit == motor.hi_limit {
        powered = false;
    }

    if powered {
        row.cfm = 0.0;
        if !limited {
            row.rhs = motor.target_velocity;
            row.lower_limit = -motor.max_motor_force;
            row.upper_limit = motor.max_motor_force;
        }
    }

    if limited {
        let k = params.inv_dt() * motor.erp;
        row.rhs = -k * motor.current_limit_error;
        row.cfm = 0.0;

        if motor.lo_limit == motor.hi_limit {
            row.lower_limit = -Real::INFINITY;
            row.upper_limit = Real::INFINITY;
        } else {
            match motor.limit_state {
                LimitState::AtLower => {
                    row.lower_limit = 0.0;
                    row.upper_limit = Real::INFINITY;
                }
                _ => {
                    row.lower_limit = -Real::INFINITY;
                    row.upper_limit = 0.0;
                }
            }

            if motor.bounce > 0.0 {
                let vel = rb_a.angvel.dot(axis) - rb_b.angvel.dot(axis);

                // Only apply the bounce if the velocity is incoming, and only
                // if it raises the correction already computed above.
                match motor.limit_state {
                    LimitState::AtLower => {
                        if vel < 0.0 {
                            let restitution_rhs = -motor.bounce * vel;
                            if restitution_rhs > row.rhs {
                                row.rhs = restitution_rhs;
                            }
                        }
                    }
                    _ => {
                        if vel > 0.0 {
                            let restitution_rhs = -motor.bounce * vel;
                            if restitution_rhs < row.rhs {
                                row.rhs = restitution_rhs;
                            }
                        }
                    }
                }
            }
        }
    }

    rows.push(row);
    1
}

/// Create six-degrees-of-freedom joints using the builder pattern.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SixDofJointBuilder(pub SixDofJoint);

impl SixDofJointBuilder {
    /// Creates a new builder from the two local joint frames, defaulting to
    /// the sequential-impulse solve strategy.
    pub fn new(local_frame_a: Isometry, local_frame_b: Isometry) -> Self {
        Self(SixDofJoint::new(
            local_frame_a,
            local_frame_b,
            SolveMode::SequentialImpulse,
        ))
    }

    /// Sets the solve strategy of the joint.
    #[must_use]
    pub fn solve_mode(mut self, mode: SolveMode) -> Self {
        self.0.solve_mode = mode;
        self
    }

    /// Sets whose basis defines the primary linear axes.
    #[must_use]
    pub fn linear_reference_frame(mut self, frame: ReferenceFrame) -> Self {
        self.0.linear_reference_frame = frame;
        self
    }

    /// Sets the `[lo, hi]` bounds of one degree of freedom.
    #[must_use]
    pub fn limit(mut self, axis: JointAxis, limits: [Real; 2]) -> Self {
        self.0.set_limit(axis, limits[0], limits[1]);
        self
    }

    /// Enables the motor of a rotational degree of freedom and sets its target
    /// velocity and force cap.
    #[must_use]
    pub fn motor_velocity(mut self, axis: JointAxis, target_velocity: Real, max_force: Real) -> Self {
        self.0.set_motor_velocity(axis, target_velocity, max_force);
        self
    }

    /// Builds the joint.
    #[must_use]
    pub fn build(self) -> SixDofJoint {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::{ReferenceFrame, SixDofJoint, SixDofJointBuilder, SolveMode};
    use crate::dynamics::joint::{JointAxesMask, JointAxis, LimitState};
    use crate::dynamics::solver::{ConstraintRows, SolverBody};
    use crate::dynamics::{IntegrationParameters, RigidBody};
    use crate::math::{Isometry, Real, Vector};
    use approx::assert_relative_eq;

    fn unit_body(translation: Vector) -> RigidBody {
        RigidBody::dynamic(
            Isometry::translation(translation.x, translation.y, translation.z),
            1.0,
            Vector::new(1.0, 1.0, 1.0),
        )
    }

    #[test]
    fn locked_axes_produce_the_exact_correction_impulse() {
        let dt = 1.0 / 60.0;
        let rb_a = unit_body(Vector::zeros());
        let rb_b = unit_body(Vector::new(1.0, 0.0, 0.0));
        let mut body_a = SolverBody::from_body(&rb_a);
        let mut body_b = SolverBody::from_body(&rb_b);

        // Identical frames, zero relative rotation, all linear axes rigidly
        // locked at zero (the default), one unit of offset along x.
        let mut joint = SixDofJoint::new(
            Isometry::identity(),
            Isometry::identity(),
            SolveMode::SequentialImpulse,
        );
        joint.linear_limit.damping = 0.0;

        joint.prepare(&rb_a, &rb_b);
        joint.solve_velocities(dt, &rb_a, &mut body_a, &rb_b, &mut body_b);

        // depth = 1 along x, both torque arms vanish, so
        // jac_diag_inv = 1 / (inv_mass_a + inv_mass_b) = 0.5.
        let expected = joint.linear_limit.limit_softness * joint.linear_limit.restitution * 1.0
            / dt
            * 0.5;
        assert_relative_eq!(
            joint.linear_limit.accumulated_impulse.x,
            expected,
            epsilon = 1.0e-3
        );
        // The impulse pulls body A toward body B: it opposes the offset.
        assert!(joint.linear_limit.accumulated_impulse.x > 0.0);
        assert_relative_eq!(body_a.linvel.x, expected, epsilon = 1.0e-3);
        assert_relative_eq!(body_b.linvel.x, -expected, epsilon = 1.0e-3);
        assert_relative_eq!(body_a.linvel.y, 0.0);
        assert_relative_eq!(body_a.linvel.z, 0.0);
    }

    #[test]
    fn fully_free_joint_is_a_no_op() {
        let dt = 1.0 / 60.0;
        let rb_a = unit_body(Vector::zeros());
        let rb_b = unit_body(Vector::new(1.0, 2.0, 3.0));
        let mut body_a = SolverBody::from_body(&rb_a);
        let mut body_b = SolverBody::from_body(&rb_b);

        let mut joint = SixDofJoint::new(
            Isometry::identity(),
            Isometry::identity(),
            SolveMode::SequentialImpulse,
        );
        // Free every axis: angular axes are free by default, the linear ones
        // get inverted bounds.
        for axis in [JointAxis::LinX, JointAxis::LinY, JointAxis::LinZ] {
            joint.set_limit(axis, 1.0, -1.0);
        }

        joint.prepare(&rb_a, &rb_b);
        for i in 0..3 {
            assert!(!joint.angular_limits[i].needs_torque());
        }
        joint.solve_velocities(dt, &rb_a, &mut body_a, &rb_b, &mut body_b);

        assert_eq!(body_a.linvel, Vector::zeros());
        assert_eq!(body_a.angvel, Vector::zeros());
        assert_eq!(body_b.linvel, Vector::zeros());
        assert_eq!(body_b.angvel, Vector::zeros());
        assert_eq!(joint.limited_axes(), JointAxesMask::empty());
    }

    #[test]
    fn row_count_includes_armed_angular_axes() {
        let rb_a = unit_body(Vector::zeros());
        let rb_b = unit_body(Vector::zeros());

        let mut joint = SixDofJoint::new(
            Isometry::identity(),
            Isometry::identity(),
            SolveMode::ConstraintRows,
        );
        let count = joint.row_count(&rb_a, &rb_b);
        assert_eq!((count.rows, count.nub), (3, 3));

        // The current angle (0) violates this lower bound, arming the axis.
        joint.set_limit(JointAxis::AngX, 0.1, 0.5);
        let count = joint.row_count(&rb_a, &rb_b);
        assert_eq!((count.rows, count.nub), (4, 3));
    }

    #[test]
    fn fixed_rows_lock_the_anchor_points() {
        let params = IntegrationParameters::default();
        let rb_a = unit_body(Vector::zeros());
        let rb_b = unit_body(Vector::new(2.0, 0.0, 0.0));

        let mut joint = SixDofJoint::new(
            Isometry::translation(0.0, 1.0, 0.0),
            Isometry::identity(),
            SolveMode::ConstraintRows,
        );
        let count = joint.row_count(&rb_a, &rb_b);
        let mut rows = ConstraintRows::with_capacity(count.rows);
        joint.fill_rows(&params, &rb_a, &rb_b, &mut rows);
        assert_eq!(rows.len(), 3);

        let k = params.inv_dt() * params.erp;
        // err = origin_b + offset_b - origin_a - offset_a = (2, -1, 0).
        for i in 0..3 {
            let row = rows.row(i);
            let mut expected_jac = Vector::zeros();
            expected_jac[i] = 1.0;
            assert_eq!(row.j1_linear, expected_jac);
            assert_eq!(row.j2_linear, Vector::zeros());
        }
        assert_relative_eq!(rows.row(0).rhs, k * 2.0, epsilon = 1.0e-4);
        assert_relative_eq!(rows.row(1).rhs, k * -1.0, epsilon = 1.0e-4);
        assert_relative_eq!(rows.row(2).rhs, 0.0, epsilon = 1.0e-4);

        // The angular parts are the rows of the skew matrices of -offset_a
        // and +offset_b (the latter is zero here).
        assert_eq!(rows.row(0).j1_angular, Vector::new(0.0, 0.0, -1.0));
        assert_eq!(rows.row(1).j1_angular, Vector::zeros());
        assert_eq!(rows.row(2).j1_angular, Vector::new(1.0, 0.0, 0.0));
        assert_eq!(rows.row(0).j2_angular, Vector::zeros());
    }

    #[test]
    fn powered_axis_emits_a_motor_row() {
        let params = IntegrationParameters::default();
        let rb_a = unit_body(Vector::zeros());
        let rb_b = unit_body(Vector::zeros());

        let mut joint = SixDofJointBuilder::new(Isometry::identity(), Isometry::identity())
            .solve_mode(SolveMode::ConstraintRows)
            .motor_velocity(JointAxis::AngZ, 2.0, 5.0)
            .build();

        let count = joint.row_count(&rb_a, &rb_b);
        assert_eq!(count.rows, 4);
        let mut rows = ConstraintRows::with_capacity(count.rows);
        joint.fill_rows(&params, &rb_a, &rb_b, &mut rows);

        let row = rows.row(3);
        assert_eq!(row.j1_angular, joint.axis(2));
        assert_eq!(row.j2_angular, -joint.axis(2));
        assert_relative_eq!(row.rhs, 2.0);
        assert_relative_eq!(row.lower_limit, -5.0);
        assert_relative_eq!(row.upper_limit, 5.0);
    }

    #[test]
    fn limit_row_bounds_follow_the_violation() {
        let params = IntegrationParameters::default();
        let rb_a = unit_body(Vector::zeros());
        let mut rb_b = unit_body(Vector::zeros());
        rb_b.position = Isometry::rotation(Vector::new(0.5, 0.0, 0.0));
        rb_b.update_world_inv_inertia();

        let mut joint = SixDofJointBuilder::new(Isometry::identity(), Isometry::identity())
            .solve_mode(SolveMode::ConstraintRows)
            .limit(JointAxis::AngX, [-0.2, 0.3])
            .build();

        let count = joint.row_count(&rb_a, &rb_b);
        assert_eq!(count.rows, 4);
        assert_eq!(joint.angular_limits[0].limit_state, LimitState::AtUpper);
        assert_relative_eq!(joint.angle(0), 0.5, epsilon = 1.0e-5);

        let mut rows = ConstraintRows::with_capacity(count.rows);
        joint.fill_rows(&params, &rb_a, &rb_b, &mut rows);

        let row = rows.row(3);
        let erp = joint.angular_limits[0].erp;
        assert_relative_eq!(
            row.rhs,
            -params.inv_dt() * erp * (0.5 - 0.3),
            epsilon = 1.0e-3
        );
        assert_eq!(row.lower_limit, -Real::INFINITY);
        assert_eq!(row.upper_limit, 0.0);
    }

    #[test]
    fn locked_limit_unbinds_the_row_and_suppresses_the_motor() {
        let params = IntegrationParameters::default();
        let rb_a = unit_body(Vector::zeros());
        let mut rb_b = unit_body(Vector::zeros());
        rb_b.position = Isometry::rotation(Vector::new(0.5, 0.0, 0.0));
        rb_b.update_world_inv_inertia();

        let mut joint = SixDofJointBuilder::new(Isometry::identity(), Isometry::identity())
            .solve_mode(SolveMode::ConstraintRows)
            .limit(JointAxis::AngX, [0.2, 0.2])
            .motor_velocity(JointAxis::AngX, 100.0, 100.0)
            .build();

        let count = joint.row_count(&rb_a, &rb_b);
        let mut rows = ConstraintRows::with_capacity(count.rows);
        joint.fill_rows(&params, &rb_a, &rb_b, &mut rows);

        let row = rows.row(3);
        let erp = joint.angular_limits[0].erp;
        // The motor target never leaks into a rigidly locked axis.
        assert_relative_eq!(
            row.rhs,
            -params.inv_dt() * erp * (0.5 - 0.2),
            epsilon = 1.0e-3
        );
        assert_eq!(row.lower_limit, -Real::INFINITY);
        assert_eq!(row.upper_limit, Real::INFINITY);
    }

    #[test]
    fn bounce_raises_the_correction_only_when_it_exceeds_it() {
        let params = IntegrationParameters::default();
        let mut rb_a = unit_body(Vector::zeros());
        let rb_b = unit_body(Vector::zeros());

        let mut joint = SixDofJointBuilder::new(Isometry::identity(), Isometry::identity())
            .solve_mode(SolveMode::ConstraintRows)
            .limit(JointAxis::AngX, [0.1, 1.0])
            .build();
        joint.angular_limits[0].bounce = 0.5;

        // Angle 0 violates the lower bound: base correction is
        // -fps * erp * (-0.1) = +3.
        let base_rhs = params.inv_dt() * joint.angular_limits[0].erp * 0.1;

        // Incoming velocity strong enough that the bounce term dominates.
        rb_a.angvel = Vector::new(-10.0, 0.0, 0.0);
        let count = joint.row_count(&rb_a, &rb_b);
        let mut rows = ConstraintRows::with_capacity(count.rows);
        joint.fill_rows(&params, &rb_a, &rb_b, &mut rows);
        assert_relative_eq!(rows.row(3).rhs, 5.0, epsilon = 1.0e-3);

        // A weak incoming velocity never lowers the computed correction.
        rb_a.angvel = Vector::new(-1.0, 0.0, 0.0);
        let count = joint.row_count(&rb_a, &rb_b);
        let mut rows = ConstraintRows::with_capacity(count.rows);
        joint.fill_rows(&params, &rb_a, &rb_b, &mut rows);
        assert_relative_eq!(rows.row(3).rhs, base_rhs, epsilon = 1.0e-3);
    }

    #[test]
    fn builder_configures_the_joint() {
        let joint = SixDofJointBuilder::new(Isometry::identity(), Isometry::identity())
            .solve_mode(SolveMode::ConstraintRows)
            .linear_reference_frame(ReferenceFrame::BodyB)
            .limit(JointAxis::AngY, [-0.4, 0.4])
            .limit(JointAxis::LinX, [1.0, -1.0])
            .build();

        assert_eq!(joint.solve_mode(), SolveMode::ConstraintRows);
        assert_eq!(joint.linear_reference_frame, ReferenceFrame::BodyB);
        assert!(joint.angular_limits[1].is_limited());
        assert!(!joint.linear_limit.is_limited(0));
        let mask = joint.limited_axes();
        assert!(mask.contains(JointAxesMask::ANG_Y));
        assert!(!mask.contains(JointAxesMask::LIN_X));
        assert!(mask.contains(JointAxesMask::LIN_Y));
    }
}
