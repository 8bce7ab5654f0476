use crate::dynamics::solver::SolverBody;
use crate::dynamics::RigidBody;
use crate::math::{Point, Real, Vector, DIM};

/// The violation state of one limited axis, recomputed from the live axis
/// value at the start of each step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum LimitState {
    /// The axis value is inside its allowed range (or the axis is free).
    #[default]
    Free,
    /// The axis value is below the lower bound.
    AtLower,
    /// The axis value is above the upper bound.
    AtUpper,
}

/// The limit and motor of one rotational degree of freedom.
///
/// A limit is active whenever `lo_limit <= hi_limit`; setting `lo_limit >
/// hi_limit` frees the axis. The motor, when enabled, drives the axis toward
/// [`target_velocity`](Self::target_velocity) with a force capped at
/// [`max_motor_force`](Self::max_motor_force).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct AngularLimitMotor {
    /// The lower bound of this axis. `lo_limit > hi_limit` frees the axis.
    pub lo_limit: Real,
    /// The upper bound of this axis.
    pub hi_limit: Real,
    /// The velocity the motor drives the axis toward.
    pub target_velocity: Real,
    /// The maximum force the motor can deliver.
    pub max_motor_force: Real,
    /// The maximum force applied to push the axis back inside its limits.
    pub max_limit_force: Real,
    /// The relative-velocity damping factor.
    pub damping: Real,
    /// The softness applied to the corrective velocity.
    pub limit_softness: Real,
    /// The fraction of the limit error corrected at each step.
    pub erp: Real,
    /// The restitution applied when the axis hits a limit.
    pub bounce: Real,
    /// Is the motor enabled?
    pub enable_motor: bool,
    /// The impulse accumulated across the sub-iterations of the current step.
    pub accumulated_impulse: Real,
    /// The signed penetration past the violated bound, valid when
    /// [`limit_state`](Self::limit_state) is not [`LimitState::Free`].
    pub current_limit_error: Real,
    /// The violation state computed by the last [`test_limit_value`](Self::test_limit_value).
    pub limit_state: LimitState,
    pub(crate) limit_checked: bool,
}

impl Default for AngularLimitMotor {
    fn default() -> Self {
        Self {
            lo_limit: 1.0,
            hi_limit: -1.0,
            target_velocity: 0.0,
            max_motor_force: 0.1,
            max_limit_force: 300.0,
            damping: 1.0,
            limit_softness: 0.5,
            erp: 0.5,
            bounce: 0.0,
            enable_motor: false,
            accumulated_impulse: 0.0,
            current_limit_error: 0.0,
            limit_state: LimitState::Free,
            limit_checked: false,
        }
    }
}

impl AngularLimitMotor {
    /// Is this axis limited at all?
    #[inline]
    pub fn is_limited(&self) -> bool {
        self.lo_limit <= self.hi_limit
    }

    /// Does this axis currently need torques applied, either by its motor or
    /// to push it back inside its limits?
    #[inline]
    pub fn needs_torque(&self) -> bool {
        self.enable_motor || self.limit_state != LimitState::Free
    }

    /// Tests `value` against the limits, caching the violation state and the
    /// signed error.
    ///
    /// Must be called once per axis per step, before any solve or row emission
    /// for this axis; the downstream solve logic reads the cached state rather
    /// than re-testing.
    pub fn test_limit_value(&mut self, value: Real) -> LimitState {
        self.limit_checked = true;

        if self.lo_limit > self.hi_limit {
            self.limit_state = LimitState::Free;
            return LimitState::Free;
        }

        if value < self.lo_limit {
            self.limit_state = LimitState::AtLower;
            self.current_limit_error = value - self.lo_limit;
        } else if value > self.hi_limit {
            self.limit_state = LimitState::AtUpper;
            self.current_limit_error = value - self.hi_limit;
        } else {
            self.limit_state = LimitState::Free;
        }
        self.limit_state
    }

    pub(crate) fn invalidate_limit_state(&mut self) {
        self.limit_checked = false;
    }

    /// Runs one sequential-impulse sub-iteration for this axis, mutating the
    /// solver-body velocities in place. Returns the impulse applied.
    ///
    /// `jac_diag_inv` is the inverse effective-mass diagonal of the axis. The
    /// cached limit state must be fresh (see [`test_limit_value`](Self::test_limit_value)).
    pub fn solve_angular_limit(
        &mut self,
        dt: Real,
        axis: &Vector,
        jac_diag_inv: Real,
        rb_a: &RigidBody,
        body_a: &mut SolverBody,
        rb_b: &RigidBody,
        body_b: &mut SolverBody,
    ) -> Real {
        if !self.needs_torque() {
            return 0.0;
        }
        debug_assert!(self.limit_checked, "stale limit state: call test_limit_value first");

        let mut target_velocity = self.target_velocity;
        let mut max_force = self.max_motor_force;

        // Error correction overrides the motor while the limit is violated.
        if self.limit_state != LimitState::Free {
            target_velocity = -self.erp * self.current_limit_error / dt;
            max_force = self.max_limit_force;
        }

        let max_impulse = max_force * dt;

        let vel_diff = body_a.angvel - body_b.angvel;
        let rel_vel = axis.dot(&vel_diff);

        let motor_rel_vel = self.limit_softness * (target_velocity - self.damping * rel_vel);
        if motor_rel_vel.abs() < Real::EPSILON {
            // Below the jitter threshold, no force is needed.
            return 0.0;
        }

        let unclipped_impulse = (1.0 + self.bounce) * motor_rel_vel * jac_diag_inv;
        let clipped_impulse = na::clamp(unclipped_impulse, -max_impulse, max_impulse);

        // The running total saturates at the force cap instead of rejecting
        // (zeroing) overflowing impulses.
        let old_impulse = self.accumulated_impulse;
        self.accumulated_impulse =
            na::clamp(old_impulse + clipped_impulse, -max_impulse, max_impulse);
        let delta = self.accumulated_impulse - old_impulse;

        body_a.apply_impulse(na::zero(), rb_a.world_inv_inertia * axis, delta);
        body_b.apply_impulse(na::zero(), rb_b.world_inv_inertia * axis, -delta);

        delta
    }
}

/// The limits of the three translational degrees of freedom.
///
/// The three axes keep independent bound and accumulated-impulse slots but
/// share one softness/damping/restitution triple. An axis `i` is limited when
/// `lower_limit[i] <= upper_limit[i]`, rigidly locked (no dead zone) when the
/// two bounds are equal, and free otherwise.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct LinearLimitMotor {
    /// The per-axis lower bounds.
    pub lower_limit: Vector,
    /// The per-axis upper bounds.
    pub upper_limit: Vector,
    /// The per-axis impulses accumulated across the sub-iterations of the
    /// current step.
    pub accumulated_impulse: Vector,
    /// The softness applied to the corrective velocity, shared by the three axes.
    pub limit_softness: Real,
    /// The relative-velocity damping factor, shared by the three axes.
    pub damping: Real,
    /// The fraction of the positional error corrected at each step, shared by
    /// the three axes.
    pub restitution: Real,
    /// The per-axis violation state computed by the last
    /// [`test_limit_value`](Self::test_limit_value).
    pub limit_state: [LimitState; DIM],
    /// The per-axis signed penetration past the violated bound.
    pub current_limit_error: Vector,
}

impl Default for LinearLimitMotor {
    fn default() -> Self {
        Self {
            lower_limit: na::zero(),
            upper_limit: na::zero(),
            accumulated_impulse: na::zero(),
            limit_softness: 0.7,
            damping: 1.0,
            restitution: 0.5,
            limit_state: [LimitState::Free; DIM],
            current_limit_error: na::zero(),
        }
    }
}

impl LinearLimitMotor {
    /// Is the `limit_index`-th axis limited at all?
    #[inline]
    pub fn is_limited(&self, limit_index: usize) -> bool {
        self.upper_limit[limit_index] >= self.lower_limit[limit_index]
    }

    /// Tests `value` against the bounds of the `limit_index`-th axis, caching
    /// the violation state and the signed error for that axis.
    pub fn test_limit_value(&mut self, limit_index: usize, value: Real) -> LimitState {
        let lo = self.lower_limit[limit_index];
        let hi = self.upper_limit[limit_index];

        if lo > hi {
            self.limit_state[limit_index] = LimitState::Free;
            return LimitState::Free;
        }

        if value < lo {
            self.limit_state[limit_index] = LimitState::AtLower;
            self.current_limit_error[limit_index] = value - lo;
        } else if value > hi {
            self.limit_state[limit_index] = LimitState::AtUpper;
            self.current_limit_error[limit_index] = value - hi;
        } else {
            self.limit_state[limit_index] = LimitState::Free;
        }
        self.limit_state[limit_index]
    }

    /// Runs one sequential-impulse sub-iteration for the `limit_index`-th
    /// axis, mutating the solver-body velocities in place. Returns the impulse
    /// applied.
    ///
    /// `point_a`/`point_b` are the world origins of the two joint frames, used
    /// for the positional error; the impulses themselves are applied at
    /// `anchor`.
    pub fn solve_linear_axis(
        &mut self,
        dt: Real,
        jac_diag_inv: Real,
        rb_a: &RigidBody,
        body_a: &mut SolverBody,
        point_a: &Point,
        rb_b: &RigidBody,
        body_b: &mut SolverBody,
        point_b: &Point,
        limit_index: usize,
        axis_normal: &Vector,
        anchor: &Point,
    ) -> Real {
        let rel_pos_a = anchor - rb_a.center_of_mass();
        let rel_pos_b = anchor - rb_b.center_of_mass();

        let vel_a = body_a.velocity_at_point(&rel_pos_a);
        let vel_b = body_b.velocity_at_point(&rel_pos_b);
        let rel_vel = axis_normal.dot(&(vel_a - vel_b));

        // Positional (zeroth order) error.
        let mut depth = -(point_a - point_b).dot(axis_normal);
        let mut lo = -Real::MAX;
        let mut hi = Real::MAX;

        let min_limit = self.lower_limit[limit_index];
        let max_limit = self.upper_limit[limit_index];

        if min_limit < max_limit {
            if depth > max_limit {
                depth -= max_limit;
                lo = 0.0;
            } else if depth < min_limit {
                depth -= min_limit;
                hi = 0.0;
            } else {
                // Inside the dead zone: the axis is slack.
                return 0.0;
            }
        } else if min_limit == max_limit {
            // Rigidly locked: same correction, but no dead zone to exit early from.
            if depth > max_limit {
                depth -= max_limit;
                lo = 0.0;
            } else {
                depth -= min_limit;
                hi = 0.0;
            }
        }

        let normal_impulse = self.limit_softness
            * (self.restitution * depth / dt - self.damping * rel_vel)
            * jac_diag_inv;

        // The running sum resets to zero when it leaves the [lo, hi] window.
        // This is deliberately not the saturating behavior of the angular path.
        let old_impulse = self.accumulated_impulse[limit_index];
        let sum = old_impulse + normal_impulse;
        self.accumulated_impulse[limit_index] = if sum > hi || sum < lo { 0.0 } else { sum };
        let normal_impulse = self.accumulated_impulse[limit_index] - old_impulse;

        let torque_arm_a = rel_pos_a.cross(axis_normal);
        let torque_arm_b = rel_pos_b.cross(axis_normal);
        body_a.apply_impulse(
            axis_normal * rb_a.inv_mass,
            rb_a.world_inv_inertia * torque_arm_a,
            normal_impulse,
        );
        body_b.apply_impulse(
            axis_normal * rb_b.inv_mass,
            rb_b.world_inv_inertia * torque_arm_b,
            -normal_impulse,
        );

        normal_impulse
    }
}
