use crate::dynamics::RigidBody;
use crate::math::{Real, Vector};

/// The velocity accumulator for one body, mutated in-place by the
/// sequential-impulse path.
///
/// Both limit-motor variants push their impulses through
/// [`apply_impulse`](Self::apply_impulse); the owning solver writes the
/// accumulated velocities back into the rigid-bodies once all constraints
/// sharing them have been iterated.
#[derive(Copy, Clone, Debug, Default)]
pub struct SolverBody {
    /// The linear velocity of the body.
    pub linvel: Vector,
    /// The angular velocity of the body.
    pub angvel: Vector,
}

impl SolverBody {
    /// Captures the current velocities of `body`.
    pub fn from_body(body: &RigidBody) -> Self {
        Self {
            linvel: body.linvel,
            angvel: body.angvel,
        }
    }

    /// Accumulates one impulse: `magnitude` scales both the linear and the
    /// angular component, with its sign selecting the push/pull direction.
    #[inline]
    pub fn apply_impulse(
        &mut self,
        linear_component: Vector,
        angular_component: Vector,
        magnitude: Real,
    ) {
        self.linvel += linear_component * magnitude;
        self.angvel += angular_component * magnitude;
    }

    /// The velocity of the point at `rel_pos` relative to the body's center of mass.
    #[inline]
    pub fn velocity_at_point(&self, rel_pos: &Vector) -> Vector {
        self.linvel + self.angvel.cross(rel_pos)
    }
}
