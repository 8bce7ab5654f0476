use crate::math::Real;
use std::num::NonZeroUsize;

/// Parameters for a time-step of the physics engine.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct IntegrationParameters {
    /// The timestep length (default: `1.0 / 60.0`).
    pub dt: Real,
    /// The default error-reduction parameter: the fraction of positional error
    /// corrected at each timestep by the hard linear-lock rows (default: `0.2`).
    ///
    /// Limited/powered angular axes carry their own per-axis error-reduction
    /// coefficient and ignore this one.
    pub erp: Real,
    /// The number of solver sub-iterations run by the sequential-impulse path
    /// for each step (default: `4`).
    pub num_solver_iterations: NonZeroUsize,
}

impl IntegrationParameters {
    /// The inverse of the time-stepping length, i.e. the steps per seconds (Hz).
    ///
    /// This is zero if `self.dt` is zero.
    #[inline(always)]
    pub fn inv_dt(&self) -> Real {
        if self.dt == 0.0 {
            0.0
        } else {
            1.0 / self.dt
        }
    }
}

impl Default for IntegrationParameters {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            erp: 0.2,
            num_solver_iterations: NonZeroUsize::new(4).unwrap(),
        }
    }
}
