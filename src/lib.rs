//! # sixdof3d
//!
//! sixdof3d is a generic six-degrees-of-freedom (6-DoF) joint constraint for 3D
//! rigid-body physics simulation. Given two rigid-bodies attached through two
//! local reference frames, the constraint restricts their relative linear and
//! angular motion to configurable per-axis ranges (free, limited, or locked),
//! optionally drives axes toward a target velocity with a motor, and feeds the
//! resulting corrective impulses into a physics solver.
//!
//! Two solve strategies are supported, selected at construction:
//! - [`SolveMode::SequentialImpulse`](dynamics::SolveMode): the constraint
//!   mutates the body velocities directly, one axis at a time, across solver
//!   sub-iterations.
//! - [`SolveMode::ConstraintRows`](dynamics::SolveMode): the constraint emits
//!   fully-formed constraint rows (Jacobians, error, CFM, impulse bounds) into
//!   a flat buffer consumed by an external iterative solver.
//!
//! Collision detection, velocity/position integration, and the iterative
//! solver itself are external collaborators: this crate only computes, for one
//! constraint instance and one solver step, the impulses or rows needed to
//! satisfy the configured limits.

#![deny(bare_trait_objects)]
#![warn(missing_docs)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)] // In the math code using indices adds clarity.

pub extern crate nalgebra as na;
#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
extern crate num_traits as num;

#[cfg(all(feature = "f32", feature = "f64"))]
std::compile_error!("The `f32` and `f64` features cannot both be enabled at the same time.");
#[cfg(all(not(feature = "f32"), not(feature = "f64")))]
std::compile_error!("Exactly one of the `f32` or `f64` features must be enabled.");

/// The string version of sixdof3d.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod dynamics;
pub mod error_handler;
pub mod math;
pub mod utils;

/// Prelude containing the common types defined by sixdof3d.
pub mod prelude {
    pub use crate::dynamics::*;
    pub use crate::math::*;
    pub extern crate nalgebra;
}
