//! Structures related to dynamics: the joint constraint, its solve paths, and
//! the rigid-body interface boundary.

pub use self::integration_parameters::IntegrationParameters;
pub use self::joint::{
    AngularLimitMotor, JointAxesMask, JointAxis, LimitState, LinearLimitMotor, ReferenceFrame,
    RelativeFrames, SixDofJoint, SixDofJointBuilder, SolveMode,
};
pub use self::rigid_body::RigidBody;
pub use self::solver::{ConstraintRow, ConstraintRows, JacobianEntry, RowCount, SolverBody};

mod integration_parameters;
pub mod joint;
mod rigid_body;
pub mod solver;
