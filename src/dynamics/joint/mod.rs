//! The 6-DoF joint: per-axis limit/motor units, the relative-frame solver,
//! and the joint itself.

pub use self::axis::{JointAxesMask, JointAxis};
pub use self::limit_motor::{AngularLimitMotor, LimitState, LinearLimitMotor};
pub use self::relative_frame::{matrix_to_euler_xyz, RelativeFrames};
pub use self::sixdof_joint::{ReferenceFrame, SixDofJoint, SixDofJointBuilder, SolveMode};

mod axis;
mod limit_motor;
mod relative_frame;
mod sixdof_joint;
