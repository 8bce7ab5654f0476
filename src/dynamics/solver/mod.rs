//! Supporting types for the two solve strategies: effective-mass entries and
//! solver bodies for the sequential-impulse path, row buffers for the
//! constraint-row path.

pub use self::constraint_rows::{ConstraintRow, ConstraintRows, RowCount};
pub use self::jacobian_entry::JacobianEntry;
pub use self::solver_body::SolverBody;

mod constraint_rows;
mod jacobian_entry;
mod solver_body;
