//! Error handling for sixdof3d.
//!
//! The constraint core performs numerical computation on caller-supplied,
//! assumed-valid state, so there is no recoverable-error taxonomy: geometric
//! singularities and near-zero corrective velocities are defined branches, not
//! errors. The one detectable caller mistake is handing the row-emission path
//! a buffer that cannot hold every armed row.
//!
//! Setting [`GLOBAL_ERROR_HANDLER`] can help you as the end user to react to
//! that mistake. Its default behaviour is to [`panic!`].

use std::sync::OnceLock;

use log::warn;

/// Possible errors to handle through [`default_error_handler`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    /// The constraint-row buffer is too small for the rows the constraint needs to emit.
    RowBufferCapacity(String),
}

/// A global error handler. This can be set at startup, as long as it is set before
/// any uses.
///
/// # Example
///
/// ```ignore
/// use sixdof3d::error_handler::{GLOBAL_ERROR_HANDLER, warn};
/// GLOBAL_ERROR_HANDLER.set(Box::new(warn)).expect("The error handler can only be set once, globally.");
/// ```
pub static GLOBAL_ERROR_HANDLER: OnceLock<Box<dyn Fn(Error) + Sync + Send>> = OnceLock::new();

/// The default error handler. This defaults to [`panic()`].
#[inline]
pub fn default_error_handler() -> &'static dyn Fn(Error) {
    GLOBAL_ERROR_HANDLER.get_or_init(|| Box::new(panic))
}

/// Error handler that panics with the error.
#[track_caller]
#[inline(always)]
pub fn panic(error: Error) {
    panic!("Encountered an error:\n{:?}", error);
}

/// Error handler that logs the error at the `warn` level.
#[track_caller]
#[inline]
pub fn warn(error: Error) {
    warn!("Encountered an error:\n{:?}", error);
}
