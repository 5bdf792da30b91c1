//! Crate-wide error and result types.

use thiserror::Error;

/// Error during a buffer operation.
///
/// Every failing operation leaves the buffer exactly as it was: valid,
/// terminated, and queryable. Allocation failure in particular is reported
/// to the caller rather than terminating the process, so the host
/// application owns the recovery policy.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Storage allocation or reallocation failed.
    #[error("allocation of {requested} bytes failed")]
    Allocation {
        /// Total size in bytes of the allocation that failed.
        requested: usize,
    },
    /// The formatting engine reported a failure while rendering arguments.
    #[error("formatting failed while rendering arguments")]
    Format,
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
