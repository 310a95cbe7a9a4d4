//! Error taxonomy for loading, solving and reconstructing.
//!
//! None of these are recoverable locally: the computation is deterministic, so
//! retrying the same input cannot succeed differently.

use thiserror::Error;

/// Errors surfaced by the solver and its input boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range matrix, dimension or configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The `n × 2^(n-1)` memo table could not be allocated, or would exceed
    /// the configured memory budget.
    #[error("resource exhausted: memo table needs {requested_bytes} bytes")]
    ResourceExhausted { requested_bytes: usize },

    /// Reconstruction found no predecessor consistent with the table.
    #[error("inconsistent memo table: {0}")]
    InconsistentState(String),

    /// Every closing edge back to the depot is unreachable.
    #[error("no tour exists: the graph has no Hamiltonian cycle through the depot")]
    NoTour,

    /// Failure reading matrix input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

/// Convenience result type for solver operations.
pub type Result<T> = std::result::Result<T, Error>;
