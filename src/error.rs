//! Error taxonomy for interpolation calls.
use thiserror::Error;

/// Failure of an interpolation call.
///
/// Numeric degeneracies inside the evaluation loop (zero-width ranges,
/// queries far outside the grid) are not errors unless
/// [`DomainPolicy::Strict`](crate::DomainPolicy::Strict) is selected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpError {
    /// Argument count, rank, shape, or arity mismatch at the call boundary
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The output array could not be allocated
    #[error("failed to allocate output array of {elements} elements")]
    OutOfMemory { elements: usize },

    /// Internal resource setup failed; fatal for the call
    #[error("resource exhausted: {0}")]
    ResourceExhaustion(String),
}

impl InterpError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
