//! Chain error types.

use thiserror::Error;

/// Errors reported by the blockchain interface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The requested transaction or block is not known to the chain.
    #[error("not found")]
    NotFound,

    /// The chain is shutting down and will deliver no further events.
    #[error("chain stopped")]
    Stopped,

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),
}
