//! Mempool error types.

use chain::ChainError;
use thiserror::Error;

/// Errors surfaced by the transaction pool and its validation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// An input spends an output this node has never seen. The index
    /// points into the transaction's input list.
    #[error("input {input} not found")]
    InputNotFound { input: usize },

    /// The pool already holds a transaction with this hash.
    #[error("duplicate transaction")]
    Duplicate,

    /// No pooled transaction with the requested hash.
    #[error("transaction not found")]
    NotFound,

    /// The pool was at capacity and evicted this entry unconfirmed.
    #[error("pool full")]
    PoolFull,

    /// The transaction failed validation.
    #[error("invalid transaction: {0}")]
    Invalid(String),

    /// The chain backend failed while validating.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// The pool service has stopped; the operation was abandoned.
    #[error("pool stopped")]
    Stopped,
}
