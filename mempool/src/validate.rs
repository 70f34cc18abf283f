//! Transaction validation boundary.

use async_trait::async_trait;

use chain::Transaction;

use crate::error::PoolError;
use crate::types::IndexList;

/// Validates candidate transactions against the chain and the current
/// pool before they are admitted.
///
/// On success the returned indices identify inputs whose previous outputs
/// come from other pooled transactions rather than the chain. An
/// [`InputNotFound`](PoolError::InputNotFound) failure carries the single
/// offending input index; every other failure carries no indices.
#[async_trait]
pub trait Validator: Send + Sync + 'static {
    async fn validate(&self, tx: &Transaction) -> Result<IndexList, PoolError>;
}
