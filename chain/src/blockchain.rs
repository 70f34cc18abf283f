//! Blockchain capability interface consumed by the sync components.

use std::sync::Arc;

use async_trait::async_trait;

use crate::block::{Block, BlockInfo, BlockLocator};
use crate::error::ChainError;
use crate::hash::HashDigest;
use crate::transaction::Transaction;

/// A change of the active chain.
///
/// `new_blocks` extend the chain from `fork_point`; `replaced_blocks` are
/// the blocks they displaced. An ordinary extension carries an empty
/// `replaced_blocks`.
#[derive(Debug, Clone)]
pub struct Reorganization {
    pub fork_point: u64,
    pub new_blocks: Vec<Arc<Block>>,
    pub replaced_blocks: Vec<Arc<Block>>,
}

/// Handle to the node's block store.
///
/// Implementations own their synchronization; the sync components call
/// these methods from any task and share the handle via `Arc`.
#[async_trait]
pub trait Blockchain: Send + Sync + 'static {
    /// Builds a locator describing the current best chain, newest first.
    async fn fetch_block_locator(&self) -> Result<BlockLocator, ChainError>;

    /// Stores a block, reporting how it landed on the chain.
    async fn store(&self, block: Block) -> Result<BlockInfo, ChainError>;

    /// Looks up a confirmed transaction by hash.
    async fn fetch_transaction(&self, hash: HashDigest) -> Result<Transaction, ChainError>;

    /// Looks up a stored block by hash.
    async fn fetch_block(&self, hash: HashDigest) -> Result<Block, ChainError>;

    /// Waits for the next reorganization of the active chain.
    ///
    /// The subscription is one-shot: each call delivers at most one event
    /// and must be called again to keep receiving.
    async fn next_reorganize(&self) -> Result<Reorganization, ChainError>;
}
