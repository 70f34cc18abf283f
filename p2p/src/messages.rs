//! Peer wire messages used by block synchronization.

use chain::{Block, BlockLocator, HashDigest, Transaction};

/// Kind tag of an inventory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryType {
    Transaction,
    Block,
    Error,
}

/// A single advertised item: kind plus hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryVector {
    pub kind: InventoryType,
    pub hash: HashDigest,
}

impl InventoryVector {
    pub fn block(hash: HashDigest) -> Self {
        Self {
            kind: InventoryType::Block,
            hash,
        }
    }

    pub fn transaction(hash: HashDigest) -> Self {
        Self {
            kind: InventoryType::Transaction,
            hash,
        }
    }
}

/// Inventory announcement received from a peer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryMessage {
    pub inventories: Vec<InventoryVector>,
}

/// Request for a range of block inventory starting from a locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBlocks {
    /// Newest-first locator of the requester's chain
    pub start_hashes: BlockLocator,
    /// Last block to announce, or the null hash for "no limit"
    pub hash_stop: HashDigest,
}

/// Request for specific inventory items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetData {
    pub inventories: Vec<InventoryVector>,
}

/// Outbound peer messages sent by the sync components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    GetBlocks(GetBlocks),
    GetData(GetData),
    Transaction(Transaction),
    Block(Block),
}
