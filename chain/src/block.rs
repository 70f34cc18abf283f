//! Block model and block store outcomes.

use crate::hash::HashDigest;
use crate::transaction::Transaction;

/// Newest-first list of block hashes used by the peer protocol to find a
/// common ancestor. The front element is the requester's best-known tip.
pub type BlockLocator = Vec<HashDigest>;

/// Header of a block; its hash identifies the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: u32,
    pub previous_block_hash: HashDigest,
    pub merkle_root: HashDigest,
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    /// Computes the block hash over a canonical little-endian encoding of
    /// the header fields.
    pub fn hash(&self) -> HashDigest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.version.to_le_bytes());
        hasher.update(&self.previous_block_hash);
        hasher.update(&self.merkle_root);
        hasher.update(&self.timestamp.to_le_bytes());
        hasher.update(&self.bits.to_le_bytes());
        hasher.update(&self.nonce.to_le_bytes());
        hasher.finalize().into()
    }
}

/// A block: header plus the transactions it confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Returns the hash of the block header.
    #[inline]
    pub fn hash(&self) -> HashDigest {
        self.header.hash()
    }
}

/// How a stored block landed on the chain.
///
/// An orphan is a normal outcome, not a failure: the parent is unknown and
/// earlier blocks must be fetched before this one connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    /// Connected to the active chain
    Confirmed,
    /// Parent unknown; held aside until the gap is filled
    Orphan,
    /// Failed chain acceptance checks
    Rejected,
}

/// Outcome of storing a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub status: BlockStatus,
    /// Height of the block when confirmed, otherwise zero
    pub depth: u64,
}
