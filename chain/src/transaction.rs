//! Transaction model.

use crate::hash::HashDigest;

/// Reference to a specific output of a previous transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutPoint {
    /// Hash of the transaction holding the output
    pub hash: HashDigest,
    /// Output position within that transaction
    pub index: u32,
}

/// A transaction input spending a previous output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInput {
    /// The output being spent
    pub previous_output: OutPoint,
    /// Unlocking script
    pub script: Vec<u8>,
    /// Relative-lock sequence number
    pub sequence: u32,
}

/// A transaction output carrying value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    /// Amount in base units
    pub value: u64,
    /// Locking script
    pub script: Vec<u8>,
}

/// An unconfirmed or confirmed transaction.
///
/// The sync core only relies on the hash, the input list, and value
/// semantics opaque to it; scripts are carried as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub locktime: u32,
}

impl Transaction {
    /// Computes the transaction hash over a canonical little-endian
    /// encoding of every field.
    pub fn hash(&self) -> HashDigest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.version.to_le_bytes());
        hasher.update(&(self.inputs.len() as u64).to_le_bytes());
        for input in &self.inputs {
            hasher.update(&input.previous_output.hash);
            hasher.update(&input.previous_output.index.to_le_bytes());
            hasher.update(&(input.script.len() as u64).to_le_bytes());
            hasher.update(&input.script);
            hasher.update(&input.sequence.to_le_bytes());
        }
        hasher.update(&(self.outputs.len() as u64).to_le_bytes());
        for output in &self.outputs {
            hasher.update(&output.value.to_le_bytes());
            hasher.update(&(output.script.len() as u64).to_le_bytes());
            hasher.update(&output.script);
        }
        hasher.update(&self.locktime.to_le_bytes());
        hasher.finalize().into()
    }
}
