//! Bounded arrival-ordered storage for unconfirmed transactions.
//!
//! Entries keep arrival order because a reorganization resubmits the whole
//! pool and a later transaction may spend an earlier one's outputs.
//!
//! ## Thread Safety
//!
//! `TransactionPool` is not thread-safe. It is owned by the mempool worker
//! task and never leaves it; callers go through the [`Mempool`] handle.
//!
//! [`Mempool`]: crate::Mempool

use std::collections::VecDeque;
use std::sync::Arc;

use chain::{HashDigest, Transaction};
use tokio::sync::oneshot;

use crate::error::PoolError;

/// Default maximum number of pooled transactions.
pub const DEFAULT_POOL_CAPACITY: usize = 2000;

/// Sender half of a pooled entry's confirmation.
pub(crate) type ConfirmSender = oneshot::Sender<Result<(), PoolError>>;

/// A pooled transaction with its pending confirmation.
pub(crate) struct TxEntry {
    pub hash: HashDigest,
    pub tx: Arc<Transaction>,
    pub confirm: ConfirmSender,
}

/// Arrival-ordered transaction pool bounded by capacity.
pub(crate) struct TransactionPool {
    entries: VecDeque<TxEntry>,
    capacity: usize,
}

impl TransactionPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, hash: &HashDigest) -> bool {
        self.entries.iter().any(|entry| entry.hash == *hash)
    }

    pub fn get(&self, hash: &HashDigest) -> Option<&TxEntry> {
        self.entries.iter().find(|entry| entry.hash == *hash)
    }

    /// Appends an entry, returning the oldest entry when the pool went
    /// over capacity.
    pub fn push(&mut self, entry: TxEntry) -> Option<TxEntry> {
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Removes and returns the entry with the given hash.
    pub fn take(&mut self, hash: &HashDigest) -> Option<TxEntry> {
        let position = self.entries.iter().position(|entry| entry.hash == *hash)?;
        self.entries.remove(position)
    }

    /// Removes every entry, preserving arrival order.
    pub fn drain(&mut self) -> Vec<TxEntry> {
        self.entries.drain(..).collect()
    }
}
