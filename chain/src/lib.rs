//! Core chain data model and the blockchain capability interface.
//!
//! This crate defines the hash, transaction, and block types shared by the
//! sync components, plus the [`Blockchain`] trait through which they consume
//! the node's block store. The store itself lives behind that trait; this
//! crate carries no storage or validation logic of its own.

pub mod block;
pub mod blockchain;
pub mod error;
pub mod hash;
pub mod transaction;

pub use block::{Block, BlockHeader, BlockInfo, BlockLocator, BlockStatus};
pub use blockchain::{Blockchain, Reorganization};
pub use error::ChainError;
pub use hash::{short_hash, HashDigest, NULL_HASH};
pub use transaction::{OutPoint, Transaction, TxInput, TxOutput};
