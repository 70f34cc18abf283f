//! In-memory pool of unconfirmed transactions.
//!
//! The pool validates arriving transactions against the chain, holds them
//! in arrival order, and keeps itself consistent across blockchain
//! reorganizations: an ordinary chain extension removes the transactions
//! the new blocks confirmed, while a true reorganization revalidates and
//! resubmits every pooled entry.
//!
//! ## Architecture
//!
//!
//! Peer/RPC ──[store/fetch/exists]──► Mempool handle ──[commands]──► worker
//!                                                                     │
//!                validation tasks ◄──────────── spawned per store ────┤
//!                       │                                             │
//!                       └──[completion]──► worker queue               │
//!                                                                     │
//!                chain ──[reorganizations]──► worker queue ◄──────────┘
//!
//!
//! All pool state lives on a single worker task; every mutation and every
//! caller-visible completion is serialized through its command queue.

mod config;
mod error;
mod pool;
mod service;
mod types;
mod validate;

pub use config::MempoolConfig;
pub use error::PoolError;
pub use pool::DEFAULT_POOL_CAPACITY;
pub use service::{Mempool, MempoolService};
pub use types::{Confirmation, IndexList, Stored};
pub use validate::Validator;
