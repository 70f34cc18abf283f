//! Peer-facing block synchronization protocols.
//!
//! Two per-peer components run against one [`PeerChannel`]: the
//! [`Poller`] drives inbound block download toward the peer's tip, and the
//! [`Responder`] serves the peer's get-data requests from the mempool and
//! the chain. Each owns a worker task that serializes its state; the two
//! subscribe to disjoint message kinds on the shared channel.

pub mod channel;
pub mod messages;
pub mod poller;
pub mod responder;

pub use channel::{ChannelError, PeerChannel};
pub use messages::{
    GetBlocks, GetData, InventoryMessage, InventoryType, InventoryVector, Message,
};
pub use poller::Poller;
pub use responder::Responder;
