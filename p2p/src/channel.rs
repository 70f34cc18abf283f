//! Peer channel capability interface.

use async_trait::async_trait;
use chain::Block;
use thiserror::Error;

use crate::messages::{GetData, InventoryMessage, Message};

/// Errors reported by a peer channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The peer disconnected; no further messages will arrive.
    #[error("channel closed")]
    Closed,

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),
}

/// Full-duplex message transport to a single peer.
///
/// Subscriptions are one-shot: each `next_*` call delivers at most one
/// message and must be issued again to receive the following one. The
/// poller and responder subscribe to disjoint kinds, so one channel serves
/// both.
#[async_trait]
pub trait PeerChannel: Send + Sync + 'static {
    /// Waits for the peer's next inventory announcement.
    async fn next_inventory(&self) -> Result<InventoryMessage, ChannelError>;

    /// Waits for the peer's next block.
    async fn next_block(&self) -> Result<Block, ChannelError>;

    /// Waits for the peer's next get-data request.
    async fn next_get_data(&self) -> Result<GetData, ChannelError>;

    /// Sends a message, resolving once it is handed to the transport.
    async fn send(&self, message: Message) -> Result<(), ChannelError>;
}
