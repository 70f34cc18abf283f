//! Serves a peer's get-data requests.
//!
//! Transactions are resolved from the mempool first, then the chain's
//! transaction index; blocks from the chain's block index. Lookups run
//! sequentially on the worker, so replies leave in request order.

use std::sync::Arc;

use chain::{Blockchain, ChainError, HashDigest};
use mempool::{Mempool, PoolError};
use slog::Logger;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::channel::{ChannelError, PeerChannel};
use crate::messages::{GetData, InventoryType, Message};

enum ResponderEvent {
    Monitor,
    GetData(GetData),
    StreamEnded(ChannelError),
}

/// Handle to the get-data worker for one peer channel.
pub struct Responder {
    events: mpsc::UnboundedSender<ResponderEvent>,
    worker: JoinHandle<()>,
}

impl Responder {
    /// Spawns the get-data worker for one peer channel.
    pub fn spawn<B, C>(chain: Arc<B>, mempool: Mempool, channel: Arc<C>, logger: Logger) -> Self
    where
        B: Blockchain,
        C: PeerChannel,
    {
        let (events, event_rx) = mpsc::unbounded_channel();
        let worker_state = Worker {
            chain,
            mempool,
            channel,
            events: events.clone(),
            logger,
            monitoring: false,
        };
        let worker = tokio::spawn(worker_state.run(event_rx));
        Self { events, worker }
    }

    /// Arms the peer's get-data stream.
    pub fn monitor(&self) {
        let _ = self.events.send(ResponderEvent::Monitor);
    }
}

impl Drop for Responder {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

struct Worker<B, C> {
    chain: Arc<B>,
    mempool: Mempool,
    channel: Arc<C>,
    events: mpsc::UnboundedSender<ResponderEvent>,
    logger: Logger,
    monitoring: bool,
}

impl<B: Blockchain, C: PeerChannel> Worker<B, C> {
    async fn run(mut self, mut events: mpsc::UnboundedReceiver<ResponderEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                ResponderEvent::Monitor => self.monitor(),
                ResponderEvent::GetData(packet) => self.serve(packet).await,
                ResponderEvent::StreamEnded(error) => {
                    slog::error!(self.logger, "Get-data stream ended"; "error" => %error);
                }
            }
        }
    }

    /// Arms the get-data forwarder, re-issuing the one-shot subscription
    /// after every delivered request.
    fn monitor(&mut self) {
        if self.monitoring {
            return;
        }
        self.monitoring = true;

        let channel = Arc::clone(&self.channel);
        let events = self.events.clone();
        tokio::spawn(async move {
            loop {
                match channel.next_get_data().await {
                    Ok(packet) => {
                        if events.send(ResponderEvent::GetData(packet)).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        let _ = events.send(ResponderEvent::StreamEnded(error));
                        break;
                    }
                }
            }
        });
    }

    /// Resolves each requested entry independently; a miss on one entry
    /// never aborts the others.
    async fn serve(&self, packet: GetData) {
        for entry in packet.inventories {
            match entry.kind {
                InventoryType::Transaction => self.serve_transaction(entry.hash).await,
                InventoryType::Block => self.serve_block(entry.hash).await,
                // Nothing to serve for other kinds
                InventoryType::Error => {}
            }
        }
    }

    async fn serve_transaction(&self, hash: HashDigest) {
        // Pool first: an unconfirmed transaction is not in the chain index.
        match self.mempool.fetch(hash).await {
            Ok(tx) => {
                self.reply(Message::Transaction((*tx).clone())).await;
                return;
            }
            Err(PoolError::NotFound) => {}
            Err(error) => {
                slog::debug!(self.logger, "Pool lookup failed"; "error" => %error);
                return;
            }
        }
        match self.chain.fetch_transaction(hash).await {
            Ok(tx) => self.reply(Message::Transaction(tx)).await,
            Err(ChainError::NotFound) => {}
            Err(error) => {
                slog::debug!(self.logger, "Chain transaction lookup failed"; "error" => %error);
            }
        }
    }

    async fn serve_block(&self, hash: HashDigest) {
        match self.chain.fetch_block(hash).await {
            Ok(block) => self.reply(Message::Block(block)).await,
            Err(ChainError::NotFound) => {}
            Err(error) => {
                slog::debug!(self.logger, "Chain block lookup failed"; "error" => %error);
            }
        }
    }

    async fn reply(&self, message: Message) {
        if let Err(error) = self.channel.send(message).await {
            slog::error!(self.logger, "Send failed"; "error" => %error);
        }
    }
}
