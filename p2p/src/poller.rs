//! Block-sync driver for a single peer.
//!
//! The poller walks the peer's chain toward its tip: it solicits block
//! inventory with get-blocks, fetches announced blocks with get-data,
//! stores them on the local chain, and uses orphan store results to
//! request the gap between the local chain and the orphan.

use std::sync::Arc;

use chain::{
    short_hash, Block, BlockInfo, BlockLocator, BlockStatus, Blockchain, ChainError, HashDigest,
    NULL_HASH,
};
use slog::Logger;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::channel::{ChannelError, PeerChannel};
use crate::messages::{GetBlocks, GetData, InventoryMessage, InventoryType, Message};

/// Events processed by the poller worker. All sync state lives on the
/// worker, so every transition is serialized through this queue.
enum PollerEvent {
    Query,
    Monitor,
    Inventory(InventoryMessage),
    Block(Block),
    Stored {
        block_hash: HashDigest,
        result: Result<BlockInfo, ChainError>,
    },
    Locator {
        hash_stop: HashDigest,
        result: Result<BlockLocator, ChainError>,
    },
    StreamEnded {
        stream: &'static str,
        error: ChannelError,
    },
}

/// Handle to the block-sync worker for one peer channel.
///
/// Dropping the handle stops the worker; its forwarders unwind once their
/// queue sends fail.
pub struct Poller {
    events: mpsc::UnboundedSender<PollerEvent>,
    worker: JoinHandle<()>,
}

impl Poller {
    /// Spawns the sync worker for one peer channel.
    pub fn spawn<B, C>(chain: Arc<B>, channel: Arc<C>, logger: Logger) -> Self
    where
        B: Blockchain,
        C: PeerChannel,
    {
        let (events, event_rx) = mpsc::unbounded_channel();
        let worker_state = Worker {
            chain,
            channel,
            events: events.clone(),
            logger,
            last_block_hash: None,
            last_hash_end: None,
            monitoring: false,
        };
        let worker = tokio::spawn(worker_state.run(event_rx));
        Self { events, worker }
    }

    /// Starts a sync round: fetches the local block locator and asks the
    /// peer for everything after it.
    pub fn query(&self) {
        let _ = self.events.send(PollerEvent::Query);
    }

    /// Arms the peer's inventory and block streams.
    pub fn monitor(&self) {
        let _ = self.events.send(PollerEvent::Monitor);
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

struct Worker<B, C> {
    chain: Arc<B>,
    channel: Arc<C>,
    events: mpsc::UnboundedSender<PollerEvent>,
    logger: Logger,
    /// Hash most recently requested via get-data; advisory dedup hint
    last_block_hash: Option<HashDigest>,
    /// Front of the most recent locator sent; suppresses duplicate asks
    last_hash_end: Option<HashDigest>,
    monitoring: bool,
}

impl<B: Blockchain, C: PeerChannel> Worker<B, C> {
    async fn run(mut self, mut events: mpsc::UnboundedReceiver<PollerEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                PollerEvent::Query => self.fetch_locator(NULL_HASH),
                PollerEvent::Monitor => self.monitor(),
                PollerEvent::Inventory(inventory) => self.handle_inventory(inventory),
                PollerEvent::Block(block) => self.handle_block(block),
                PollerEvent::Stored { block_hash, result } => {
                    self.handle_stored(block_hash, result)
                }
                PollerEvent::Locator { hash_stop, result } => {
                    self.handle_locator(hash_stop, result)
                }
                PollerEvent::StreamEnded { stream, error } => {
                    slog::error!(
                        self.logger,
                        "Peer stream ended";
                        "stream" => stream,
                        "error" => %error,
                    );
                }
            }
        }
    }

    /// Arms one forwarder per subscribed stream. Each forwarder re-issues
    /// its one-shot subscription after every delivered message; without
    /// that re-arm the peer's subsequent messages would be dropped.
    fn monitor(&mut self) {
        if self.monitoring {
            return;
        }
        self.monitoring = true;

        let channel = Arc::clone(&self.channel);
        let events = self.events.clone();
        tokio::spawn(async move {
            loop {
                match channel.next_inventory().await {
                    Ok(inventory) => {
                        if events.send(PollerEvent::Inventory(inventory)).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        let _ = events.send(PollerEvent::StreamEnded {
                            stream: "inventory",
                            error,
                        });
                        break;
                    }
                }
            }
        });

        let channel = Arc::clone(&self.channel);
        let events = self.events.clone();
        tokio::spawn(async move {
            loop {
                match channel.next_block().await {
                    Ok(block) => {
                        if events.send(PollerEvent::Block(block)).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        let _ = events.send(PollerEvent::StreamEnded {
                            stream: "block",
                            error,
                        });
                        break;
                    }
                }
            }
        });
    }

    /// Fetches the current block locator; the result re-enters the queue
    /// carrying the stop hash for the ask it will drive.
    fn fetch_locator(&self, hash_stop: HashDigest) {
        let chain = Arc::clone(&self.chain);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = chain.fetch_block_locator().await;
            let _ = events.send(PollerEvent::Locator { hash_stop, result });
        });
    }

    fn handle_locator(&mut self, hash_stop: HashDigest, result: Result<BlockLocator, ChainError>) {
        match result {
            Ok(locator) => self.ask_blocks(locator, hash_stop),
            Err(error) => {
                slog::error!(self.logger, "Fetching block locator failed"; "error" => %error);
            }
        }
    }

    fn ask_blocks(&mut self, locator: BlockLocator, hash_stop: HashDigest) {
        let Some(&front) = locator.first() else {
            return;
        };
        if self.last_hash_end == Some(front) {
            slog::debug!(
                self.logger,
                "Skipping duplicate ask blocks";
                "start" => short_hash(&front),
            );
            return;
        }
        self.last_hash_end = Some(front);
        self.send(Message::GetBlocks(GetBlocks {
            start_hashes: locator,
            hash_stop,
        }));
    }

    fn handle_inventory(&mut self, inventory: InventoryMessage) {
        let mut getdata = GetData::default();
        for entry in inventory.inventories {
            if entry.kind != InventoryType::Block {
                continue;
            }
            // Already requested this block
            if Some(entry.hash) == self.last_block_hash {
                continue;
            }
            getdata.inventories.push(entry);
        }
        if let Some(last) = getdata.inventories.last() {
            self.last_block_hash = Some(last.hash);
            self.send(Message::GetData(getdata));
        }
    }

    fn handle_block(&self, block: Block) {
        let block_hash = block.hash();
        let chain = Arc::clone(&self.chain);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = chain.store(block).await;
            let _ = events.send(PollerEvent::Stored { block_hash, result });
        });
    }

    fn handle_stored(&mut self, block_hash: HashDigest, result: Result<BlockInfo, ChainError>) {
        match result {
            Ok(info) => match info.status {
                BlockStatus::Confirmed => {
                    slog::info!(
                        self.logger,
                        "Block confirmed";
                        "depth" => info.depth,
                        "hash" => short_hash(&block_hash),
                    );
                }
                BlockStatus::Orphan => {
                    // The block is ahead of the local chain; ask the peer
                    // for the gap up to it.
                    self.fetch_locator(block_hash);
                }
                BlockStatus::Rejected => {
                    slog::error!(
                        self.logger,
                        "Block rejected";
                        "hash" => short_hash(&block_hash),
                    );
                }
            },
            Err(error) => {
                slog::error!(
                    self.logger,
                    "Storing block failed";
                    "hash" => short_hash(&block_hash),
                    "error" => %error,
                );
            }
        }
    }

    /// Fire-and-forget send; failures are logged and end that branch.
    fn send(&self, message: Message) {
        let channel = Arc::clone(&self.channel);
        let logger = self.logger.clone();
        tokio::spawn(async move {
            if let Err(error) = channel.send(message).await {
                slog::error!(logger, "Send failed"; "error" => %error);
            }
        });
    }
}
