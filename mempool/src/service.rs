//! Mempool service: the serialized pool worker and its public handle.
//!
//! The worker owns the [`TransactionPool`] and processes commands strictly
//! in order. Validation runs off the worker so that stores do not block
//! lookups; its completion re-enters the queue, which is what makes the
//! duplicate re-check observe inserts that happened while validation was
//! in flight.

use std::sync::Arc;

use chain::{short_hash, Block, Blockchain, HashDigest, Reorganization, Transaction};
use slog::Logger;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::MempoolConfig;
use crate::error::PoolError;
use crate::pool::{ConfirmSender, TransactionPool, TxEntry};
use crate::types::{Confirmation, IndexList, Stored};
use crate::validate::Validator;

/// Where a store outcome is reported.
enum StoreReply {
    /// An external [`Mempool::store`] call awaiting the outcome
    Caller(oneshot::Sender<Result<IndexList, PoolError>>),
    /// A reorganization resubmission; failures propagate to the entry's
    /// original confirmation
    Resubmit,
}

enum Command {
    Store {
        tx: Arc<Transaction>,
        confirm: ConfirmSender,
        reply: StoreReply,
    },
    Validated {
        hash: HashDigest,
        tx: Arc<Transaction>,
        confirm: ConfirmSender,
        reply: StoreReply,
        result: Result<IndexList, PoolError>,
    },
    Fetch {
        hash: HashDigest,
        reply: oneshot::Sender<Result<Arc<Transaction>, PoolError>>,
    },
    Exists {
        hash: HashDigest,
        reply: oneshot::Sender<bool>,
    },
    Reorganize(Reorganization),
}

/// Cloneable handle to the mempool worker.
#[derive(Clone)]
pub struct Mempool {
    commands: mpsc::UnboundedSender<Command>,
}

impl Mempool {
    /// Validates and stores an unconfirmed transaction.
    ///
    /// Resolves once validation and the insert attempt have completed. On
    /// success the returned [`Stored`] carries the unconfirmed input
    /// indices and the entry's [`Confirmation`].
    pub async fn store(&self, tx: Transaction) -> Result<Stored, PoolError> {
        let (confirm, confirm_rx) = oneshot::channel();
        let (reply, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Store {
                tx: Arc::new(tx),
                confirm,
                reply: StoreReply::Caller(reply),
            })
            .map_err(|_| PoolError::Stopped)?;
        let unconfirmed = reply_rx.await.map_err(|_| PoolError::Stopped)??;
        Ok(Stored {
            unconfirmed,
            confirmation: Confirmation::new(confirm_rx),
        })
    }

    /// Looks up a pooled transaction by hash.
    pub async fn fetch(&self, hash: HashDigest) -> Result<Arc<Transaction>, PoolError> {
        let (reply, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Fetch { hash, reply })
            .map_err(|_| PoolError::Stopped)?;
        reply_rx.await.map_err(|_| PoolError::Stopped)?
    }

    /// Reports whether a transaction with this hash is pooled.
    pub async fn exists(&self, hash: HashDigest) -> Result<bool, PoolError> {
        let (reply, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Exists { hash, reply })
            .map_err(|_| PoolError::Stopped)?;
        reply_rx.await.map_err(|_| PoolError::Stopped)
    }
}

/// Owns the worker task and the reorganization subscription.
///
/// Dropping the service stops both; outstanding operations resolve with
/// [`PoolError::Stopped`].
pub struct MempoolService {
    worker: JoinHandle<()>,
    reorg: JoinHandle<()>,
}

impl MempoolService {
    /// Spawns the pool worker and arms the reorganization subscription.
    pub fn spawn<B, V>(
        chain: Arc<B>,
        validator: Arc<V>,
        config: MempoolConfig,
        logger: Logger,
    ) -> (Self, Mempool)
    where
        B: Blockchain,
        V: Validator,
    {
        let (commands, command_rx) = mpsc::unbounded_channel();

        let reorg = {
            let commands = commands.clone();
            let logger = logger.clone();
            tokio::spawn(async move {
                loop {
                    match chain.next_reorganize().await {
                        Ok(event) => {
                            if commands.send(Command::Reorganize(event)).is_err() {
                                break;
                            }
                        }
                        Err(error) => {
                            slog::info!(
                                logger,
                                "Reorganization subscription ended";
                                "error" => %error,
                            );
                            break;
                        }
                    }
                }
            })
        };

        slog::info!(logger, "Mempool service started"; "capacity" => config.capacity);

        let worker_state = Worker {
            pool: TransactionPool::new(config.capacity),
            validator,
            commands: commands.clone(),
            logger,
        };
        let worker = tokio::spawn(worker_state.run(command_rx));

        (Self { worker, reorg }, Mempool { commands })
    }
}

impl Drop for MempoolService {
    fn drop(&mut self) {
        self.worker.abort();
        self.reorg.abort();
    }
}

struct Worker<V> {
    pool: TransactionPool,
    validator: Arc<V>,
    commands: mpsc::UnboundedSender<Command>,
    logger: Logger,
}

impl<V: Validator> Worker<V> {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = commands.recv().await {
            match command {
                Command::Store { tx, confirm, reply } => self.start_validation(tx, confirm, reply),
                Command::Validated {
                    hash,
                    tx,
                    confirm,
                    reply,
                    result,
                } => self.finish_store(hash, tx, confirm, reply, result),
                Command::Fetch { hash, reply } => {
                    let result = self
                        .pool
                        .get(&hash)
                        .map(|entry| Arc::clone(&entry.tx))
                        .ok_or(PoolError::NotFound);
                    let _ = reply.send(result);
                }
                Command::Exists { hash, reply } => {
                    let _ = reply.send(self.pool.contains(&hash));
                }
                Command::Reorganize(event) => self.reorganize(event),
            }
        }
    }

    /// Kicks validation off the worker; the verdict re-enters the queue as
    /// a `Validated` command.
    fn start_validation(&self, tx: Arc<Transaction>, confirm: ConfirmSender, reply: StoreReply) {
        let hash = tx.hash();
        let validator = Arc::clone(&self.validator);
        let commands = self.commands.clone();
        tokio::spawn(async move {
            let result = validator.validate(&tx).await;
            let _ = commands.send(Command::Validated {
                hash,
                tx,
                confirm,
                reply,
                result,
            });
        });
    }

    fn finish_store(
        &mut self,
        hash: HashDigest,
        tx: Arc<Transaction>,
        confirm: ConfirmSender,
        reply: StoreReply,
        result: Result<IndexList, PoolError>,
    ) {
        match result {
            // Re-check: another store may have inserted this hash while
            // validation was in flight.
            Ok(_) if self.pool.contains(&hash) => {
                Self::report(reply, confirm, Err(PoolError::Duplicate));
            }
            Ok(unconfirmed) => {
                if let Some(evicted) = self.pool.push(TxEntry { hash, tx, confirm }) {
                    slog::debug!(
                        self.logger,
                        "Evicted oldest pooled transaction";
                        "hash" => short_hash(&evicted.hash),
                        "pool_size" => self.pool.len(),
                    );
                    let _ = evicted.confirm.send(Err(PoolError::PoolFull));
                }
                slog::debug!(
                    self.logger,
                    "Transaction pooled";
                    "hash" => short_hash(&hash),
                    "pool_size" => self.pool.len(),
                );
                if let StoreReply::Caller(reply) = reply {
                    let _ = reply.send(Ok(unconfirmed));
                }
            }
            Err(error) => {
                if let PoolError::InputNotFound { input } = &error {
                    debug_assert!(*input < tx.inputs.len());
                }
                Self::report(reply, confirm, Err(error));
            }
        }
    }

    /// Reports a store that did not insert: external callers get the
    /// outcome on their reply channel; resubmissions propagate failures to
    /// the entry's original confirmation.
    fn report(reply: StoreReply, confirm: ConfirmSender, result: Result<IndexList, PoolError>) {
        match reply {
            StoreReply::Caller(reply) => {
                let _ = reply.send(result);
            }
            StoreReply::Resubmit => {
                if let Err(error) = result {
                    let _ = confirm.send(Err(error));
                }
            }
        }
    }

    fn reorganize(&mut self, event: Reorganization) {
        if event.replaced_blocks.is_empty() {
            self.takeout_confirmed(&event.new_blocks);
        } else {
            slog::info!(
                self.logger,
                "Chain reorganized, resubmitting pool";
                "fork_point" => event.fork_point,
                "replaced" => event.replaced_blocks.len(),
                "pool_size" => self.pool.len(),
            );
            self.resubmit_all();
        }
    }

    /// Replaced blocks mean pooled transactions may now double-spend or
    /// rest on vanished confirmations; every entry goes through validation
    /// again, in arrival order.
    fn resubmit_all(&mut self) {
        for entry in self.pool.drain() {
            let _ = self.commands.send(Command::Store {
                tx: entry.tx,
                confirm: entry.confirm,
                reply: StoreReply::Resubmit,
            });
        }
    }

    /// Simple chain extension: entries confirmed by the new blocks leave
    /// the pool with a successful confirmation.
    fn takeout_confirmed(&mut self, new_blocks: &[Arc<Block>]) {
        for block in new_blocks {
            for tx in &block.transactions {
                if let Some(entry) = self.pool.take(&tx.hash()) {
                    slog::debug!(
                        self.logger,
                        "Pooled transaction confirmed";
                        "hash" => short_hash(&entry.hash),
                        "pool_size" => self.pool.len(),
                    );
                    let _ = entry.confirm.send(Ok(()));
                }
            }
        }
    }
}
