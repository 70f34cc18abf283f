//! Handle-facing types for the mempool service.

use tokio::sync::oneshot;

use crate::error::PoolError;

/// Indices into a transaction's input list whose previous outputs come
/// from other pooled transactions rather than the chain.
pub type IndexList = Vec<usize>;

/// Successful outcome of [`Mempool::store`](crate::Mempool::store).
#[derive(Debug)]
pub struct Stored {
    /// Inputs satisfied by other pooled transactions
    pub unconfirmed: IndexList,
    /// Resolves once the transaction's final fate is known
    pub confirmation: Confirmation,
}

/// One-shot notification of a pooled transaction's final fate.
///
/// Resolves `Ok` when the transaction is confirmed in a block, or an error
/// when it is evicted at capacity or fails revalidation after a
/// reorganization. Each pooled entry resolves exactly once.
#[derive(Debug)]
pub struct Confirmation {
    rx: oneshot::Receiver<Result<(), PoolError>>,
}

impl Confirmation {
    pub(crate) fn new(rx: oneshot::Receiver<Result<(), PoolError>>) -> Self {
        Self { rx }
    }

    /// Waits for the entry's fate. Reports [`PoolError::Stopped`] if the
    /// pool shut down before resolving it.
    pub async fn wait(self) -> Result<(), PoolError> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(PoolError::Stopped),
        }
    }
}
