//! End-to-end scenarios for the transaction pool.
//!
//! Covers the store race, reorganization handling, and capacity eviction
//! against a scripted chain and validator.

#![cfg(test)]

use std::sync::Arc;
use std::time::Duration;

use chain::Reorganization;
use mempool::{MempoolConfig, MempoolService, PoolError};

use crate::helpers::{
    discard_logger, eventually, fake_chain, test_block, test_tx, ScriptedValidator,
};

#[tokio::test]
async fn test_concurrent_stores_of_same_tx_race_to_one_insert() {
    let (chain, _chain_driver) = fake_chain();
    let validator = ScriptedValidator::accepting();
    validator.set_delay(Duration::from_millis(50));

    let (_service, pool) = MempoolService::spawn(
        Arc::clone(&chain),
        Arc::clone(&validator),
        MempoolConfig::default(),
        discard_logger(),
    );

    let tx = test_tx(1);
    let (first, second) = tokio::join!(pool.store(tx.clone()), pool.store(tx.clone()));

    // Exactly one store inserts; the other loses the re-check after its
    // validation completes.
    let mut accepted = 0;
    let mut duplicates = 0;
    for result in [first, second] {
        match result {
            Ok(_) => accepted += 1,
            Err(PoolError::Duplicate) => duplicates += 1,
            Err(other) => panic!("unexpected store outcome: {other}"),
        }
    }
    assert_eq!((accepted, duplicates), (1, 1));
    assert!(pool.exists(tx.hash()).await.unwrap());
}

#[tokio::test]
async fn test_extension_blocks_take_out_confirmed_entries() {
    let (chain, chain_driver) = fake_chain();
    let validator = ScriptedValidator::accepting();

    let (_service, pool) = MempoolService::spawn(
        Arc::clone(&chain),
        validator,
        MempoolConfig::default(),
        discard_logger(),
    );

    let (a, b, c) = (test_tx(1), test_tx(2), test_tx(3));
    pool.store(a.clone()).await.expect("store A");
    let stored_b = pool.store(b.clone()).await.expect("store B");
    pool.store(c.clone()).await.expect("store C");

    // A plain extension confirms B; nothing is resubmitted.
    chain_driver
        .reorgs
        .send(Reorganization {
            fork_point: 10,
            new_blocks: vec![Arc::new(test_block(9, vec![b.clone()]))],
            replaced_blocks: Vec::new(),
        })
        .unwrap();

    assert_eq!(stored_b.confirmation.wait().await, Ok(()));
    assert!(!pool.exists(b.hash()).await.unwrap());
    assert!(pool.exists(a.hash()).await.unwrap());
    assert!(pool.exists(c.hash()).await.unwrap());
}

#[tokio::test]
async fn test_reorganization_resubmits_pool_and_propagates_failures() {
    let (chain, chain_driver) = fake_chain();
    let validator = ScriptedValidator::accepting();

    let (_service, pool) = MempoolService::spawn(
        Arc::clone(&chain),
        Arc::clone(&validator),
        MempoolConfig::default(),
        discard_logger(),
    );

    let (a, b) = (test_tx(1), test_tx(2));
    let stored_a = pool.store(a.clone()).await.expect("store A");
    pool.store(b.clone()).await.expect("store B");

    // After the fork A spends a replaced output and no longer validates.
    let rejection = PoolError::Invalid("spends replaced output".into());
    validator.set_verdict(a.hash(), Err(rejection.clone()));

    chain_driver
        .reorgs
        .send(Reorganization {
            fork_point: 5,
            new_blocks: vec![Arc::new(test_block(6, Vec::new()))],
            replaced_blocks: vec![Arc::new(test_block(5, Vec::new()))],
        })
        .unwrap();

    // A's original confirmation learns about the failed resubmission.
    assert_eq!(stored_a.confirmation.wait().await, Err(rejection));
    assert!(!pool.exists(a.hash()).await.unwrap());

    // B revalidated cleanly and is back in the pool.
    let pool_handle = pool.clone();
    let b_hash = b.hash();
    eventually(move || {
        let pool = pool_handle.clone();
        async move { pool.exists(b_hash).await.unwrap() }
    })
    .await;
}

#[tokio::test]
async fn test_capacity_eviction_notifies_oldest_entry() {
    let (chain, _chain_driver) = fake_chain();
    let validator = ScriptedValidator::accepting();

    let (_service, pool) = MempoolService::spawn(
        Arc::clone(&chain),
        validator,
        MempoolConfig::new(2),
        discard_logger(),
    );

    let (t1, t2, t3) = (test_tx(1), test_tx(2), test_tx(3));
    let stored_t1 = pool.store(t1.clone()).await.expect("store t1");
    pool.store(t2.clone()).await.expect("store t2");
    pool.store(t3.clone()).await.expect("store t3");

    // The pool stays within capacity by evicting the oldest entry.
    assert_eq!(stored_t1.confirmation.wait().await, Err(PoolError::PoolFull));
    assert!(!pool.exists(t1.hash()).await.unwrap());
    assert!(pool.exists(t2.hash()).await.unwrap());
    assert!(pool.exists(t3.hash()).await.unwrap());
}
