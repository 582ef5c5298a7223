//! Integration tests for the auction engine against live collaborators.
//!
//! These drive full fill sequences through real trait implementations
//! instead of per-crate mocks.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use pool_auction::core::fixed::FixedPoint;
use pool_auction::core::{AuctionError, AuctionParams, FIXED_POINT_SCALE};
use pool_auction::engine::{
    AssetTransfer, AuctionEngine, ManualClock, SettlementAuthority,
};

const AUTHORITY: &str = "pool-vault";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Transfer primitive that always succeeds and records requested amounts.
#[derive(Default)]
struct RecordingTransfer {
    amounts: Mutex<Vec<u128>>,
}

#[async_trait]
impl AssetTransfer for RecordingTransfer {
    async fn transfer_from(&self, _from: &str, _to: &str, _asset: &str, amount: u128) -> Result<()> {
        self.amounts.lock().unwrap().push(amount);
        Ok(())
    }
}

/// Settlement authority that records every seized portion.
#[derive(Default)]
struct RecordingVault {
    seizures: Mutex<Vec<(String, u128, FixedPoint)>>,
}

#[async_trait]
impl SettlementAuthority for RecordingVault {
    fn authority_id(&self) -> &str {
        AUTHORITY
    }

    async fn offer_taken(
        &self,
        buyer: &str,
        _asset: &str,
        amount_paid: u128,
        portion_seized: FixedPoint,
    ) -> Result<()> {
        self.seizures
            .lock()
            .unwrap()
            .push((buyer.to_string(), amount_paid, portion_seized));
        Ok(())
    }
}

fn params(amount_desired: u128, auction_length_secs: u64) -> AuctionParams {
    AuctionParams {
        accepted_asset: "USDC".to_string(),
        amount_desired,
        auction_length_secs,
    }
}

/// Scenario from the design: 1000 desired over 100 seconds, a partial
/// fill of 400 at t=50, then a closing fill of 600.
#[tokio::test]
async fn test_two_fill_liquidation_scenario() {
    init_tracing();

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let transfer = Arc::new(RecordingTransfer::default());
    let vault = Arc::new(RecordingVault::default());

    let engine = AuctionEngine::new(clock.clone(), transfer.clone());
    engine
        .initialize(vault.clone(), params(1000, 100))
        .await
        .unwrap();

    // Nothing on offer at the starting instant.
    let quote = engine.available_fraction().await.unwrap();
    assert!(quote.fraction.is_zero());
    assert_eq!(quote.scale, FIXED_POINT_SCALE);

    clock.advance_secs(50);
    let first = engine.take_offer("liquidator-a", 400).await.unwrap();
    tracing::info!(receipt = ?first, "first fill settled");
    assert!(!first.closed);
    assert_ne!(first.auction_id, uuid::Uuid::nil());
    // 50% on offer, 40% of the debt retired: 20% of the pool.
    assert_eq!(
        first.portion_seized.to_decimal().unwrap(),
        rust_decimal::Decimal::new(2, 1)
    );
    assert_eq!(engine.outstanding().await, 600);

    let status = engine.status().await;
    assert_eq!(status.start_time_offset_secs, 50);
    assert_eq!(status.velocity, FixedPoint::from_ratio(2, 1).unwrap());

    // The rescaled schedule still reaches the full pool at t=100.
    clock.advance_secs(25);
    assert_eq!(
        engine.available_fraction().await.unwrap().fraction,
        FixedPoint::from_ratio(1, 2).unwrap()
    );

    clock.advance_secs(40);
    let second = engine.take_offer("liquidator-b", 600).await.unwrap();
    assert!(second.closed);
    assert!(!engine.is_open().await);
    assert_eq!(engine.amount_transferred().await, 1000);

    let amounts = transfer.amounts.lock().unwrap().clone();
    assert_eq!(amounts, vec![400, 600]);

    let seizures = vault.seizures.lock().unwrap().clone();
    assert_eq!(seizures.len(), 2);
    assert_eq!(seizures[0].0, "liquidator-a");
    // At t=115 the full pool was on offer, so the closing payment took
    // everything the first fill left behind.
    assert_eq!(seizures[1].2, FixedPoint::ONE);

    // The closed snapshot serializes with cleared schedule state.
    let status = serde_json::to_value(engine.status().await).unwrap();
    assert_eq!(status["state"], serde_json::json!("closed"));
    assert_eq!(status["start_time_offset_secs"], serde_json::json!(0));
}

/// A single payment covering the whole desired amount closes the
/// auction in one step and takes the entire offered fraction.
#[tokio::test]
async fn test_single_fill_closes_in_one_step() {
    init_tracing();

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let engine = AuctionEngine::new(clock.clone(), Arc::new(RecordingTransfer::default()));
    engine
        .initialize(Arc::new(RecordingVault::default()), params(500, 100))
        .await
        .unwrap();

    clock.advance_secs(40);
    let quote = engine.available_fraction().await.unwrap();
    let receipt = engine.take_offer("liquidator", 500).await.unwrap();

    assert!(receipt.closed);
    assert_eq!(receipt.amount_paid, 500);
    assert_eq!(receipt.portion_seized, quote.fraction);
    assert_eq!(engine.amount_transferred().await, 500);
}

/// Queries are well-defined on an instance nobody initialized.
#[tokio::test]
async fn test_uninitialized_instance_queries() {
    let engine = AuctionEngine::new(
        Arc::new(ManualClock::new(Utc::now())),
        Arc::new(RecordingTransfer::default()),
    );

    assert!(!engine.is_open().await);
    assert_eq!(engine.outstanding().await, 0);
    assert_eq!(engine.amount_transferred().await, 0);
    assert!(engine.available_fraction().await.unwrap().fraction.is_zero());
}

/// Concurrent offers race on one instance without corrupting the
/// outstanding amount: transfers sum to exactly the desired amount.
#[tokio::test]
async fn test_concurrent_offers_never_overfill() {
    init_tracing();

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let transfer = Arc::new(RecordingTransfer::default());
    let engine = Arc::new(AuctionEngine::new(clock.clone(), transfer.clone()));
    engine
        .initialize(Arc::new(RecordingVault::default()), params(1000, 100))
        .await
        .unwrap();
    clock.advance_secs(20);

    let mut handles = Vec::new();
    for i in 0..4 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.take_offer(&format!("racer-{i}"), 600).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AuctionError::ClosedAuction) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    // First racer takes 600, one more takes the remaining 400, the
    // rest see a closed auction.
    assert_eq!(successes, 2);
    assert!(!engine.is_open().await);
    assert_eq!(engine.amount_transferred().await, 1000);

    let amounts = transfer.amounts.lock().unwrap().clone();
    assert_eq!(amounts.iter().sum::<u128>(), 1000);
}

/// Early close by the authority tears the auction down without any
/// further transfer; non-authorities are rejected.
#[tokio::test]
async fn test_early_close_paths() {
    init_tracing();

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let transfer = Arc::new(RecordingTransfer::default());
    let engine = AuctionEngine::new(clock.clone(), transfer.clone());
    engine
        .initialize(Arc::new(RecordingVault::default()), params(1000, 100))
        .await
        .unwrap();

    clock.advance_secs(30);
    engine.take_offer("liquidator", 250).await.unwrap();

    let err = engine.early_close("someone-else").await.unwrap_err();
    assert!(matches!(err, AuctionError::Unauthorized));
    assert!(engine.is_open().await);

    engine.early_close(AUTHORITY).await.unwrap();
    assert!(!engine.is_open().await);
    assert_eq!(engine.amount_transferred().await, 250);
    assert_eq!(transfer.amounts.lock().unwrap().len(), 1);

    let err = engine.take_offer("late", 100).await.unwrap_err();
    assert!(matches!(err, AuctionError::ClosedAuction));
}
