//! The per-auction state machine.
//!
//! One engine tracks one auction: `Uninitialized -> Open -> Closed`,
//! with partial fills looping back to `Open` under rescaled pricing
//! parameters. `Closed` is terminal; the open record is dropped on
//! closure and every entry point checks the state tag first.

use auction_core::error::{AuctionError, Result};
use auction_core::fixed::FixedPoint;
use auction_core::pricing;
use auction_core::types::{AuctionParams, AuctionState, AuctionStatus, FillReceipt, FractionQuote};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::settlement::{AssetTransfer, SettlementAuthority};

/// Live record for an open auction. Dropped in full on closure.
struct OpenAuction {
    settlement: Arc<dyn SettlementAuthority>,
    accepted_asset: String,
    amount_desired: u128,
    amount_outstanding: u128,
    auction_length_secs: u64,
    start_time_offset_secs: u64,
    velocity: FixedPoint,
    created_at: DateTime<Utc>,
}

enum EngineState {
    Uninitialized,
    Open(OpenAuction),
    Closed {
        amount_desired: u128,
        amount_transferred: u128,
    },
}

/// Dutch auction engine for a single collateral pool liquidation.
///
/// Every mutating operation holds the state write lock for its full
/// duration, so the snapshot, the mutation, and the settlement call
/// form one indivisible unit relative to concurrent offers. Independent
/// engines share no state.
pub struct AuctionEngine {
    id: Uuid,
    clock: Arc<dyn Clock>,
    assets: Arc<dyn AssetTransfer>,
    state: RwLock<EngineState>,
}

impl AuctionEngine {
    pub fn new(clock: Arc<dyn Clock>, assets: Arc<dyn AssetTransfer>) -> Self {
        Self {
            id: Uuid::new_v4(),
            clock,
            assets,
            state: RwLock::new(EngineState::Uninitialized),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Bind the auction parameters and the settlement authority.
    ///
    /// Succeeds exactly once per instance; a closed instance stays
    /// permanently inert. Resets the depletion velocity to baseline and
    /// records the creation instant from the clock.
    pub async fn initialize(
        &self,
        settlement: Arc<dyn SettlementAuthority>,
        params: AuctionParams,
    ) -> Result<()> {
        params.validate()?;

        let mut state = self.state.write().await;
        if !matches!(*state, EngineState::Uninitialized) {
            return Err(AuctionError::AlreadyInitialized);
        }

        let created_at = self.clock.now();
        info!(
            auction_id = %self.id,
            asset = %params.accepted_asset,
            amount_desired = %params.amount_desired,
            auction_length_secs = params.auction_length_secs,
            authority = %settlement.authority_id(),
            "Auction initialized"
        );

        *state = EngineState::Open(OpenAuction {
            settlement,
            accepted_asset: params.accepted_asset,
            amount_desired: params.amount_desired,
            amount_outstanding: params.amount_desired,
            auction_length_secs: params.auction_length_secs,
            start_time_offset_secs: 0,
            velocity: FixedPoint::ONE,
            created_at,
        });
        Ok(())
    }

    /// Pay `amount` of the accepted asset toward the auction.
    ///
    /// Only `min(amount, outstanding)` is ever requested from the
    /// caller's custody. The payment purchases the proportional share
    /// of the currently offered pool fraction. A partial fill rescales
    /// the depletion velocity; a full fill closes the auction.
    pub async fn take_offer(&self, caller: &str, amount: u128) -> Result<FillReceipt> {
        if amount == 0 {
            return Err(AuctionError::ZeroAmount);
        }

        let mut state = self.state.write().await;
        let auction = match &mut *state {
            EngineState::Open(auction) => auction,
            EngineState::Uninitialized => return Err(AuctionError::NotInitialized),
            EngineState::Closed { .. } => return Err(AuctionError::ClosedAuction),
        };

        let now = self.clock.now();
        let elapsed = elapsed_secs(auction.created_at, now);

        // Consistent snapshot: pre-mutation outstanding is the
        // denominator for the seized portion.
        let amount_to_transfer = amount.min(auction.amount_outstanding);
        let fraction_on_offer = pricing::available_fraction(
            elapsed,
            auction.start_time_offset_secs,
            auction.auction_length_secs,
            auction.velocity,
        )?;
        let portion_to_seize =
            pricing::seized_portion(fraction_on_offer, amount_to_transfer, auction.amount_outstanding)?;

        let asset = auction.accepted_asset.clone();
        let authority = auction.settlement.authority_id().to_string();

        // Payment reaches the authority before any bookkeeping changes;
        // a failed transfer leaves the auction untouched.
        self.assets
            .transfer_from(caller, &authority, &asset, amount_to_transfer)
            .await
            .map_err(AuctionError::Settlement)?;

        auction.amount_outstanding -= amount_to_transfer;
        let closed = auction.amount_outstanding == 0;
        let outstanding = auction.amount_outstanding;

        if !closed && elapsed < auction.auction_length_secs {
            // Less schedule remains to reach full availability, so the
            // velocity only ever ratchets upward. Fills landing at or
            // past the deadline skip the rescale: the full pool is
            // already on offer.
            let velocity = pricing::rescaled_velocity(auction.auction_length_secs, elapsed)?;
            if elapsed > auction.start_time_offset_secs {
                auction.start_time_offset_secs = elapsed;
            }
            if velocity > auction.velocity {
                debug!(
                    auction_id = %self.id,
                    old_velocity = %auction.velocity,
                    new_velocity = %velocity,
                    start_time_offset_secs = elapsed,
                    "Depletion velocity rescaled after partial fill"
                );
                auction.velocity = velocity;
            }
        }

        let settlement = auction.settlement.clone();
        if closed {
            // Outstanding hit zero, so closure belongs to the recorded
            // mutation and must stand even if the notification below
            // fails.
            let amount_desired = auction.amount_desired;
            *state = EngineState::Closed {
                amount_desired,
                amount_transferred: amount_desired,
            };
            info!(auction_id = %self.id, "Auction fully filled and closed");
        }

        // The mutation is already recorded when the settlement side
        // effect runs.
        settlement
            .offer_taken(caller, &asset, amount_to_transfer, portion_to_seize)
            .await
            .map_err(AuctionError::Settlement)?;

        info!(
            auction_id = %self.id,
            buyer = %caller,
            amount_paid = %amount_to_transfer,
            fraction_on_offer = %fraction_on_offer,
            portion_seized = %portion_to_seize,
            outstanding = %outstanding,
            closed = closed,
            "Offer taken"
        );

        Ok(FillReceipt {
            auction_id: self.id,
            buyer: caller.to_string(),
            asset,
            amount_paid: amount_to_transfer,
            portion_seized: portion_to_seize,
            closed,
            filled_at: now,
        })
    }

    /// Terminate the auction without a transfer.
    ///
    /// Only the settlement authority may call this; closure is the same
    /// irreversible state clear a full fill performs.
    pub async fn early_close(&self, caller: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let auction = match &*state {
            EngineState::Open(auction) => auction,
            EngineState::Uninitialized => return Err(AuctionError::NotInitialized),
            EngineState::Closed { .. } => return Err(AuctionError::AlreadyClosed),
        };

        if caller != auction.settlement.authority_id() {
            return Err(AuctionError::Unauthorized);
        }

        warn!(
            auction_id = %self.id,
            authority = %caller,
            outstanding = %auction.amount_outstanding,
            "Auction closed early by authority"
        );

        let amount_desired = auction.amount_desired;
        let amount_transferred = amount_desired - auction.amount_outstanding;
        *state = EngineState::Closed {
            amount_desired,
            amount_transferred,
        };
        Ok(())
    }

    /// Fraction of the pool currently on offer, with its scale made
    /// explicit. Zero whenever the auction is not open.
    pub async fn available_fraction(&self) -> Result<FractionQuote> {
        let state = self.state.read().await;
        match &*state {
            EngineState::Open(auction) => {
                let elapsed = elapsed_secs(auction.created_at, self.clock.now());
                let fraction = pricing::available_fraction(
                    elapsed,
                    auction.start_time_offset_secs,
                    auction.auction_length_secs,
                    auction.velocity,
                )?;
                Ok(FractionQuote::new(fraction))
            }
            _ => Ok(FractionQuote::zero()),
        }
    }

    /// Remaining amount still owed. Zero before initialization and
    /// after closure.
    pub async fn outstanding(&self) -> u128 {
        match &*self.state.read().await {
            EngineState::Open(auction) => auction.amount_outstanding,
            _ => 0,
        }
    }

    /// Cumulative amount paid in so far.
    pub async fn amount_transferred(&self) -> u128 {
        match &*self.state.read().await {
            EngineState::Open(auction) => auction.amount_desired - auction.amount_outstanding,
            EngineState::Closed {
                amount_transferred, ..
            } => *amount_transferred,
            EngineState::Uninitialized => 0,
        }
    }

    pub async fn is_open(&self) -> bool {
        matches!(&*self.state.read().await, EngineState::Open(_))
    }

    /// Point-in-time snapshot for reporting.
    pub async fn status(&self) -> AuctionStatus {
        match &*self.state.read().await {
            EngineState::Uninitialized => AuctionStatus::default(),
            EngineState::Open(auction) => AuctionStatus {
                state: AuctionState::Open,
                amount_desired: auction.amount_desired,
                amount_outstanding: auction.amount_outstanding,
                amount_transferred: auction.amount_desired - auction.amount_outstanding,
                auction_length_secs: auction.auction_length_secs,
                start_time_offset_secs: auction.start_time_offset_secs,
                velocity: auction.velocity,
                created_at: Some(auction.created_at),
            },
            EngineState::Closed {
                amount_desired,
                amount_transferred,
            } => AuctionStatus {
                state: AuctionState::Closed,
                amount_desired: *amount_desired,
                amount_transferred: *amount_transferred,
                ..AuctionStatus::default()
            },
        }
    }
}

fn elapsed_secs(created_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - created_at).num_seconds().max(0) as u64
}
