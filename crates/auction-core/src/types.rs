//! Shared types for the auction engine.

use crate::error::{AuctionError, Result};
use crate::fixed::{FixedPoint, FIXED_POINT_SCALE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable parameters binding one auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionParams {
    /// Identifier of the asset accepted as payment.
    pub accepted_asset: String,
    /// Total amount (in accepted-asset units) that fully pays off the auction.
    pub amount_desired: u128,
    /// Seconds for the offered pool fraction to reach 100%.
    pub auction_length_secs: u64,
}

impl AuctionParams {
    /// Reject parameter combinations the pricing formula cannot serve.
    pub fn validate(&self) -> Result<()> {
        if self.amount_desired == 0 {
            return Err(AuctionError::invalid_parameter(
                "amount desired must be greater than zero",
            ));
        }
        if self.auction_length_secs == 0 {
            return Err(AuctionError::invalid_parameter(
                "auction length must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Lifecycle position of an auction instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionState {
    /// Instantiated but parameters not yet bound.
    Uninitialized,
    /// Accepting offers; `amount_outstanding > 0`.
    Open,
    /// Terminal. No operation ever succeeds again.
    Closed,
}

/// Report emitted for every successful fill, modeled per offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillReceipt {
    pub auction_id: Uuid,
    pub buyer: String,
    pub asset: String,
    /// Amount actually transferred; never exceeds what was outstanding.
    pub amount_paid: u128,
    /// Share of the collateral pool this payment purchased.
    pub portion_seized: FixedPoint,
    /// Whether this fill retired the auction.
    pub closed: bool,
    pub filled_at: DateTime<Utc>,
}

/// Available-fraction quote with its scale made explicit so callers
/// never assume a divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractionQuote {
    pub fraction: FixedPoint,
    pub scale: u128,
}

impl FractionQuote {
    pub fn new(fraction: FixedPoint) -> Self {
        Self {
            fraction,
            scale: FIXED_POINT_SCALE,
        }
    }

    pub fn zero() -> Self {
        Self::new(FixedPoint::ZERO)
    }
}

/// Point-in-time snapshot of an auction for reporting and logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionStatus {
    pub state: AuctionState,
    pub amount_desired: u128,
    pub amount_outstanding: u128,
    pub amount_transferred: u128,
    pub auction_length_secs: u64,
    pub start_time_offset_secs: u64,
    pub velocity: FixedPoint,
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for AuctionStatus {
    fn default() -> Self {
        Self {
            state: AuctionState::Uninitialized,
            amount_desired: 0,
            amount_outstanding: 0,
            amount_transferred: 0,
            auction_length_secs: 0,
            start_time_offset_secs: 0,
            velocity: FixedPoint::ZERO,
            created_at: None,
        }
    }
}
