//! Pure pricing math for the falling-price auction.
//!
//! The fraction of the collateral pool on offer grows linearly with
//! elapsed time. After every partial fill the depletion velocity is
//! rescaled upward so the remaining schedule still reaches 100% of the
//! pool at the original `created_at + auction_length` deadline.

use crate::error::{AuctionError, Result};
use crate::fixed::FixedPoint;

/// Fraction of the pool currently purchasable.
///
/// `effective = (elapsed - start_time_offset) * velocity / baseline`,
/// `fraction = min(effective / auction_length, 1.0)`.
///
/// Monotonically non-decreasing in `elapsed_secs` for fixed parameters
/// and capped at 1.0 (the whole pool).
pub fn available_fraction(
    elapsed_secs: u64,
    start_time_offset_secs: u64,
    auction_length_secs: u64,
    velocity: FixedPoint,
) -> Result<FixedPoint> {
    if auction_length_secs == 0 {
        return Err(AuctionError::invalid_parameter("zero auction length"));
    }
    let run = u128::from(elapsed_secs.saturating_sub(start_time_offset_secs));
    let effective = velocity
        .raw()
        .checked_mul(run)
        .ok_or(AuctionError::ArithmeticOverflow)?;
    let raw = effective / u128::from(auction_length_secs);
    Ok(FixedPoint::from_raw(raw).min_one())
}

/// Velocity after a partial fill at `start_time_offset_secs`:
/// `auction_length / (auction_length - start_time_offset)`.
///
/// Less schedule remains to reach full availability, so the multiplier
/// is always above baseline for a non-zero offset. The offset is
/// measured from auction start, not from the previous offset, so the
/// recurrence stays consistent across repeated partial fills.
pub fn rescaled_velocity(
    auction_length_secs: u64,
    start_time_offset_secs: u64,
) -> Result<FixedPoint> {
    if start_time_offset_secs >= auction_length_secs {
        return Err(AuctionError::invalid_parameter(
            "start time offset must stay below auction length",
        ));
    }
    FixedPoint::from_ratio(
        u128::from(auction_length_secs),
        u128::from(auction_length_secs - start_time_offset_secs),
    )
}

/// Share of the pool a payment purchases: the offered fraction scaled
/// by how much of the remaining debt the payment retires.
///
/// `amount_outstanding` is the pre-mutation value and must be at least
/// `amount_paid`, so the result never exceeds `fraction`.
pub fn seized_portion(
    fraction: FixedPoint,
    amount_paid: u128,
    amount_outstanding: u128,
) -> Result<FixedPoint> {
    if amount_outstanding == 0 {
        return Err(AuctionError::invalid_parameter("zero outstanding amount"));
    }
    let raw = fraction
        .raw()
        .checked_mul(amount_paid)
        .ok_or(AuctionError::ArithmeticOverflow)?
        / amount_outstanding;
    Ok(FixedPoint::from_raw(raw))
}
