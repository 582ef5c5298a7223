//! Scaled-integer fixed-point arithmetic for fractional quantities.
//!
//! Fractions and rate multipliers are stored as `u128` values scaled by
//! [`FIXED_POINT_SCALE`] so the pricing formula stays deterministic
//! across platforms. All arithmetic is checked; overflow surfaces
//! [`AuctionError::ArithmeticOverflow`] instead of panicking.

use crate::error::{AuctionError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Divisor defining the precision of fixed-point values (18 decimals).
pub const FIXED_POINT_SCALE: u128 = 1_000_000_000_000_000_000;

/// A non-negative fixed-point number with 18 decimals of precision.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FixedPoint(u128);

impl FixedPoint {
    pub const ZERO: FixedPoint = FixedPoint(0);

    /// The baseline multiplier, 1.0 in fixed point.
    pub const ONE: FixedPoint = FixedPoint(FIXED_POINT_SCALE);

    /// Wrap an already-scaled raw value.
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// The underlying scaled integer.
    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Build the fixed-point ratio `numerator / denominator`.
    pub fn from_ratio(numerator: u128, denominator: u128) -> Result<Self> {
        if denominator == 0 {
            return Err(AuctionError::invalid_parameter("zero denominator"));
        }
        let raw = numerator
            .checked_mul(FIXED_POINT_SCALE)
            .ok_or(AuctionError::ArithmeticOverflow)?
            / denominator;
        Ok(Self(raw))
    }

    /// Fixed-point multiplication: `self * other / scale`.
    pub fn checked_mul(self, other: FixedPoint) -> Result<Self> {
        let raw = self
            .0
            .checked_mul(other.0)
            .ok_or(AuctionError::ArithmeticOverflow)?
            / FIXED_POINT_SCALE;
        Ok(Self(raw))
    }

    /// Scale an integer amount by this fraction, truncating toward zero.
    pub fn scale_amount(self, amount: u128) -> Result<u128> {
        let scaled = self
            .0
            .checked_mul(amount)
            .ok_or(AuctionError::ArithmeticOverflow)?;
        Ok(scaled / FIXED_POINT_SCALE)
    }

    /// Clamp to at most 1.0.
    pub fn min_one(self) -> Self {
        if self > Self::ONE {
            Self::ONE
        } else {
            self
        }
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Lossless conversion for display and reporting. Returns `None` when
    /// the value exceeds what `Decimal` can represent.
    pub fn to_decimal(self) -> Option<Decimal> {
        i128::try_from(self.0)
            .ok()
            .and_then(|raw| Decimal::try_from_i128_with_scale(raw, 18).ok())
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:018}",
            self.0 / FIXED_POINT_SCALE,
            self.0 % FIXED_POINT_SCALE
        )
    }
}
