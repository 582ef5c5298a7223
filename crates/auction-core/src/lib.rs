//! Auction Core
//!
//! Shared types, errors, and the fixed-point pricing math for the
//! pool-liquidation Dutch auction. The engine crate builds the state
//! machine on top of these primitives.

pub mod error;
pub mod fixed;
pub mod pricing;
pub mod types;

pub use error::{AuctionError, Result};
pub use fixed::{FixedPoint, FIXED_POINT_SCALE};
pub use types::{AuctionParams, AuctionState, AuctionStatus, FillReceipt, FractionQuote};
