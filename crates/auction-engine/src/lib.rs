//! Auction Engine
//!
//! State machine for a linear falling-price auction that liquidates a
//! collateral pool into a single accepted asset. Payment settlement,
//! collateral seizure, and time are collaborators behind traits.

pub mod clock;
pub mod engine;
pub mod settlement;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::AuctionEngine;
pub use settlement::{AssetTransfer, SettlementAuthority};
