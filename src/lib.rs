//! Pool Auction: Dutch auction engine for collateral pool liquidation.
//!
//! This is the root crate that provides benchmark and integration-test
//! access to the internal modules. For actual functionality, use the
//! individual crates directly:
//!
//! - `auction-core`: types, errors, fixed-point pricing math
//! - `auction-engine`: the per-auction state machine and its
//!   collaborator traits (settlement, asset transfer, clock)

// Re-export for benchmarks
pub use auction_core as core;
pub use auction_engine as engine;
