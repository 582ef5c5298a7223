//! Error types for the auction engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuctionError {
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Auction already initialized")]
    AlreadyInitialized,

    #[error("Auction not initialized")]
    NotInitialized,

    #[error("Offer amount must be greater than zero")]
    ZeroAmount,

    #[error("Auction is closed")]
    ClosedAuction,

    #[error("Auction already closed")]
    AlreadyClosed,

    #[error("Caller is not the settlement authority")]
    Unauthorized,

    #[error("Fixed-point arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Settlement error: {0}")]
    Settlement(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AuctionError>;

impl AuctionError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}
