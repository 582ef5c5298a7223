//! Collaborator interfaces at the engine boundary.
//!
//! The engine never moves assets or seizes collateral itself; it calls
//! these traits and trusts the implementations to execute.

use anyhow::Result;
use async_trait::async_trait;
use auction_core::FixedPoint;

#[cfg(test)]
use mockall::automock;

/// Fungible-asset transfer primitive for the accepted payment asset.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AssetTransfer: Send + Sync {
    /// Move `amount` of `asset` from `from` custody to `to`.
    async fn transfer_from(&self, from: &str, to: &str, asset: &str, amount: u128) -> Result<()>;
}

/// Authority that receives payments and releases seized collateral.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SettlementAuthority: Send + Sync {
    /// Identity of the single principal allowed to close an auction early.
    fn authority_id(&self) -> &str;

    /// Invoked on every successful fill, after the engine has recorded
    /// the payment. Releases `portion_seized` of the pooled collateral
    /// to `buyer`.
    async fn offer_taken(
        &self,
        buyer: &str,
        asset: &str,
        amount_paid: u128,
        portion_seized: FixedPoint,
    ) -> Result<()>;
}
