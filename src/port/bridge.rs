//! Cross-chain USDC bridge port.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{MarketId, Side};
use crate::error::Result;

/// Why funds are being moved.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgePurpose {
    /// Buy the outcome token for a 1x position on Polygon.
    SpotPurchase { market_id: MarketId, side: Side },
    /// Offset vault exposure.
    Hedge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BridgeRequest {
    /// USDC to move.
    pub amount: Decimal,
    pub purpose: BridgePurpose,
}

impl BridgeRequest {
    #[must_use]
    pub fn spot(amount: Decimal, market_id: MarketId, side: Side) -> Self {
        Self {
            amount,
            purpose: BridgePurpose::SpotPurchase { market_id, side },
        }
    }

    #[must_use]
    pub const fn hedge(amount: Decimal) -> Self {
        Self {
            amount,
            purpose: BridgePurpose::Hedge,
        }
    }
}

/// Result of a bridge transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeOutcome {
    /// Burn transaction mined on the source chain.
    Submitted {
        tx_hash: String,
        block_number: Option<u64>,
    },
    /// No transaction was sent.
    Simulated,
}

impl BridgeOutcome {
    #[must_use]
    pub fn tx_hash(&self) -> Option<&str> {
        match self {
            Self::Submitted { tx_hash, .. } => Some(tx_hash),
            Self::Simulated => None,
        }
    }
}

/// Moves USDC from Arc to Polygon.
#[async_trait]
pub trait Bridge: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the transfer could not be submitted or reverted.
    async fn bridge(&self, request: &BridgeRequest) -> Result<BridgeOutcome>;

    fn name(&self) -> &'static str;
}
