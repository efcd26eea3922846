//! Vault contract ports: event intake, settlement and balance reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Collateral, DomainError, MarketId, Position, PositionId, Price, Side};
use crate::error::Result;

/// A decoded `PositionOpened` event, from the chain or the webhook API.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionOpened {
    pub position_id: PositionId,
    pub market_id: MarketId,
    pub is_long_yes: bool,
    /// Held-side entry price in points.
    pub entry_price: Price,
    /// Collateral in USDC.
    pub collateral: Collateral,
    pub leverage: u32,
    pub trader: Option<String>,
    /// Block the event was emitted in (0 for webhook intake).
    pub block_number: u64,
    pub tx_hash: Option<String>,
}

impl PositionOpened {
    #[must_use]
    pub const fn side(&self) -> Side {
        Side::from_long_yes(self.is_long_yes)
    }

    /// Validate into a domain position.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if the event carries invalid values.
    pub fn into_position(self, opened_at: DateTime<Utc>) -> std::result::Result<Position, DomainError> {
        let side = self.side();
        let position = Position::try_new(
            self.position_id,
            self.market_id,
            side,
            self.entry_price,
            self.collateral,
            self.leverage,
            opened_at,
        )?;
        Ok(match self.trader {
            Some(trader) => position.with_trader(trader),
            None => position,
        })
    }
}

/// Receipt of a mined settlement transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReceipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
}

/// Reads `PositionOpened` events from the vault.
#[async_trait]
pub trait PositionEventSource: Send + Sync {
    /// Current chain head.
    async fn latest_block(&self) -> Result<u64>;

    /// Events emitted in `[from_block, to_block]`, in chain order.
    async fn position_opened(&self, from_block: u64, to_block: u64) -> Result<Vec<PositionOpened>>;
}

/// Forces settlement of a position on the vault.
#[async_trait]
pub trait SettlementGateway: Send + Sync {
    /// Send `settlePosition(id)` and wait for it to be mined.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails or the transaction reverts.
    async fn settle_position(&self, position_id: PositionId) -> Result<SettlementReceipt>;
}

/// Reads the vault's liquidity.
#[async_trait]
pub trait VaultReader: Send + Sync {
    /// Vault USDC balance.
    async fn vault_balance(&self) -> Result<Decimal>;
}
