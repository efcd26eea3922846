//! Position tracking types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::DomainError;
use super::ids::{MarketId, PositionId};
use super::money::{is_valid_price, Collateral, Price};
use super::pnl::PnlSnapshot;
use super::route::ExecutionRoute;
use super::side::Side;

/// A trader's bet on one side of a binary market.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    id: PositionId,
    market_id: MarketId,
    side: Side,
    entry_price: Price,
    collateral: Collateral,
    leverage: u32,
    trader: Option<String>,
    opened_at: DateTime<Utc>,
}

impl Position {
    /// Create a validated position.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if leverage is zero, the entry price is
    /// outside 0-100, the collateral is negative, or `collateral * leverage`
    /// does not fit in a [`Decimal`].
    pub fn try_new(
        id: PositionId,
        market_id: MarketId,
        side: Side,
        entry_price: Price,
        collateral: Collateral,
        leverage: u32,
        opened_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if leverage == 0 {
            return Err(DomainError::InvalidLeverage { leverage });
        }
        if !is_valid_price(entry_price) {
            return Err(DomainError::PriceOutOfRange { price: entry_price });
        }
        if collateral < Decimal::ZERO {
            return Err(DomainError::NegativeCollateral { collateral });
        }
        if collateral.checked_mul(Decimal::from(leverage)).is_none() {
            return Err(DomainError::NotionalOverflow {
                collateral,
                leverage,
            });
        }

        Ok(Self {
            id,
            market_id,
            side,
            entry_price,
            collateral,
            leverage,
            trader: None,
            opened_at,
        })
    }

    /// Attach the trader address.
    #[must_use]
    pub fn with_trader(mut self, trader: impl Into<String>) -> Self {
        self.trader = Some(trader.into());
        self
    }

    #[must_use]
    pub const fn id(&self) -> PositionId {
        self.id
    }

    #[must_use]
    pub fn market_id(&self) -> &MarketId {
        &self.market_id
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Entry price of the held side, in points.
    #[must_use]
    pub const fn entry_price(&self) -> Price {
        self.entry_price
    }

    #[must_use]
    pub const fn collateral(&self) -> Collateral {
        self.collateral
    }

    #[must_use]
    pub const fn leverage(&self) -> u32 {
        self.leverage
    }

    #[must_use]
    pub fn trader(&self) -> Option<&str> {
        self.trader.as_deref()
    }

    #[must_use]
    pub const fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Leveraged size (`collateral * leverage`).
    #[must_use]
    pub fn notional(&self) -> Collateral {
        // Checked in `try_new`.
        self.collateral.saturating_mul(Decimal::from(self.leverage))
    }

    #[must_use]
    pub fn route(&self) -> ExecutionRoute {
        if self.leverage > 1 {
            ExecutionRoute::Synthetic
        } else {
            ExecutionRoute::Spot
        }
    }

    /// Unrealized PnL given the current price of the held side.
    #[must_use]
    pub fn pnl_at(&self, current_price: Price) -> PnlSnapshot {
        PnlSnapshot::compute(
            self.entry_price,
            current_price,
            self.collateral,
            self.leverage,
        )
    }
}

/// Tracks open positions, keyed and ordered by id.
#[derive(Debug, Default)]
pub struct PositionBook {
    positions: BTreeMap<PositionId, Position>,
}

impl PositionBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a position. Returns false (and keeps the existing entry) if the
    /// id is already tracked.
    pub fn insert(&mut self, position: Position) -> bool {
        if self.positions.contains_key(&position.id()) {
            return false;
        }
        self.positions.insert(position.id(), position);
        true
    }

    pub fn remove(&mut self, id: PositionId) -> Option<Position> {
        self.positions.remove(&id)
    }

    #[must_use]
    pub fn get(&self, id: PositionId) -> Option<&Position> {
        self.positions.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: PositionId) -> bool {
        self.positions.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    /// Clone of all tracked positions, in id order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Position> {
        self.positions.values().cloned().collect()
    }

    /// Summed collateral on (YES, NO) for one market, saturating at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn volume_by_side(&self, market_id: &MarketId) -> (Collateral, Collateral) {
        self.positions
            .values()
            .filter(|p| p.market_id() == market_id)
            .fold((Decimal::ZERO, Decimal::ZERO), |(yes, no), p| match p.side() {
                Side::Yes => (yes.saturating_add(p.collateral()), no),
                Side::No => (yes, no.saturating_add(p.collateral())),
            })
    }
}
