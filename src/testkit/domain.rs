//! Builders for domain primitives used across tests.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::{MarketId, Position, PositionId, Side};
use crate::port::PositionOpened;

/// Create a [`MarketId`] from a string.
pub fn market_id(id: &str) -> MarketId {
    MarketId::new(id)
}

/// A `PositionOpened` event on `market` with the given terms, at block 0.
pub fn opened(
    id: u64,
    market: &str,
    side: Side,
    entry_price: Decimal,
    collateral: Decimal,
    leverage: u32,
) -> PositionOpened {
    PositionOpened {
        position_id: PositionId::new(id),
        market_id: MarketId::new(market),
        is_long_yes: side == Side::Yes,
        entry_price,
        collateral,
        leverage,
        trader: None,
        block_number: 0,
        tx_hash: None,
    }
}

/// The same event, emitted at `block`.
pub fn opened_at_block(mut event: PositionOpened, block: u64) -> PositionOpened {
    event.block_number = block;
    event.tx_hash = Some(format!("0x{block:064x}"));
    event
}

/// A validated position.
///
/// # Panics
///
/// Panics if the terms are invalid.
pub fn position(
    id: u64,
    market: &str,
    side: Side,
    entry_price: Decimal,
    collateral: Decimal,
    leverage: u32,
) -> Position {
    Position::try_new(
        PositionId::new(id),
        MarketId::new(market),
        side,
        entry_price,
        collateral,
        leverage,
        Utc::now(),
    )
    .expect("valid test position")
}
