//! Polymarket price oracle.

mod client;
mod dto;
mod oracle;

pub use client::PolymarketClient;
pub use dto::{ClobMarket, MarketsPayload, DEFAULT_YES_PRICE};
pub use oracle::PolymarketOracle;
