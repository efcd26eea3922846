//! Price oracle port.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{MarketId, MarketQuote};
use crate::error::Result;

/// Metered data-access counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OracleStats {
    /// Requests made to the data provider.
    pub requests_served: u64,
    /// Access fees accrued, in USDC.
    pub fees_paid: Decimal,
}

/// Source of current market prices.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Quote a market.
    ///
    /// # Errors
    ///
    /// Returns an error if the market is unknown or the source is unreachable.
    async fn quote(&self, market_id: &MarketId) -> Result<MarketQuote>;

    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn stats(&self) -> OracleStats {
        OracleStats::default()
    }
}
