//! Live price oracle with x402 data-access metering.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::client::PolymarketClient;
use super::dto::{select_market, ClobMarket};
use crate::domain::{MarketId, MarketQuote, QuoteSource};
use crate::error::{OracleError, Result};
use crate::port::{OracleStats, PriceOracle};

/// Quotes markets from the Polymarket CLOB.
///
/// Each request is metered as one paid x402 data access. Payment
/// verification is out of scope; only the fee is accounted.
pub struct PolymarketOracle {
    client: PolymarketClient,
    fee: Decimal,
    requests: AtomicU64,
    fees_paid: Mutex<Decimal>,
}

impl PolymarketOracle {
    #[must_use]
    pub fn new(client: PolymarketClient, fee: Decimal) -> Self {
        Self {
            client,
            fee,
            requests: AtomicU64::new(0),
            fees_paid: Mutex::new(Decimal::ZERO),
        }
    }

    fn meter(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let mut fees = self.fees_paid.lock();
        *fees += self.fee;
        debug!(fee = %self.fee, total = %*fees, "x402 data access");
    }
}

#[async_trait]
impl PriceOracle for PolymarketOracle {
    async fn quote(&self, market_id: &MarketId) -> Result<MarketQuote> {
        self.meter();

        let markets = self.client.get_markets().await?;
        let quote = quote_from_markets(&markets, market_id)?;

        info!(
            market = %market_id,
            question = %quote.question,
            yes = %quote.yes_price,
            no = %quote.no_price(),
            volume = %quote.volume,
            "Polymarket quote"
        );

        Ok(quote)
    }

    fn name(&self) -> &'static str {
        "polymarket"
    }

    fn stats(&self) -> OracleStats {
        OracleStats {
            requests_served: self.requests.load(Ordering::Relaxed),
            fees_paid: *self.fees_paid.lock(),
        }
    }
}

/// Build a live quote for `market_id` from a CLOB market listing.
fn quote_from_markets(markets: &[ClobMarket], market_id: &MarketId) -> Result<MarketQuote> {
    let market =
        select_market(markets, market_id.as_str()).ok_or_else(|| OracleError::MarketNotFound {
            market: market_id.to_string(),
        })?;

    let yes_price = market.yes_price();
    if !(Decimal::ZERO..=Decimal::ONE).contains(&yes_price) {
        return Err(OracleError::InvalidPrice {
            market: market_id.to_string(),
            price: yes_price,
        }
        .into());
    }

    Ok(MarketQuote {
        market_id: market_id.clone(),
        question: market.display_question().to_string(),
        yes_price,
        volume: market.volume(),
        liquidity: market.liquidity(),
        source: QuoteSource::Live,
    })
}
