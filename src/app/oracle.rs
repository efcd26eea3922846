//! Fallback pricing when the live oracle is unavailable.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::state::AppState;
use crate::domain::{MarketId, MarketQuote, SimulatedAmm};
use crate::error::Result;
use crate::port::{OracleStats, PriceOracle};

/// Prices a market from the collateral tracked on each side.
pub struct AmmOracle {
    state: Arc<AppState>,
    amm: SimulatedAmm,
}

impl AmmOracle {
    #[must_use]
    pub const fn new(state: Arc<AppState>, amm: SimulatedAmm) -> Self {
        Self { state, amm }
    }
}

#[async_trait]
impl PriceOracle for AmmOracle {
    async fn quote(&self, market_id: &MarketId) -> Result<MarketQuote> {
        let (yes_volume, no_volume) = self.state.positions().volume_by_side(market_id);
        let yes_price = self.amm.yes_price(yes_volume, no_volume);
        Ok(MarketQuote::simulated(
            market_id.clone(),
            market_id.to_string(),
            yes_price,
        ))
    }

    fn name(&self) -> &'static str {
        "amm"
    }
}

/// Answers from `primary`, falling back on any error when a fallback is set.
pub struct FallbackOracle {
    primary: Arc<dyn PriceOracle>,
    fallback: Option<Arc<dyn PriceOracle>>,
}

impl FallbackOracle {
    #[must_use]
    pub fn new(primary: Arc<dyn PriceOracle>, fallback: Option<Arc<dyn PriceOracle>>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl PriceOracle for FallbackOracle {
    async fn quote(&self, market_id: &MarketId) -> Result<MarketQuote> {
        match self.primary.quote(market_id).await {
            Ok(quote) => Ok(quote),
            Err(err) => match &self.fallback {
                Some(fallback) => {
                    warn!(
                        market = %market_id,
                        primary = self.primary.name(),
                        fallback = fallback.name(),
                        error = %err,
                        "Live quote failed, using fallback pricing"
                    );
                    fallback.quote(market_id).await
                }
                None => Err(err),
            },
        }
    }

    fn name(&self) -> &'static str {
        self.primary.name()
    }

    fn stats(&self) -> OracleStats {
        self.primary.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Position, PositionId, QuoteSource, Side};
    use crate::error::OracleError;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct Down;

    #[async_trait]
    impl PriceOracle for Down {
        async fn quote(&self, market_id: &MarketId) -> Result<MarketQuote> {
            Err(OracleError::Unavailable(format!("no route to {market_id}")).into())
        }

        fn name(&self) -> &'static str {
            "down"
        }
    }

    fn state_with_yes_volume(volume: Decimal) -> Arc<AppState> {
        let state = Arc::new(AppState::default());
        let position = Position::try_new(
            PositionId::new(1),
            MarketId::new("m"),
            Side::Yes,
            dec!(50),
            volume,
            2,
            Utc::now(),
        )
        .unwrap();
        state.track(position);
        state
    }

    #[tokio::test]
    async fn amm_quotes_even_odds_without_volume() {
        let oracle = AmmOracle::new(Arc::new(AppState::default()), SimulatedAmm::default());
        let quote = oracle.quote(&MarketId::new("m")).await.unwrap();
        assert_eq!(quote.yes_price, dec!(0.5));
        assert_eq!(quote.source, QuoteSource::Simulated);
    }

    #[tokio::test]
    async fn amm_moves_toward_heavier_side() {
        let oracle = AmmOracle::new(state_with_yes_volume(dec!(1000)), SimulatedAmm::default());
        let quote = oracle.quote(&MarketId::new("m")).await.unwrap();
        assert!(quote.yes_price > dec!(0.5));
    }

    #[tokio::test]
    async fn falls_back_on_primary_error() {
        let amm: Arc<dyn PriceOracle> =
            Arc::new(AmmOracle::new(Arc::new(AppState::default()), SimulatedAmm::default()));
        let oracle = FallbackOracle::new(Arc::new(Down), Some(amm));
        let quote = oracle.quote(&MarketId::new("m")).await.unwrap();
        assert!(quote.is_simulated());
        assert_eq!(oracle.name(), "down");
    }

    #[tokio::test]
    async fn propagates_without_fallback() {
        let oracle = FallbackOracle::new(Arc::new(Down), None);
        assert!(oracle.quote(&MarketId::new("m")).await.is_err());
    }
}
