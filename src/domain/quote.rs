//! Oracle price quotes.

use rust_decimal::Decimal;
use serde::Serialize;

use super::ids::MarketId;
use super::money::{probability_to_points, Price};
use super::side::Side;

/// Where a quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    /// Live exchange data.
    Live,
    /// Derived locally when live data is unavailable.
    Simulated,
}

/// A binary market's prices at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketQuote {
    pub market_id: MarketId,
    pub question: String,
    /// YES probability in 0..1.
    pub yes_price: Decimal,
    pub volume: Decimal,
    pub liquidity: Decimal,
    pub source: QuoteSource,
}

impl MarketQuote {
    /// A quote with no volume or liquidity data.
    #[must_use]
    pub fn simulated(market_id: MarketId, question: impl Into<String>, yes_price: Decimal) -> Self {
        Self {
            market_id,
            question: question.into(),
            yes_price,
            volume: Decimal::ZERO,
            liquidity: Decimal::ZERO,
            source: QuoteSource::Simulated,
        }
    }

    /// NO probability in 0..1.
    #[must_use]
    pub fn no_price(&self) -> Decimal {
        Decimal::ONE - self.yes_price
    }

    /// Price of `side` in points.
    #[must_use]
    pub fn price_points(&self, side: Side) -> Price {
        match side {
            Side::Yes => probability_to_points(self.yes_price),
            Side::No => probability_to_points(self.no_price()),
        }
    }

    #[must_use]
    pub fn is_simulated(&self) -> bool {
        self.source == QuoteSource::Simulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn side_prices_in_points() {
        let quote = MarketQuote::simulated(MarketId::new("m"), "Will it?", dec!(0.35));
        assert_eq!(quote.no_price(), dec!(0.65));
        assert_eq!(quote.price_points(Side::Yes), dec!(35));
        assert_eq!(quote.price_points(Side::No), dec!(65));
        assert!(quote.is_simulated());
    }
}
