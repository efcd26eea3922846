//! Polymarket CLOB `/markets` response types.
//!
//! The endpoint answers either with a page (`{"data": [...], "next_cursor": ...}`)
//! or with a bare list. Entries are decoded one by one so a malformed
//! market does not poison the whole response.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Raw `/markets` payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MarketsPayload {
    Page {
        #[serde(default)]
        data: Vec<Value>,
    },
    List(Vec<Value>),
}

impl MarketsPayload {
    /// Decode the market objects, skipping anything that is not one.
    #[must_use]
    pub fn into_markets(self) -> Vec<ClobMarket> {
        let entries = match self {
            Self::Page { data } => data,
            Self::List(list) => list,
        };
        entries
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|entry| {
                serde_json::from_value::<ClobMarket>(entry)
                    .map_err(|e| debug!(error = %e, "Skipping undecodable market"))
                    .ok()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClobMarket {
    #[serde(default)]
    pub condition_id: Option<String>,
    #[serde(default)]
    pub market_slug: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tokens: Vec<ClobToken>,
    #[serde(default)]
    pub volume: Option<Value>,
    #[serde(default)]
    pub liquidity: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClobToken {
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub price: Option<Value>,
}

/// Default YES probability when a market carries no token price.
pub const DEFAULT_YES_PRICE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

impl ClobMarket {
    /// Question, falling back to the title.
    #[must_use]
    pub fn display_question(&self) -> &str {
        self.question
            .as_deref()
            .filter(|q| !q.is_empty())
            .or(self.title.as_deref())
            .unwrap_or_default()
    }

    /// Case-insensitive match on condition id or slug.
    #[must_use]
    pub fn is_identified_by(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return false;
        }
        [&self.condition_id, &self.market_slug]
            .into_iter()
            .flatten()
            .any(|value| value.to_lowercase() == query)
    }

    /// Case-insensitive substring match on the question text.
    ///
    /// Slug-style queries (`bitcoin-100k`) also match questions containing
    /// the same words separated by spaces.
    #[must_use]
    pub fn mentions(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return false;
        }
        let question = self.display_question().to_lowercase();
        question.contains(&query) || question.contains(&query.replace('-', " "))
    }

    /// YES probability from the first token.
    #[must_use]
    pub fn yes_price(&self) -> Decimal {
        self.tokens
            .first()
            .and_then(|token| token.price.as_ref())
            .and_then(decimal_from_value)
            .unwrap_or(DEFAULT_YES_PRICE)
    }

    #[must_use]
    pub fn volume(&self) -> Decimal {
        self.volume
            .as_ref()
            .and_then(decimal_from_value)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn liquidity(&self) -> Decimal {
        self.liquidity
            .as_ref()
            .and_then(decimal_from_value)
            .unwrap_or_default()
    }
}

/// The market identified by `query`, else the first whose question
/// mentions it.
#[must_use]
pub fn select_market<'a>(markets: &'a [ClobMarket], query: &str) -> Option<&'a ClobMarket> {
    markets
        .iter()
        .find(|m| m.is_identified_by(query))
        .or_else(|| markets.iter().find(|m| m.mentions(query)))
}

/// Read a number or a numeric string.
fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => Decimal::from_str(&number.to_string())
            .or_else(|_| Decimal::from_scientific(&number.to_string()))
            .ok(),
        Value::String(text) => Decimal::from_str(text.trim()).ok(),
        _ => None,
    }
}
