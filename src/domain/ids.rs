//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Market identifier - newtype for type safety.
///
/// Holds whatever the vault contract recorded as the market: a Polymarket
/// condition id, a slug, or a free-form question fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketId(String);

impl MarketId {
    /// Create a new MarketId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the market ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MarketId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for MarketId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// On-chain position identifier assigned by the vault contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(u64);

impl PositionId {
    /// Create a new `PositionId` from a u64 value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for PositionId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_id_display() {
        let id = MarketId::new("bitcoin-100k-2024");
        assert_eq!(id.to_string(), "bitcoin-100k-2024");
        assert_eq!(id.as_str(), "bitcoin-100k-2024");
    }

    #[test]
    fn position_id_display_uses_hash_prefix() {
        assert_eq!(PositionId::new(42).to_string(), "#42");
    }

    #[test]
    fn position_ids_order_numerically() {
        assert!(PositionId::new(2) < PositionId::new(10));
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&PositionId::new(7)).unwrap();
        assert_eq!(json, "7");
        let json = serde_json::to_string(&MarketId::new("m")).unwrap();
        assert_eq!(json, "\"m\"");
    }
}
