//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors and other methods
//! that validate domain rules, such as [`Position::try_new`].
//!
//! # Examples
//!
//! ```
//! use signalkeeper::domain::{DomainError, MarketId, Position, PositionId, Side};
//! use rust_decimal_macros::dec;
//!
//! let result = Position::try_new(
//!     PositionId::new(1),
//!     MarketId::new("btc-100k"),
//!     Side::Yes,
//!     dec!(50),
//!     dec!(100),
//!     0, // leverage must be at least 1
//!     chrono::Utc::now(),
//! );
//!
//! assert!(matches!(result, Err(DomainError::InvalidLeverage { leverage: 0 })));
//! ```
//!
//! [`Position::try_new`]: crate::domain::Position::try_new

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Leverage must be at least 1x.
    #[error("leverage must be at least 1, got {leverage}")]
    InvalidLeverage {
        /// The invalid leverage that was provided.
        leverage: u32,
    },

    /// Prices live on the 0-100 points scale.
    #[error("price {price} is outside the 0-100 range")]
    PriceOutOfRange {
        /// The invalid price.
        price: Decimal,
    },

    /// Collateral cannot be negative.
    #[error("collateral must not be negative, got {collateral}")]
    NegativeCollateral {
        /// The invalid collateral.
        collateral: Decimal,
    },

    /// Leveraged size must be representable.
    #[error("notional of {collateral} at {leverage}x overflows")]
    NotionalOverflow {
        /// The collateral that was provided.
        collateral: Decimal,
        /// The leverage that was provided.
        leverage: u32,
    },

    /// A liquidation threshold must be a loss.
    #[error("liquidation threshold must be negative, got {threshold}")]
    InvalidThreshold {
        /// The invalid threshold.
        threshold: Decimal,
    },

    /// AMM liquidity must be positive.
    #[error("initial liquidity must be positive, got {liquidity}")]
    NonPositiveLiquidity {
        /// The invalid liquidity.
        liquidity: Decimal,
    },
}
