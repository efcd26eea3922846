//! Unrealized PnL and liquidation thresholds.
//!
//! Prices are in points (0-100). A move of one point against a 1x
//! position loses 1% of its collateral; leverage multiplies that:
//!
//! ```text
//! ratio  = (current - entry) / 100 * leverage
//! amount = ratio * collateral
//! ```
//!
//! `entry` and `current` are always the price of the side the position
//! holds, so a NO position gains when the NO price rises.

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::DomainError;
use super::money::{Collateral, Price, PRICE_SCALE};
use super::position::Position;

/// Default liquidation threshold: a loss of 80% of collateral.
pub const DEFAULT_LIQUIDATION_THRESHOLD: Decimal = Decimal::from_parts(80, 0, 0, true, 2);

/// PnL as a fraction of collateral, saturating at the [`Decimal`] bounds.
#[must_use]
pub fn pnl_ratio(entry_price: Price, current_price: Price, leverage: u32) -> Decimal {
    (current_price.saturating_sub(entry_price) / PRICE_SCALE)
        .saturating_mul(Decimal::from(leverage))
}

/// Point-in-time unrealized PnL for a position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PnlSnapshot {
    pub entry_price: Price,
    pub current_price: Price,
    /// PnL as a fraction of collateral (-0.8 = -80%).
    pub ratio: Decimal,
    /// PnL in USDC.
    pub amount: Collateral,
}

impl PnlSnapshot {
    #[must_use]
    pub fn compute(
        entry_price: Price,
        current_price: Price,
        collateral: Collateral,
        leverage: u32,
    ) -> Self {
        let ratio = pnl_ratio(entry_price, current_price, leverage);
        Self {
            entry_price,
            current_price,
            ratio,
            amount: ratio.saturating_mul(collateral),
        }
    }

    /// PnL as a percentage.
    #[must_use]
    pub fn percent(&self) -> Decimal {
        self.ratio.saturating_mul(Decimal::ONE_HUNDRED)
    }
}

/// Health classification of a leveraged position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    /// Loss is less than half the threshold.
    Healthy,
    /// Loss is past half the threshold.
    Warning,
    /// Threshold reached; the position should be settled.
    Liquidatable,
}

/// Threshold-based liquidation rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiquidationPolicy {
    threshold: Decimal,
}

impl LiquidationPolicy {
    /// Create a policy that liquidates at `threshold` (a negative ratio).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidThreshold`] unless the threshold is negative.
    pub fn new(threshold: Decimal) -> Result<Self, DomainError> {
        if threshold >= Decimal::ZERO {
            return Err(DomainError::InvalidThreshold { threshold });
        }
        Ok(Self { threshold })
    }

    #[must_use]
    pub const fn threshold(&self) -> Decimal {
        self.threshold
    }

    /// True once the loss reaches the threshold.
    #[must_use]
    pub fn should_liquidate(&self, pnl: &PnlSnapshot) -> bool {
        pnl.ratio <= self.threshold
    }

    #[must_use]
    pub fn health(&self, pnl: &PnlSnapshot) -> HealthLevel {
        if self.should_liquidate(pnl) {
            HealthLevel::Liquidatable
        } else if pnl.ratio <= self.threshold / Decimal::TWO {
            HealthLevel::Warning
        } else {
            HealthLevel::Healthy
        }
    }

    /// Held-side price at which the position hits the threshold.
    ///
    /// `None` when that price is below zero: prices floor at 0, so such a
    /// position cannot be liquidated by price movement.
    #[must_use]
    pub fn liquidation_price(&self, position: &Position) -> Option<Price> {
        let leverage = Decimal::from(position.leverage());
        if leverage.is_zero() {
            return None;
        }
        let price = position.entry_price() + self.threshold * PRICE_SCALE / leverage;
        (price >= Decimal::ZERO).then_some(price)
    }
}

impl Default for LiquidationPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LIQUIDATION_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MarketId, PositionId, Side};
    use rust_decimal_macros::dec;

    fn position(entry: Decimal, leverage: u32) -> Position {
        Position::try_new(
            PositionId::new(1),
            MarketId::new("m"),
            Side::Yes,
            entry,
            dec!(100),
            leverage,
            chrono::Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn default_threshold_is_minus_eighty_percent() {
        assert_eq!(DEFAULT_LIQUIDATION_THRESHOLD, dec!(-0.80));
        assert_eq!(LiquidationPolicy::default().threshold(), dec!(-0.80));
    }

    #[test]
    fn ratio_scales_with_leverage() {
        assert_eq!(pnl_ratio(dec!(50), dec!(40), 1), dec!(-0.1));
        assert_eq!(pnl_ratio(dec!(50), dec!(40), 5), dec!(-0.5));
        assert_eq!(pnl_ratio(dec!(40), dec!(60), 2), dec!(0.4));
    }

    #[test]
    fn amount_is_ratio_times_collateral() {
        let pnl = PnlSnapshot::compute(dec!(50), dec!(30), dec!(250), 2);
        assert_eq!(pnl.ratio, dec!(-0.4));
        assert_eq!(pnl.amount, dec!(-100));
        assert_eq!(pnl.percent(), dec!(-40));
    }

    #[test]
    fn liquidates_at_and_beyond_threshold() {
        let policy = LiquidationPolicy::default();
        // 10x, entry 50: -8 points is exactly -80%
        let at = PnlSnapshot::compute(dec!(50), dec!(42), dec!(100), 10);
        let beyond = PnlSnapshot::compute(dec!(50), dec!(41), dec!(100), 10);
        let short_of = PnlSnapshot::compute(dec!(50), dec!(43), dec!(100), 10);
        assert!(policy.should_liquidate(&at));
        assert!(policy.should_liquidate(&beyond));
        assert!(!policy.should_liquidate(&short_of));
    }

    #[test]
    fn health_levels() {
        let policy = LiquidationPolicy::default();
        let healthy = PnlSnapshot::compute(dec!(50), dec!(48), dec!(100), 5);
        let warning = PnlSnapshot::compute(dec!(50), dec!(42), dec!(100), 5);
        let liquidatable = PnlSnapshot::compute(dec!(50), dec!(34), dec!(100), 5);
        assert_eq!(policy.health(&healthy), HealthLevel::Healthy);
        assert_eq!(policy.health(&warning), HealthLevel::Warning);
        assert_eq!(policy.health(&liquidatable), HealthLevel::Liquidatable);
    }

    #[test]
    fn rejects_non_negative_threshold() {
        assert!(LiquidationPolicy::new(dec!(0)).is_err());
        assert!(LiquidationPolicy::new(dec!(0.5)).is_err());
        assert!(LiquidationPolicy::new(dec!(-0.5)).is_ok());
    }

    #[test]
    fn liquidation_price_moves_closer_with_leverage() {
        let policy = LiquidationPolicy::default();
        assert_eq!(policy.liquidation_price(&position(dec!(50), 5)), Some(dec!(34)));
        assert_eq!(policy.liquidation_price(&position(dec!(50), 10)), Some(dec!(42)));
    }

    #[test]
    fn low_leverage_cannot_be_liquidated_by_price() {
        let policy = LiquidationPolicy::default();
        // 1x from 50 would need the price at -30
        assert_eq!(policy.liquidation_price(&position(dec!(50), 1)), None);
    }
}
