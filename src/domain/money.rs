//! Monetary types for price and collateral representation.

use rust_decimal::Decimal;

/// Outcome price in points on the 0-100 probability scale.
pub type Price = Decimal;

/// USDC amount.
pub type Collateral = Decimal;

/// Upper bound of the points scale (a certain outcome).
pub const PRICE_SCALE: Decimal = Decimal::ONE_HUNDRED;

/// Convert a 0..1 probability into points.
#[must_use]
pub fn probability_to_points(probability: Decimal) -> Price {
    probability * PRICE_SCALE
}

/// Whether a price lies on the 0-100 points scale.
#[must_use]
pub fn is_valid_price(price: Price) -> bool {
    price >= Decimal::ZERO && price <= PRICE_SCALE
}
