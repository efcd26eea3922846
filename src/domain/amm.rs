//! Constant-sum AMM approximation over observed position volume.
//!
//! Both sides are seeded with the same virtual liquidity `L`; observed
//! collateral is added to its side and YES is priced by its share of the
//! pool:
//!
//! ```text
//! yes = (L + yes_volume) / (2L + yes_volume + no_volume)
//! ```
//!
//! YES and NO always sum to 1 and an untouched market sits at 0.50.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::DomainError;
use super::money::Collateral;

/// Default virtual liquidity per side, in USDC.
pub const DEFAULT_INITIAL_LIQUIDITY: Decimal = Decimal::ONE_THOUSAND;

const MIN_PRICE: Decimal = dec!(0.01);
const MAX_PRICE: Decimal = dec!(0.99);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedAmm {
    initial_liquidity: Decimal,
}

impl SimulatedAmm {
    /// # Errors
    ///
    /// Returns [`DomainError::NonPositiveLiquidity`] unless liquidity is positive.
    pub fn new(initial_liquidity: Decimal) -> Result<Self, DomainError> {
        if initial_liquidity <= Decimal::ZERO {
            return Err(DomainError::NonPositiveLiquidity {
                liquidity: initial_liquidity,
            });
        }
        Ok(Self { initial_liquidity })
    }

    #[must_use]
    pub const fn initial_liquidity(&self) -> Decimal {
        self.initial_liquidity
    }

    /// YES probability in `[0.01, 0.99]`.
    #[must_use]
    pub fn yes_price(&self, yes_volume: Collateral, no_volume: Collateral) -> Decimal {
        let yes_volume = yes_volume.max(Decimal::ZERO);
        let no_volume = no_volume.max(Decimal::ZERO);
        let yes_pool = self.initial_liquidity.saturating_add(yes_volume);
        let total = yes_pool
            .saturating_add(self.initial_liquidity)
            .saturating_add(no_volume);
        (yes_pool / total).clamp(MIN_PRICE, MAX_PRICE)
    }
}

impl Default for SimulatedAmm {
    fn default() -> Self {
        Self {
            initial_liquidity: DEFAULT_INITIAL_LIQUIDITY,
        }
    }
}
