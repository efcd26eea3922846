//! Vault exposure across outcome sides.

use rust_decimal::Decimal;
use serde::Serialize;

use super::money::Collateral;
use super::position::Position;
use super::route::ExecutionRoute;
use super::side::Side;

/// The vault's net directional risk from synthetic positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VaultExposure {
    pub vault_balance: Collateral,
    /// Leveraged notional of YES positions.
    pub yes_exposure: Collateral,
    /// Leveraged notional of NO positions.
    pub no_exposure: Collateral,
}

impl VaultExposure {
    /// Sum synthetic notional per side, saturating at [`Decimal::MAX`].
    /// Spot positions are fully bridged and carry no vault risk.
    pub fn from_positions<'a>(
        positions: impl IntoIterator<Item = &'a Position>,
        vault_balance: Collateral,
    ) -> Self {
        let mut exposure = Self {
            vault_balance,
            ..Self::default()
        };
        for position in positions {
            if position.route() != ExecutionRoute::Synthetic {
                continue;
            }
            let side_exposure = match position.side() {
                Side::Yes => &mut exposure.yes_exposure,
                Side::No => &mut exposure.no_exposure,
            };
            *side_exposure = side_exposure.saturating_add(position.notional());
        }
        exposure
    }

    #[must_use]
    pub fn imbalance(&self) -> Collateral {
        (self.yes_exposure - self.no_exposure).abs()
    }

    /// True when the imbalance, less what is already hedged, exceeds `threshold`.
    #[must_use]
    pub fn needs_hedge(&self, threshold: Collateral, cover: Collateral) -> bool {
        self.imbalance().saturating_sub(cover) > threshold
    }

    #[must_use]
    pub fn dominant_side(&self) -> Option<Side> {
        match self.yes_exposure.cmp(&self.no_exposure) {
            std::cmp::Ordering::Greater => Some(Side::Yes),
            std::cmp::Ordering::Less => Some(Side::No),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.imbalance() == Decimal::ZERO
    }
}
