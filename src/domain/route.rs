//! Execution routing by leverage.

use std::fmt;

use serde::Serialize;

use super::error::DomainError;

/// How an opened position is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionRoute {
    /// 1x: the collateral is bridged to Polygon and the outcome token bought.
    Spot,
    /// >1x: settled peer-to-pool against vault liquidity, tracked for liquidation.
    Synthetic,
}

impl ExecutionRoute {
    /// Pick the route for a leverage multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidLeverage`] for zero leverage.
    pub const fn for_leverage(leverage: u32) -> Result<Self, DomainError> {
        match leverage {
            0 => Err(DomainError::InvalidLeverage { leverage }),
            1 => Ok(Self::Spot),
            _ => Ok(Self::Synthetic),
        }
    }
}

impl fmt::Display for ExecutionRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spot => write!(f, "spot"),
            Self::Synthetic => write!(f, "synthetic"),
        }
    }
}
