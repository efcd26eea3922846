//! Exchange-agnostic domain logic.

pub mod amm;
pub mod error;
pub mod exposure;
pub mod ids;
pub mod money;
pub mod pnl;
pub mod position;
pub mod quote;
pub mod route;
pub mod side;

pub use amm::SimulatedAmm;
pub use error::DomainError;
pub use exposure::VaultExposure;
pub use ids::{MarketId, PositionId};
pub use money::{Collateral, Price};
pub use pnl::{HealthLevel, LiquidationPolicy, PnlSnapshot};
pub use position::{Position, PositionBook};
pub use quote::{MarketQuote, QuoteSource};
pub use route::ExecutionRoute;
pub use side::Side;
