//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! - [`PriceOracle`] - market prices for PnL checks
//! - [`PositionEventSource`], [`SettlementGateway`], [`VaultReader`] - vault contract
//! - [`Bridge`] - USDC transfers to Polygon

pub mod bridge;
pub mod chain;
pub mod oracle;

pub use bridge::{Bridge, BridgeOutcome, BridgePurpose, BridgeRequest};
pub use chain::{
    PositionEventSource, PositionOpened, SettlementGateway, SettlementReceipt, VaultReader,
};
pub use oracle::{OracleStats, PriceOracle};
