//! Configuration for the keeper's loops and the webhook API.

use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::pnl::DEFAULT_LIQUIDATION_THRESHOLD;

const fn default_true() -> bool {
    true
}

/// Chain event polling.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Blocks re-scanned behind the last processed block to catch late logs.
    #[serde(default = "default_lookback_blocks")]
    pub lookback_blocks: u64,
}

const fn default_poll_interval_ms() -> u64 {
    2_000
}

const fn default_lookback_blocks() -> u64 {
    10
}

impl ListenerConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: default_poll_interval_ms(),
            lookback_blocks: default_lookback_blocks(),
        }
    }
}

/// Liquidation monitor.
#[derive(Debug, Clone, Deserialize)]
pub struct LiquidationConfig {
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,
    /// PnL ratio at which positions are settled (-0.80 = -80%).
    #[serde(default = "default_threshold")]
    pub threshold: Decimal,
    #[serde(default = "default_max_concurrent_settlements")]
    pub max_concurrent_settlements: usize,
    /// First retry delay after a failed settlement; doubles per failure.
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
    #[serde(default = "default_retry_max_ms")]
    pub retry_max_ms: u64,
}

const fn default_check_interval_ms() -> u64 {
    10_000
}

const fn default_threshold() -> Decimal {
    DEFAULT_LIQUIDATION_THRESHOLD
}

const fn default_max_concurrent_settlements() -> usize {
    4
}

const fn default_retry_base_ms() -> u64 {
    5_000
}

const fn default_retry_max_ms() -> u64 {
    300_000
}

impl LiquidationConfig {
    #[must_use]
    pub const fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}

impl Default for LiquidationConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: default_check_interval_ms(),
            threshold: default_threshold(),
            max_concurrent_settlements: default_max_concurrent_settlements(),
            retry_base_ms: default_retry_base_ms(),
            retry_max_ms: default_retry_max_ms(),
        }
    }
}

/// Vault hedging.
#[derive(Debug, Clone, Deserialize)]
pub struct HedgeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_hedge_interval_ms")]
    pub check_interval_ms: u64,
    /// Imbalance (USDC) above which a hedge is bridged.
    #[serde(default = "default_hedge_threshold")]
    pub threshold: Decimal,
    /// USDC bridged per hedge.
    #[serde(default = "default_hedge_threshold")]
    pub bridge_amount: Decimal,
}

const fn default_hedge_interval_ms() -> u64 {
    30_000
}

fn default_hedge_threshold() -> Decimal {
    Decimal::ONE_THOUSAND
}

impl HedgeConfig {
    #[must_use]
    pub const fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}

impl Default for HedgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_interval_ms: default_hedge_interval_ms(),
            threshold: default_hedge_threshold(),
            bridge_amount: default_hedge_threshold(),
        }
    }
}

/// Spot/synthetic routing.
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    /// Bridge collateral for 1x positions. Disable when the client bridges.
    #[serde(default = "default_true")]
    pub bridge_spot: bool,
    /// Where the latest bridge transaction is published for the front-end.
    #[serde(default)]
    pub latest_bridge_tx_file: Option<PathBuf>,
    /// Delay of the simulated bridge used without a signing key.
    #[serde(default = "default_simulated_bridge_delay_ms")]
    pub simulated_bridge_delay_ms: u64,
}

const fn default_simulated_bridge_delay_ms() -> u64 {
    1_000
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            bridge_spot: true,
            latest_bridge_tx_file: None,
            simulated_bridge_delay_ms: default_simulated_bridge_delay_ms(),
        }
    }
}

/// Webhook API server.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:5001".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: default_bind(),
        }
    }
}
