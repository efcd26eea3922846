//! Price oracle configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::amm::DEFAULT_INITIAL_LIQUIDITY;

/// What to price with when the live oracle fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// Simulated AMM over locally tracked volume.
    #[default]
    Amm,
    /// Propagate the error; the position is skipped this round.
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// Polymarket CLOB base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// x402 data-access fee per request, in USDC.
    #[serde(default = "default_x402_fee")]
    pub x402_fee: Decimal,
    #[serde(default)]
    pub fallback: FallbackMode,
    /// Virtual per-side liquidity of the fallback AMM.
    #[serde(default = "default_initial_liquidity")]
    pub initial_liquidity: Decimal,
    /// Market quoted once at startup to check the oracle.
    #[serde(default)]
    pub probe_market: Option<String>,
}

fn default_api_url() -> String {
    "https://clob.polymarket.com".into()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

const fn default_retry_max_attempts() -> u32 {
    3
}

const fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_x402_fee() -> Decimal {
    Decimal::new(1, 3) // 0.001 USDC
}

const fn default_initial_liquidity() -> Decimal {
    DEFAULT_INITIAL_LIQUIDITY
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            x402_fee: default_x402_fee(),
            fallback: FallbackMode::default(),
            initial_liquidity: default_initial_liquidity(),
            probe_market: None,
        }
    }
}
