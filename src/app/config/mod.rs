//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. Deployment values (RPC URL,
//! contract addresses) can be overridden from the environment; the agent
//! signing key is only ever read from `AGENT_PRIVATE_KEY`.

use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

mod chain;
mod logging;
mod oracle;
mod service;

pub use chain::{
    ChainConfig, ARC_TESTNET_RPC, ARC_USDC, POLYGON_DOMAIN, SIGNAL_VAULT_TESTNET,
    TOKEN_MESSENGER_TESTNET,
};
pub use logging::LoggingConfig;
pub use oracle::{FallbackMode, OracleConfig};
pub use service::{ApiConfig, HedgeConfig, LiquidationConfig, ListenerConfig, RouterConfig};

/// Highest scale `rust_decimal` can represent.
const MAX_DECIMALS: u32 = 28;

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub listener: ListenerConfig,
    #[serde(default)]
    pub liquidation: LiquidationConfig,
    #[serde(default)]
    pub hedge: HedgeConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub api: ApiConfig,
    /// Dry-run mode: track and report, but never send transactions.
    #[serde(default)]
    pub dry_run: bool,
    /// Log a stats summary every N processed trades (0 disables).
    #[serde(default = "default_stats_every")]
    pub stats_every_trades: u64,
}

const fn default_stats_every() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            chain: ChainConfig::default(),
            oracle: OracleConfig::default(),
            listener: ListenerConfig::default(),
            liquidation: LiquidationConfig::default(),
            hedge: HedgeConfig::default(),
            router: RouterConfig::default(),
            api: ApiConfig::default(),
            dry_run: false,
            stats_every_trades: default_stats_every(),
        }
    }
}

impl Config {
    /// Load from a TOML file, apply process environment overrides and validate.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content, |key| std::env::var(key).ok())
    }

    /// Parse TOML content with overrides from `env`, then validate.
    #[allow(clippy::result_large_err)]
    pub fn from_toml(content: &str, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides, for running without a config file.
    #[allow(clippy::result_large_err)]
    pub fn from_env(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Self::from_toml("", env)
    }

    #[allow(clippy::result_large_err)]
    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = var("ARC_RPC_URL") {
            self.chain.rpc_url = url;
        }
        if let Some(address) = var("CONTRACT_ADDRESS") {
            self.chain.vault_address = address;
        }
        if let Some(address) = var("ARC_TOKEN_MESSENGER") {
            self.chain.token_messenger = address;
        }
        if let Some(address) = var("ARC_USDC_ADDRESS") {
            self.chain.usdc_address = address;
        }
        if let Some(domain) = var("POLYGON_DOMAIN_ID") {
            self.chain.destination_domain =
                domain.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    field: "POLYGON_DOMAIN_ID",
                    reason: format!("'{domain}' is not a domain id"),
                })?;
        }

        // Signing key comes from the environment only.
        self.chain.private_key = var("AGENT_PRIVATE_KEY");
        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.chain.rpc_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "chain.rpc_url" }.into());
        }
        url::Url::parse(&self.chain.rpc_url).map_err(|e| ConfigError::InvalidValue {
            field: "chain.rpc_url",
            reason: e.to_string(),
        })?;
        url::Url::parse(&self.oracle.api_url).map_err(|e| ConfigError::InvalidValue {
            field: "oracle.api_url",
            reason: e.to_string(),
        })?;

        validate_address("chain.vault_address", &self.chain.vault_address)?;
        validate_address("chain.usdc_address", &self.chain.usdc_address)?;
        validate_address("chain.token_messenger", &self.chain.token_messenger)?;

        if let Some(decimals) = self.chain.collateral_decimals {
            if decimals > MAX_DECIMALS {
                return Err(ConfigError::InvalidValue {
                    field: "chain.collateral_decimals",
                    reason: format!("must be at most {MAX_DECIMALS}"),
                }
                .into());
            }
        }

        if self.liquidation.threshold >= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "liquidation.threshold",
                reason: "must be negative".into(),
            }
            .into());
        }
        if self.liquidation.max_concurrent_settlements == 0 {
            return Err(ConfigError::InvalidValue {
                field: "liquidation.max_concurrent_settlements",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if self.liquidation.retry_base_ms > self.liquidation.retry_max_ms {
            return Err(ConfigError::InvalidValue {
                field: "liquidation.retry_base_ms",
                reason: "must not exceed retry_max_ms".into(),
            }
            .into());
        }

        for (field, interval) in [
            ("listener.poll_interval_ms", self.listener.poll_interval_ms),
            ("liquidation.check_interval_ms", self.liquidation.check_interval_ms),
            ("hedge.check_interval_ms", self.hedge.check_interval_ms),
        ] {
            if interval == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than 0".into(),
                }
                .into());
            }
        }

        if self.hedge.bridge_amount <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "hedge.bridge_amount",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.hedge.threshold < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "hedge.threshold",
                reason: "must not be negative".into(),
            }
            .into());
        }
        if self.oracle.initial_liquidity <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "oracle.initial_liquidity",
                reason: "must be positive".into(),
            }
            .into());
        }

        if self.api.enabled {
            self.api_bind()?;
        }
        Ok(())
    }

    /// Parsed API bind address.
    #[allow(clippy::result_large_err)]
    pub fn api_bind(&self) -> Result<SocketAddr> {
        self.api
            .bind
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    field: "api.bind",
                    reason: e.to_string(),
                }
                .into()
            })
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[allow(clippy::result_large_err)]
fn validate_address(field: &'static str, value: &str) -> Result<()> {
    Address::from_str(value.trim()).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_file_uses_testnet_defaults() {
        let config = Config::from_toml("", no_env).unwrap();
        assert_eq!(config.chain.rpc_url, ARC_TESTNET_RPC);
        assert_eq!(config.chain.vault_address, SIGNAL_VAULT_TESTNET);
        assert_eq!(config.chain.destination_domain, POLYGON_DOMAIN);
        assert_eq!(config.liquidation.threshold, dec!(-0.80));
        assert_eq!(config.hedge.threshold, dec!(1000));
        assert_eq!(config.api.bind, "0.0.0.0:5001");
        assert_eq!(config.stats_every_trades, 10);
        assert!(!config.chain.has_signer());
        assert!(!config.dry_run);
    }

    #[test]
    fn env_overrides_file_values() {
        let toml = r#"
            [chain]
            rpc_url = "http://localhost:8545"
        "#;
        let config = Config::from_toml(toml, |key| match key {
            "ARC_RPC_URL" => Some("http://rpc.example:8545".into()),
            "POLYGON_DOMAIN_ID" => Some("3".into()),
            "AGENT_PRIVATE_KEY" => Some("0xabc".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.chain.rpc_url, "http://rpc.example:8545");
        assert_eq!(config.chain.destination_domain, 3);
        assert!(config.chain.has_signer());
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config = Config::from_toml("", |key| match key {
            "AGENT_PRIVATE_KEY" | "ARC_RPC_URL" => Some("  ".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.chain.rpc_url, ARC_TESTNET_RPC);
        assert!(!config.chain.has_signer());
    }

    #[test]
    fn private_key_is_not_read_from_file() {
        let toml = r#"
            [chain]
            private_key = "0xdeadbeef"
        "#;
        let config = Config::from_toml(toml, no_env).unwrap();
        assert!(config.chain.private_key.is_none());
    }

    #[test]
    fn rejects_non_negative_threshold() {
        let toml = "[liquidation]\nthreshold = 0.1\n";
        let err = Config::from_toml(toml, no_env).unwrap_err();
        assert!(err.to_string().contains("liquidation.threshold"));
    }

    #[test]
    fn rejects_bad_vault_address() {
        let toml = "[chain]\nvault_address = \"not-an-address\"\n";
        let err = Config::from_toml(toml, no_env).unwrap_err();
        assert!(err.to_string().contains("chain.vault_address"));
    }

    #[test]
    fn rejects_zero_interval() {
        let toml = "[listener]\npoll_interval_ms = 0\n";
        let err = Config::from_toml(toml, no_env).unwrap_err();
        assert!(err.to_string().contains("listener.poll_interval_ms"));
    }

    #[test]
    fn rejects_bad_bind_only_when_api_enabled() {
        let toml = "[api]\nbind = \"nowhere\"\n";
        assert!(Config::from_toml(toml, no_env).is_err());

        let toml = "[api]\nenabled = false\nbind = \"nowhere\"\n";
        assert!(Config::from_toml(toml, no_env).is_ok());
    }

    #[test]
    fn rejects_bad_domain_env() {
        let err = Config::from_toml("", |key| {
            (key == "POLYGON_DOMAIN_ID").then(|| "polygon".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("POLYGON_DOMAIN_ID"));
    }

    #[test]
    fn parses_fallback_mode() {
        let toml = "[oracle]\nfallback = \"none\"\n";
        let config = Config::from_toml(toml, no_env).unwrap();
        assert_eq!(config.oracle.fallback, FallbackMode::None);
    }
}
