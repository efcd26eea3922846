//! Arc network and contract addresses.

use std::path::PathBuf;

use serde::Deserialize;

/// Public Arc testnet RPC endpoint.
pub const ARC_TESTNET_RPC: &str = "https://rpc-testnet.arc.network";

/// SignalVault deployment on Arc testnet.
pub const SIGNAL_VAULT_TESTNET: &str = "0x8e1cD697805aA9022B266c513840345f215bEA83";

/// Circle CCTP TokenMessenger on Arc testnet.
pub const TOKEN_MESSENGER_TESTNET: &str = "0x8FE6B999Dc680CcFDD5Bf7EB0974218be2542DAA";

/// USDC system contract on Arc.
pub const ARC_USDC: &str = "0x3600000000000000000000000000000000000000";

/// CCTP domain id of Polygon PoS.
pub const POLYGON_DOMAIN: u32 = 7;

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_vault_address")]
    pub vault_address: String,
    #[serde(default = "default_usdc_address")]
    pub usdc_address: String,
    #[serde(default = "default_token_messenger")]
    pub token_messenger: String,
    /// CCTP destination domain for bridged USDC.
    #[serde(default = "default_destination_domain")]
    pub destination_domain: u32,
    /// Decimals of the `collateral` event field. Unset means: values above
    /// 10^10 are 18-decimal, everything else 6-decimal.
    #[serde(default)]
    pub collateral_decimals: Option<u32>,
    /// File persisting the last processed block.
    #[serde(default)]
    pub checkpoint_file: Option<PathBuf>,
    /// Loaded from `AGENT_PRIVATE_KEY` at runtime, never from the config file.
    #[serde(skip)]
    pub private_key: Option<String>,
}

fn default_rpc_url() -> String {
    ARC_TESTNET_RPC.into()
}

fn default_vault_address() -> String {
    SIGNAL_VAULT_TESTNET.into()
}

fn default_usdc_address() -> String {
    ARC_USDC.into()
}

fn default_token_messenger() -> String {
    TOKEN_MESSENGER_TESTNET.into()
}

const fn default_destination_domain() -> u32 {
    POLYGON_DOMAIN
}

impl ChainConfig {
    #[must_use]
    pub fn has_signer(&self) -> bool {
        self.private_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            vault_address: default_vault_address(),
            usdc_address: default_usdc_address(),
            token_messenger: default_token_messenger(),
            destination_domain: default_destination_domain(),
            collateral_decimals: None,
            checkpoint_file: None,
            private_key: None,
        }
    }
}
