//! Arc network adapters: the SignalVault contract and the CCTP bridge.

mod cctp;
mod contract;
pub mod units;
mod vault;

use std::str::FromStr;

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use url::Url;

use crate::error::{ConfigError, Result};

pub use cctp::CctpBridge;
pub use vault::ArcVault;

pub(crate) fn parse_rpc_url(rpc_url: &str) -> Result<Url> {
    rpc_url.parse().map_err(|e: url::ParseError| {
        ConfigError::InvalidValue {
            field: "chain.rpc_url",
            reason: e.to_string(),
        }
        .into()
    })
}

pub(crate) fn parse_address(field: &'static str, value: &str) -> Result<Address> {
    Address::from_str(value.trim()).map_err(|e| {
        ConfigError::InvalidValue {
            field,
            reason: e.to_string(),
        }
        .into()
    })
}

/// Local signer from `AGENT_PRIVATE_KEY`.
pub(crate) fn signer_from_key(private_key: &str) -> Result<PrivateKeySigner> {
    let key = private_key.trim();
    if key.is_empty() {
        return Err(ConfigError::MissingField {
            field: "AGENT_PRIVATE_KEY",
        }
        .into());
    }
    PrivateKeySigner::from_str(key).map_err(|e| {
        ConfigError::InvalidValue {
            field: "AGENT_PRIVATE_KEY",
            reason: e.to_string(),
        }
        .into()
    })
}
