//! SignalVault contract adapter.

use alloy_primitives::{Address, U256};
use alloy_provider::network::{EthereumWallet, ReceiptResponse};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use url::Url;

use super::contract::{SignalVault, IERC20};
use super::units::{collateral_from_units, from_units, from_usdc_units};
use super::{parse_address, parse_rpc_url, signer_from_key};
use crate::app::config::ChainConfig;
use crate::domain::{MarketId, PositionId};
use crate::error::{Error, ExecutionError, Result};
use crate::port::{
    PositionEventSource, PositionOpened, SettlementGateway, SettlementReceipt, VaultReader,
};

/// Reads events from, settles on, and reads the balance of the vault.
pub struct ArcVault {
    rpc_url: Url,
    vault: Address,
    usdc: Address,
    signer: Option<PrivateKeySigner>,
    collateral_decimals: Option<u32>,
}

impl ArcVault {
    /// Build from chain configuration. A signer is only created when a key
    /// is configured; without one, settlement fails with `NoSigner`.
    pub fn from_config(config: &ChainConfig) -> Result<Self> {
        let signer = match config.private_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Some(signer_from_key(key)?),
            _ => None,
        };

        Ok(Self {
            rpc_url: parse_rpc_url(&config.rpc_url)?,
            vault: parse_address("chain.vault_address", &config.vault_address)?,
            usdc: parse_address("chain.usdc_address", &config.usdc_address)?,
            signer,
            collateral_decimals: config.collateral_decimals,
        })
    }

    #[must_use]
    pub const fn address(&self) -> Address {
        self.vault
    }

    /// Address of the agent signer, if configured.
    #[must_use]
    pub fn agent_address(&self) -> Option<Address> {
        self.signer.as_ref().map(PrivateKeySigner::address)
    }

    fn decode(
        &self,
        event: &SignalVault::PositionOpened,
        block_number: Option<u64>,
        tx_hash: Option<String>,
    ) -> Result<PositionOpened> {
        let position_id: u64 = event
            .positionId
            .try_into()
            .map_err(|_| Error::Chain(format!("position id {} out of range", event.positionId)))?;
        let leverage: u32 = event
            .leverage
            .try_into()
            .map_err(|_| Error::Chain(format!("leverage {} out of range", event.leverage)))?;

        Ok(PositionOpened {
            position_id: PositionId::new(position_id),
            market_id: MarketId::new(event.marketId.clone()),
            is_long_yes: event.isLongYes,
            entry_price: from_units(event.entryPrice, 0)?,
            collateral: collateral_from_units(event.collateral, self.collateral_decimals)?,
            leverage,
            trader: Some(format!("{}", event.trader)),
            block_number: block_number.unwrap_or_default(),
            tx_hash,
        })
    }
}

#[async_trait]
impl PositionEventSource for ArcVault {
    async fn latest_block(&self) -> Result<u64> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        provider
            .get_block_number()
            .await
            .map_err(|e| Error::Chain(format!("failed to get block number: {e}")))
    }

    async fn position_opened(&self, from_block: u64, to_block: u64) -> Result<Vec<PositionOpened>> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let vault = SignalVault::new(self.vault, &provider);

        let logs = vault
            .PositionOpened_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await
            .map_err(|e| Error::Chain(format!("failed to query PositionOpened logs: {e}")))?;

        debug!(from_block, to_block, count = logs.len(), "Queried vault events");

        let mut events = Vec::with_capacity(logs.len());
        for (event, log) in &logs {
            let tx_hash = log.transaction_hash.map(|hash| format!("{hash:?}"));
            match self.decode(event, log.block_number, tx_hash) {
                Ok(decoded) => events.push(decoded),
                Err(e) => warn!(error = %e, position_id = %event.positionId, "Skipping undecodable event"),
            }
        }
        Ok(events)
    }
}

#[async_trait]
impl SettlementGateway for ArcVault {
    async fn settle_position(&self, position_id: PositionId) -> Result<SettlementReceipt> {
        let signer = self
            .signer
            .clone()
            .ok_or(ExecutionError::NoSigner("settlement requires AGENT_PRIVATE_KEY"))?;

        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());
        let vault = SignalVault::new(self.vault, &provider);

        info!(position_id = %position_id, "Sending settlePosition");

        let pending = vault
            .settlePosition(U256::from(position_id.value()))
            .send()
            .await
            .map_err(|e| ExecutionError::SettlementFailed {
                position_id,
                reason: e.to_string(),
            })?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ExecutionError::SettlementFailed {
                position_id,
                reason: format!("failed to get receipt: {e}"),
            })?;

        let tx_hash = format!("{:?}", ReceiptResponse::transaction_hash(&receipt));
        if !ReceiptResponse::status(&receipt) {
            return Err(ExecutionError::Reverted { tx_hash }.into());
        }

        Ok(SettlementReceipt {
            tx_hash,
            block_number: ReceiptResponse::block_number(&receipt),
            gas_used: Some(ReceiptResponse::gas_used(&receipt)),
        })
    }
}

#[async_trait]
impl VaultReader for ArcVault {
    async fn vault_balance(&self) -> Result<Decimal> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let usdc = IERC20::new(self.usdc, &provider);
        let balance: U256 = usdc
            .balanceOf(self.vault)
            .call()
            .await
            .map_err(|e| Error::Chain(format!("failed to get vault balance: {e}")))?;
        from_usdc_units(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn vault(collateral_decimals: Option<u32>) -> ArcVault {
        ArcVault::from_config(&ChainConfig {
            collateral_decimals,
            ..ChainConfig::default()
        })
        .unwrap()
    }

    fn event(collateral: U256, leverage: u64) -> SignalVault::PositionOpened {
        SignalVault::PositionOpened {
            positionId: U256::from(7u64),
            marketId: "bitcoin-100k".into(),
            isLongYes: false,
            entryPrice: U256::from(40u64),
            collateral,
            leverage: U256::from(leverage),
            trader: Address::ZERO,
        }
    }

    #[test]
    fn decodes_six_decimal_collateral() {
        let decoded = vault(None)
            .decode(&event(U256::from(100_000_000u64), 5), Some(12), None)
            .unwrap();
        assert_eq!(decoded.position_id, PositionId::new(7));
        assert_eq!(decoded.market_id, MarketId::new("bitcoin-100k"));
        assert!(!decoded.is_long_yes);
        assert_eq!(decoded.entry_price, dec!(40));
        assert_eq!(decoded.collateral, dec!(100));
        assert_eq!(decoded.leverage, 5);
        assert_eq!(decoded.block_number, 12);
    }

    #[test]
    fn configured_decimals_apply() {
        let collateral = U256::from(3u64) * U256::from(10u64).pow(U256::from(18u64));
        let decoded = vault(Some(18)).decode(&event(collateral, 2), None, None).unwrap();
        assert_eq!(decoded.collateral, dec!(3));
    }

    #[test]
    fn oversized_leverage_is_an_error() {
        let result = vault(None).decode(&event(U256::from(1u64), u64::MAX), None, None);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn settlement_without_key_fails() {
        let err = vault(None).settle_position(PositionId::new(1)).await.unwrap_err();
        assert!(matches!(err, Error::Execution(ExecutionError::NoSigner(_))));
    }
}
