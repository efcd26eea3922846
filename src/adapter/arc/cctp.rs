//! Circle CCTP bridge from Arc to Polygon.

use alloy_primitives::{Address, U256};
use alloy_provider::network::{EthereumWallet, ReceiptResponse};
use alloy_provider::ProviderBuilder;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::info;
use url::Url;

use super::contract::{ITokenMessenger, IERC20};
use super::units::{address_to_bytes32, to_usdc_units};
use super::{parse_address, parse_rpc_url, signer_from_key};
use crate::app::config::ChainConfig;
use crate::error::{ConfigError, ExecutionError, Result};
use crate::port::{Bridge, BridgeOutcome, BridgePurpose, BridgeRequest};

/// Burns USDC on Arc with `depositForBurn`; Circle mints it on the
/// destination domain to the agent's own address.
pub struct CctpBridge {
    rpc_url: Url,
    token_messenger: Address,
    usdc: Address,
    destination_domain: u32,
    signer: PrivateKeySigner,
}

impl CctpBridge {
    /// # Errors
    ///
    /// Requires `AGENT_PRIVATE_KEY`; fails on invalid addresses.
    pub fn from_config(config: &ChainConfig) -> Result<Self> {
        let key = config.private_key.as_deref().ok_or(ConfigError::MissingField {
            field: "AGENT_PRIVATE_KEY",
        })?;

        Ok(Self {
            rpc_url: parse_rpc_url(&config.rpc_url)?,
            token_messenger: parse_address("chain.token_messenger", &config.token_messenger)?,
            usdc: parse_address("chain.usdc_address", &config.usdc_address)?,
            destination_domain: config.destination_domain,
            signer: signer_from_key(key)?,
        })
    }

    #[must_use]
    pub fn agent_address(&self) -> Address {
        self.signer.address()
    }
}

#[async_trait]
impl Bridge for CctpBridge {
    async fn bridge(&self, request: &BridgeRequest) -> Result<BridgeOutcome> {
        let amount = to_usdc_units(request.amount)?;
        if amount.is_zero() {
            return Err(ExecutionError::BridgeFailed("amount rounds to zero".into()).into());
        }

        let owner = self.signer.address();
        let wallet = EthereumWallet::from(self.signer.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());

        match &request.purpose {
            BridgePurpose::SpotPurchase { market_id, side } => info!(
                amount = %request.amount,
                market = %market_id,
                side = %side,
                destination_domain = self.destination_domain,
                "Bridging spot collateral via CCTP"
            ),
            BridgePurpose::Hedge => info!(
                amount = %request.amount,
                destination_domain = self.destination_domain,
                "Bridging hedge via CCTP"
            ),
        }

        let usdc = IERC20::new(self.usdc, &provider);
        let allowance: U256 = usdc
            .allowance(owner, self.token_messenger)
            .call()
            .await
            .map_err(|e| ExecutionError::BridgeFailed(format!("failed to get allowance: {e}")))?;

        if allowance < amount {
            info!(spender = %self.token_messenger, "Approving USDC for TokenMessenger");
            let receipt = usdc
                .approve(self.token_messenger, amount)
                .send()
                .await
                .map_err(|e| ExecutionError::BridgeFailed(format!("failed to send approval: {e}")))?
                .get_receipt()
                .await
                .map_err(|e| ExecutionError::BridgeFailed(format!("failed to get receipt: {e}")))?;
            if !ReceiptResponse::status(&receipt) {
                return Err(ExecutionError::Reverted {
                    tx_hash: format!("{:?}", ReceiptResponse::transaction_hash(&receipt)),
                }
                .into());
            }
        }

        let messenger = ITokenMessenger::new(self.token_messenger, &provider);
        let receipt = messenger
            .depositForBurn(
                amount,
                self.destination_domain,
                address_to_bytes32(owner),
                self.usdc,
            )
            .send()
            .await
            .map_err(|e| ExecutionError::BridgeFailed(format!("failed to send depositForBurn: {e}")))?
            .get_receipt()
            .await
            .map_err(|e| ExecutionError::BridgeFailed(format!("failed to get receipt: {e}")))?;

        let tx_hash = format!("{:?}", ReceiptResponse::transaction_hash(&receipt));
        if !ReceiptResponse::status(&receipt) {
            return Err(ExecutionError::Reverted { tx_hash }.into());
        }

        let block_number = ReceiptResponse::block_number(&receipt);
        info!(
            tx_hash = %tx_hash,
            block = ?block_number,
            gas_used = ReceiptResponse::gas_used(&receipt),
            "CCTP burn confirmed, mint follows after attestation"
        );

        Ok(BridgeOutcome::Submitted {
            tx_hash,
            block_number,
        })
    }

    fn name(&self) -> &'static str {
        "cctp"
    }
}
