//! Local key connector
//!
//! Signs and broadcasts with a private key from the environment. There is
//! no approval prompt, so submissions resolve as soon as the transaction
//! is accepted by the RPC.

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, B256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::contracts::{BridgeCall, BridgeContract, BRIDGE_CONTRACT_ADDRESS};

use super::{WalletBackend, WalletError};

/// Wallet backed by a locally held private key
pub struct LocalWallet {
    rpc_url: String,
    signer: PrivateKeySigner,
    /// Chain served by the configured RPC, read once at connect
    chain_id: u64,
}

impl LocalWallet {
    /// Parse the key and read the chain ID from the RPC
    pub async fn connect(rpc_url: &str, private_key: &str) -> Result<Self, WalletError> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|_| WalletError::InvalidInput("invalid private key".to_string()))?;

        let url = rpc_url
            .parse()
            .map_err(|_| WalletError::InvalidInput(format!("invalid RPC URL: {}", rpc_url)))?;
        let provider = ProviderBuilder::new().on_http(url);
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| WalletError::Rpc(format!("Failed to get chain id: {}", e)))?;

        info!(
            address = %signer.address(),
            chain_id = chain_id,
            "Local wallet ready"
        );

        Ok(Self {
            rpc_url: rpc_url.to_string(),
            signer,
            chain_id,
        })
    }
}

#[async_trait]
impl WalletBackend for LocalWallet {
    fn connector_id(&self) -> &'static str {
        "local"
    }

    async fn request_accounts(&self) -> Result<Address, WalletError> {
        Ok(self.signer.address())
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.chain_id)
    }

    /// A key has no network of its own; the chain is whatever the
    /// configured RPC serves, so only a matching request can succeed.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        if chain_id == self.chain_id {
            return Ok(());
        }
        Err(WalletError::Rpc(format!(
            "configured RPC serves chain {}, cannot switch to {}",
            self.chain_id, chain_id
        )))
    }

    async fn submit_bridge(&self, call: &BridgeCall) -> Result<B256, WalletError> {
        // Build provider with signer
        let wallet = EthereumWallet::from(self.signer.clone());
        let url = self
            .rpc_url
            .parse()
            .map_err(|_| WalletError::InvalidInput(format!("invalid RPC URL: {}", self.rpc_url)))?;
        let provider = ProviderBuilder::new().wallet(wallet).on_http(url);

        let contract = BridgeContract::new(BRIDGE_CONTRACT_ADDRESS, &provider);

        debug!(
            destination_network = call.destination_network,
            recipient = %call.recipient,
            amount = %call.amount_wei,
            "Submitting bridgeAsset"
        );

        let pending_tx = contract
            .bridgeAsset(
                call.destination_network,
                call.recipient,
                call.amount_wei,
                call.token,
                call.force_update_global_exit_root,
                call.permit_data.clone(),
            )
            .value(call.amount_wei)
            .send()
            .await
            .map_err(|e| WalletError::Rpc(format!("Failed to send transaction: {}", e)))?;

        let tx_hash = *pending_tx.tx_hash();
        info!(tx_hash = %tx_hash, "Transaction sent");

        Ok(tx_hash)
    }
}
