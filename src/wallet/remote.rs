//! Remote wallet agent connector
//!
//! Speaks JSON-RPC over HTTP to a wallet agent using the standard
//! EIP-1193 method names. Requests that need user approval
//! (eth_sendTransaction, wallet_switchEthereumChain) block until the
//! agent's user responds; a rejection comes back as error code 4001.

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::contracts::{BridgeCall, BRIDGE_CONTRACT_ADDRESS};

use super::{WalletBackend, WalletError};

/// EIP-1193 error code for a user rejection
const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Wallet reached through a walletconnect-style agent endpoint
pub struct RemoteWallet {
    client: Client,
    /// Agent endpoint with the project ID attached
    url: String,
}

impl RemoteWallet {
    pub fn new(endpoint: &str, project_id: &str) -> Result<Self, WalletError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| WalletError::Rpc(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!("{}?projectId={}", endpoint.trim_end_matches('/'), project_id),
        })
    }

    async fn rpc_request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>, WalletError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        debug!(method = method, "Wallet agent request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WalletError::Rpc(format!("wallet agent unreachable: {}", e)))?
            .json::<RpcResponse<T>>()
            .await
            .map_err(|e| WalletError::Rpc(format!("malformed wallet response: {}", e)))?;

        if let Some(error) = response.error {
            if error.code == USER_REJECTED_CODE {
                return Err(WalletError::Rejected);
            }
            return Err(WalletError::Rpc(format!(
                "RPC error: {} - {}",
                error.code, error.message
            )));
        }

        Ok(response.result)
    }
}

#[async_trait]
impl WalletBackend for RemoteWallet {
    fn connector_id(&self) -> &'static str {
        "walletconnect"
    }

    async fn request_accounts(&self) -> Result<Address, WalletError> {
        let accounts: Vec<String> = self
            .rpc_request("eth_requestAccounts", serde_json::json!([]))
            .await?
            .ok_or_else(|| WalletError::Rpc("wallet returned no accounts".to_string()))?;

        let first = accounts
            .first()
            .ok_or_else(|| WalletError::Rpc("wallet returned no accounts".to_string()))?;
        first
            .parse::<Address>()
            .map_err(|_| WalletError::Rpc(format!("invalid account address: {}", first)))
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        let hex: String = self
            .rpc_request("eth_chainId", serde_json::json!([]))
            .await?
            .ok_or_else(|| WalletError::Rpc("wallet returned no chain id".to_string()))?;

        u64::from_str_radix(hex.trim_start_matches("0x"), 16)
            .map_err(|_| WalletError::Rpc(format!("invalid chain id: {}", hex)))
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        // Result is null on success
        self.rpc_request::<serde_json::Value>(
            "wallet_switchEthereumChain",
            serde_json::json!([{ "chainId": format!("0x{:x}", chain_id) }]),
        )
        .await?;
        Ok(())
    }

    async fn submit_bridge(&self, call: &BridgeCall) -> Result<B256, WalletError> {
        let from = self.request_accounts().await?;
        let params = serde_json::json!([{
            "from": format!("0x{:x}", from),
            "to": format!("0x{:x}", BRIDGE_CONTRACT_ADDRESS),
            "value": format!("0x{:x}", call.amount_wei),
            "data": format!("0x{}", hex::encode(call.calldata())),
        }]);

        let tx_hash: String = self
            .rpc_request("eth_sendTransaction", params)
            .await?
            .ok_or_else(|| WalletError::Rpc("wallet returned no transaction hash".to_string()))?;

        tx_hash
            .parse::<B256>()
            .map_err(|_| WalletError::Rpc(format!("invalid transaction hash: {}", tx_hash)))
    }
}
