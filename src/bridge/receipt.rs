//! Receipt polling against the source chain RPC

use alloy::primitives::B256;
use eyre::{eyre, Result};
use reqwest::Client;
use serde::Deserialize;

/// Result of one receipt poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// No receipt yet
    Pending,
    /// Mined with success status
    Confirmed,
    /// Mined but reverted
    Failed,
}

/// Transaction receipt from RPC, reduced to the status field
#[derive(Debug, Deserialize)]
struct TransactionReceipt {
    status: Option<String>,
}

/// RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// RPC error
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i32,
    message: String,
}

/// Polls the source chain for transaction receipts
pub struct ReceiptChecker {
    rpc_url: String,
    client: Client,
}

impl ReceiptChecker {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            rpc_url: rpc_url.to_string(),
            client,
        })
    }

    /// Check the receipt for a transaction hash
    pub async fn check(&self, tx_hash: &B256) -> Result<ReceiptStatus> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_getTransactionReceipt",
            "params": [format!("0x{:x}", tx_hash)],
            "id": 1
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await?
            .json::<RpcResponse<TransactionReceipt>>()
            .await?;

        if let Some(error) = response.error {
            return Err(eyre!("RPC error: {} - {}", error.code, error.message));
        }

        let receipt = match response.result {
            Some(receipt) => receipt,
            None => return Ok(ReceiptStatus::Pending),
        };

        if receipt.status == Some("0x0".to_string()) {
            return Ok(ReceiptStatus::Failed);
        }

        Ok(ReceiptStatus::Confirmed)
    }
}
