//! Client configuration
//!
//! Loaded from the environment with an optional `.env` file. Only the
//! source RPC has a default; the connectors are enabled by whichever of
//! their variables are present.

use std::env;
use std::fmt;

use eyre::{eyre, Result};

/// Bridge client configuration
#[derive(Clone)]
pub struct Config {
    /// Source chain (Sepolia) RPC URL
    pub sepolia_rpc_url: String,
    /// Private key enabling the local connector
    pub private_key: Option<String>,
    /// Project ID for the walletconnect connector; an empty string in the
    /// environment is treated as unset
    pub walletconnect_project_id: Option<String>,
    /// Wallet agent endpoint for the walletconnect connector
    pub wallet_bridge_url: Option<String>,
    /// Receipt poll interval in milliseconds
    pub receipt_poll_interval_ms: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("sepolia_rpc_url", &self.sepolia_rpc_url)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("walletconnect_project_id", &self.walletconnect_project_id)
            .field("wallet_bridge_url", &self.wallet_bridge_url)
            .field("receipt_poll_interval_ms", &self.receipt_poll_interval_ms)
            .finish()
    }
}

fn default_sepolia_rpc_url() -> String {
    "https://rpc.sepolia.org".to_string()
}

fn default_poll_interval() -> u64 {
    1000
}

impl Config {
    /// Load configuration from environment variables
    /// Loads .env file if present, then reads from environment
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded .env from {:?}", path);
        }

        let config = Self {
            sepolia_rpc_url: env::var("SEPOLIA_RPC_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(default_sepolia_rpc_url),

            private_key: env::var("BRIDGE_PRIVATE_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            // An empty project ID disables the connector but is not an error
            walletconnect_project_id: env::var("WALLETCONNECT_PROJECT_ID")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            wallet_bridge_url: env::var("WALLET_BRIDGE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            receipt_poll_interval_ms: env::var("RECEIPT_POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_poll_interval),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check field shapes before anything dials out
    pub fn validate(&self) -> Result<()> {
        if !self.sepolia_rpc_url.starts_with("http://")
            && !self.sepolia_rpc_url.starts_with("https://")
        {
            return Err(eyre!(
                "SEPOLIA_RPC_URL must be an http(s) URL, got {}",
                self.sepolia_rpc_url
            ));
        }

        if let Some(key) = &self.private_key {
            if !key.starts_with("0x") || key.len() != 66 {
                return Err(eyre!(
                    "BRIDGE_PRIVATE_KEY must be a 0x-prefixed 32-byte hex string"
                ));
            }
            if key[2..].chars().any(|c| !c.is_ascii_hexdigit()) {
                return Err(eyre!("BRIDGE_PRIVATE_KEY contains non-hex characters"));
            }
        }

        if let Some(url) = &self.wallet_bridge_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(eyre!(
                    "WALLET_BRIDGE_URL must be an http(s) URL, got {}",
                    url
                ));
            }
        }

        if self.receipt_poll_interval_ms == 0 {
            return Err(eyre!("RECEIPT_POLL_INTERVAL_MS must be greater than zero"));
        }

        Ok(())
    }
}
