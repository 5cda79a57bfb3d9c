//! Wallet session layer
//!
//! `WalletBackend` is the seam between the bridge flow and a concrete
//! wallet: a locally held key or a remote wallet agent speaking EIP-1193
//! method names. `WalletSession` tracks the connected backend together
//! with its account and active chain.

mod local;
mod remote;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use local::LocalWallet;
pub use remote::RemoteWallet;

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::contracts::BridgeCall;

/// Wallet-facing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// The user declined the request in their wallet
    #[error("User rejected the request")]
    Rejected,
    /// No wallet session is active
    #[error("no wallet connected")]
    NotConnected,
    /// The requested connector is not configured
    #[error("connector unavailable: {0}")]
    ConnectorUnavailable(String),
    /// A value could not be parsed or encoded
    #[error("{0}")]
    InvalidInput(String),
    /// The wallet or its RPC reported a failure
    #[error("{0}")]
    Rpc(String),
}

/// A concrete wallet implementation
#[async_trait]
pub trait WalletBackend: Send + Sync {
    /// Connector identifier, e.g. "local" or "walletconnect"
    fn connector_id(&self) -> &'static str;

    /// Request the wallet's account
    async fn request_accounts(&self) -> Result<Address, WalletError>;

    /// The wallet's active chain ID
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Ask the wallet to switch its active chain
    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

    /// Send the bridge contract call. Resolves once the wallet has
    /// approved and broadcast the transaction.
    async fn submit_bridge(&self, call: &BridgeCall) -> Result<B256, WalletError>;
}

/// Wallet connectors the client can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    /// Signs with a private key from the environment
    Local,
    /// Remote wallet agent reached over HTTP JSON-RPC
    WalletConnect,
}

impl ConnectorKind {
    pub fn id(&self) -> &'static str {
        match self {
            ConnectorKind::Local => "local",
            ConnectorKind::WalletConnect => "walletconnect",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "local" => Some(ConnectorKind::Local),
            "walletconnect" => Some(ConnectorKind::WalletConnect),
            _ => None,
        }
    }
}

/// Connectors usable with the given configuration. The walletconnect
/// connector is offered only when both a non-empty project ID and an
/// agent URL are configured.
pub fn available_connectors(config: &Config) -> Vec<ConnectorKind> {
    let mut connectors = Vec::new();
    if config.private_key.is_some() {
        connectors.push(ConnectorKind::Local);
    }
    if config.walletconnect_project_id.is_some() && config.wallet_bridge_url.is_some() {
        connectors.push(ConnectorKind::WalletConnect);
    }
    connectors
}

/// Build a backend for a connector
pub async fn connect_backend(
    kind: ConnectorKind,
    config: &Config,
) -> Result<Box<dyn WalletBackend>, WalletError> {
    match kind {
        ConnectorKind::Local => {
            let key = config.private_key.as_deref().ok_or_else(|| {
                WalletError::ConnectorUnavailable("BRIDGE_PRIVATE_KEY is not set".to_string())
            })?;
            Ok(Box::new(
                LocalWallet::connect(&config.sepolia_rpc_url, key).await?,
            ))
        }
        ConnectorKind::WalletConnect => {
            let project_id = config.walletconnect_project_id.as_deref().ok_or_else(|| {
                WalletError::ConnectorUnavailable(
                    "WALLETCONNECT_PROJECT_ID is not set".to_string(),
                )
            })?;
            let url = config.wallet_bridge_url.as_deref().ok_or_else(|| {
                WalletError::ConnectorUnavailable("WALLET_BRIDGE_URL is not set".to_string())
            })?;
            Ok(Box::new(RemoteWallet::new(url, project_id)?))
        }
    }
}

/// The active wallet session, if any
#[derive(Default)]
pub struct WalletSession {
    backend: Option<Box<dyn WalletBackend>>,
    address: Option<Address>,
    chain_id: Option<u64>,
}

impl WalletSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a backend, replacing any existing session. Fetches the
    /// account and the active chain up front.
    pub async fn connect(&mut self, backend: Box<dyn WalletBackend>) -> Result<(), WalletError> {
        let address = backend.request_accounts().await?;
        let chain_id = backend.chain_id().await?;

        info!(
            connector = backend.connector_id(),
            address = %address,
            chain_id = chain_id,
            "Wallet connected"
        );

        self.backend = Some(backend);
        self.address = Some(address);
        self.chain_id = Some(chain_id);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(backend) = self.backend.take() {
            info!(connector = backend.connector_id(), "Wallet disconnected");
        }
        self.address = None;
        self.chain_id = None;
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    pub fn connector_id(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|b| b.connector_id())
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    /// Last observed chain ID
    pub fn active_chain(&self) -> Option<u64> {
        self.chain_id
    }

    /// Re-read the wallet's chain ID. Returns None when disconnected.
    pub async fn refresh_chain(&mut self) -> Result<Option<u64>, WalletError> {
        match &self.backend {
            Some(backend) => {
                let chain_id = backend.chain_id().await?;
                self.chain_id = Some(chain_id);
                Ok(Some(chain_id))
            }
            None => Ok(None),
        }
    }

    /// Request a chain switch and record the new chain on success
    pub async fn switch_chain(&mut self, chain_id: u64) -> Result<(), WalletError> {
        let backend = self.backend.as_ref().ok_or(WalletError::NotConnected)?;
        backend.switch_chain(chain_id).await?;
        self.chain_id = Some(chain_id);
        Ok(())
    }

    /// Send a bridge call through the connected wallet
    pub async fn submit_bridge(&self, call: &BridgeCall) -> Result<B256, WalletError> {
        let backend = self.backend.as_ref().ok_or(WalletError::NotConnected)?;
        backend.submit_bridge(call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_ids_round_trip() {
        assert_eq!(ConnectorKind::Local.id(), "local");
        assert_eq!(ConnectorKind::WalletConnect.id(), "walletconnect");
        assert_eq!(ConnectorKind::from_id("local"), Some(ConnectorKind::Local));
        assert_eq!(
            ConnectorKind::from_id("walletconnect"),
            Some(ConnectorKind::WalletConnect)
        );
        assert_eq!(ConnectorKind::from_id("ledger"), None);
    }

    #[test]
    fn test_available_connectors_gating() {
        let mut config = Config {
            sepolia_rpc_url: "http://localhost:8545".to_string(),
            private_key: None,
            walletconnect_project_id: None,
            wallet_bridge_url: None,
            receipt_poll_interval_ms: 1000,
        };
        assert!(available_connectors(&config).is_empty());

        config.private_key = Some(
            "0x0000000000000000000000000000000000000000000000000000000000000001".to_string(),
        );
        assert_eq!(available_connectors(&config), vec![ConnectorKind::Local]);

        // Project ID alone is not enough, the agent URL is required too
        config.walletconnect_project_id = Some("abc123".to_string());
        assert_eq!(available_connectors(&config), vec![ConnectorKind::Local]);

        config.wallet_bridge_url = Some("http://localhost:9545".to_string());
        assert_eq!(
            available_connectors(&config),
            vec![ConnectorKind::Local, ConnectorKind::WalletConnect]
        );
    }

    #[test]
    fn test_session_starts_disconnected() {
        let session = WalletSession::new();
        assert!(!session.is_connected());
        assert_eq!(session.address(), None);
        assert_eq!(session.active_chain(), None);
        assert_eq!(session.connector_id(), None);
    }
}
