//! Chain descriptors for the bridge route
//!
//! The source chain is Ethereum Sepolia; the destination is the Tatara
//! testnet. Only the source chain is ever dialed directly, but both
//! descriptors are kept so the UI can name chains and decimals stay
//! explicit.

use alloy::primitives::B256;

/// Sepolia native chain ID
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Tatara testnet native chain ID, also used as the bridge destination
/// network identifier
pub const TATARA_CHAIN_ID: u64 = 129_399;

/// Static description of a chain the client knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainDescriptor {
    pub name: &'static str,
    pub chain_id: u64,
    pub rpc_url: &'static str,
    pub explorer_url: &'static str,
    pub currency_symbol: &'static str,
    pub currency_decimals: u8,
    pub testnet: bool,
}

impl ChainDescriptor {
    /// Explorer link for a transaction hash
    pub fn explorer_tx_url(&self, tx_hash: &B256) -> String {
        format!("{}/tx/0x{:x}", self.explorer_url, tx_hash)
    }
}

/// The required source chain
pub const SEPOLIA: ChainDescriptor = ChainDescriptor {
    name: "Sepolia",
    chain_id: SEPOLIA_CHAIN_ID,
    rpc_url: "https://rpc.sepolia.org",
    explorer_url: "https://sepolia.etherscan.io",
    currency_symbol: "ETH",
    currency_decimals: 18,
    testnet: true,
};

/// The bridge destination chain
pub const TATARA: ChainDescriptor = ChainDescriptor {
    name: "Tatara Testnet",
    chain_id: TATARA_CHAIN_ID,
    rpc_url: "https://rpc.tatara.katanarpc.com",
    explorer_url: "https://explorer.tatara.katana.network",
    currency_symbol: "ETH",
    currency_decimals: 18,
    testnet: true,
};

/// Display name for a chain ID
pub fn chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        SEPOLIA_CHAIN_ID => SEPOLIA.name,
        TATARA_CHAIN_ID => TATARA.name,
        _ => "Unknown",
    }
}
