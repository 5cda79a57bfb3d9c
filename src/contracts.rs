//! Sepolia bridge contract ABI definition
//!
//! Uses alloy's sol! macro to generate type-safe bindings for the unified
//! bridge contract.

use alloy::primitives::{address, Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::chains;

/// Unified bridge contract on Sepolia
pub const BRIDGE_CONTRACT_ADDRESS: Address =
    address!("528e26b25a34a4A5d0dbDa1d57D318153d2ED582");

sol! {
    /// Unified bridge interface on the source chain
    #[sol(rpc)]
    contract BridgeContract {
        /// Bridge an asset to a destination network
        /// For the native asset, msg.value must equal `amount`
        ///
        /// # Arguments
        /// * `destinationNetwork` - Network identifier of the destination chain
        /// * `destinationAddress` - Recipient on the destination chain
        /// * `amount` - Amount to bridge (wei)
        /// * `token` - Token address, zero for the native asset
        /// * `forceUpdateGlobalExitRoot` - Update the exit root with this deposit
        /// * `permitData` - Optional permit call for token deposits
        function bridgeAsset(
            uint32 destinationNetwork,
            address destinationAddress,
            uint256 amount,
            address token,
            bool forceUpdateGlobalExitRoot,
            bytes permitData
        ) external payable;
    }
}

/// One bridge submission, fully describing the contract call
#[derive(Debug, Clone)]
pub struct BridgeCall {
    pub destination_network: u32,
    pub recipient: Address,
    pub amount_wei: U256,
    pub token: Address,
    pub force_update_global_exit_root: bool,
    pub permit_data: Bytes,
}

impl BridgeCall {
    /// Native-ETH bridge to Tatara for the connected account
    pub fn for_recipient(recipient: Address, amount_wei: U256) -> Self {
        Self {
            destination_network: chains::TATARA_CHAIN_ID as u32,
            recipient,
            amount_wei,
            token: Address::ZERO,
            force_update_global_exit_root: true,
            permit_data: Bytes::new(),
        }
    }

    /// ABI-encoded calldata for wallets that take a raw transaction
    pub fn calldata(&self) -> Vec<u8> {
        BridgeContract::bridgeAssetCall {
            destinationNetwork: self.destination_network,
            destinationAddress: self.recipient,
            amount: self.amount_wei,
            token: self.token,
            forceUpdateGlobalExitRoot: self.force_update_global_exit_root,
            permitData: self.permit_data.clone(),
        }
        .abi_encode()
    }
}
