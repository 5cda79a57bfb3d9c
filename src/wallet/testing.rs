//! Scripted wallet backend for tests

use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::{Address, B256};
use async_trait::async_trait;

use crate::chains::SEPOLIA_CHAIN_ID;
use crate::contracts::BridgeCall;

use super::{WalletBackend, WalletError};

/// Wallet backend whose responses are scripted up front. Clones share
/// state, so a test can keep a handle while the session owns another,
/// and chain switches and submissions stay observable.
#[derive(Clone)]
pub struct MockWallet {
    inner: Arc<MockState>,
}

struct MockState {
    address: Address,
    chain_id: Mutex<u64>,
    submit_result: Mutex<Result<B256, WalletError>>,
    switch_result: Mutex<Result<(), WalletError>>,
    switch_requests: Mutex<Vec<u64>>,
    submit_calls: Mutex<u32>,
}

impl MockWallet {
    /// Wallet on Sepolia that accepts everything, returning a zero hash
    pub fn new(address: Address) -> Self {
        Self {
            inner: Arc::new(MockState {
                address,
                chain_id: Mutex::new(SEPOLIA_CHAIN_ID),
                submit_result: Mutex::new(Ok(B256::ZERO)),
                switch_result: Mutex::new(Ok(())),
                switch_requests: Mutex::new(Vec::new()),
                submit_calls: Mutex::new(0),
            }),
        }
    }

    pub fn with_chain(self, chain_id: u64) -> Self {
        *lock(&self.inner.chain_id) = chain_id;
        self
    }

    pub fn with_submit_result(self, result: Result<B256, WalletError>) -> Self {
        *lock(&self.inner.submit_result) = result;
        self
    }

    pub fn with_switch_result(self, result: Result<(), WalletError>) -> Self {
        *lock(&self.inner.switch_result) = result;
        self
    }

    /// Simulate the wallet user changing networks out of band
    pub fn set_chain(&self, chain_id: u64) {
        *lock(&self.inner.chain_id) = chain_id;
    }

    pub fn switch_requests(&self) -> Vec<u64> {
        lock(&self.inner.switch_requests).clone()
    }

    pub fn submit_calls(&self) -> u32 {
        *lock(&self.inner.submit_calls)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl WalletBackend for MockWallet {
    fn connector_id(&self) -> &'static str {
        "mock"
    }

    async fn request_accounts(&self) -> Result<Address, WalletError> {
        Ok(self.inner.address)
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(*lock(&self.inner.chain_id))
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        lock(&self.inner.switch_requests).push(chain_id);
        let result = lock(&self.inner.switch_result).clone();
        if result.is_ok() {
            *lock(&self.inner.chain_id) = chain_id;
        }
        result
    }

    async fn submit_bridge(&self, _call: &BridgeCall) -> Result<B256, WalletError> {
        *lock(&self.inner.submit_calls) += 1;
        lock(&self.inner.submit_result).clone()
    }
}
