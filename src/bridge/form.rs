//! The bridge form: amount entry, submission, receipt polling
//!
//! Drives one bridge attempt at a time. Every mutation records signals;
//! the status is always re-derived from them, so a late failure still
//! lands on the error state no matter where the attempt was.

use alloy::primitives::utils::parse_ether;
use alloy::primitives::{B256, U256};
use tracing::{debug, info, warn};

use crate::chains;
use crate::contracts::BridgeCall;
use crate::wallet::{WalletError, WalletSession};

use super::receipt::{ReceiptChecker, ReceiptStatus};
use super::status::{derive_status, BridgeStatus, StatusView, TxSignals};

/// Amount entry plus the signals of the current attempt
#[derive(Debug, Default)]
pub struct BridgeForm {
    amount_input: String,
    signals: TxSignals,
}

impl BridgeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(&self) -> &str {
        &self.amount_input
    }

    /// Set the amount. The field is locked while an attempt is running
    /// or finished, like an input disabled outside idle.
    pub fn set_amount(&mut self, input: &str) {
        if self.status() != BridgeStatus::Idle {
            debug!(status = %self.status(), "Amount change ignored outside idle");
            return;
        }
        self.amount_input = input.trim().to_string();
    }

    /// The amount scaled to wei (18 decimals)
    pub fn amount_wei(&self) -> Option<U256> {
        parse_ether(&self.amount_input).ok()
    }

    /// Eligibility and submission use the same parse, so an amount that
    /// passes here cannot fail the wei conversion later
    fn amount_is_positive(&self) -> bool {
        self.amount_wei().map_or(false, |wei| wei > U256::ZERO)
    }

    pub fn status(&self) -> BridgeStatus {
        derive_status(&self.signals)
    }

    pub fn view(&self) -> StatusView {
        self.signals.view()
    }

    /// Whether a submission can start right now: wallet connected, on
    /// Sepolia, a positive amount entered, and nothing in flight.
    /// Re-evaluated on every call, never cached.
    pub fn can_submit(&self, session: &WalletSession) -> bool {
        session.is_connected()
            && session.active_chain() == Some(chains::SEPOLIA_CHAIN_ID)
            && self.amount_is_positive()
            && self.status() == BridgeStatus::Idle
    }

    /// Start a submission attempt: clear previous signals and move to
    /// wallet confirmation. Returns false when not eligible.
    pub fn begin_submit(&mut self, session: &WalletSession) -> bool {
        if !self.can_submit(session) || session.address().is_none() {
            return false;
        }
        self.signals.clear();
        self.signals.submit_pending = true;
        true
    }

    /// Complete a started submission: scale the amount, send the call
    /// through the wallet, record the hash or the failure.
    pub async fn finish_submit(&mut self, session: &WalletSession) {
        if !self.signals.submit_pending {
            return;
        }

        let recipient = match session.address() {
            Some(address) => address,
            None => {
                self.signals.submit_pending = false;
                self.signals.submit_error = Some("Transaction failed".to_string());
                return;
            }
        };

        let amount_wei = match parse_ether(&self.amount_input) {
            Ok(wei) => wei,
            Err(e) => {
                self.signals.submit_pending = false;
                self.signals.submit_error = Some(e.to_string());
                return;
            }
        };

        let call = BridgeCall::for_recipient(recipient, amount_wei);
        match session.submit_bridge(&call).await {
            Ok(tx_hash) => {
                info!(
                    tx_hash = %tx_hash,
                    amount = %self.amount_input,
                    recipient = %recipient,
                    "Bridge transaction sent"
                );
                self.signals.submit_pending = false;
                self.signals.tx_hash = Some(tx_hash);
            }
            Err(e) => {
                warn!(error = %e, "Bridge submission failed");
                self.signals.submit_pending = false;
                self.signals.submit_error = Some(submit_error_message(&e));
            }
        }
    }

    /// Begin and complete a submission in one call
    pub async fn submit(&mut self, session: &WalletSession) -> BridgeStatus {
        if self.begin_submit(session) {
            self.finish_submit(session).await;
        }
        self.status()
    }

    /// One receipt poll step. No-op unless a hash is outstanding.
    pub async fn poll_receipt(&mut self, checker: &ReceiptChecker) -> BridgeStatus {
        if let Some(tx_hash) = self.pollable_hash() {
            let result = checker.check(&tx_hash).await;
            self.apply_receipt(result);
        }
        self.status()
    }

    fn pollable_hash(&self) -> Option<B256> {
        match self.status() {
            BridgeStatus::Submitted | BridgeStatus::Confirming => self.signals.tx_hash,
            _ => None,
        }
    }

    /// Fold one receipt observation into the signals
    pub fn apply_receipt(&mut self, result: eyre::Result<ReceiptStatus>) {
        match result {
            Ok(ReceiptStatus::Pending) => {
                self.signals.receipt_waiting = true;
            }
            Ok(ReceiptStatus::Confirmed) => {
                self.signals.receipt_confirmed = true;
            }
            Ok(ReceiptStatus::Failed) => {
                self.signals.receipt_error = Some("Transaction reverted".to_string());
            }
            Err(e) => {
                warn!(error = %e, "Receipt poll failed");
                self.signals.receipt_error = Some(e.to_string());
            }
        }
    }

    /// Clear the form back to idle. Only acts after a terminal state;
    /// from idle or mid-attempt it is a no-op.
    pub fn reset(&mut self) {
        if !self.status().is_terminal() {
            debug!(status = %self.status(), "Reset ignored");
            return;
        }
        self.amount_input.clear();
        self.signals.clear();
    }
}

/// Map a wallet submission failure onto the user-facing message. A
/// rejection, by error kind or by message text, always reads
/// "Transaction rejected by user".
fn submit_error_message(err: &WalletError) -> String {
    if matches!(err, WalletError::Rejected) {
        return "Transaction rejected by user".to_string();
    }
    let message = err.to_string();
    if message.contains("rejected") {
        "Transaction rejected by user".to_string()
    } else if message.is_empty() {
        "Transaction failed".to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::{SEPOLIA_CHAIN_ID, TATARA_CHAIN_ID};
    use crate::wallet::testing::MockWallet;
    use alloy::primitives::{address, b256, Address};

    const USER: Address = address!("1111111111111111111111111111111111111111");

    async fn connected_session(mock: MockWallet) -> WalletSession {
        let mut session = WalletSession::new();
        session.connect(Box::new(mock)).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_can_submit_requires_connection() {
        let form = {
            let mut f = BridgeForm::new();
            f.set_amount("0.5");
            f
        };
        let session = WalletSession::new();
        assert!(!form.can_submit(&session));
    }

    #[tokio::test]
    async fn test_can_submit_requires_sepolia() {
        let mut form = BridgeForm::new();
        form.set_amount("0.5");
        let session = connected_session(MockWallet::new(USER).with_chain(TATARA_CHAIN_ID)).await;
        assert!(!form.can_submit(&session));
    }

    #[tokio::test]
    async fn test_can_submit_amount_grid() {
        let session = connected_session(MockWallet::new(USER)).await;
        assert_eq!(session.active_chain(), Some(SEPOLIA_CHAIN_ID));

        for (input, expected) in [
            ("", false),
            ("0", false),
            ("0.0", false),
            ("-1", false),
            ("abc", false),
            // Accepted by float parsing but not by the wei conversion
            ("1e1", false),
            ("inf", false),
            ("NaN", false),
            ("0.5", true),
            ("1", true),
        ] {
            let mut form = BridgeForm::new();
            form.set_amount(input);
            assert_eq!(
                form.can_submit(&session),
                expected,
                "amount {:?} should give {}",
                input,
                expected
            );
        }
    }

    #[tokio::test]
    async fn test_wei_scaling() {
        let mut form = BridgeForm::new();
        form.set_amount("0.5");
        assert_eq!(
            form.amount_wei(),
            Some(U256::from(500_000_000_000_000_000u64))
        );

        form.set_amount("1");
        assert_eq!(
            form.amount_wei(),
            Some(U256::from(1_000_000_000_000_000_000u64))
        );
    }

    #[tokio::test]
    async fn test_begin_submit_enters_wallet_confirmation() {
        let session = connected_session(MockWallet::new(USER)).await;
        let mut form = BridgeForm::new();
        form.set_amount("0.5");

        assert!(form.begin_submit(&session));
        assert_eq!(form.status(), BridgeStatus::WalletConfirmation);
        // No second attempt can start while one is pending
        assert!(!form.can_submit(&session));
        assert!(!form.begin_submit(&session));
    }

    #[tokio::test]
    async fn test_submit_records_hash() {
        let hash = b256!("00000000000000000000000000000000000000000000000000000000000000ab");
        let mock = MockWallet::new(USER).with_submit_result(Ok(hash));
        let session = connected_session(mock.clone()).await;

        let mut form = BridgeForm::new();
        form.set_amount("0.5");
        let status = form.submit(&session).await;

        assert_eq!(status, BridgeStatus::Submitted);
        assert_eq!(form.view().tx_hash, Some(hash));
        assert_eq!(mock.submit_calls(), 1);
    }

    #[tokio::test]
    async fn test_rejection_message_is_exact() {
        let mock = MockWallet::new(USER).with_submit_result(Err(WalletError::Rejected));
        let session = connected_session(mock).await;

        let mut form = BridgeForm::new();
        form.set_amount("0.5");
        let status = form.submit(&session).await;

        assert_eq!(status, BridgeStatus::Error);
        assert_eq!(
            form.view().error.as_deref(),
            Some("Transaction rejected by user")
        );
        assert_eq!(form.view().tx_hash, None);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_rpc_message() {
        let mock = MockWallet::new(USER)
            .with_submit_result(Err(WalletError::Rpc("insufficient funds".to_string())));
        let session = connected_session(mock).await;

        let mut form = BridgeForm::new();
        form.set_amount("0.5");
        form.submit(&session).await;

        assert_eq!(form.view().error.as_deref(), Some("insufficient funds"));
    }

    #[tokio::test]
    async fn test_receipt_progression() {
        let session = connected_session(MockWallet::new(USER)).await;
        let mut form = BridgeForm::new();
        form.set_amount("0.5");
        form.submit(&session).await;
        assert_eq!(form.status(), BridgeStatus::Submitted);

        form.apply_receipt(Ok(ReceiptStatus::Pending));
        assert_eq!(form.status(), BridgeStatus::Confirming);

        form.apply_receipt(Ok(ReceiptStatus::Confirmed));
        assert_eq!(form.status(), BridgeStatus::Confirmed);
        assert!(form.view().tx_hash.is_some());
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_error() {
        let session = connected_session(MockWallet::new(USER)).await;
        let mut form = BridgeForm::new();
        form.set_amount("0.5");
        form.submit(&session).await;

        form.apply_receipt(Ok(ReceiptStatus::Failed));
        assert_eq!(form.status(), BridgeStatus::Error);
        assert_eq!(form.view().error.as_deref(), Some("Transaction reverted"));
    }

    #[tokio::test]
    async fn test_poll_failure_is_error() {
        let session = connected_session(MockWallet::new(USER)).await;
        let mut form = BridgeForm::new();
        form.set_amount("0.5");
        form.submit(&session).await;

        form.apply_receipt(Err(eyre::eyre!("RPC error: -32000 - no backend")));
        assert_eq!(form.status(), BridgeStatus::Error);
        assert!(form
            .view()
            .error
            .unwrap()
            .contains("no backend"));
    }

    #[tokio::test]
    async fn test_reset_semantics() {
        let session = connected_session(MockWallet::new(USER)).await;
        let mut form = BridgeForm::new();

        // No-op from idle, the typed amount stays
        form.set_amount("0.5");
        form.reset();
        assert_eq!(form.amount(), "0.5");
        assert_eq!(form.status(), BridgeStatus::Idle);

        // After confirmation, reset clears everything
        form.submit(&session).await;
        form.apply_receipt(Ok(ReceiptStatus::Confirmed));
        assert_eq!(form.status(), BridgeStatus::Confirmed);
        form.reset();
        assert_eq!(form.status(), BridgeStatus::Idle);
        assert_eq!(form.amount(), "");
        assert_eq!(form.view().tx_hash, None);

        // Mid-attempt reset is ignored
        form.set_amount("0.5");
        form.submit(&session).await;
        assert_eq!(form.status(), BridgeStatus::Submitted);
        form.reset();
        assert_eq!(form.status(), BridgeStatus::Submitted);
    }

    #[tokio::test]
    async fn test_amount_locked_outside_idle() {
        let session = connected_session(MockWallet::new(USER)).await;
        let mut form = BridgeForm::new();
        form.set_amount("0.5");
        form.submit(&session).await;

        form.set_amount("2.0");
        assert_eq!(form.amount(), "0.5");
    }

    #[tokio::test]
    async fn test_resubmit_after_reset() {
        let mock = MockWallet::new(USER).with_submit_result(Err(WalletError::Rejected));
        let session = connected_session(mock.clone()).await;

        let mut form = BridgeForm::new();
        form.set_amount("0.5");
        form.submit(&session).await;
        assert_eq!(form.status(), BridgeStatus::Error);

        // A fresh attempt needs a reset first
        assert!(!form.can_submit(&session));
        form.reset();

        form.set_amount("0.25");
        form.submit(&session).await;
        assert_eq!(mock.submit_calls(), 2);
    }

    #[test]
    fn test_submit_error_message_mapping() {
        assert_eq!(
            submit_error_message(&WalletError::Rejected),
            "Transaction rejected by user"
        );
        assert_eq!(
            submit_error_message(&WalletError::Rpc(
                "User rejected the request.".to_string()
            )),
            "Transaction rejected by user"
        );
        assert_eq!(
            submit_error_message(&WalletError::Rpc("execution reverted".to_string())),
            "execution reverted"
        );
        assert_eq!(
            submit_error_message(&WalletError::Rpc(String::new())),
            "Transaction failed"
        );
    }
}
