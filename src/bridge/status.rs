//! Transaction status state machine
//!
//! Status is never assigned at call sites. Each step of a bridge attempt
//! records what it observed into `TxSignals`, and `derive_status` maps the
//! signals onto a single status, with failures taking precedence over
//! progress. Any combination of signals derives to exactly one status.

use std::fmt;

use alloy::primitives::B256;

/// Lifecycle of one bridge attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeStatus {
    /// Nothing in flight
    Idle,
    /// Waiting for the wallet user to approve
    WalletConfirmation,
    /// Broadcast, no receipt activity yet
    Submitted,
    /// Actively waiting for the receipt
    Confirming,
    /// Receipt observed with success status
    Confirmed,
    /// Submission or confirmation failed
    Error,
}

impl BridgeStatus {
    /// Get the status as a kebab-case string
    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeStatus::Idle => "idle",
            BridgeStatus::WalletConfirmation => "wallet-confirmation",
            BridgeStatus::Submitted => "transaction-submitted",
            BridgeStatus::Confirming => "confirming",
            BridgeStatus::Confirmed => "confirmed",
            BridgeStatus::Error => "error",
        }
    }

    /// Confirmed or error; only reset leaves these states
    pub fn is_terminal(&self) -> bool {
        matches!(self, BridgeStatus::Confirmed | BridgeStatus::Error)
    }

    /// An attempt is running and a new one cannot start
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            BridgeStatus::WalletConfirmation | BridgeStatus::Submitted | BridgeStatus::Confirming
        )
    }
}

impl fmt::Display for BridgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Latest observations for the current bridge attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxSignals {
    /// A submission has started and the wallet has not answered yet
    pub submit_pending: bool,
    /// Hash returned by the wallet
    pub tx_hash: Option<B256>,
    /// A receipt poll has come back empty at least once
    pub receipt_waiting: bool,
    /// A receipt with success status was observed
    pub receipt_confirmed: bool,
    /// The submission failed before a hash existed
    pub submit_error: Option<String>,
    /// Receipt polling failed or the transaction reverted
    pub receipt_error: Option<String>,
}

impl TxSignals {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn error_message(&self) -> Option<&str> {
        self.submit_error.as_deref().or(self.receipt_error.as_deref())
    }

    /// Project the signals onto a status with its associated data. The
    /// hash is exposed only in the submitted/confirming/confirmed states
    /// and the error message only in the error state.
    pub fn view(&self) -> StatusView {
        let status = derive_status(self);
        let tx_hash = match status {
            BridgeStatus::Submitted | BridgeStatus::Confirming | BridgeStatus::Confirmed => {
                self.tx_hash
            }
            _ => None,
        };
        let error = match status {
            BridgeStatus::Error => Some(
                self.error_message()
                    .unwrap_or("Transaction failed")
                    .to_string(),
            ),
            _ => None,
        };
        StatusView {
            status,
            tx_hash,
            error,
        }
    }
}

/// Derive the status from observed signals. Pure and total; precedence is
/// error > confirmed > confirming > submitted > wallet-confirmation > idle.
pub fn derive_status(signals: &TxSignals) -> BridgeStatus {
    if signals.submit_error.is_some() || signals.receipt_error.is_some() {
        BridgeStatus::Error
    } else if signals.receipt_confirmed && signals.tx_hash.is_some() {
        BridgeStatus::Confirmed
    } else if signals.receipt_waiting && signals.tx_hash.is_some() {
        BridgeStatus::Confirming
    } else if signals.tx_hash.is_some() {
        BridgeStatus::Submitted
    } else if signals.submit_pending {
        BridgeStatus::WalletConfirmation
    } else {
        BridgeStatus::Idle
    }
}

/// Status with its associated data, upholding the presence invariants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub status: BridgeStatus,
    pub tx_hash: Option<B256>,
    pub error: Option<String>,
}
