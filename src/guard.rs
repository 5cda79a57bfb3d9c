//! Required-network reconciliation
//!
//! The wallet may sit on any chain; bridging requires Sepolia. Each tick
//! observes the wallet chain and requests a switch when it differs, one
//! request at a time with the outcome awaited before another can start.
//! A failed request is latched and not repeated until the observed chain
//! changes or the guard is re-armed explicitly.

use tracing::{debug, info, warn};

use crate::wallet::WalletSession;

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// No wallet session
    NoSession,
    /// Already on the required chain
    InSync,
    /// Switch request accepted
    Switched,
    /// Switch request failed or was rejected by the wallet user
    SwitchFailed(String),
    /// No action this pass: the chain was unreadable, or an earlier
    /// failure on this same chain still stands
    Skipped,
}

pub struct NetworkGuard {
    required_chain: u64,
    /// Observed chain at the last failed switch attempt
    failed_on: Option<u64>,
}

impl NetworkGuard {
    pub fn new(required_chain: u64) -> Self {
        Self {
            required_chain,
            failed_on: None,
        }
    }

    pub fn required_chain(&self) -> u64 {
        self.required_chain
    }

    /// Clear the failure latch so the next mismatch triggers a new request
    pub fn rearm(&mut self) {
        self.failed_on = None;
    }

    /// Observe the wallet chain and reconcile it with the required chain
    pub async fn reconcile(&mut self, session: &mut WalletSession) -> GuardOutcome {
        if !session.is_connected() {
            self.failed_on = None;
            return GuardOutcome::NoSession;
        }

        let observed = match session.refresh_chain().await {
            Ok(Some(chain_id)) => chain_id,
            Ok(None) => {
                self.failed_on = None;
                return GuardOutcome::NoSession;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read wallet chain");
                return GuardOutcome::Skipped;
            }
        };

        if observed == self.required_chain {
            self.failed_on = None;
            return GuardOutcome::InSync;
        }

        if self.failed_on == Some(observed) {
            debug!(
                observed_chain = observed,
                "Switch already failed on this chain, waiting"
            );
            return GuardOutcome::Skipped;
        }

        info!(
            observed_chain = observed,
            required_chain = self.required_chain,
            "Wallet on wrong network, requesting switch"
        );

        match session.switch_chain(self.required_chain).await {
            Ok(()) => {
                self.failed_on = None;
                info!(chain_id = self.required_chain, "Wallet network switched");
                GuardOutcome::Switched
            }
            Err(e) => {
                warn!(
                    error = %e,
                    required_chain = self.required_chain,
                    "Network switch failed"
                );
                self.failed_on = Some(observed);
                GuardOutcome::SwitchFailed(e.to_string())
            }
        }
    }
}
