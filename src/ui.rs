//! Terminal rendering
//!
//! Pure string builders for the session header, the bridge panel, and the
//! static footer. The app loop prints whatever these return; nothing here
//! touches the wallet or the form state directly.

use alloy::primitives::Address;

use crate::bridge::{BridgeStatus, StatusView};
use crate::chains::{self, SEPOLIA, TATARA};
use crate::wallet::WalletSession;

/// `0x1234…abcd` form used wherever an account is shown
pub fn short_address(address: &Address) -> String {
    let full = format!("{:#x}", address);
    format!("{}\u{2026}{}", &full[..6], &full[full.len() - 4..])
}

/// One-line session header: account, network, mismatch warning
pub fn render_header(session: &WalletSession) -> String {
    match (session.address(), session.active_chain()) {
        (Some(address), Some(chain_id)) => {
            let mut line = format!(
                "[{}] {} on {}",
                session.connector_id().unwrap_or("?"),
                short_address(&address),
                chains::chain_name(chain_id)
            );
            if chain_id != chains::SEPOLIA_CHAIN_ID {
                line.push_str("  !! wrong network, Sepolia required");
            }
            line
        }
        _ => "No wallet connected".to_string(),
    }
}

/// The bridge panel: route, amount, derived status with its follow-ups
pub fn render_panel(view: &StatusView, amount: &str, session: &WalletSession) -> String {
    let mut lines = Vec::new();

    lines.push("Bridge ETH".to_string());
    lines.push(format!(
        "  From: {}    To: {}",
        SEPOLIA.name, TATARA.name
    ));
    lines.push(format!(
        "  Amount: {} ETH",
        if amount.is_empty() { "0.0" } else { amount }
    ));

    match view.status {
        BridgeStatus::Idle => {
            if !session.is_connected() {
                lines.push("  Connect your wallet to bridge".to_string());
            } else if session.active_chain() != Some(chains::SEPOLIA_CHAIN_ID) {
                lines.push("  Please switch to Sepolia network".to_string());
            }
        }
        BridgeStatus::WalletConfirmation => {
            lines.push("  Waiting for wallet confirmation...".to_string());
        }
        BridgeStatus::Submitted => {
            lines.push("  Transaction submitted...".to_string());
        }
        BridgeStatus::Confirming => {
            lines.push("  Confirming transaction...".to_string());
        }
        BridgeStatus::Confirmed => {
            lines.push("  Bridge Successful!".to_string());
            lines.push(
                "  The bridge takes 30 minutes to 1 hour for tokens to reach \
                 your destination chain."
                    .to_string(),
            );
            lines.push("  Run `reset` to bridge again".to_string());
        }
        BridgeStatus::Error => {
            if let Some(error) = &view.error {
                lines.push(format!("  Error: {}", error));
            }
            lines.push("  Run `reset` to try again".to_string());
        }
    }

    if let Some(tx_hash) = &view.tx_hash {
        lines.push(format!(
            "  View on Etherscan: {}",
            SEPOLIA.explorer_tx_url(tx_hash)
        ));
    }

    if let Some(address) = session.address() {
        lines.push(format!(
            "  Destination address: {}",
            short_address(&address)
        ));
    }

    lines.join("\n")
}

/// Static resource links, printed once at startup
pub fn render_footer() -> String {
    [
        "Resources:",
        "  Sepolia Explorer  https://sepolia.etherscan.io/",
        "  Documentation     https://docs.katana.network/",
        "  Telegram          https://t.me/katanadevs",
    ]
    .join("\n")
}

/// Command reference for the `help` command
pub fn render_help() -> String {
    [
        "Commands:",
        "  connect [local|walletconnect]  connect a wallet",
        "  disconnect                     drop the wallet session",
        "  switch                         request a switch to Sepolia",
        "  amount <eth>                   set the amount to bridge",
        "  bridge [eth]                   submit the bridge transaction",
        "  reset                          clear a finished attempt",
        "  status                         print the current panel",
        "  help                           this text",
        "  quit                           exit",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{BridgeForm, ReceiptStatus};
    use crate::wallet::testing::MockWallet;
    use alloy::primitives::{address, b256};

    const USER: Address = address!("1234567890abcdef1234567890abcdef12345678");

    async fn connected_session(mock: MockWallet) -> WalletSession {
        let mut session = WalletSession::new();
        session.connect(Box::new(mock)).await.unwrap();
        session
    }

    #[test]
    fn test_short_address() {
        assert_eq!(short_address(&USER), "0x1234\u{2026}5678");
    }

    #[tokio::test]
    async fn test_header_states() {
        let session = WalletSession::new();
        assert_eq!(render_header(&session), "No wallet connected");

        let session = connected_session(MockWallet::new(USER)).await;
        let header = render_header(&session);
        assert!(header.contains("0x1234\u{2026}5678"));
        assert!(header.contains("Sepolia"));
        assert!(!header.contains("wrong network"));

        let session =
            connected_session(MockWallet::new(USER).with_chain(chains::TATARA_CHAIN_ID)).await;
        assert!(render_header(&session).contains("wrong network"));
    }

    #[tokio::test]
    async fn test_panel_shows_explorer_link() {
        let hash = b256!("00000000000000000000000000000000000000000000000000000000000000ab");
        let mock = MockWallet::new(USER).with_submit_result(Ok(hash));
        let session = connected_session(mock).await;

        let mut form = BridgeForm::new();
        form.set_amount("0.5");
        form.submit(&session).await;

        let panel = render_panel(&form.view(), form.amount(), &session);
        assert!(panel.contains("Transaction submitted..."));
        assert!(panel.contains(&SEPOLIA.explorer_tx_url(&hash)));
    }

    #[tokio::test]
    async fn test_panel_confirmed_copy() {
        let session = connected_session(MockWallet::new(USER)).await;
        let mut form = BridgeForm::new();
        form.set_amount("0.5");
        form.submit(&session).await;
        form.apply_receipt(Ok(ReceiptStatus::Confirmed));

        let panel = render_panel(&form.view(), form.amount(), &session);
        assert!(panel.contains("Bridge Successful!"));
        assert!(panel.contains("30 minutes to 1 hour"));
    }

    #[tokio::test]
    async fn test_panel_error_copy() {
        let session = connected_session(
            MockWallet::new(USER).with_submit_result(Err(crate::wallet::WalletError::Rejected)),
        )
        .await;
        let mut form = BridgeForm::new();
        form.set_amount("0.5");
        form.submit(&session).await;

        let panel = render_panel(&form.view(), form.amount(), &session);
        assert!(panel.contains("Error: Transaction rejected by user"));
        assert!(!panel.contains("Etherscan"));
    }

    #[test]
    fn test_panel_disconnected_placeholder() {
        let session = WalletSession::new();
        let form = BridgeForm::new();
        let panel = render_panel(&form.view(), form.amount(), &session);
        assert!(panel.contains("Connect your wallet to bridge"));
    }

    #[tokio::test]
    async fn test_panel_wrong_network_placeholder() {
        let session =
            connected_session(MockWallet::new(USER).with_chain(chains::TATARA_CHAIN_ID)).await;
        let form = BridgeForm::new();
        let panel = render_panel(&form.view(), form.amount(), &session);
        assert!(panel.contains("Please switch to Sepolia network"));
    }
}
