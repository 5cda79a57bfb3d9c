//! Interactive bridge session
//!
//! Line-oriented command loop over stdin with a periodic tick. Each tick
//! reconciles the wallet network and polls the outstanding receipt; the
//! panel is re-rendered whenever the derived status changes.

use std::time::Duration;

use eyre::{Result, WrapErr};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::bridge::{BridgeForm, BridgeStatus, ReceiptChecker};
use crate::chains::SEPOLIA_CHAIN_ID;
use crate::config::Config;
use crate::guard::{GuardOutcome, NetworkGuard};
use crate::ui;
use crate::wallet::{self, ConnectorKind, WalletSession};

/// One parsed user command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect(Option<String>),
    Disconnect,
    Switch,
    Amount(String),
    Bridge(Option<String>),
    Reset,
    Status,
    Help,
    Quit,
}

/// Parse one input line. Empty lines and unknown words give None.
pub fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let command = match words.next()? {
        "connect" => Command::Connect(words.next().map(str::to_string)),
        "disconnect" => Command::Disconnect,
        "switch" => Command::Switch,
        "amount" => Command::Amount(words.next().unwrap_or_default().to_string()),
        "bridge" => Command::Bridge(words.next().map(str::to_string)),
        "reset" => Command::Reset,
        "status" => Command::Status,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// The session state the loop drives
pub struct BridgeApp {
    config: Config,
    session: WalletSession,
    form: BridgeForm,
    guard: NetworkGuard,
    receipts: ReceiptChecker,
    /// Exact text of the last printed header+panel
    last_rendered: Option<String>,
    #[cfg(test)]
    render_log: Vec<String>,
}

impl BridgeApp {
    pub fn new(config: Config) -> Result<Self> {
        let receipts = ReceiptChecker::new(&config.sepolia_rpc_url)
            .wrap_err("Failed to build receipt checker")?;
        Ok(Self {
            config,
            session: WalletSession::new(),
            form: BridgeForm::new(),
            guard: NetworkGuard::new(SEPOLIA_CHAIN_ID),
            receipts,
            last_rendered: None,
            #[cfg(test)]
            render_log: Vec::new(),
        })
    }

    /// Main run loop
    pub async fn run(&mut self, mut shutdown: mpsc::Receiver<()>) -> Result<()> {
        println!("{}", ui::render_footer());
        println!();
        println!("{}", ui::render_help());
        self.render();

        let mut stdin = BufReader::new(tokio::io::stdin()).lines();
        let mut tick = tokio::time::interval(Duration::from_millis(
            self.config.receipt_poll_interval_ms,
        ));

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
                line = stdin.next_line() => {
                    match line.wrap_err("Failed to read stdin")? {
                        Some(line) => {
                            if self.handle_line(&line).await {
                                break;
                            }
                        }
                        // stdin closed
                        None => break,
                    }
                }
                _ = tick.tick() => {
                    self.on_tick().await;
                }
            }
        }

        Ok(())
    }

    /// Returns true when the session should end
    async fn handle_line(&mut self, line: &str) -> bool {
        let command = match parse_command(line) {
            Some(command) => command,
            None => {
                if !line.trim().is_empty() {
                    println!("Unknown command, try `help`");
                }
                return false;
            }
        };
        debug!(?command, "Command");

        match command {
            Command::Connect(id) => self.connect(id.as_deref()).await,
            Command::Disconnect => {
                self.session.disconnect();
                self.render();
            }
            Command::Switch => {
                // Explicit request re-arms the guard after a rejection
                self.guard.rearm();
                match self.session.switch_chain(SEPOLIA_CHAIN_ID).await {
                    Ok(()) => self.render(),
                    Err(e) => println!("Network switch failed: {}", e),
                }
            }
            Command::Amount(amount) => {
                self.form.set_amount(&amount);
                self.render();
            }
            Command::Bridge(amount) => {
                if let Some(amount) = amount {
                    self.form.set_amount(&amount);
                }
                if !self.form.can_submit(&self.session) {
                    println!("Cannot bridge: {}", self.submit_blocker());
                    return false;
                }
                // Show the wallet-confirmation panel before suspending on
                // the wallet, which may wait on a remote user for minutes
                if self.form.begin_submit(&self.session) {
                    self.render();
                    self.form.finish_submit(&self.session).await;
                }
                self.render();
            }
            Command::Reset => {
                self.form.reset();
                self.render();
            }
            Command::Status => {
                self.last_rendered = None;
                self.render();
            }
            Command::Help => println!("{}", ui::render_help()),
            Command::Quit => return true,
        }
        false
    }

    async fn connect(&mut self, id: Option<&str>) {
        let available = wallet::available_connectors(&self.config);
        if available.is_empty() {
            println!(
                "No connectors configured; set BRIDGE_PRIVATE_KEY or \
                 WALLETCONNECT_PROJECT_ID and WALLET_BRIDGE_URL"
            );
            return;
        }

        let kind = match id {
            Some(id) => match ConnectorKind::from_id(id) {
                Some(kind) if available.contains(&kind) => kind,
                Some(_) => {
                    println!("Connector {} is not configured", id);
                    return;
                }
                None => {
                    println!("Unknown connector {}", id);
                    return;
                }
            },
            None => available[0],
        };

        match wallet::connect_backend(kind, &self.config).await {
            Ok(backend) => match self.session.connect(backend).await {
                Ok(()) => self.render(),
                Err(e) => println!("Connect failed: {}", e),
            },
            Err(e) => println!("Connect failed: {}", e),
        }
    }

    /// Why `bridge` is refused right now, for the user
    fn submit_blocker(&self) -> &'static str {
        if !self.session.is_connected() {
            "no wallet connected"
        } else if self.session.active_chain() != Some(SEPOLIA_CHAIN_ID) {
            "wallet is not on Sepolia"
        } else if self.form.status() != BridgeStatus::Idle {
            "an attempt is already in progress, `reset` first"
        } else {
            "enter a positive amount first"
        }
    }

    /// One tick: network reconciliation, then a receipt poll step
    async fn on_tick(&mut self) {
        match self.guard.reconcile(&mut self.session).await {
            GuardOutcome::Switched => {
                println!("Wallet switched to Sepolia");
            }
            GuardOutcome::SwitchFailed(reason) => {
                println!(
                    "Network switch was refused ({}); run `switch` to retry",
                    reason
                );
            }
            GuardOutcome::NoSession | GuardOutcome::InSync | GuardOutcome::Skipped => {}
        }

        self.form.poll_receipt(&self.receipts).await;
        self.render();
    }

    /// Print the header and panel whenever what the user would see has
    /// changed. Deduping on the full text keeps ticks quiet while letting
    /// session and amount changes through even when the status is the same.
    fn render(&mut self) {
        let text = format!(
            "{}\n{}",
            ui::render_header(&self.session),
            ui::render_panel(&self.form.view(), self.form.amount(), &self.session)
        );
        if self.last_rendered.as_deref() == Some(text.as_str()) {
            return;
        }
        #[cfg(test)]
        self.render_log.push(text.clone());

        println!();
        println!("{}", text);
        self.last_rendered = Some(text);
    }
}
