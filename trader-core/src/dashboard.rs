use crate::balances::BalanceBook;
use crate::config::TraderConfig;
use crate::connection::Connection;
use crate::error::{Result, TraderError};
use crate::funding::{self, AutoFunder};
use crate::logs::LogBuffer;
use crate::models::{DashboardEvent, TradingSettings};
use crate::session::{SessionState, TradingSession};
use crate::settings::SettingsForm;
use crate::setup::SetupState;
use crate::wallets::WalletRegistry;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

const EVENT_BUFFER: usize = 256;
const MAX_NOTICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient titled notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

/// Owns every panel's state. User actions are methods; timer completions
/// arrive on the event channel and are folded in by [`Dashboard::apply`].
pub struct Dashboard {
    setup: SetupState,
    connection: Connection,
    wallets: WalletRegistry,
    settings: SettingsForm,
    funder: AutoFunder,
    session: TradingSession,
    logs: LogBuffer,
    balances: BalanceBook,
    notices: VecDeque<Notice>,
    event_tx: mpsc::Sender<DashboardEvent>,
}

impl Dashboard {
    pub fn new(config: TraderConfig) -> (Self, mpsc::Receiver<DashboardEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let dashboard = Self {
            setup: SetupState::new(),
            connection: Connection::new(),
            wallets: WalletRegistry::new(config.wallets.max_count),
            settings: SettingsForm::new(),
            funder: AutoFunder::new(config.funding),
            session: TradingSession::new(config.session),
            logs: LogBuffer::new(config.logs.capacity),
            balances: BalanceBook::new(config.utilities),
            notices: VecDeque::with_capacity(MAX_NOTICES),
            event_tx,
        };
        (dashboard, event_rx)
    }

    pub fn setup(&self) -> &SetupState {
        &self.setup
    }

    pub fn is_setup_complete(&self) -> bool {
        self.setup.is_complete()
    }

    pub fn subscribe_setup(&self) -> watch::Receiver<bool> {
        self.setup.subscribe()
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn wallets(&self) -> &WalletRegistry {
        &self.wallets
    }

    pub fn settings(&self) -> &SettingsForm {
        &self.settings
    }

    pub fn funder(&self) -> &AutoFunder {
        &self.funder
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_trading(&self) -> bool {
        self.session.is_running()
    }

    pub fn logs(&self) -> &LogBuffer {
        &self.logs
    }

    pub fn balances(&self) -> &BalanceBook {
        &self.balances
    }

    pub fn notices(&self) -> impl DoubleEndedIterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn connect_rpc(&mut self, url: &str) -> Result<()> {
        self.connection.connect(url)?;
        self.setup.set_rpc_connected(true);
        self.notify("RPC Connected", "Successfully connected to Solana RPC");
        Ok(())
    }

    pub fn load_funding(&mut self, secret: &str) -> Result<()> {
        self.connection.load_funding(secret)?;
        self.setup.set_funding_loaded(true);
        self.notify("Funding Wallet Loaded", "Successfully loaded funding wallet");
        Ok(())
    }

    pub fn create_wallets(&mut self, count: usize) -> Result<usize> {
        let count = self.wallets.create(count)?;
        self.setup.set_wallet_count(count);
        self.notify("Wallets Created", format!("Successfully created {count} wallets"));
        Ok(count)
    }

    pub fn export_wallets(&mut self, dir: &Path) -> Result<PathBuf> {
        let path = self.wallets.export_to(dir)?;
        self.notify("Wallets Exported", format!("Wallet JSON written to {}", path.display()));
        Ok(path)
    }

    pub fn import_wallets(&mut self, text: &str) -> Result<usize> {
        let count = self.wallets.import_json(text)?;
        self.setup.set_wallet_count(count);
        self.notify("Wallets Imported", format!("Successfully imported {count} wallets"));
        Ok(count)
    }

    pub fn set_token_mint(&mut self, mint: &str) {
        self.settings.set_token_mint(mint);
    }

    pub fn validate_mint(&mut self) -> Result<()> {
        self.settings.validate_mint()?;
        self.notify("Mint Validated", "Token mint address is valid");
        Ok(())
    }

    pub fn save_settings(&mut self, settings: TradingSettings) -> Result<()> {
        self.settings.save(settings)?;
        self.setup.set_settings_saved(true);
        self.notify("Settings Saved", "Trading configuration saved successfully");
        Ok(())
    }

    pub fn min_budget(&self) -> f64 {
        funding::min_required(self.wallets.count())
    }

    pub fn per_wallet_allocation(&self, total_budget: f64) -> f64 {
        funding::per_wallet_allocation(total_budget, self.wallets.count())
    }

    pub fn auto_fund(&mut self, total_budget: f64) -> Result<()> {
        self.funder.start(
            total_budget,
            self.wallets.count(),
            self.setup.funding_ready(),
            self.event_tx.clone(),
        )
    }

    pub fn check_balances(&mut self) -> Result<()> {
        self.balances
            .check(self.wallets.count(), self.setup.is_complete(), self.event_tx.clone())
    }

    pub fn sell_all(&mut self) -> Result<()> {
        self.balances.sell_all(self.setup.is_complete(), self.event_tx.clone())
    }

    pub fn sweep_all(&mut self) -> Result<()> {
        self.balances.sweep_all(self.setup.is_complete(), self.event_tx.clone())
    }

    pub fn start_trading(&mut self) -> Result<()> {
        self.session.start(self.setup.is_complete(), self.event_tx.clone())
    }

    pub fn stop_trading(&mut self) -> bool {
        self.session.stop()
    }

    pub fn toggle_trading(&mut self) -> Result<SessionState> {
        if self.session.is_running() {
            self.session.stop();
        } else {
            self.start_trading()?;
        }
        Ok(self.session.state())
    }

    /// Writes the CSV log export. `None` when there are no logs to export.
    pub fn export_logs(&mut self, dir: &Path) -> Result<Option<PathBuf>> {
        let path = self.logs.export_to(dir)?;
        if let Some(path) = &path {
            self.notify("Logs Exported", format!("CSV written to {}", path.display()));
        }
        Ok(path)
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
        self.notify("Logs Cleared", "All log entries removed");
    }

    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Log { run, draft } => {
                if self.session.current_run() == Some(run) {
                    self.logs.append(draft);
                } else {
                    debug!(run, "dropping log from a stopped session");
                }
            }
            DashboardEvent::FundingProgress(progress) => self.funder.record_progress(progress),
            DashboardEvent::FundingComplete { wallets, budget } => {
                self.funder.finish();
                self.notify(
                    "Auto-Funding Complete",
                    format!("Successfully funded {wallets} wallets with €{budget}"),
                );
            }
            DashboardEvent::BalancesChecked(snapshot) => {
                let count = snapshot.len();
                self.balances.apply_checked(snapshot);
                self.notify("Balances Updated", format!("Checked balances for {count} wallets"));
            }
            DashboardEvent::SellComplete => {
                self.balances.apply_sold();
                self.notify("Sell Orders Complete", "All tokens sold across wallets");
            }
            DashboardEvent::SweepComplete => {
                let residue = self
                    .settings
                    .saved()
                    .map_or(TradingSettings::default().sweep_residue_sol, |s| s.sweep_residue_sol);
                self.balances.apply_swept(residue);
                self.notify("Sweep Complete", "All SOL swept back to funding wallet");
            }
        }
    }

    /// Turns a declined action into an error notice.
    pub fn report(&mut self, err: &TraderError) {
        warn!("{}: {err}", err.title());
        self.push_notice(Notice {
            level: NoticeLevel::Error,
            title: err.title().to_string(),
            body: err.to_string(),
        });
    }

    fn notify(&mut self, title: &str, body: impl Into<String>) {
        self.push_notice(Notice {
            level: NoticeLevel::Success,
            title: title.to_string(),
            body: body.into(),
        });
    }

    fn push_notice(&mut self, notice: Notice) {
        while self.notices.len() >= MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "4NMwxzmYj2uvHuq8xoqhY8RXg63KSVJM1DXkpbmkUY7YQWuoyQgFnnzn6yo3CMnqZasnNPNuAT2TLwQsCaKkUddp";
    const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn ready_dashboard() -> (Dashboard, mpsc::Receiver<DashboardEvent>) {
        let (mut dash, rx) = Dashboard::new(TraderConfig::default());
        dash.connect_rpc("https://api.mainnet-beta.solana.com").unwrap();
        dash.load_funding(SECRET).unwrap();
        dash.create_wallets(10).unwrap();
        dash.set_token_mint(MINT);
        dash.validate_mint().unwrap();
        dash.save_settings(TradingSettings::default()).unwrap();
        (dash, rx)
    }

    #[tokio::test]
    async fn test_trading_gated_by_setup() {
        let (mut dash, _rx) = Dashboard::new(TraderConfig::default());
        let err = dash.start_trading().unwrap_err();
        assert!(matches!(err, TraderError::SetupIncomplete));
        dash.report(&err);
        let last = dash.notices().last().unwrap();
        assert_eq!(last.level, NoticeLevel::Error);
        assert_eq!(last.title, "Prerequisites Not Met");
        assert!(!dash.is_trading());
    }

    #[tokio::test]
    async fn test_auto_fund_scenario_reports_minimum() {
        let (mut dash, _rx) = ready_dashboard();
        assert!((dash.min_budget() - 12.0).abs() < 1e-9);
        let err = dash.auto_fund(5.0).unwrap_err();
        assert_eq!(err.to_string(), "Minimum budget required: €12.00");
        assert_eq!(dash.per_wallet_allocation(5.0), 0.5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_fold_into_state() {
        let (mut dash, mut rx) = ready_dashboard();
        assert!(dash.is_setup_complete());

        assert_eq!(dash.toggle_trading().unwrap(), SessionState::Running);
        for _ in 0..3 {
            let event = rx.recv().await.unwrap();
            dash.apply(event);
        }
        assert_eq!(dash.logs().len(), 3);
        assert_eq!(dash.toggle_trading().unwrap(), SessionState::Idle);
        dash.clear_logs();
        assert!(dash.logs().is_empty());

        dash.check_balances().unwrap();
        let event = rx.recv().await.unwrap();
        dash.apply(event);
        assert_eq!(dash.balances().balances().len(), 10);
        assert_eq!(dash.notices().last().unwrap().title, "Balances Updated");

        dash.sweep_all().unwrap();
        let event = rx.recv().await.unwrap();
        dash.apply(event);
        assert!(dash.balances().balances().iter().all(|b| b.sol_balance <= 0.002));
    }

    #[tokio::test]
    async fn test_sweep_without_snapshot_reports_no_funds() {
        let (mut dash, _rx) = ready_dashboard();
        let err = dash.sweep_all().unwrap_err();
        dash.report(&err);
        let last = dash.notices().last().unwrap();
        assert_eq!(last.title, "No Funds to Sweep");
        assert_eq!(last.body, "Check balances first or ensure wallets have SOL");

        let err = dash.sell_all().unwrap_err();
        assert_eq!(err.title(), "No Tokens to Sell");
    }

    #[tokio::test]
    async fn test_notices_are_bounded() {
        let (mut dash, _rx) = Dashboard::new(TraderConfig::default());
        for _ in 0..12 {
            dash.report(&TraderError::NoWallets);
        }
        assert_eq!(dash.notices().count(), MAX_NOTICES);
    }
}
