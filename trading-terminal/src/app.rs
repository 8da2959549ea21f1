use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use trader_core::models::{DashboardEvent, TradingSettings};
use trader_core::{Dashboard, TraderError};

pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    RpcUrl,
    FundingSecret,
    WalletCount,
    WalletFile,
    TotalBudget,
    TokenMint,
    Slippage,
    MinTrade,
    MaxTrade,
    Interval,
    DailyLimit,
    PerWallet,
    SweepResidue,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::RpcUrl,
        Field::FundingSecret,
        Field::WalletCount,
        Field::WalletFile,
        Field::TotalBudget,
        Field::TokenMint,
        Field::Slippage,
        Field::MinTrade,
        Field::MaxTrade,
        Field::Interval,
        Field::DailyLimit,
        Field::PerWallet,
        Field::SweepResidue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::RpcUrl => "RPC URL",
            Field::FundingSecret => "Funding secret",
            Field::WalletCount => "Wallet count",
            Field::WalletFile => "Wallet JSON file",
            Field::TotalBudget => "Total budget (€)",
            Field::TokenMint => "Token mint",
            Field::Slippage => "Slippage (bps)",
            Field::MinTrade => "Min per trade (€)",
            Field::MaxTrade => "Max per trade (€)",
            Field::Interval => "Interval (sec)",
            Field::DailyLimit => "Daily limit (€, 0 = none)",
            Field::PerWallet => "Per wallet (€)",
            Field::SweepResidue => "Sweep residue (SOL)",
        }
    }

    /// Secrets are masked when rendered.
    pub fn is_secret(&self) -> bool {
        matches!(self, Field::FundingSecret)
    }
}

pub struct App {
    pub should_quit: bool,
    pub dashboard: Dashboard,
    pub theme: Theme,
    pub export_dir: PathBuf,
    pub selected: usize,
    /// Edit buffer of the selected field while editing.
    pub editing: Option<String>,
    values: Vec<String>,
}

impl App {
    pub fn new(dashboard: Dashboard, rpc_url: &str, funding_secret: Option<&str>, export_dir: PathBuf) -> Self {
        let defaults = TradingSettings::default();
        let values = Field::ALL
            .iter()
            .map(|field| match field {
                Field::RpcUrl => rpc_url.to_string(),
                Field::FundingSecret => funding_secret.unwrap_or_default().to_string(),
                Field::WalletCount => "10".to_string(),
                Field::WalletFile => export_dir
                    .join(trader_core::wallets::EXPORT_FILE_NAME)
                    .display()
                    .to_string(),
                Field::TotalBudget => "100".to_string(),
                Field::TokenMint => defaults.token_mint.clone(),
                Field::Slippage => defaults.slippage_bps.to_string(),
                Field::MinTrade => defaults.min_trade.to_string(),
                Field::MaxTrade => defaults.max_trade.to_string(),
                Field::Interval => defaults.interval_secs.to_string(),
                Field::DailyLimit => defaults.daily_limit_per_wallet.to_string(),
                Field::PerWallet => defaults.per_wallet_amount.to_string(),
                Field::SweepResidue => defaults.sweep_residue_sol.to_string(),
            })
            .collect();

        Self {
            should_quit: false,
            dashboard,
            theme: Theme::Dark,
            export_dir,
            selected: 0,
            editing: None,
            values,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        &self.values[field as usize]
    }

    pub fn selected_field(&self) -> Field {
        Field::ALL[self.selected]
    }

    pub fn select_next(&mut self) {
        if self.editing.is_none() {
            self.selected = (self.selected + 1) % Field::ALL.len();
        }
    }

    pub fn select_prev(&mut self) {
        if self.editing.is_none() {
            self.selected = (self.selected + Field::ALL.len() - 1) % Field::ALL.len();
        }
    }

    pub fn begin_edit(&mut self) {
        self.editing = Some(self.value(self.selected_field()).to_string());
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(buffer) = &mut self.editing {
            buffer.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(buffer) = &mut self.editing {
            buffer.pop();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn commit_edit(&mut self) {
        if let Some(buffer) = self.editing.take() {
            self.set_value(self.selected_field(), buffer);
        }
    }

    pub fn set_value(&mut self, field: Field, value: String) {
        if field == Field::TokenMint {
            self.dashboard.set_token_mint(&value);
        }
        self.values[field as usize] = value;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn on_event(&mut self, event: DashboardEvent) {
        self.dashboard.apply(event);
    }

    pub fn connect_rpc(&mut self) {
        let url = self.value(Field::RpcUrl).to_string();
        self.act(|dash| dash.connect_rpc(&url));
    }

    pub fn load_funding(&mut self) {
        let secret = self.value(Field::FundingSecret).to_string();
        self.act(|dash| dash.load_funding(&secret));
    }

    pub fn create_wallets(&mut self) {
        let count = self.parse::<usize>(Field::WalletCount);
        self.act(|dash| dash.create_wallets(count?));
    }

    pub fn export_wallets(&mut self) {
        let dir = self.export_dir.clone();
        self.act(|dash| dash.export_wallets(&dir));
    }

    pub fn import_wallets(&mut self) {
        let path = self.value(Field::WalletFile).trim().to_string();
        let text = if path.is_empty() {
            Err(TraderError::MissingField("wallet JSON file"))
        } else {
            fs::read_to_string(&path).map_err(|source| TraderError::ImportRead { path, source })
        };
        self.act(|dash| dash.import_wallets(&text?));
    }

    pub fn validate_mint(&mut self) {
        self.act(Dashboard::validate_mint);
    }

    pub fn save_settings(&mut self) {
        let settings = self.read_settings();
        self.act(|dash| dash.save_settings(settings?));
    }

    pub fn auto_fund(&mut self) {
        let budget = self.parse::<f64>(Field::TotalBudget);
        self.act(|dash| dash.auto_fund(budget?));
    }

    pub fn check_balances(&mut self) {
        self.act(Dashboard::check_balances);
    }

    pub fn sell_all(&mut self) {
        self.act(Dashboard::sell_all);
    }

    pub fn sweep_all(&mut self) {
        self.act(Dashboard::sweep_all);
    }

    pub fn toggle_trading(&mut self) {
        self.act(Dashboard::toggle_trading);
    }

    /// Does nothing when there are no logs yet.
    pub fn export_logs(&mut self) {
        let dir = self.export_dir.clone();
        self.act(|dash| dash.export_logs(&dir));
    }

    pub fn clear_logs(&mut self) {
        self.dashboard.clear_logs();
    }

    /// Budget as typed, for the live per-wallet preview.
    pub fn budget_preview(&self) -> Option<f64> {
        self.value(Field::TotalBudget).trim().parse().ok()
    }

    fn read_settings(&self) -> Result<TradingSettings, TraderError> {
        Ok(TradingSettings {
            token_mint: self.value(Field::TokenMint).to_string(),
            slippage_bps: self.parse(Field::Slippage)?,
            min_trade: self.parse(Field::MinTrade)?,
            max_trade: self.parse(Field::MaxTrade)?,
            interval_secs: self.parse(Field::Interval)?,
            daily_limit_per_wallet: self.parse(Field::DailyLimit)?,
            per_wallet_amount: self.parse(Field::PerWallet)?,
            sweep_residue_sol: self.parse(Field::SweepResidue)?,
        })
    }

    fn parse<T: FromStr>(&self, field: Field) -> Result<T, TraderError> {
        let input = self.value(field).trim();
        input.parse().map_err(|_| TraderError::InvalidNumber {
            field: field.label(),
            input: input.to_string(),
        })
    }

    fn act<T>(&mut self, action: impl FnOnce(&mut Dashboard) -> trader_core::Result<T>) {
        if let Err(err) = action(&mut self.dashboard) {
            self.dashboard.report(&err);
        }
    }
}
