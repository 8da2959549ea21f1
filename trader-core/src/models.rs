use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Success,
    Error,
    Warning,
    Info,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Success => "success",
            LogKind::Error => "error",
            LogKind::Warning => "warning",
            LogKind::Info => "info",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A log event before the aggregator stamps it with an id and time.
#[derive(Debug, Clone, PartialEq)]
pub struct LogDraft {
    pub kind: LogKind,
    pub wallet_id: u32,
    pub message: String,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: String,
    pub kind: LogKind,
    pub wallet_id: u32,
    pub message: String,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LogStats {
    pub total: usize,
    pub success: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub volume: f64,
}

/// Placeholder keypair. Both keys are random base58 strings, not key material.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletRecord {
    pub id: u32,
    pub public_key: String,
    pub secret_key: String,
}

/// One entry of the exported wallet document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletEntry {
    pub secret_b58: String,
    pub pubkey: String,
}

impl From<&WalletRecord> for WalletEntry {
    fn from(record: &WalletRecord) -> Self {
        Self {
            secret_b58: record.secret_key.clone(),
            pubkey: record.public_key.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub id: u32,
    pub sol_balance: f64,
    pub token_balance: f64,
    pub value_eur: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BalanceTotals {
    pub sol: f64,
    pub tokens: f64,
    pub value_eur: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingSettings {
    pub token_mint: String,
    pub slippage_bps: u32,
    pub min_trade: f64,
    pub max_trade: f64,
    pub interval_secs: u64,
    /// 0 means unlimited.
    pub daily_limit_per_wallet: f64,
    pub per_wallet_amount: f64,
    pub sweep_residue_sol: f64,
}

impl Default for TradingSettings {
    fn default() -> Self {
        Self {
            token_mint: String::new(),
            slippage_bps: 100,
            min_trade: 1.0,
            max_trade: 10.0,
            interval_secs: 30,
            daily_limit_per_wallet: 0.0,
            per_wallet_amount: 5.0,
            sweep_residue_sol: 0.002,
        }
    }
}

/// Asynchronous completions folded back into the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// A session log line, tagged with the run that produced it.
    Log { run: u64, draft: LogDraft },
    FundingProgress(u8),
    FundingComplete { wallets: usize, budget: f64 },
    BalancesChecked(Vec<WalletBalance>),
    SellComplete,
    SweepComplete,
}
