use crate::config::UtilitiesConfig;
use crate::error::{Result, TraderError};
use crate::models::{BalanceTotals, DashboardEvent, WalletBalance};
use crate::tasks::ScopedTasks;
use rand::Rng;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Random snapshot for `wallet_count` wallets, ids starting at 1.
pub fn random_balances<R: Rng>(rng: &mut R, wallet_count: usize) -> Vec<WalletBalance> {
    (1..=wallet_count as u32)
        .map(|id| WalletBalance {
            id,
            sol_balance: rng.gen_range(0.1..0.6),
            token_balance: rng.gen_range(100.0..1_100.0),
            value_eur: rng.gen_range(10.0..60.0),
        })
        .collect()
}

/// Mock per-wallet balances with check, sell-all and sweep-all utilities.
#[derive(Debug)]
pub struct BalanceBook {
    config: UtilitiesConfig,
    balances: Vec<WalletBalance>,
    checking: bool,
    selling: bool,
    sweeping: bool,
    tasks: ScopedTasks,
}

impl BalanceBook {
    pub fn new(config: UtilitiesConfig) -> Self {
        Self {
            config,
            balances: Vec::new(),
            checking: false,
            selling: false,
            sweeping: false,
            tasks: ScopedTasks::new(),
        }
    }

    pub fn balances(&self) -> &[WalletBalance] {
        &self.balances
    }

    pub fn totals(&self) -> BalanceTotals {
        self.balances.iter().fold(BalanceTotals::default(), |mut totals, b| {
            totals.sol += b.sol_balance;
            totals.tokens += b.token_balance;
            totals.value_eur += b.value_eur;
            totals
        })
    }

    pub fn is_checking(&self) -> bool {
        self.checking
    }

    pub fn is_selling(&self) -> bool {
        self.selling
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweeping
    }

    pub fn check(
        &mut self,
        wallet_count: usize,
        setup_complete: bool,
        event_tx: mpsc::Sender<DashboardEvent>,
    ) -> Result<()> {
        if !setup_complete {
            return Err(TraderError::PrerequisitesNotMet(
                "Please create and fund wallets first",
            ));
        }
        if self.checking {
            return Err(TraderError::OperationInProgress("Balance check"));
        }

        let snapshot = random_balances(&mut rand::thread_rng(), wallet_count);
        self.checking = true;
        info!(wallet_count, "checking balances");
        self.delayed(self.config.balance_check_ms, event_tx, DashboardEvent::BalancesChecked(snapshot));
        Ok(())
    }

    pub fn sell_all(&mut self, setup_complete: bool, event_tx: mpsc::Sender<DashboardEvent>) -> Result<()> {
        if !self.has_snapshot(setup_complete) {
            return Err(TraderError::NoBalances);
        }
        if self.selling {
            return Err(TraderError::OperationInProgress("Sell all"));
        }
        self.selling = true;
        info!(wallets = self.balances.len(), "selling all tokens");
        self.delayed(self.config.sell_ms, event_tx, DashboardEvent::SellComplete);
        Ok(())
    }

    pub fn sweep_all(&mut self, setup_complete: bool, event_tx: mpsc::Sender<DashboardEvent>) -> Result<()> {
        if !self.has_snapshot(setup_complete) {
            return Err(TraderError::NoFunds);
        }
        if self.sweeping {
            return Err(TraderError::OperationInProgress("Sweep"));
        }
        self.sweeping = true;
        info!(wallets = self.balances.len(), "sweeping SOL to funding wallet");
        self.delayed(self.config.sweep_ms, event_tx, DashboardEvent::SweepComplete);
        Ok(())
    }

    /// Replaces the whole snapshot.
    pub fn apply_checked(&mut self, snapshot: Vec<WalletBalance>) {
        self.checking = false;
        self.balances = snapshot;
    }

    /// Tokens are gone after a sell, and so is their value.
    pub fn apply_sold(&mut self) {
        self.selling = false;
        for balance in &mut self.balances {
            balance.token_balance = 0.0;
            balance.value_eur = 0.0;
        }
    }

    /// Each wallet keeps at most `residue_sol` after a sweep.
    pub fn apply_swept(&mut self, residue_sol: f64) {
        self.sweeping = false;
        for balance in &mut self.balances {
            balance.sol_balance = balance.sol_balance.min(residue_sol);
        }
    }

    fn has_snapshot(&self, setup_complete: bool) -> bool {
        setup_complete && !self.balances.is_empty()
    }

    fn delayed(&mut self, delay_ms: u64, event_tx: mpsc::Sender<DashboardEvent>, event: DashboardEvent) {
        let delay = Duration::from_millis(delay_ms);
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = event_tx.send(event).await;
        });
    }
}
