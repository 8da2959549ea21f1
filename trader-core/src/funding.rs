use crate::config::FundingConfig;
use crate::error::{Result, TraderError};
use crate::models::DashboardEvent;
use crate::tasks::ScopedTasks;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Roughly €1 per wallet plus a fee reserve.
pub const PER_WALLET_RESERVE: f64 = 1.2;
pub const MIN_BUDGET_FLOOR: f64 = 10.0;
pub const MIN_BUDGET_INPUT: f64 = 1.0;

pub fn min_required(wallet_count: usize) -> f64 {
    (wallet_count as f64 * PER_WALLET_RESERVE).max(MIN_BUDGET_FLOOR)
}

pub fn per_wallet_allocation(total_budget: f64, wallet_count: usize) -> f64 {
    if wallet_count == 0 {
        return 0.0;
    }
    total_budget / wallet_count as f64
}

/// Drives the auto-fund progress animation. Nothing is transferred.
#[derive(Debug)]
pub struct AutoFunder {
    config: FundingConfig,
    progress: u8,
    running: bool,
    tasks: ScopedTasks,
}

impl AutoFunder {
    pub fn new(config: FundingConfig) -> Self {
        Self {
            config,
            progress: 0,
            running: false,
            tasks: ScopedTasks::new(),
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(
        &mut self,
        total_budget: f64,
        wallet_count: usize,
        prerequisites_met: bool,
        event_tx: mpsc::Sender<DashboardEvent>,
    ) -> Result<()> {
        if !prerequisites_met {
            return Err(TraderError::PrerequisitesNotMet(
                "Please create wallets and configure settings first",
            ));
        }
        if self.running {
            return Err(TraderError::FundingInProgress);
        }
        if !total_budget.is_finite() || total_budget < MIN_BUDGET_INPUT {
            return Err(TraderError::InvalidBudget);
        }
        let minimum = min_required(wallet_count);
        if total_budget < minimum {
            warn!(total_budget, minimum, "auto-fund budget too low");
            return Err(TraderError::InsufficientBudget { minimum });
        }

        info!(
            total_budget,
            wallet_count,
            per_wallet = per_wallet_allocation(total_budget, wallet_count),
            "auto-funding started"
        );
        self.running = true;
        self.progress = 0;

        let tick = Duration::from_millis(self.config.tick_ms);
        let step = self.config.step_percent;
        self.tasks.spawn(async move {
            let mut progress = 0u8;
            loop {
                tokio::time::sleep(tick).await;
                progress = progress.saturating_add(step).min(100);
                debug!(progress, "auto-fund tick");
                if event_tx.send(DashboardEvent::FundingProgress(progress)).await.is_err() {
                    return;
                }
                if progress >= 100 {
                    break;
                }
            }
            tokio::time::sleep(tick).await;
            let _ = event_tx
                .send(DashboardEvent::FundingComplete {
                    wallets: wallet_count,
                    budget: total_budget,
                })
                .await;
        });
        Ok(())
    }

    pub fn record_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
    }

    pub fn finish(&mut self) {
        self.progress = 100;
        self.running = false;
    }
}
