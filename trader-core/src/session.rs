// Simulated trading session.
// While running, a timer task re-arms itself with a fresh random delay and
// emits one synthetic buy-loop outcome per tick.

use crate::config::SessionConfig;
use crate::error::{Result, TraderError};
use crate::models::{DashboardEvent, LogDraft, LogKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const SUCCESS_MESSAGES: &[&str] = &[
    "RPC connection established successfully",
    "Funding wallet loaded and verified",
    "Wallet #1 attempting buy order for €5.50",
    "Jupiter route found for token swap",
    "Buy order executed successfully - €5.50",
    "Wallet #2 attempting buy order for €3.20",
    "Slippage tolerance exceeded, retrying with backup route",
    "Buy order executed successfully - €3.20",
    "Wallet #3 rate limited, waiting 30 seconds",
    "Platform fee (2%) deducted: €0.11",
    "Daily limit check passed for wallet #1",
];

const ERROR_MESSAGES: &[&str] = &[
    "Transaction failed: insufficient SOL for fees",
    "Route not found, switching to fallback DEX",
    "Slippage exceeded maximum tolerance",
    "Network congestion, retrying in 10s",
];

/// Amount attached to successful events, in euros.
pub const AMOUNT_RANGE: Range<f64> = 2.0..10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
}

/// Produces the synthetic log events of a running session.
#[derive(Debug, Clone)]
pub struct EventSynth<R> {
    rng: R,
    success_rate: f64,
    max_wallet_id: u32,
    tick_ms: Range<u64>,
}

impl<R: Rng> EventSynth<R> {
    pub fn new(rng: R, config: &SessionConfig) -> Self {
        Self {
            rng,
            success_rate: config.success_rate.clamp(0.0, 1.0),
            max_wallet_id: config.max_wallet_id.max(1),
            tick_ms: config.min_tick_ms..config.max_tick_ms.max(config.min_tick_ms + 1),
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(self.tick_ms.clone()))
    }

    pub fn next_event(&mut self) -> LogDraft {
        let wallet_id = self.rng.gen_range(1..=self.max_wallet_id);

        if self.rng.gen_bool(self.success_rate) {
            let template = SUCCESS_MESSAGES
                .choose(&mut self.rng)
                .copied()
                .unwrap_or_default();
            LogDraft {
                kind: LogKind::Success,
                wallet_id,
                // Only the first "#1" is rewritten, as the template list expects.
                message: template.replacen("#1", &format!("#{wallet_id}"), 1),
                amount: Some(self.rng.gen_range(AMOUNT_RANGE)),
            }
        } else {
            let message = ERROR_MESSAGES
                .choose(&mut self.rng)
                .copied()
                .unwrap_or_default();
            LogDraft {
                kind: LogKind::Error,
                wallet_id,
                message: message.to_string(),
                amount: None,
            }
        }
    }
}

/// Idle/Running state machine owning the tick task while running.
#[derive(Debug)]
pub struct TradingSession {
    config: SessionConfig,
    run: u64,
    ticker: Option<JoinHandle<()>>,
}

impl TradingSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            run: 0,
            ticker: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.ticker.as_ref().is_some_and(|ticker| !ticker.is_finished()) {
            SessionState::Running
        } else {
            SessionState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SessionState::Running
    }

    /// Run number of the live session. Logs tagged with any other run are stale.
    pub fn current_run(&self) -> Option<u64> {
        self.is_running().then_some(self.run)
    }

    pub fn start(&mut self, setup_complete: bool, event_tx: mpsc::Sender<DashboardEvent>) -> Result<()> {
        self.start_with(setup_complete, event_tx, StdRng::from_entropy())
    }

    /// Like `start`, with a caller-supplied RNG.
    pub fn start_with<R>(
        &mut self,
        setup_complete: bool,
        event_tx: mpsc::Sender<DashboardEvent>,
        rng: R,
    ) -> Result<()>
    where
        R: Rng + Send + 'static,
    {
        if !setup_complete {
            return Err(TraderError::SetupIncomplete);
        }
        if self.is_running() {
            return Err(TraderError::SessionAlreadyRunning);
        }

        self.run += 1;
        let run = self.run;
        let mut synth = EventSynth::new(rng, &self.config);
        self.ticker = Some(tokio::spawn(async move {
            loop {
                let delay = synth.next_delay();
                tokio::time::sleep(delay).await;
                let draft = synth.next_event();
                debug!(run, wallet_id = draft.wallet_id, kind = %draft.kind, "session tick");
                if event_tx.send(DashboardEvent::Log { run, draft }).await.is_err() {
                    break;
                }
            }
        }));
        info!(run, "trading session started");
        Ok(())
    }

    /// Returns whether a running session was stopped.
    pub fn stop(&mut self) -> bool {
        let running = self.is_running();
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        if running {
            info!(run = self.run, "trading session stopped");
        }
        running
    }
}

impl Drop for TradingSession {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synth_outcomes_stay_in_range() {
        let mut synth = EventSynth::new(StdRng::seed_from_u64(7), &SessionConfig::default());
        let mut successes = 0;
        for _ in 0..2_000 {
            let delay = synth.next_delay();
            assert!(delay >= Duration::from_millis(1_000) && delay < Duration::from_millis(4_000));

            let event = synth.next_event();
            assert!((1..=10).contains(&event.wallet_id));
            match event.kind {
                LogKind::Success => {
                    successes += 1;
                    let amount = event.amount.unwrap();
                    assert!(AMOUNT_RANGE.contains(&amount));
                    assert!(SUCCESS_MESSAGES
                        .iter()
                        .any(|t| t.replacen("#1", &format!("#{}", event.wallet_id), 1) == event.message));
                }
                LogKind::Error => {
                    assert_eq!(event.amount, None);
                    assert!(ERROR_MESSAGES.contains(&event.message.as_str()));
                }
                other => panic!("unexpected kind {other:?}"),
            }
        }
        // 70% nominal; generous bounds for a fixed seed.
        assert!((1_200..1_600).contains(&successes), "successes = {successes}");
    }

    #[test]
    fn test_success_message_substitutes_wallet_id() {
        let config = SessionConfig {
            success_rate: 1.0,
            max_wallet_id: 9,
            ..SessionConfig::default()
        };
        let mut synth = EventSynth::new(StdRng::seed_from_u64(1), &config);
        for _ in 0..200 {
            let event = synth.next_event();
            assert_eq!(event.kind, LogKind::Success);
            assert!(!event.message.contains("#1") || event.wallet_id == 1, "{}", event.message);
        }
    }

    #[tokio::test]
    async fn test_start_requires_complete_setup() {
        let (tx, _rx) = mpsc::channel(8);
        let mut session = TradingSession::new(SessionConfig::default());
        assert!(matches!(session.start(false, tx), Err(TraderError::SetupIncomplete)));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_session_emits_until_stopped() {
        let (tx, mut rx) = mpsc::channel(64);
        let mut session = TradingSession::new(SessionConfig::default());
        session
            .start_with(true, tx.clone(), StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(session.state(), SessionState::Running);
        assert!(matches!(
            session.start(true, tx.clone()),
            Err(TraderError::SessionAlreadyRunning)
        ));

        for _ in 0..5 {
            match rx.recv().await.unwrap() {
                DashboardEvent::Log { run, draft } => {
                    assert_eq!(Some(run), session.current_run());
                    assert!((1..=10).contains(&draft.wallet_id));
                }
                other => panic!("unexpected event {other:?}"),
            }
        }

        assert!(session.stop());
        assert_eq!(session.state(), SessionState::Idle);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_are_spaced_by_configured_window() {
        let (tx, mut rx) = mpsc::channel(64);
        let mut session = TradingSession::new(SessionConfig::default());
        session
            .start_with(true, tx, StdRng::seed_from_u64(3))
            .unwrap();

        let mut last = tokio::time::Instant::now();
        for _ in 0..10 {
            rx.recv().await.unwrap();
            let now = tokio::time::Instant::now();
            let gap = now - last;
            assert!(gap >= Duration::from_millis(1_000) && gap <= Duration::from_millis(4_000));
            last = now;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_start_gets_a_new_run() {
        let (tx, _rx) = mpsc::channel(64);
        let mut session = TradingSession::new(SessionConfig::default());
        assert_eq!(session.current_run(), None);

        session.start(true, tx.clone()).unwrap();
        let first = session.current_run().unwrap();
        session.stop();
        assert_eq!(session.current_run(), None);

        session.start(true, tx).unwrap();
        assert!(session.current_run().unwrap() > first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_goes_idle_when_receiver_is_gone() {
        let (tx, rx) = mpsc::channel(64);
        drop(rx);
        let mut session = TradingSession::new(SessionConfig::default());
        session.start(true, tx).unwrap();
        assert!(session.is_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.current_run(), None);
    }
}
