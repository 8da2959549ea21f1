use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessFlags {
    pub rpc_connected: bool,
    pub funding_loaded: bool,
    pub wallet_count: usize,
    pub settings_saved: bool,
}

impl ReadinessFlags {
    pub fn is_complete(&self) -> bool {
        self.funding_ready() && self.settings_saved
    }

    /// Auto-funding only needs a connection, a funding wallet and wallets.
    pub fn funding_ready(&self) -> bool {
        self.rpc_connected && self.funding_loaded && self.wallet_count > 0
    }
}

/// Readiness flags with the composite "setup complete" published on a watch channel.
pub struct SetupState {
    flags: ReadinessFlags,
    complete_tx: watch::Sender<bool>,
}

impl SetupState {
    pub fn new() -> Self {
        let (complete_tx, _) = watch::channel(false);
        Self {
            flags: ReadinessFlags::default(),
            complete_tx,
        }
    }

    pub fn flags(&self) -> ReadinessFlags {
        self.flags
    }

    pub fn is_complete(&self) -> bool {
        *self.complete_tx.borrow()
    }

    pub fn funding_ready(&self) -> bool {
        self.flags.funding_ready()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.complete_tx.subscribe()
    }

    pub fn set_rpc_connected(&mut self, connected: bool) {
        self.flags.rpc_connected = connected;
        self.recompute();
    }

    pub fn set_funding_loaded(&mut self, loaded: bool) {
        self.flags.funding_loaded = loaded;
        self.recompute();
    }

    pub fn set_wallet_count(&mut self, count: usize) {
        self.flags.wallet_count = count;
        self.recompute();
    }

    pub fn set_settings_saved(&mut self, saved: bool) {
        self.flags.settings_saved = saved;
        self.recompute();
    }

    fn recompute(&mut self) {
        let complete = self.flags.is_complete();
        let changed = self.complete_tx.send_if_modified(|current| {
            if *current == complete {
                return false;
            }
            *current = complete;
            true
        });
        if changed {
            info!(complete, flags = ?self.flags, "setup readiness changed");
        }
    }
}

impl Default for SetupState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_requires_all_four_flags() {
        let mut setup = SetupState::new();
        assert!(!setup.is_complete());

        setup.set_rpc_connected(true);
        setup.set_funding_loaded(true);
        setup.set_wallet_count(3);
        assert!(!setup.is_complete());
        assert!(setup.funding_ready());

        setup.set_settings_saved(true);
        assert!(setup.is_complete());

        setup.set_wallet_count(0);
        assert!(!setup.is_complete());
        assert!(!setup.funding_ready());
    }

    #[test]
    fn test_watch_flips_on_fourth_flag() {
        let mut setup = SetupState::new();
        let mut rx = setup.subscribe();

        setup.set_rpc_connected(true);
        setup.set_funding_loaded(true);
        setup.set_settings_saved(true);
        assert!(!rx.has_changed().unwrap());

        setup.set_wallet_count(10);
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());

        // Same composite value again: no notification.
        setup.set_wallet_count(20);
        assert!(!rx.has_changed().unwrap());
    }
}
