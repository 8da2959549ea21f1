use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub min_tick_ms: u64,
    pub max_tick_ms: u64,
    pub success_rate: f64,
    pub max_wallet_id: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_tick_ms: 1_000,
            max_tick_ms: 4_000,
            success_rate: 0.7,
            max_wallet_id: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub capacity: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { capacity: 50 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FundingConfig {
    pub tick_ms: u64,
    pub step_percent: u8,
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 300,
            step_percent: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UtilitiesConfig {
    pub balance_check_ms: u64,
    pub sell_ms: u64,
    pub sweep_ms: u64,
}

impl Default for UtilitiesConfig {
    fn default() -> Self {
        Self {
            balance_check_ms: 2_000,
            sell_ms: 3_000,
            sweep_ms: 2_500,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WalletConfig {
    pub max_count: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self { max_count: 1_000 }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TraderConfig {
    pub session: SessionConfig,
    pub logs: LogConfig,
    pub funding: FundingConfig,
    pub utilities: UtilitiesConfig,
    pub wallets: WalletConfig,
}

impl TraderConfig {
    pub fn from_env() -> Result<Self> {
        // Optional `config/default.(toml|yaml|json)` relative to the working directory,
        // overridden by `TRADER__SECTION__KEY` environment variables.
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("TRADER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.session.min_tick_ms < self.session.max_tick_ms,
            "session.min_tick_ms must be below session.max_tick_ms"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.session.success_rate),
            "session.success_rate must be within [0, 1]"
        );
        anyhow::ensure!(self.session.max_wallet_id >= 1, "session.max_wallet_id must be >= 1");
        anyhow::ensure!(self.logs.capacity >= 1, "logs.capacity must be >= 1");
        anyhow::ensure!(
            (1..=100).contains(&self.funding.step_percent),
            "funding.step_percent must be within [1, 100]"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_timings() {
        let config = TraderConfig::default();
        assert_eq!(config.session.min_tick_ms, 1_000);
        assert_eq!(config.session.max_tick_ms, 4_000);
        assert_eq!(config.logs.capacity, 50);
        assert_eq!(config.funding.tick_ms, 300);
        assert_eq!(config.funding.step_percent, 10);
        assert_eq!(config.utilities.balance_check_ms, 2_000);
        assert_eq!(config.wallets.max_count, 1_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_tick_window_is_rejected() {
        let mut config = TraderConfig::default();
        config.session.min_tick_ms = 5_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                "[logs]\ncapacity = 10\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: TraderConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.logs.capacity, 10);
        assert_eq!(config.session.max_wallet_id, 10);
    }
}
