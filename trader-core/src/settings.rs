use crate::error::{Result, TraderError};
use crate::models::TradingSettings;
use std::ops::RangeInclusive;
use tracing::{info, warn};

/// Accepted length of a base58 mint address, in characters.
pub const MINT_LEN: RangeInclusive<usize> = 32..=44;
pub const SLIPPAGE_BPS: RangeInclusive<u32> = 1..=10_000;

/// Editable trading settings plus the mint-validated and saved flags.
#[derive(Debug, Default)]
pub struct SettingsForm {
    draft: TradingSettings,
    mint_validated: bool,
    saved: Option<TradingSettings>,
}

impl SettingsForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &TradingSettings {
        &self.draft
    }

    pub fn saved(&self) -> Option<&TradingSettings> {
        self.saved.as_ref()
    }

    pub fn is_saved(&self) -> bool {
        self.saved.is_some()
    }

    pub fn is_mint_validated(&self) -> bool {
        self.mint_validated
    }

    /// Editing the mint invalidates any earlier validation.
    pub fn set_token_mint(&mut self, mint: &str) {
        self.draft.token_mint = mint.to_string();
        self.mint_validated = false;
    }

    pub fn validate_mint(&mut self) -> Result<()> {
        let mint = self.draft.token_mint.trim();
        if mint.is_empty() {
            return Err(TraderError::MissingField("token mint"));
        }
        if !MINT_LEN.contains(&mint.len()) {
            warn!(len = mint.len(), "rejected token mint with bad length");
            return Err(TraderError::InvalidMint);
        }
        self.mint_validated = true;
        info!(mint, "token mint validated");
        Ok(())
    }

    /// Saves the numeric fields of `settings` together with the validated mint.
    pub fn save(&mut self, settings: TradingSettings) -> Result<()> {
        if !self.mint_validated {
            return Err(TraderError::MintNotValidated);
        }
        check_ranges(&settings)?;

        let settings = TradingSettings {
            token_mint: self.draft.token_mint.trim().to_string(),
            ..settings
        };
        info!(
            mint = %settings.token_mint,
            slippage_bps = settings.slippage_bps,
            min_trade = settings.min_trade,
            max_trade = settings.max_trade,
            "trading settings saved"
        );
        self.draft = settings.clone();
        self.saved = Some(settings);
        Ok(())
    }
}

fn check_ranges(settings: &TradingSettings) -> Result<()> {
    if !(settings.min_trade < settings.max_trade) {
        return Err(TraderError::InvalidTradeRange);
    }
    if !SLIPPAGE_BPS.contains(&settings.slippage_bps) {
        return Err(TraderError::OutOfRange { field: "Slippage (bps)" });
    }
    if settings.min_trade <= 0.0 {
        return Err(TraderError::OutOfRange { field: "Min per trade" });
    }
    if settings.interval_secs < 1 {
        return Err(TraderError::OutOfRange { field: "Interval" });
    }
    if !(settings.daily_limit_per_wallet >= 0.0) {
        return Err(TraderError::OutOfRange { field: "Daily limit" });
    }
    if !(settings.per_wallet_amount > 0.0) {
        return Err(TraderError::OutOfRange { field: "Per wallet" });
    }
    if !(settings.sweep_residue_sol >= 0.0) {
        return Err(TraderError::OutOfRange { field: "Sweep residue" });
    }
    Ok(())
}
