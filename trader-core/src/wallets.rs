use crate::error::{Result, TraderError};
use crate::models::{WalletEntry, WalletRecord};
use rand::Rng;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const EXPORT_FILE_NAME: &str = "solana-wallets.json";

/// Mock wallet registry. Holds the last created or imported wallet document.
#[derive(Debug)]
pub struct WalletRegistry {
    max_count: usize,
    records: Vec<WalletRecord>,
    // Entries are kept verbatim so an import followed by an export is lossless.
    document: Option<Vec<Value>>,
}

impl WalletRegistry {
    pub fn new(max_count: usize) -> Self {
        Self {
            max_count,
            records: Vec::new(),
            document: None,
        }
    }

    pub fn is_created(&self) -> bool {
        self.document.is_some()
    }

    pub fn count(&self) -> usize {
        self.document.as_ref().map_or(0, Vec::len)
    }

    /// Records generated by the last `create`. Empty after an import.
    pub fn records(&self) -> &[WalletRecord] {
        &self.records
    }

    pub fn create(&mut self, count: usize) -> Result<usize> {
        if count < 1 || count > self.max_count {
            warn!(count, max = self.max_count, "rejected wallet count");
            return Err(TraderError::InvalidWalletCount {
                count,
                max: self.max_count,
            });
        }

        let mut rng = rand::thread_rng();
        let records: Vec<WalletRecord> = (1..=count as u32)
            .map(|id| placeholder_wallet(&mut rng, id))
            .collect();

        let entries = records
            .iter()
            .map(|record| serde_json::to_value(WalletEntry::from(record)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        info!(count, "created placeholder wallets");
        self.records = records;
        self.document = Some(entries);
        Ok(count)
    }

    pub fn export_json(&self) -> Result<String> {
        let entries = self.document.as_ref().ok_or(TraderError::NoWallets)?;
        let document = json!({ "wallets": entries });
        Ok(serde_json::to_string_pretty(&document)?)
    }

    pub fn export_to(&self, dir: &Path) -> Result<PathBuf> {
        let json = self.export_json()?;
        let path = dir.join(EXPORT_FILE_NAME);
        fs::write(&path, json)?;
        info!(path = %path.display(), count = self.count(), "exported wallets");
        Ok(path)
    }

    /// Replaces the registry with the `wallets` list of `text`. Entries are not validated.
    pub fn import_json(&mut self, text: &str) -> Result<usize> {
        if text.trim().is_empty() {
            return Err(TraderError::MissingField("wallet JSON"));
        }

        let parsed: Value = serde_json::from_str(text).map_err(|err| {
            warn!("wallet import is not valid JSON: {err}");
            TraderError::InvalidWalletFormat
        })?;
        let entries = match parsed.get("wallets") {
            Some(Value::Array(entries)) => entries.clone(),
            _ => {
                warn!("wallet import has no `wallets` array");
                return Err(TraderError::InvalidWalletFormat);
            }
        };

        let count = entries.len();
        info!(count, "imported wallets");
        self.records.clear();
        self.document = Some(entries);
        Ok(count)
    }
}

fn placeholder_wallet<R: Rng>(rng: &mut R, id: u32) -> WalletRecord {
    let mut public = [0u8; 32];
    let mut secret = [0u8; 64];
    rng.fill(&mut public[..]);
    rng.fill(&mut secret[..]);

    WalletRecord {
        id,
        public_key: bs58::encode(public).into_string(),
        secret_key: bs58::encode(secret).into_string(),
    }
}
