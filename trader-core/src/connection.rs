// RPC endpoint and funding wallet inputs.
// Nothing is dialed or decoded: both inputs only pass superficial checks.

use crate::error::{Result, TraderError};
use std::ops::RangeInclusive;
use tracing::{info, warn};

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Accepted length of a base58 secret, in characters.
pub const SECRET_LEN: RangeInclusive<usize> = 44..=88;

#[derive(Debug, Default)]
pub struct Connection {
    rpc_url: Option<String>,
    funding_loaded: bool,
}

impl Connection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.rpc_url.is_some()
    }

    pub fn rpc_url(&self) -> Option<&str> {
        self.rpc_url.as_deref()
    }

    pub fn is_funding_loaded(&self) -> bool {
        self.funding_loaded
    }

    pub fn connect(&mut self, url: &str) -> Result<()> {
        if self.is_connected() {
            return Err(TraderError::AlreadyConnected);
        }
        let url = url.trim();
        if url.is_empty() {
            warn!("rejected empty RPC URL");
            return Err(TraderError::MissingField("RPC URL"));
        }

        info!(rpc_url = url, "RPC connected (simulated)");
        self.rpc_url = Some(url.to_string());
        Ok(())
    }

    pub fn load_funding(&mut self, secret: &str) -> Result<()> {
        if self.funding_loaded {
            return Err(TraderError::AlreadyLoaded);
        }
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(TraderError::MissingField("funding secret"));
        }
        if !SECRET_LEN.contains(&secret.len()) {
            warn!(len = secret.len(), "rejected funding secret with bad length");
            return Err(TraderError::InvalidSecret);
        }

        info!(len = secret.len(), "funding wallet loaded (simulated)");
        self.funding_loaded = true;
        Ok(())
    }
}
