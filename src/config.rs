use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

const SETTINGS_FILE: &str = "settings.json";

/// Wallet settings entered through the UI, persisted between runs so the
/// operator does not have to re-enter the key after a restart.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SavedSettings {
    pub private_key: Option<String>,
    pub rpc_url: Option<String>,
    pub chain_id: Option<u64>,
}

impl SavedSettings {
    pub fn load() -> Self {
        let path = Path::new(SETTINGS_FILE);
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str(&contents) {
                    Ok(s) => return s,
                    Err(e) => tracing::warn!("failed to parse {SETTINGS_FILE}: {e}"),
                },
                Err(e) => tracing::warn!("failed to read {SETTINGS_FILE}: {e}"),
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(SETTINGS_FILE, json) {
                    tracing::warn!("failed to write {SETTINGS_FILE}: {e}");
                }
            }
            Err(e) => tracing::warn!("failed to serialize settings: {e}"),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            private_key: Some(config.private_key.clone()).filter(|s| !s.is_empty()),
            rpc_url: Some(config.rpc_url.clone()),
            chain_id: Some(config.chain_id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    #[serde(skip)]
    pub private_key: String,
    pub rpc_url: String,
    pub chain_id: u64,

    /// Fixed gas limit override on the bot-contract call
    pub gas_limit: u64,
    /// Extra pause after the approval receipt, for RPC backends whose
    /// pending-nonce view lags the head block. 0 = receipt wait only.
    pub tx_settle_ms: u64,

    pub contracts_dir: String,
    pub log_level: String,
    pub http_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let saved = SavedSettings::load();

        let rpc_url = saved
            .rpc_url
            .unwrap_or_else(|| env_or("RPC_URL", "http://127.0.0.1:8545"));
        Url::parse(&rpc_url).with_context(|| format!("invalid RPC_URL: {rpc_url}"))?;

        Ok(Self {
            private_key: saved
                .private_key
                .unwrap_or_else(|| env_or("PRIVATE_KEY", "")),
            rpc_url,
            chain_id: match saved.chain_id {
                Some(id) => id,
                None => env_or("CHAIN_ID", "5").parse()?,
            },

            gas_limit: env_or("GAS_LIMIT", "5000000").parse()?,
            tx_settle_ms: env_or("TX_SETTLE_MS", "0").parse()?,

            contracts_dir: env_or("CONTRACTS_DIR", "constants"),
            log_level: env_or("LOG_LEVEL", "info"),
            http_port: env_or("HTTP_PORT", "3000").parse()?,
        })
    }

    pub fn persist(&self) {
        SavedSettings::from_config(self).save();
    }

    pub fn has_wallet(&self) -> bool {
        !self.private_key.is_empty()
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
