//! Deployment configuration.
//!
//! Everything environment-derived — signing key, contract address, RPC
//! endpoint, authorization window — arrives through this structure and is
//! passed into component constructors. Business logic never reads the
//! process environment. Tests construct the struct directly with fixed
//! values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, Result};

/// Reward core configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// 0x-prefixed 32-byte signing key hex. Never logged.
    pub signer_private_key: String,
    /// Relics contract address the signatures are verified against.
    pub relics_contract: String,
    /// Chain RPC endpoint for nonce and claim reads.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// EVM chain id.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Validity window for issued mint authorizations, in seconds.
    #[serde(default = "default_auth_window")]
    pub auth_window_secs: u64,
    /// Page size for settlement listings.
    #[serde(default = "default_settlement_limit")]
    pub settlement_list_limit: u32,
}

impl CoreConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("read {}: {e}", path.display())))?;
        toml::from_str(&raw).map_err(|e| CoreError::Config(format!("parse {}: {e}", path.display())))
    }
}

// The signing key must never reach logs, so Debug redacts it.
impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("signer_private_key", &"<redacted>")
            .field("relics_contract", &self.relics_contract)
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("auth_window_secs", &self.auth_window_secs)
            .field("settlement_list_limit", &self.settlement_list_limit)
            .finish()
    }
}

// Default value functions

fn default_rpc_url() -> String {
    "https://rpc.sepolia.mantle.xyz".to_string()
}

fn default_chain_id() -> u64 {
    5003
}

fn default_auth_window() -> u64 {
    kronos_types::DEFAULT_AUTH_WINDOW_SECS
}

fn default_settlement_limit() -> u32 {
    kronos_types::DEFAULT_SETTLEMENT_LIMIT
}
