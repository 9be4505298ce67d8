//! Gate configuration
//!
//! Endpoints and tunables come from a TOML file or from `MINTGATE_*`
//! environment variables; nothing else is persisted. The chain-reading and
//! verification services take this config at construction so tests can
//! substitute fakes instead of relying on module-level singletons.

use crate::validation::validate_wallet_address;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid setting {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Registration gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Base URL of the remote verification API
    pub api_url: String,

    /// JSON-RPC endpoint for chain reads
    pub rpc_url: String,

    /// Address of the NFT gating contract
    pub gating_contract: String,

    /// JSON-RPC endpoint of the wallet provider. Absent means no provider
    /// is installed, which is a distinct user-visible condition.
    #[serde(default)]
    pub wallet_rpc_url: Option<String>,

    /// Minimum invite code length, applied uniformly to every code entry
    /// point.
    #[serde(default = "default_invite_code_min_len")]
    pub invite_code_min_len: usize,

    /// Bound on every outbound HTTP call, so a dead endpoint cannot leave
    /// a flow loading forever.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_invite_code_min_len() -> usize {
    6
}

fn default_http_timeout_secs() -> u64 {
    30
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            gating_contract: "0x0000000000000000000000000000000000000000".to_string(),
            wallet_rpc_url: None,
            invite_code_min_len: default_invite_code_min_len(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl GateConfig {
    /// Loads configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: GateConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds configuration from `MINTGATE_*` environment variables.
    /// `MINTGATE_API_URL`, `MINTGATE_RPC_URL` and `MINTGATE_GATING_CONTRACT`
    /// are required; the rest fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url =
            env::var("MINTGATE_API_URL").map_err(|_| ConfigError::Missing("MINTGATE_API_URL"))?;
        let rpc_url =
            env::var("MINTGATE_RPC_URL").map_err(|_| ConfigError::Missing("MINTGATE_RPC_URL"))?;
        let gating_contract = env::var("MINTGATE_GATING_CONTRACT")
            .map_err(|_| ConfigError::Missing("MINTGATE_GATING_CONTRACT"))?;

        let invite_code_min_len = match env::var("MINTGATE_INVITE_CODE_MIN_LEN") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "MINTGATE_INVITE_CODE_MIN_LEN",
                message: format!("not a valid length: {}", raw),
            })?,
            Err(_) => default_invite_code_min_len(),
        };

        let http_timeout_secs = match env::var("MINTGATE_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "MINTGATE_HTTP_TIMEOUT_SECS",
                message: format!("not a valid duration: {}", raw),
            })?,
            Err(_) => default_http_timeout_secs(),
        };

        let config = Self {
            api_url,
            rpc_url,
            gating_contract,
            wallet_rpc_url: env::var("MINTGATE_WALLET_RPC_URL").ok(),
            invite_code_min_len,
            http_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates field contents beyond what deserialization enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.is_empty() {
            return Err(ConfigError::Missing("api_url"));
        }
        if self.rpc_url.is_empty() {
            return Err(ConfigError::Missing("rpc_url"));
        }
        if validate_wallet_address(&self.gating_contract).is_err() {
            return Err(ConfigError::Invalid {
                name: "gating_contract",
                message: format!("not a valid contract address: {}", self.gating_contract),
            });
        }
        if self.invite_code_min_len == 0 {
            return Err(ConfigError::Invalid {
                name: "invite_code_min_len",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
