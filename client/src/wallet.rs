//! Wallet provider interface
//!
//! Signing is delegated entirely to an external wallet. Two failure modes
//! are kept distinct on purpose: no provider configured at all
//! (`ProviderMissing`, fixed by installing/configuring one) versus a
//! provider that is present but refuses or fails a request
//! (`Request`, fixed by retrying).

use crate::rpc::{self, RpcError};
use async_trait::async_trait;
use mintgate_core::GateConfig;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Wallet provider not found. Please install or configure a wallet.")]
    ProviderMissing,

    #[error("Wallet request failed: {0}")]
    Request(String),

    #[error("Invalid wallet response: {0}")]
    InvalidResponse(String),
}

impl From<RpcError> for WalletError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Transport(e) => WalletError::Request(e.to_string()),
            RpcError::Remote { message, .. } => WalletError::Request(message),
            RpcError::InvalidResponse(message) => WalletError::InvalidResponse(message),
        }
    }
}

/// External signer the flows request accounts and signatures from.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Connected account addresses, first one is the active account.
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    /// Signs `message` with the key behind `address` (`personal_sign`).
    async fn personal_sign(&self, message: &str, address: &str) -> Result<String, WalletError>;
}

/// `WalletProvider` over a wallet's JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcWalletProvider {
    url: String,
    client: Client,
}

impl RpcWalletProvider {
    /// Builds a provider from config. A missing `wallet_rpc_url` is the
    /// "provider not found" condition, not a request failure.
    pub fn from_config(config: &GateConfig) -> Result<Self, WalletError> {
        let url = config
            .wallet_rpc_url
            .clone()
            .ok_or(WalletError::ProviderMissing)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| WalletError::Request(e.to_string()))?;

        log::info!("📡 Wallet provider connected: {}", url);
        Ok(Self { url, client })
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        let result = rpc::call(&self.client, &self.url, "eth_requestAccounts", json!([])).await?;

        let accounts: Vec<String> = serde_json::from_value(result)
            .map_err(|e| WalletError::InvalidResponse(e.to_string()))?;

        if accounts.is_empty() {
            return Err(WalletError::Request("no accounts available".to_string()));
        }
        log::info!("✅ Wallet connected: {}", accounts[0]);
        Ok(accounts)
    }

    async fn personal_sign(&self, message: &str, address: &str) -> Result<String, WalletError> {
        let params = json!([message, address]);
        let result = rpc::call(&self.client, &self.url, "personal_sign", params).await?;

        let signature = rpc::expect_string(result)?;
        log::info!("✅ Message signed by {}", address);
        Ok(signature)
    }
}
