//! Stake record reads against the NFT gating contract
//!
//! The contract exposes `stakes(uint256)` returning
//! `(timestamp, isStaked, lastActionTimestamp)` and
//! `meetsStakingRequirement(uint256)`. Both are plain `eth_call` views, so
//! this reader speaks raw JSON-RPC: Keccak-256 selector plus one 32-byte
//! big-endian argument, result decoded word by word. No retries; a failed
//! read is terminal for that attempt and the caller re-invokes on the next
//! token-id change.

use crate::rpc::{self, RpcError};
use async_trait::async_trait;
use mintgate_core::{GateConfig, StakeRecord};
use reqwest::Client;
use serde_json::json;
use sha3::{Digest, Keccak256};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Chain read failed: {0}")]
    Rpc(String),

    #[error("Contract call reverted: {0}")]
    ContractRevert(String),

    #[error("Malformed contract response: {0}")]
    Decode(String),
}

impl From<RpcError> for ChainError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Transport(e) => ChainError::Rpc(e.to_string()),
            RpcError::Remote { message, .. } => ChainError::ContractRevert(message),
            RpcError::InvalidResponse(message) => ChainError::Decode(message),
        }
    }
}

/// Read-only view of the gating contract's stake state.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn get_stake_record(&self, token_id: u64) -> Result<StakeRecord, ChainError>;
    async fn meets_staking_requirement(&self, token_id: u64) -> Result<bool, ChainError>;
}

/// `ChainReader` over a JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcChainReader {
    rpc_url: String,
    contract: String,
    client: Client,
}

impl RpcChainReader {
    pub fn new(config: &GateConfig) -> Result<Self, ChainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        log::info!("📡 Chain reader initialized: {}", config.rpc_url);
        Ok(Self {
            rpc_url: config.rpc_url.clone(),
            contract: config.gating_contract.clone(),
            client,
        })
    }

    async fn eth_call(&self, data: String) -> Result<String, ChainError> {
        let params = json!([{ "to": self.contract, "data": data }, "latest"]);
        let result = rpc::call(&self.client, &self.rpc_url, "eth_call", params).await?;
        Ok(rpc::expect_string(result)?)
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    async fn get_stake_record(&self, token_id: u64) -> Result<StakeRecord, ChainError> {
        let data = encode_uint_call("stakes(uint256)", token_id);
        let raw = self.eth_call(data).await?;

        let words = decode_words(&raw, 3)?;
        let record = StakeRecord {
            token_id,
            stake_timestamp: word_to_u64(&words[0])?,
            is_staked: word_to_bool(&words[1]),
            last_action_timestamp: word_to_u64(&words[2])?,
        };
        log::debug!("✅ Stake record for token {}: {:?}", token_id, record);
        Ok(record)
    }

    async fn meets_staking_requirement(&self, token_id: u64) -> Result<bool, ChainError> {
        let data = encode_uint_call("meetsStakingRequirement(uint256)", token_id);
        let raw = self.eth_call(data).await?;

        let words = decode_words(&raw, 1)?;
        Ok(word_to_bool(&words[0]))
    }
}

/// First four bytes of the Keccak-256 hash of the function signature.
fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Encodes a single-`uint256`-argument call as 0x-prefixed hex calldata.
fn encode_uint_call(signature: &str, value: u64) -> String {
    let mut arg = [0u8; 32];
    arg[24..].copy_from_slice(&value.to_be_bytes());
    format!("0x{}{}", hex::encode(selector(signature)), hex::encode(arg))
}

/// Splits a hex `eth_call` result into exactly `expected` 32-byte words.
fn decode_words(raw: &str, expected: usize) -> Result<Vec<[u8; 32]>, ChainError> {
    let stripped = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(stripped)
        .map_err(|e| ChainError::Decode(format!("invalid hex in result: {}", e)))?;

    if bytes.len() != expected * 32 {
        return Err(ChainError::Decode(format!(
            "expected {} words, got {} bytes",
            expected,
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(32)
        .map(|chunk| {
            let mut word = [0u8; 32];
            word.copy_from_slice(chunk);
            word
        })
        .collect())
}

fn word_to_u64(word: &[u8; 32]) -> Result<u64, ChainError> {
    if word[..24].iter().any(|&b| b != 0) {
        return Err(ChainError::Decode("value exceeds u64 range".to_string()));
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[24..]);
    Ok(u64::from_be_bytes(tail))
}

fn word_to_bool(word: &[u8; 32]) -> bool {
    word.iter().any(|&b| b != 0)
}
