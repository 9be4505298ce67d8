//! Minimal JSON-RPC 2.0 plumbing shared by the chain reader and the wallet
//! provider.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("RPC request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u32,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Performs a single JSON-RPC call and unwraps the result value.
pub async fn call(
    client: &Client,
    url: &str,
    method: &str,
    params: Value,
) -> Result<Value, RpcError> {
    log::debug!("→ RPC {} {}", url, method);

    let request = RpcRequest {
        jsonrpc: "2.0",
        id: 1,
        method,
        params,
    };

    let response: RpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await?
        .json()
        .await?;

    if let Some(err) = response.error {
        log::warn!("⚠️ RPC {} failed: {} ({})", method, err.message, err.code);
        return Err(RpcError::Remote {
            code: err.code,
            message: err.message,
        });
    }

    response
        .result
        .ok_or_else(|| RpcError::InvalidResponse("missing result".to_string()))
}

/// Unwraps an RPC result that must be a string (hex data, signatures).
pub fn expect_string(value: Value) -> Result<String, RpcError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(RpcError::InvalidResponse(format!(
            "expected string result, got {}",
            other
        ))),
    }
}
