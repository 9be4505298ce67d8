//! Remote verification API client
//!
//! Wraps the registration service's four endpoints: invite-code
//! verification, email/wallet availability, and the final reservation. The
//! service answers every request with a `{success, message}` envelope;
//! `success: false` is an application-level failure carrying `message`,
//! regardless of the transport status code.

use async_trait::async_trait;
use mintgate_core::GateConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error {0}")]
    Http(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Envelope every API endpoint answers with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiEnvelope {
    fn reason(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "Request rejected".to_string())
    }
}

/// Outcome of a code verification or registration submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(String),
}

/// Outcome of an email or wallet availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Conflict(String),
}

/// Final reservation payload. Exactly one of `code` and `token_id` is set,
/// matching the invite and NFT proof paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "tokenId", skip_serializing_if = "Option::is_none")]
    pub token_id: Option<u64>,
    pub email: String,
    #[serde(rename = "walletAddress")]
    pub wallet_address: String,
    pub signature: String,
}

/// Remote verification operations used by the registration flows.
#[async_trait]
pub trait VerificationApi: Send + Sync {
    async fn verify_invite_code(&self, code: &str) -> Result<Verdict, ClientError>;
    async fn check_email_available(&self, email: &str) -> Result<Availability, ClientError>;
    async fn check_wallet_available(&self, wallet: &str) -> Result<Availability, ClientError>;
    async fn submit_registration(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<Verdict, ClientError>;
}

/// `VerificationApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpVerificationClient {
    base_url: String,
    client: Client,
}

impl HttpVerificationClient {
    pub fn new(config: &GateConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        log::info!("📡 Verification client initialized: {}", config.api_url);
        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Reads the `{success, message}` envelope out of a response. A body
    /// that does not parse on a non-2xx status is reported as an HTTP
    /// error; a parsed envelope wins over the status code either way.
    async fn read_envelope(response: reqwest::Response) -> Result<ApiEnvelope, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<ApiEnvelope>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(ClientError::Http(status.as_u16())),
            Err(e) => Err(ClientError::InvalidResponse(e.to_string())),
        }
    }

    async fn get_envelope(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiEnvelope, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("→ GET {}", url);
        let response = self.client.get(&url).query(query).send().await?;
        Self::read_envelope(response).await
    }
}

#[async_trait]
impl VerificationApi for HttpVerificationClient {
    async fn verify_invite_code(&self, code: &str) -> Result<Verdict, ClientError> {
        let envelope = self.get_envelope("/verifyCode", &[("code", code)]).await?;
        if envelope.success {
            log::info!("✅ Invite code accepted");
            Ok(Verdict::Accepted)
        } else {
            log::warn!("❌ Invite code rejected: {}", envelope.reason());
            Ok(Verdict::Rejected(envelope.reason()))
        }
    }

    async fn check_email_available(&self, email: &str) -> Result<Availability, ClientError> {
        let envelope = self
            .get_envelope("/isEmailUsed", &[("email", email)])
            .await?;
        if envelope.success {
            Ok(Availability::Available)
        } else {
            log::debug!("❌ Email unavailable: {}", envelope.reason());
            Ok(Availability::Conflict(envelope.reason()))
        }
    }

    async fn check_wallet_available(&self, wallet: &str) -> Result<Availability, ClientError> {
        let envelope = self
            .get_envelope("/isWalletUsed", &[("wallet", wallet)])
            .await?;
        if envelope.success {
            Ok(Availability::Available)
        } else {
            log::debug!("❌ Wallet unavailable: {}", envelope.reason());
            Ok(Availability::Conflict(envelope.reason()))
        }
    }

    async fn submit_registration(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<Verdict, ClientError> {
        let url = format!("{}/reserve", self.base_url);
        log::debug!("→ POST {}", url);

        let response = self.client.post(&url).json(payload).send().await?;
        let envelope = Self::read_envelope(response).await?;

        if envelope.success {
            log::info!("✅ Registration reserved for {}", payload.email);
            Ok(Verdict::Accepted)
        } else {
            log::warn!("❌ Registration rejected: {}", envelope.reason());
            Ok(Verdict::Rejected(envelope.reason()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_without_message() {
        let envelope: ApiEnvelope = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(envelope.success);
        assert!(envelope.message.is_none());
    }

    #[test]
    fn test_envelope_failure_carries_message() {
        let envelope: ApiEnvelope =
            serde_json::from_str(r#"{"success": false, "message": "Code already used"}"#).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.reason(), "Code already used");
    }

    #[test]
    fn test_envelope_tolerates_extra_fields() {
        let envelope: ApiEnvelope =
            serde_json::from_str(r#"{"success": true, "reservationId": 7}"#).unwrap();
        assert!(envelope.success);
    }

    #[test]
    fn test_invite_payload_omits_token_id() {
        let payload = RegistrationPayload {
            code: Some("ABCDE1".to_string()),
            token_id: None,
            email: "a@b.com".to_string(),
            wallet_address: "0xABCDEF0123456789abcdef0123456789ABCDEF01".to_string(),
            signature: "0xsig".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["code"], "ABCDE1");
        assert_eq!(json["walletAddress"], payload.wallet_address);
        assert!(json.get("tokenId").is_none());
    }

    #[test]
    fn test_nft_payload_omits_code() {
        let payload = RegistrationPayload {
            code: None,
            token_id: Some(42),
            email: "a@b.com".to_string(),
            wallet_address: "0xABCDEF0123456789abcdef0123456789ABCDEF01".to_string(),
            signature: "0xsig".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["tokenId"], 42);
        assert!(json.get("code").is_none());
    }
}
