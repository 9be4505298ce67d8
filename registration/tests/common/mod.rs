//! Hand-written fakes for the external collaborators, so flow tests run
//! without a network, a chain, or a wallet.

use async_trait::async_trait;
use mintgate_client::{
    Availability, ChainError, ChainReader, ClientError, RegistrationPayload, Verdict,
    VerificationApi, WalletError, WalletProvider,
};
use mintgate_core::StakeRecord;
use std::collections::HashMap;
use std::sync::Mutex;

/// Scripted verification API recording every submission it accepts a call
/// for.
pub struct FakeApi {
    pub code_verdict: Verdict,
    pub email_availability: Availability,
    pub wallet_availability: Availability,
    pub submit_verdict: Verdict,
    pub submissions: Mutex<Vec<RegistrationPayload>>,
}

impl FakeApi {
    pub fn accepting() -> Self {
        Self {
            code_verdict: Verdict::Accepted,
            email_availability: Availability::Available,
            wallet_availability: Availability::Available,
            submit_verdict: Verdict::Accepted,
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn submissions(&self) -> Vec<RegistrationPayload> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl VerificationApi for FakeApi {
    async fn verify_invite_code(&self, _code: &str) -> Result<Verdict, ClientError> {
        Ok(self.code_verdict.clone())
    }

    async fn check_email_available(&self, _email: &str) -> Result<Availability, ClientError> {
        Ok(self.email_availability.clone())
    }

    async fn check_wallet_available(&self, _wallet: &str) -> Result<Availability, ClientError> {
        Ok(self.wallet_availability.clone())
    }

    async fn submit_registration(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<Verdict, ClientError> {
        self.submissions.lock().unwrap().push(payload.clone());
        Ok(self.submit_verdict.clone())
    }
}

/// Chain reader serving stake records from a map; unknown tokens fail the
/// read the way a reverting contract would.
pub struct FakeChain {
    pub records: HashMap<u64, StakeRecord>,
}

impl FakeChain {
    pub fn with_record(record: StakeRecord) -> Self {
        let mut records = HashMap::new();
        records.insert(record.token_id, record);
        Self { records }
    }

    pub fn empty() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn get_stake_record(&self, token_id: u64) -> Result<StakeRecord, ChainError> {
        self.records
            .get(&token_id)
            .copied()
            .ok_or_else(|| ChainError::ContractRevert("unknown token".to_string()))
    }

    async fn meets_staking_requirement(&self, token_id: u64) -> Result<bool, ChainError> {
        Ok(self
            .records
            .get(&token_id)
            .map(|r| r.is_staked)
            .unwrap_or(false))
    }
}

/// Wallet returning a fixed account and signature, recording every message
/// it was asked to sign.
pub struct FakeWallet {
    pub address: String,
    pub signature: String,
    pub fail_sign: bool,
    pub signed_messages: Mutex<Vec<(String, String)>>,
}

impl FakeWallet {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            signature: "0xfakesignature".to_string(),
            fail_sign: false,
            signed_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn signed_messages(&self) -> Vec<(String, String)> {
        self.signed_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        Ok(vec![self.address.clone()])
    }

    async fn personal_sign(&self, message: &str, address: &str) -> Result<String, WalletError> {
        if self.fail_sign {
            return Err(WalletError::Request("user rejected signing".to_string()));
        }
        self.signed_messages
            .lock()
            .unwrap()
            .push((message.to_string(), address.to_string()));
        Ok(self.signature.clone())
    }
}

pub const WALLET: &str = "0xABCDEF0123456789abcdef0123456789ABCDEF01";
