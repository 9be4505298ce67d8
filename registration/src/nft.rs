//! NFT-staking registration flow
//!
//! Entry is gated by proof of staking: the token named by the user must
//! have been staked for at least a week. Each token-id edit issues a keyed
//! stake check; the result drives the eligible/ineligible split and the
//! submit gate. Stake state is re-read on every edit, never cached.

use crate::checks::{CheckOutcome, CheckTicket, FieldCheck};
use crate::error::{FlowError, Result};
use crate::gate::GateInputs;
use mintgate_client::{
    ChainError, ChainReader, RegistrationPayload, Verdict, VerificationApi, WalletError,
    WalletProvider,
};
use mintgate_core::{
    evaluate, parse_token_id, remaining_days, validate_email, validate_wallet_address, StakeRecord,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NftState {
    AwaitingTokenId,
    CheckingStake,
    Ineligible,
    Eligible,
    CollectingDetails,
    AwaitingSignature,
    Submitting,
    Succeeded,
}

/// What the latest settled stake check said about the current token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakeStatus {
    /// No token id entered yet
    Unknown,
    /// A stake check is in flight
    Checking,
    NotStaked,
    Waiting { remaining_wait_secs: u64 },
    Eligible,
    /// The chain read failed; recoverable by re-entering the token id
    Failed(String),
}

impl fmt::Display for StakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StakeStatus::Unknown => write!(f, "Enter a token ID to check staking status"),
            StakeStatus::Checking => write!(f, "Checking staking status..."),
            StakeStatus::NotStaked => {
                write!(f, "This NFT is not staked. Please stake your NFT first.")
            }
            StakeStatus::Waiting { remaining_wait_secs } => write!(
                f,
                "{} days remaining until eligible",
                remaining_days(*remaining_wait_secs)
            ),
            StakeStatus::Eligible => write!(
                f,
                "Staking requirement met! You can proceed with registration."
            ),
            StakeStatus::Failed(reason) => write!(f, "Error checking stake status: {}", reason),
        }
    }
}

/// Handle for an in-flight stake check, keyed to the token id it was
/// issued for.
#[derive(Debug, Clone)]
pub struct StakeTicket {
    pub token_id: u64,
    inner: CheckTicket,
}

pub struct NftFlow {
    state: NftState,
    token_id: Option<u64>,
    stake_check: FieldCheck,
    stake_status: StakeStatus,
    email: String,
    wallet_address: String,
    email_valid: bool,
    wallet_valid: bool,
}

impl NftFlow {
    pub fn new() -> Self {
        Self {
            state: NftState::AwaitingTokenId,
            token_id: None,
            stake_check: FieldCheck::new(),
            stake_status: StakeStatus::Unknown,
            email: String::new(),
            wallet_address: String::new(),
            email_valid: false,
            wallet_valid: false,
        }
    }

    pub fn state(&self) -> NftState {
        self.state
    }

    pub fn stake_status(&self) -> &StakeStatus {
        &self.stake_status
    }

    pub fn token_id(&self) -> Option<u64> {
        self.token_id
    }

    /// Records a token-id edit and issues a keyed stake check for it.
    /// Invalid input clears the stake status and returns the flow to
    /// `AwaitingTokenId`.
    pub fn set_token_id(&mut self, raw: &str) -> Result<StakeTicket> {
        let token_id = match parse_token_id(raw) {
            Ok(token_id) => token_id,
            Err(e) => {
                self.token_id = None;
                self.stake_check.reset();
                self.stake_status = StakeStatus::Unknown;
                self.state = NftState::AwaitingTokenId;
                return Err(e.into());
            }
        };

        self.token_id = Some(token_id);
        self.stake_status = StakeStatus::Checking;
        self.state = NftState::CheckingStake;
        let inner = self.stake_check.begin(&token_id.to_string());
        Ok(StakeTicket { token_id, inner })
    }

    /// Applies a completed stake read for the ticket's token id. Stale
    /// results (the token id changed while the read was in flight) are
    /// dropped and the return value is false. A failed read returns the
    /// flow to `AwaitingTokenId`.
    pub fn apply_stake_result(
        &mut self,
        ticket: &StakeTicket,
        result: std::result::Result<StakeRecord, ChainError>,
        now: u64,
    ) -> bool {
        let outcome = match &result {
            Ok(_) => CheckOutcome::Available,
            Err(e) => CheckOutcome::Errored(e.to_string()),
        };
        if !self.stake_check.apply(&ticket.inner, outcome) {
            return false;
        }

        match result {
            Ok(record) => {
                let eligibility = evaluate(&record, now);
                if !record.is_staked {
                    self.stake_status = StakeStatus::NotStaked;
                    self.state = NftState::Ineligible;
                } else if eligibility.is_eligible {
                    self.stake_status = StakeStatus::Eligible;
                    self.state = NftState::Eligible;
                } else {
                    self.stake_status = StakeStatus::Waiting {
                        remaining_wait_secs: eligibility.remaining_wait_secs,
                    };
                    self.state = NftState::Ineligible;
                }
                log::debug!(
                    "Stake check for token {}: {}",
                    ticket.token_id,
                    self.stake_status
                );
            }
            Err(e) => {
                log::warn!("❌ Stake check failed for token {}: {}", ticket.token_id, e);
                self.stake_status = StakeStatus::Failed(e.to_string());
                self.state = NftState::AwaitingTokenId;
            }
        }
        true
    }

    /// Convenience driver: reads the stake record for the current ticket
    /// and applies it. Equivalent to calling the reader and
    /// [`apply_stake_result`] by hand.
    ///
    /// [`apply_stake_result`]: NftFlow::apply_stake_result
    pub async fn run_stake_check(
        &mut self,
        ticket: &StakeTicket,
        reader: &dyn ChainReader,
        now: u64,
    ) -> bool {
        let result = reader.get_stake_record(ticket.token_id).await;
        self.apply_stake_result(ticket, result, now)
    }

    pub fn set_email(&mut self, value: &str) {
        self.email = value.trim().to_string();
        self.email_valid = validate_email(&self.email).is_ok();
        self.enter_details();
    }

    pub fn set_wallet_address(&mut self, value: &str) {
        self.wallet_address = value.trim().to_string();
        self.wallet_valid = validate_wallet_address(&self.wallet_address).is_ok();
        self.enter_details();
    }

    /// Entering details moves an eligible flow into its collection stage.
    fn enter_details(&mut self) {
        if self.state == NftState::Eligible {
            self.state = NftState::CollectingDetails;
        }
    }

    /// Fills the wallet field from the provider's active account.
    pub async fn connect_wallet(&mut self, provider: &dyn WalletProvider) -> Result<()> {
        let accounts = provider.request_accounts().await?;
        let active = accounts
            .first()
            .ok_or_else(|| WalletError::Request("no accounts available".to_string()))?;
        self.set_wallet_address(active);
        Ok(())
    }

    /// Gate conditions: submission readiness is the AND of stake
    /// eligibility and field validity, never either alone.
    pub fn gate(&self) -> GateInputs {
        GateInputs {
            fields_valid: self.email_valid && self.wallet_valid && self.token_id.is_some(),
            checks_settled: !self.stake_check.is_pending(),
            no_conflict: !matches!(self.stake_status, StakeStatus::Failed(_)),
            proof_satisfied: matches!(self.stake_status, StakeStatus::Eligible),
            not_in_flight: !matches!(
                self.state,
                NftState::CheckingStake | NftState::AwaitingSignature | NftState::Submitting
            ),
        }
    }

    /// Requests a signature over the fixed NFT message and submits the
    /// reservation. The payload carries the token id in place of an invite
    /// code; success resets everything to `AwaitingTokenId`.
    pub async fn submit(
        &mut self,
        provider: &dyn WalletProvider,
        api: &dyn VerificationApi,
    ) -> Result<()> {
        let gate = self.gate();
        if !gate.submit_allowed() {
            if let StakeStatus::Waiting { remaining_wait_secs } = self.stake_status {
                return Err(FlowError::Ineligible(format!(
                    "please wait {} more days",
                    remaining_days(remaining_wait_secs)
                )));
            }
            if matches!(self.stake_status, StakeStatus::NotStaked) {
                return Err(FlowError::Ineligible(
                    "you need to stake your NFT for at least a week".to_string(),
                ));
            }
            return Err(FlowError::NotReady(gate.blockers().join(", ")));
        }
        // Gate passed, so a token id is present.
        let token_id = self.token_id.unwrap_or_default();
        let return_state = self.state;

        self.state = NftState::AwaitingSignature;
        let message = format!("Register with NFT token ID: {}", token_id);
        let signature = match provider.personal_sign(&message, &self.wallet_address).await {
            Ok(signature) => signature,
            Err(e) => {
                self.state = return_state;
                return Err(e.into());
            }
        };

        self.state = NftState::Submitting;
        let payload = RegistrationPayload {
            code: None,
            token_id: Some(token_id),
            email: self.email.clone(),
            wallet_address: self.wallet_address.clone(),
            signature,
        };

        let verdict = match api.submit_registration(&payload).await {
            Ok(verdict) => verdict,
            Err(e) => {
                self.state = return_state;
                return Err(e.into());
            }
        };

        match verdict {
            Verdict::Accepted => {
                self.state = NftState::Succeeded;
                log::info!("✅ NFT registration completed for {}", payload.email);
                self.reset();
                Ok(())
            }
            Verdict::Rejected(reason) => {
                self.state = return_state;
                Err(FlowError::Rejected(reason))
            }
        }
    }

    /// Clears all form state and returns to `AwaitingTokenId`.
    pub fn reset(&mut self) {
        self.state = NftState::AwaitingTokenId;
        self.token_id = None;
        self.stake_check.reset();
        self.stake_status = StakeStatus::Unknown;
        self.email.clear();
        self.wallet_address.clear();
        self.email_valid = false;
        self.wallet_valid = false;
    }
}

impl Default for NftFlow {
    fn default() -> Self {
        Self::new()
    }
}
