//! Invite-code registration flow
//!
//! Two-step flow: verify a pre-issued code, then collect details, obtain a
//! signature over a message embedding the verified code, and reserve. Any
//! failure returns the controller to the state preceding the failed
//! operation; a successful reservation resets all form state back to
//! `AwaitingCode`.

use crate::checks::{CheckOutcome, CheckStatus, CheckTicket, FieldCheck};
use crate::error::{FlowError, Result};
use crate::gate::GateInputs;
use mintgate_client::{
    RegistrationPayload, Verdict, VerificationApi, WalletError, WalletProvider,
};
use mintgate_core::{
    normalize_invite_code, validate_email, validate_invite_code, validate_wallet_address,
    GateConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteState {
    AwaitingCode,
    CodeVerifying,
    CollectingDetails,
    AwaitingSignature,
    Submitting,
    Succeeded,
}

pub struct InviteFlow {
    state: InviteState,
    min_code_len: usize,
    verified_code: Option<String>,
    email: String,
    wallet_address: String,
    email_valid: bool,
    wallet_valid: bool,
    email_check: FieldCheck,
    wallet_check: FieldCheck,
}

impl InviteFlow {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            state: InviteState::AwaitingCode,
            min_code_len: config.invite_code_min_len,
            verified_code: None,
            email: String::new(),
            wallet_address: String::new(),
            email_valid: false,
            wallet_valid: false,
            email_check: FieldCheck::new(),
            wallet_check: FieldCheck::new(),
        }
    }

    pub fn state(&self) -> InviteState {
        self.state
    }

    pub fn verified_code(&self) -> Option<&str> {
        self.verified_code.as_deref()
    }

    pub fn email_check_status(&self) -> &CheckStatus {
        self.email_check.status()
    }

    pub fn wallet_check_status(&self) -> &CheckStatus {
        self.wallet_check.status()
    }

    /// Submits an invite code for remote verification. The code is
    /// normalized to uppercase before length validation and forwarding.
    /// Rejection or a failed call returns the flow to `AwaitingCode`.
    pub async fn submit_code(&mut self, raw: &str, api: &dyn VerificationApi) -> Result<()> {
        if self.state != InviteState::AwaitingCode {
            return Err(FlowError::NotReady(
                "a code has already been verified".to_string(),
            ));
        }

        let code = normalize_invite_code(raw);
        validate_invite_code(&code, self.min_code_len)?;

        self.state = InviteState::CodeVerifying;
        let verdict = match api.verify_invite_code(&code).await {
            Ok(verdict) => verdict,
            Err(e) => {
                self.state = InviteState::AwaitingCode;
                return Err(e.into());
            }
        };

        match verdict {
            Verdict::Accepted => {
                log::info!("✅ Invite code verified");
                self.verified_code = Some(code);
                self.state = InviteState::CollectingDetails;
                Ok(())
            }
            Verdict::Rejected(reason) => {
                self.state = InviteState::AwaitingCode;
                Err(FlowError::Rejected(reason))
            }
        }
    }

    /// Records an email edit. Returns a ticket when the value is valid and
    /// an availability check should be issued for it; an invalid value
    /// clears any previous check result instead.
    pub fn set_email(&mut self, value: &str) -> Option<CheckTicket> {
        self.email = value.trim().to_string();
        self.email_valid = validate_email(&self.email).is_ok();

        if self.email_valid {
            Some(self.email_check.begin(&self.email))
        } else {
            self.email_check.reset();
            None
        }
    }

    /// Records a wallet-address edit, same contract as [`set_email`].
    ///
    /// [`set_email`]: InviteFlow::set_email
    pub fn set_wallet_address(&mut self, value: &str) -> Option<CheckTicket> {
        self.wallet_address = value.trim().to_string();
        self.wallet_valid = validate_wallet_address(&self.wallet_address).is_ok();

        if self.wallet_valid {
            Some(self.wallet_check.begin(&self.wallet_address))
        } else {
            self.wallet_check.reset();
            None
        }
    }

    /// Fills the wallet field from the provider's active account.
    pub async fn connect_wallet(
        &mut self,
        provider: &dyn WalletProvider,
    ) -> Result<Option<CheckTicket>> {
        let accounts = provider.request_accounts().await?;
        let active = accounts
            .first()
            .ok_or_else(|| WalletError::Request("no accounts available".to_string()))?;
        Ok(self.set_wallet_address(active))
    }

    /// Applies a completed email availability check; stale results are
    /// dropped and the return value says whether the result landed.
    pub fn apply_email_check(&mut self, ticket: &CheckTicket, outcome: CheckOutcome) -> bool {
        self.email_check.apply(ticket, outcome)
    }

    pub fn apply_wallet_check(&mut self, ticket: &CheckTicket, outcome: CheckOutcome) -> bool {
        self.wallet_check.apply(ticket, outcome)
    }

    /// Gate conditions derived from current state, never cached.
    pub fn gate(&self) -> GateInputs {
        GateInputs {
            fields_valid: self.email_valid && self.wallet_valid,
            checks_settled: !self.email_check.is_pending() && !self.wallet_check.is_pending(),
            no_conflict: !self.email_check.is_blocking() && !self.wallet_check.is_blocking(),
            proof_satisfied: self.verified_code.is_some(),
            not_in_flight: !matches!(
                self.state,
                InviteState::CodeVerifying | InviteState::AwaitingSignature | InviteState::Submitting
            ),
        }
    }

    /// Requests a signature over the fixed invite message and submits the
    /// reservation. Signature failure and rejection both return the flow to
    /// `CollectingDetails`; success resets everything to the initial state.
    pub async fn submit(
        &mut self,
        provider: &dyn WalletProvider,
        api: &dyn VerificationApi,
    ) -> Result<()> {
        let gate = self.gate();
        if !gate.submit_allowed() {
            return Err(FlowError::NotReady(gate.blockers().join(", ")));
        }
        // Gate passed, so the code is present.
        let code = self.verified_code.clone().unwrap_or_default();

        self.state = InviteState::AwaitingSignature;
        let message = format!("Register with invite code: {}", code);
        let signature = match provider.personal_sign(&message, &self.wallet_address).await {
            Ok(signature) => signature,
            Err(e) => {
                self.state = InviteState::CollectingDetails;
                return Err(e.into());
            }
        };

        self.state = InviteState::Submitting;
        let payload = RegistrationPayload {
            code: Some(code),
            token_id: None,
            email: self.email.clone(),
            wallet_address: self.wallet_address.clone(),
            signature,
        };

        let verdict = match api.submit_registration(&payload).await {
            Ok(verdict) => verdict,
            Err(e) => {
                self.state = InviteState::CollectingDetails;
                return Err(e.into());
            }
        };

        match verdict {
            Verdict::Accepted => {
                self.state = InviteState::Succeeded;
                log::info!("✅ Registration completed for {}", payload.email);
                self.reset();
                Ok(())
            }
            Verdict::Rejected(reason) => {
                self.state = InviteState::CollectingDetails;
                Err(FlowError::Rejected(reason))
            }
        }
    }

    /// Clears all form state and returns to `AwaitingCode`.
    pub fn reset(&mut self) {
        self.state = InviteState::AwaitingCode;
        self.verified_code = None;
        self.email.clear();
        self.wallet_address.clear();
        self.email_valid = false;
        self.wallet_valid = false;
        self.email_check.reset();
        self.wallet_check.reset();
    }
}
