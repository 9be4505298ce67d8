//! Submit gate
//!
//! Submission readiness is the logical AND of five independent conditions,
//! explicit and re-derived from flow state on every query, never cached.

/// Inputs to the submit gate, one flag per gating condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateInputs {
    /// Every field-level validation passes
    pub fields_valid: bool,
    /// No remote check is still in flight
    pub checks_settled: bool,
    /// No settled check reported a conflict or failed outright
    pub no_conflict: bool,
    /// Proof of entry holds: verified invite code, or stake eligibility
    pub proof_satisfied: bool,
    /// No submission is already in flight
    pub not_in_flight: bool,
}

impl GateInputs {
    /// True only when every condition holds.
    pub fn submit_allowed(&self) -> bool {
        self.fields_valid
            && self.checks_settled
            && self.no_conflict
            && self.proof_satisfied
            && self.not_in_flight
    }

    /// Human-readable reasons the gate is closed, empty when open.
    pub fn blockers(&self) -> Vec<&'static str> {
        let mut reasons = Vec::new();
        if !self.fields_valid {
            reasons.push("one or more fields are invalid");
        }
        if !self.checks_settled {
            reasons.push("a check is still in progress");
        }
        if !self.no_conflict {
            reasons.push("an availability check reported a conflict");
        }
        if !self.proof_satisfied {
            reasons.push("entry requirement not met");
        }
        if !self.not_in_flight {
            reasons.push("a submission is already in flight");
        }
        reasons
    }
}
