//! Keyed availability checks
//!
//! A check is issued for the field value current at the time of issue and
//! carries a generation number. Editing the field bumps the generation, so
//! a response that comes back for an older value no longer matches and is
//! dropped silently. This supersede-by-key scheme replaces cancellation:
//! in-flight requests are never aborted, their results just stop mattering.

/// Result of a completed availability check. A conflict and a transport
/// error both block submission; they differ only in how the user recovers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Available,
    Conflict(String),
    Errored(String),
}

impl From<mintgate_client::Availability> for CheckOutcome {
    fn from(availability: mintgate_client::Availability) -> Self {
        match availability {
            mintgate_client::Availability::Available => CheckOutcome::Available,
            mintgate_client::Availability::Conflict(msg) => CheckOutcome::Conflict(msg),
        }
    }
}

/// Current standing of one field's check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Field is empty or invalid, nothing to check
    NotRequested,
    /// A check is in flight for the current value
    Pending,
    Available,
    Conflict(String),
    Errored(String),
}

/// Handle returned when a check is issued. Must be presented back with the
/// result; only the ticket matching the latest issue is accepted.
#[derive(Debug, Clone)]
pub struct CheckTicket {
    pub value: String,
    generation: u64,
}

/// Per-field check bookkeeping.
#[derive(Debug, Clone)]
pub struct FieldCheck {
    generation: u64,
    status: CheckStatus,
}

impl FieldCheck {
    pub fn new() -> Self {
        Self {
            generation: 0,
            status: CheckStatus::NotRequested,
        }
    }

    /// Issues a check for `value`, superseding any in-flight check.
    pub fn begin(&mut self, value: &str) -> CheckTicket {
        self.generation += 1;
        self.status = CheckStatus::Pending;
        CheckTicket {
            value: value.to_string(),
            generation: self.generation,
        }
    }

    /// Invalidates the current check, e.g. when the field turned invalid.
    /// Also supersedes any in-flight result.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.status = CheckStatus::NotRequested;
    }

    /// Applies a completed check. Returns false (and changes nothing) when
    /// the ticket was superseded by a newer edit.
    pub fn apply(&mut self, ticket: &CheckTicket, outcome: CheckOutcome) -> bool {
        if ticket.generation != self.generation {
            log::debug!("Dropping stale check result for '{}'", ticket.value);
            return false;
        }
        self.status = match outcome {
            CheckOutcome::Available => CheckStatus::Available,
            CheckOutcome::Conflict(msg) => CheckStatus::Conflict(msg),
            CheckOutcome::Errored(msg) => CheckStatus::Errored(msg),
        };
        true
    }

    pub fn status(&self) -> &CheckStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, CheckStatus::Pending)
    }

    /// True when the settled result blocks submission.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self.status,
            CheckStatus::Conflict(_) | CheckStatus::Errored(_)
        )
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, CheckStatus::Available)
    }
}

impl Default for FieldCheck {
    fn default() -> Self {
        Self::new()
    }
}
