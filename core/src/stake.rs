//! Stake records and eligibility evaluation
//!
//! A `StakeRecord` is a read-only snapshot of a token's on-chain stake
//! state. Eligibility is never stored: it is recomputed from a record and
//! the current time on every check, so the chain stays the single source
//! of truth.

use crate::{SECS_PER_DAY, STAKING_REQUIREMENT_SECS};
use serde::{Deserialize, Serialize};

/// On-chain stake state for a single token, as returned by the gating
/// contract's `stakes(tokenId)` view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StakeRecord {
    pub token_id: u64,
    pub is_staked: bool,
    /// Unix timestamp (seconds) at which the token was staked
    pub stake_timestamp: u64,
    /// Unix timestamp of the last stake/unstake action
    pub last_action_timestamp: u64,
}

/// Outcome of evaluating a stake record against the staking requirement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EligibilityResult {
    pub is_eligible: bool,
    /// Seconds left until the requirement is met. Zero when eligible, and
    /// zero by convention when the token is not staked at all; callers must
    /// check `StakeRecord::is_staked` to tell those apart.
    pub remaining_wait_secs: u64,
}

/// Evaluates a stake record at time `now` (unix seconds).
///
/// Deterministic and side-effect-free. An unstaked token is never eligible.
/// A staked token is eligible once a full week has elapsed since
/// `stake_timestamp`. A stake timestamp in the future (clock skew, bad
/// chain data) clamps elapsed time to zero, so the full wait is reported.
pub fn evaluate(record: &StakeRecord, now: u64) -> EligibilityResult {
    if !record.is_staked {
        return EligibilityResult {
            is_eligible: false,
            remaining_wait_secs: 0,
        };
    }

    let elapsed = now.saturating_sub(record.stake_timestamp);
    let remaining = STAKING_REQUIREMENT_SECS.saturating_sub(elapsed);

    EligibilityResult {
        is_eligible: remaining == 0,
        remaining_wait_secs: remaining,
    }
}

/// Remaining wait expressed in whole days, rounded up, for display
/// ("4 days remaining").
pub fn remaining_days(remaining_wait_secs: u64) -> u64 {
    remaining_wait_secs.div_ceil(SECS_PER_DAY)
}
