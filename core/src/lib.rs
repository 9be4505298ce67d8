//! Mintgate core domain types
//!
//! Pure, I/O-free building blocks for the stake-gated registration flows:
//! stake records and eligibility evaluation, field validation, and
//! configuration. Everything here is deterministic and testable in
//! isolation; the chain and the verification API live in `mintgate-client`.

pub mod config;
pub mod stake;
pub mod validation;

pub use config::{ConfigError, GateConfig};
pub use stake::{evaluate, remaining_days, EligibilityResult, StakeRecord};
pub use validation::{
    normalize_invite_code, parse_token_id, validate_email, validate_invite_code,
    validate_wallet_address, ValidationError,
};

/// Staking duration required before a token becomes eligible (one week).
pub const STAKING_REQUIREMENT_SECS: u64 = 7 * 24 * 3600;

/// Seconds in a day, for remaining-time display.
pub const SECS_PER_DAY: u64 = 24 * 3600;

/// Core module version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staking_requirement_is_one_week() {
        assert_eq!(STAKING_REQUIREMENT_SECS, 604_800);
    }
}
