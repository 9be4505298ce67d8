//! Field-level validation for registration inputs
//!
//! Validation is local and recoverable: a failure means the user edits the
//! field and tries again. It runs on every field change and gates both the
//! availability checks and final submission.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid wallet address")]
    InvalidWalletAddress,

    #[error("Invite code must be at least {min_len} characters")]
    InviteCodeTooShort { min_len: usize },

    #[error("Token ID must be a non-negative integer")]
    InvalidTokenId,
}

/// Checks a reasonable email grammar: one `@`, a non-empty local part, and
/// a dotted domain with non-empty labels. No attempt at full RFC 5322.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(ValidationError::InvalidEmail),
    };

    if local.is_empty() || email.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }

    if !domain.contains('.') || domain.split('.').any(|label| label.is_empty()) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

/// Wallet addresses are `0x` followed by exactly 40 hex digits. No checksum
/// validation is performed.
pub fn validate_wallet_address(address: &str) -> Result<(), ValidationError> {
    let hex_part = address
        .strip_prefix("0x")
        .ok_or(ValidationError::InvalidWalletAddress)?;

    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidWalletAddress);
    }

    Ok(())
}

/// Invite codes are entered case-insensitively and forwarded uppercase.
pub fn normalize_invite_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Checks the (normalized) code against the configured minimum length.
pub fn validate_invite_code(code: &str, min_len: usize) -> Result<(), ValidationError> {
    if code.trim().len() < min_len {
        return Err(ValidationError::InviteCodeTooShort { min_len });
    }
    Ok(())
}

/// Parses a token-id field. Rejects signs, decimals and anything non-numeric.
pub fn parse_token_id(raw: &str) -> Result<u64, ValidationError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidTokenId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("user.name+tag@example.co.uk").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert!(validate_email("").is_err());
        assert!(validate_email("plainaddress").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a@b..com").is_err());
        assert!(validate_email("a b@example.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn test_valid_wallet_address() {
        assert!(validate_wallet_address("0xABCDEF0123456789abcdef0123456789ABCDEF01").is_ok());
    }

    #[test]
    fn test_invalid_wallet_addresses() {
        // Non-hex characters
        assert!(validate_wallet_address("0xZZZDEF0123456789abcdef0123456789ABCDEF01").is_err());
        // Too short / too long
        assert!(validate_wallet_address("0xABCDEF0123456789abcdef0123456789ABCDEF0").is_err());
        assert!(validate_wallet_address("0xABCDEF0123456789abcdef0123456789ABCDEF012").is_err());
        // Missing prefix
        assert!(validate_wallet_address("ABCDEF0123456789abcdef0123456789ABCDEF0101").is_err());
        assert!(validate_wallet_address("").is_err());
    }

    #[test]
    fn test_invite_code_normalization() {
        assert_eq!(normalize_invite_code("abcde1"), "ABCDE1");
        assert_eq!(normalize_invite_code("  AbCdE1  "), "ABCDE1");
    }

    #[test]
    fn test_invite_code_length() {
        assert!(validate_invite_code("ABCDE1", 6).is_ok());
        assert!(validate_invite_code("ABCDE", 6).is_err());
        // Alternate schema variant: minimum of 1
        assert!(validate_invite_code("A", 1).is_ok());
        assert!(validate_invite_code("", 1).is_err());
    }

    #[test]
    fn test_token_id_parsing() {
        assert_eq!(parse_token_id("0").unwrap(), 0);
        assert_eq!(parse_token_id(" 1234 ").unwrap(), 1234);
        assert!(parse_token_id("-1").is_err());
        assert!(parse_token_id("1.5").is_err());
        assert!(parse_token_id("abc").is_err());
        assert!(parse_token_id("").is_err());
    }
}
