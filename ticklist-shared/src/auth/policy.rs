//! Password strength policy
//!
//! Applied once, at sign-up, before the password is hashed. It has no effect
//! on sign-in, so accounts created under an older policy keep working.
//!
//! Rules (all independent, every violation is reported):
//!
//! - at least [`MIN_PASSWORD_LENGTH`] characters
//! - at least one ASCII digit
//! - at least one symbol from [`PASSWORD_SYMBOLS`]

/// Minimum number of characters (Unicode scalar values)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters that satisfy the symbol rule (ASCII punctuation)
pub const PASSWORD_SYMBOLS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// A rule the password does not satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    #[error("Password must be at least 8 characters long.")]
    TooShort,

    #[error("Password must contain at least one number.")]
    MissingDigit,

    #[error("Password must contain at least one symbol such as ! @ # $ %.")]
    MissingSymbol,
}

/// Checks `password` against every rule
///
/// # Example
///
/// ```
/// use ticklist_shared::auth::policy::{validate, PolicyViolation};
///
/// assert!(validate("abc123!!").is_ok());
/// assert_eq!(validate("abc12345"), Err(vec![PolicyViolation::MissingSymbol]));
/// ```
pub fn validate(password: &str) -> Result<(), Vec<PolicyViolation>> {
    let mut violations = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(PolicyViolation::TooShort);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(PolicyViolation::MissingDigit);
    }

    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        violations.push(PolicyViolation::MissingSymbol);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
