//! Credential input validation.

use ticketline_core::{DomainError, Result};

/// Bounds on username length.
const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 64;

/// Bounds on password length. The upper bound guards the hasher against
/// absurd inputs; Argon2 itself has no practical limit.
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 128;

/// Validate a username at registration time.
///
/// Usernames are 3-64 characters from `[A-Za-z0-9._-]`.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] describing the first failed rule.
pub fn validate_username(username: &str) -> Result<()> {
    if username.len() < USERNAME_MIN || username.len() > USERNAME_MAX {
        return Err(DomainError::Validation(format!(
            "Username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(DomainError::Validation(
            "Username may only contain letters, digits, '.', '_' and '-'".to_string(),
        ));
    }
    Ok(())
}

/// Validate a password at registration time.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] if the password is too short or too
/// long.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < PASSWORD_MIN || password.len() > PASSWORD_MAX {
        return Err(DomainError::Validation(format!(
            "Password must be between {PASSWORD_MIN} and {PASSWORD_MAX} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_username() {
        assert!(validate_username("alice.w-42").is_ok());
    }

    #[test]
    fn rejects_short_username() {
        assert!(validate_username("ab").is_err());
    }

    #[test]
    fn rejects_username_with_spaces() {
        assert!(validate_username("alice smith").is_err());
    }

    #[test]
    fn rejects_short_password() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
    }
}
