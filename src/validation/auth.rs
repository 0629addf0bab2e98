use crate::error::{AppError, Result};

/// Validates a username.
///
/// # Arguments
///
/// * `username` - The username to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the username is valid.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || username.len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters long".to_string(),
        ));
    }

    if username.len() > 255 {
        return Err(AppError::Validation(
            "Username must be at most 255 characters".to_string(),
        ));
    }

    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(AppError::Validation(
            "Username can only contain letters, numbers, underscores, and hyphens".to_string(),
        ));
    }

    Ok(())
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates an email address: a single `@` with a dotted domain.
pub fn validate_email(email: &str) -> Result<()> {
    if email.len() > 255 {
        return Err(AppError::Validation(
            "Email must be at most 255 characters".to_string(),
        ));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_are_checked_for_length_and_charset() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_username(&"a".repeat(256)).is_err());
    }

    #[test]
    fn emails_need_a_local_part_and_a_dotted_domain() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@com").is_err());
        assert!(validate_email("alice@.com").is_err());
    }

    #[test]
    fn passwords_are_length_bounded() {
        assert!(validate_password("secretpw").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }
}
