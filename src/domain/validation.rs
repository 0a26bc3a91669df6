use validator::ValidationError;

use crate::constants::MIN_PASSWORD_LENGTH;

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Cannot be empty".into());
        return Err(error);
    }
    Ok(())
}

/// Length is the only rule; whitespace-only passwords are rejected as well.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH as usize {
        let mut error = ValidationError::new("password_length");
        error.message = Some(format!("Must be at least {} characters", MIN_PASSWORD_LENGTH).into());
        return Err(error);
    }

    validate_not_blank(password)
}

/// Emails are compared and stored trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
