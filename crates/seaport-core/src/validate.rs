//! Local input checks run before anything is sent to the backend.

use thiserror::Error;

use crate::models::UserUpdate;

/// Maximum length for the login identifier (RFC 5321 address limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
pub const MAX_PASSWORD_LENGTH: usize = 128;

pub const MAX_TITLE_LENGTH: usize = 200;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Email must be a valid address")]
    InvalidEmail,

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{0} contains control characters")]
    ControlCharacters(&'static str),

    #[error("Nothing to update")]
    EmptyUpdate,
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    if value.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacters(field));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    check_text("Email", email, MAX_EMAIL_LENGTH)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidEmail),
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    check_email(email)?;
    check_text("Password", password, MAX_PASSWORD_LENGTH)
}

/// Titles are required; descriptions may be empty
pub fn validate_item(title: &str, description: &str) -> Result<(), ValidationError> {
    check_text("Title", title, MAX_TITLE_LENGTH)?;
    if description.chars().any(|c| c.is_control() && c != '\n' && c != '\t') {
        return Err(ValidationError::ControlCharacters("Description"));
    }
    Ok(())
}

pub fn validate_update(update: &UserUpdate) -> Result<(), ValidationError> {
    if update.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }
    if let Some(ref name) = update.full_name {
        check_text("Full name", name, MAX_TITLE_LENGTH)?;
    }
    if let Some(ref email) = update.email {
        check_email(email)?;
    }
    if let Some(ref password) = update.password {
        check_text("Password", password, MAX_PASSWORD_LENGTH)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_login() {
        assert!(validate_login("a@b.com", "secret").is_ok());
        assert_eq!(validate_login("", "secret"), Err(ValidationError::Required("Email")));
        assert_eq!(validate_login("   ", "secret"), Err(ValidationError::Required("Email")));
        assert_eq!(validate_login("ab.com", "secret"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_login("a@", "secret"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_login("a@b.com", ""), Err(ValidationError::Required("Password")));
    }

    #[test]
    fn test_validate_login_limits() {
        let long_password = "x".repeat(MAX_PASSWORD_LENGTH + 1);
        assert_eq!(
            validate_login("a@b.com", &long_password),
            Err(ValidationError::TooLong { field: "Password", max: MAX_PASSWORD_LENGTH })
        );
        assert!(validate_login("a@b.com", &"x".repeat(MAX_PASSWORD_LENGTH)).is_ok());
        assert_eq!(
            validate_login("a@b.com", "sec\nret"),
            Err(ValidationError::ControlCharacters("Password"))
        );
    }

    #[test]
    fn test_validate_item() {
        assert!(validate_item("x", "").is_ok());
        assert!(validate_item("x", "line one\nline two").is_ok());
        assert_eq!(validate_item("", "y"), Err(ValidationError::Required("Title")));
        assert_eq!(
            validate_item("x", "bell\x07"),
            Err(ValidationError::ControlCharacters("Description"))
        );
    }

    #[test]
    fn test_validate_update() {
        assert_eq!(validate_update(&UserUpdate::default()), Err(ValidationError::EmptyUpdate));
        let rename = UserUpdate {
            full_name: Some("A B".to_string()),
            ..Default::default()
        };
        assert!(validate_update(&rename).is_ok());
        let bad_email = UserUpdate {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_update(&bad_email), Err(ValidationError::InvalidEmail));
    }
}
