//! Users Data

use std::fmt;

use crate::{
    auth::MIN_PASSWORD_CHARS,
    domain::users::{
        errors::UsersServiceError,
        records::{UserRole, UserUuid},
    },
};

const MAX_FULL_NAME_CHARS: usize = 200;

/// New User Data
#[derive(Clone, PartialEq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("uuid", &self.uuid)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .field("role", &self.role)
            .finish()
    }
}

/// Profile Update Data
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Password Change Data
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordChange(**redacted**)")
    }
}

/// Normalise an email address for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn validate_full_name(full_name: &str) -> Result<(), UsersServiceError> {
    let chars = full_name.trim().chars().count();

    if chars == 0 || chars > MAX_FULL_NAME_CHARS {
        return Err(UsersServiceError::InvalidData(
            "full name must be between 1 and 200 characters",
        ));
    }

    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), UsersServiceError> {
    let invalid = UsersServiceError::InvalidData("email address is invalid");

    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid);
    };

    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid);
    }

    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), UsersServiceError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(UsersServiceError::InvalidData(
            "password must be at least 8 characters",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalisation_trims_and_lowercases() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("jane.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("jane@").is_err());
        assert!(validate_email("jane@ex@ample.com").is_err());
        assert!(validate_email("ja ne@example.com").is_err());
    }

    #[test]
    fn password_and_name_bounds() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
        assert!(validate_full_name("   ").is_err());
        assert!(validate_full_name(&"x".repeat(201)).is_err());
        assert!(validate_full_name("Jane Doe").is_ok());
    }
}
