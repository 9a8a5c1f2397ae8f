//! Login and registration DTOs.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Body of `POST /auth/login` and `POST /auth/register`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// Check login input before sending it.
    pub fn validate_login(&self) -> Result<()> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AppError::validation("Email and password are required."));
        }
        Ok(())
    }

    /// Check registration input before sending it.
    pub fn validate_registration(&self) -> Result<()> {
        self.validate_login()?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long."
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_password_rejected_on_registration() {
        let creds = Credentials::new("desk@clinic.com", "12345");
        let err = creds.validate_registration().unwrap_err();
        assert_eq!(err.user_message(), "Password must be at least 6 characters long.");
    }

    #[test]
    fn test_short_password_allowed_on_login() {
        let creds = Credentials::new("desk@clinic.com", "123");
        assert!(creds.validate_login().is_ok());
    }

    #[test]
    fn test_six_characters_is_enough() {
        let creds = Credentials::new("desk@clinic.com", "123456");
        assert!(creds.validate_registration().is_ok());
    }

    #[test]
    fn test_email_trimmed() {
        let creds = Credentials::new("  desk@clinic.com ", "secret1");
        assert_eq!(creds.email, "desk@clinic.com");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("desk@clinic.com", "hunter22");
        assert!(!format!("{creds:?}").contains("hunter22"));
    }
}
