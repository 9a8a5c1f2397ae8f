//! Error types and handling.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the bearer token (HTTP 401)
    #[error("Session expired or not authenticated")]
    Unauthorized,

    /// Backend answered with a non-success status
    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Server { status: u16, message: Option<String> },

    /// Form input rejected before submission
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Message reported by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether this error means the session is no longer valid.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Text suitable for an alert: the server message when present, otherwise
    /// the error itself.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            _ => self.server_message().map(str::to_string).unwrap_or_else(|| self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_present() {
        let err = AppError::Server {
            status: 400,
            message: Some("name should not be empty".to_string()),
        };
        assert_eq!(err.server_message(), Some("name should not be empty"));
        assert_eq!(err.user_message(), "name should not be empty");
    }

    #[test]
    fn test_server_message_absent() {
        let err = AppError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.server_message(), None);
        assert_eq!(err.user_message(), "Server error (500): no details");
    }

    #[test]
    fn test_validation_user_message_is_bare() {
        let err = AppError::validation("Please select a doctor.");
        assert_eq!(err.user_message(), "Please select a doctor.");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized() {
        assert!(AppError::Unauthorized.is_unauthorized());
        assert_eq!(AppError::Unauthorized.server_message(), None);
    }
}
