//! Error types for notely-core

use thiserror::Error;

/// Result type alias using notely-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in notely-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure (connect, timeout, body decode)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("API error: {message} ({status})")]
    Api { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input rejected before reaching the service
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status code for errors returned by the service, if any.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the service reported the entity as missing.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_renders_message_and_status() {
        let error = Error::Api {
            status: 404,
            message: "Note not found".to_string(),
        };
        assert_eq!(error.to_string(), "API error: Note not found (404)");
        assert_eq!(error.status(), Some(404));
        assert!(error.is_not_found());
    }

    #[test]
    fn invalid_input_has_no_status() {
        let error = Error::InvalidInput("title is required".to_string());
        assert_eq!(error.status(), None);
        assert!(!error.is_not_found());
    }
}
