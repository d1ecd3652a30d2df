//! Unified error handling for the client.

use pass_core::Route;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::pages::LoginError;
use crate::session::SessionError;
use crate::token_store::TokenStoreError;

/// Client-level error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The token store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] TokenStoreError),

    /// A backend call failed.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// A session transition failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Sign-in failed; the message is meant for inline display.
    #[error("{0}")]
    Login(#[from] LoginError),

    /// Input rejected before reaching the backend.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Navigation settled on a route that has no page.
    #[error("No page for route {0}")]
    Unroutable(Route),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_status_message_passes_through() {
        let err = ClientError::from(ApiError::Status {
            status: 404,
            message: "Student not found".to_string(),
        });
        assert_eq!(err.to_string(), "Student not found");
    }

    #[test]
    fn test_client_error_display() {
        let err = ClientError::InvalidInput("note is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: note is required");

        let err = ClientError::Login(LoginError::EmptyPassword);
        assert_eq!(err.to_string(), "password cannot be empty");
    }
}
