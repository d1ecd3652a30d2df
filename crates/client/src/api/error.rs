//! Error types for the PASS API client.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::token_store::TokenStoreError;

/// Errors that can occur when calling the PASS API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    ///
    /// Displays as the bare message so it can be shown inline.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Backend-provided `error` text, or a generic fallback.
        message: String,
    },

    /// The request never completed.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success body did not match the expected schema.
    #[error("unexpected response from {path}: {message}")]
    Decode {
        /// Request path.
        path: String,
        /// Decoder message.
        message: String,
    },

    /// The stored credential could not be read.
    #[error(transparent)]
    Storage(#[from] TokenStoreError),
}

impl ApiError {
    /// Build the error for a failed response from its status and parsed body.
    ///
    /// Uses the body's `error` field when it is a non-empty string, otherwise
    /// `"Request failed (<status>)"`.
    #[must_use]
    pub fn from_status(status: u16, body: &Value) -> Self {
        let message = Some(body)
            .filter(|b| b.is_object())
            .and_then(|b| ErrorBody::deserialize(b).ok())
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed ({status})"));
        Self::Status { status, message }
    }

    /// HTTP status, when the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode { .. } | Self::Storage(_) => None,
        }
    }
}

/// Error payload returned by the backend.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error text.
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_uses_error_field() {
        let err = ApiError::from_status(401, &json!({"error": "bad credentials"}));
        assert_eq!(err.to_string(), "bad credentials");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_falls_back_to_generic_message() {
        let err = ApiError::from_status(500, &json!({}));
        assert_eq!(err.to_string(), "Request failed (500)");
    }

    #[test]
    fn test_non_string_or_empty_error_field_falls_back() {
        let err = ApiError::from_status(422, &json!({"error": {"code": 1}}));
        assert_eq!(err.to_string(), "Request failed (422)");

        let err = ApiError::from_status(400, &json!({"error": ""}));
        assert_eq!(err.to_string(), "Request failed (400)");
    }

    #[test]
    fn test_non_object_body_falls_back() {
        let err = ApiError::from_status(502, &json!(["oops"]));
        assert_eq!(err.to_string(), "Request failed (502)");
    }
}
