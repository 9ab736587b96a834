//! Generative service error types.

use serde::Deserialize;
use thiserror::Error;

/// Result type for generative service operations.
pub type GenAiResult<T> = Result<T, GenAiError>;

/// Message the service returns when the selected credential (or the project
/// behind it) cannot be resolved. Failures carrying it route to credential
/// re-selection.
pub const ENTITY_NOT_FOUND_MESSAGE: &str = "Requested entity was not found";

/// Errors that can occur when calling the generative services.
#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("No API credential configured")]
    MissingCredential,

    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        /// Canonical status code from the error envelope (e.g. `NOT_FOUND`).
        code: Option<String>,
        message: String,
    },

    #[error("Operation failed: (code {code}) {message}")]
    OperationFailed { code: i32, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GenAiError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Build an error from a non-success HTTP response.
    ///
    /// Parses the `{"error": {"code", "message", "status"}}` envelope when
    /// present and falls back to the raw body otherwise.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self::Api {
                status,
                code: envelope.error.status,
                message: envelope.error.message,
            },
            Err(_) => Self::Api {
                status,
                code: None,
                message: body.trim().to_string(),
            },
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            GenAiError::Api { status, .. } => Some(*status),
            GenAiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True if the failure means no valid credential is selected.
    ///
    /// Prefers the structured `NOT_FOUND` status code, and keeps matching the
    /// entity-not-found message text for errors that only carry a message.
    pub fn is_credential_error(&self) -> bool {
        match self {
            GenAiError::MissingCredential => true,
            GenAiError::Api { code: Some(code), .. } if code == "NOT_FOUND" => true,
            other => other.to_string().contains(ENTITY_NOT_FOUND_MESSAGE),
        }
    }

    /// Check if error is transient.
    ///
    /// Informational only: the pipeline does not retry automatically.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenAiError::Network(_) => true,
            GenAiError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
