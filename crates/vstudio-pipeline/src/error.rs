//! Pipeline error types.

use thiserror::Error;

use vstudio_genai::GenAiError;

pub type StudioResult<T> = Result<T, StudioError>;

#[derive(Debug, Error)]
pub enum StudioError {
    /// Rejected before any external call; nothing was mutated.
    #[error("{0}")]
    Validation(String),

    #[error("A video generation is already in progress")]
    GenerationInProgress,

    #[error("Video generation failed: No download link.")]
    NoResult,

    #[error("No image was generated.")]
    NoImageProduced,

    #[error("Video generation cancelled")]
    Cancelled,

    #[error(transparent)]
    GenAi(#[from] GenAiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True if the failure should route to credential re-selection.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, StudioError::GenAi(e) if e.is_credential_error())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StudioError::Validation(_))
    }
}

impl From<vstudio_models::ImageError> for StudioError {
    fn from(err: vstudio_models::ImageError) -> Self {
        match err {
            vstudio_models::ImageError::Io(e) => StudioError::Io(e),
            other => StudioError::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_error_passthrough() {
        let err: StudioError = GenAiError::MissingCredential.into();
        assert!(err.is_credential_error());
        assert!(!StudioError::NoResult.is_credential_error());
    }

    #[test]
    fn test_genai_message_is_unmodified() {
        let inner = GenAiError::from_http_status(500, "quota blew up");
        let expected = inner.to_string();
        let err: StudioError = inner.into();
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_validation() {
        let err = StudioError::validation("Please upload at least 5 images.");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please upload at least 5 images.");
    }
}
