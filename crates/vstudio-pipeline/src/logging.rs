//! Structured generation logging.

use tracing::{error, info, warn, Span};
use uuid::Uuid;

use vstudio_models::GenerationSettings;

use crate::error::StudioError;

/// Logger carrying the generation id and operation on every event.
#[derive(Debug, Clone)]
pub struct GenerationLogger {
    generation_id: String,
    operation: String,
}

impl GenerationLogger {
    /// Logger for a fresh generation id.
    pub fn new(operation: &str) -> Self {
        Self::from_string(&Uuid::new_v4().to_string(), operation)
    }

    pub fn from_string(generation_id: &str, operation: &str) -> Self {
        Self {
            generation_id: generation_id.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            generation_id = %self.generation_id,
            operation = %self.operation,
            "Generation started: {}", message
        );
    }

    /// Start of a video generation, with the request snapshot as fields.
    pub fn log_video_start(&self, image_count: usize, settings: &GenerationSettings) {
        info!(
            generation_id = %self.generation_id,
            operation = %self.operation,
            images = image_count,
            transition_style = %settings.transition_style,
            pacing = %settings.pacing,
            aspect_ratio = %settings.aspect_ratio,
            "Generation started"
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            generation_id = %self.generation_id,
            operation = %self.operation,
            "Generation progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            generation_id = %self.generation_id,
            operation = %self.operation,
            "Generation warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str, credential_error: bool) {
        error!(
            generation_id = %self.generation_id,
            operation = %self.operation,
            credential_error,
            "Generation error: {}", message
        );
    }

    /// Log a failed run. Cancellation is operator intent, not an error.
    pub fn log_failure(&self, err: &StudioError) {
        match err {
            StudioError::Cancelled => self.log_warning(&err.to_string()),
            _ => self.log_error(&err.to_string(), err.is_credential_error()),
        }
    }

    pub fn log_completion(&self, mime_type: &str, bytes: usize) {
        info!(
            generation_id = %self.generation_id,
            operation = %self.operation,
            mime_type,
            bytes,
            "Generation completed"
        );
    }

    pub fn generation_id(&self) -> &str {
        &self.generation_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Span to instrument the futures of one generation.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "generation",
            generation_id = %self.generation_id,
            operation = %self.operation
        )
    }
}
