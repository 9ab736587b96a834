//! UI-facing generation status snapshot.

use crate::resource::ResourceRef;

/// The only record the presentation layer observes for a video generation.
///
/// Always replaced wholesale; fields are never patched independently.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStatus {
    pub is_generating: bool,
    pub status_message: String,
    /// Coarse phase indicator (0-100), not a continuous measurement.
    pub progress: u8,
    pub result: Option<ResourceRef>,
}

impl GenerationStatus {
    /// Idle status before any generation was requested.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn in_progress(message: impl Into<String>, progress: u8) -> Self {
        Self {
            is_generating: true,
            status_message: message.into(),
            progress: progress.min(100),
            result: None,
        }
    }

    pub fn completed(message: impl Into<String>, result: ResourceRef) -> Self {
        Self {
            is_generating: false,
            status_message: message.into(),
            progress: 100,
            result: Some(result),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_generating: false,
            status_message: message.into(),
            progress: 0,
            result: None,
        }
    }

    /// Check if the status is terminal (success or failure).
    pub fn is_terminal(&self) -> bool {
        !self.is_generating && (self.result.is_some() || !self.status_message.is_empty())
    }
}
