//! Generation status projection.
//!
//! Lifecycle events are projected onto whole [`GenerationStatus`] snapshots
//! and published on a single-writer watch channel.

use tokio::sync::watch;

use vstudio_models::{GenerationStatus, ResourceRef};

pub const ANALYZING_MESSAGE: &str = "Analyzing visual narrative with Gemini...";
pub const SYNTHESIZING_MESSAGE: &str =
    "Synthesizing cinematic transition with Veo (may take a few minutes)...";
pub const SUCCESS_MESSAGE: &str = "Video generated successfully!";

/// Lifecycle events of one video generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    Started,
    /// Prompt synthesized, video job being submitted.
    PromptReady,
    Resolved(ResourceRef),
    Failed(String),
}

/// Project an event onto the status snapshot it produces.
pub fn project(event: &GenerationEvent) -> GenerationStatus {
    match event {
        GenerationEvent::Started => GenerationStatus::in_progress(ANALYZING_MESSAGE, 10),
        GenerationEvent::PromptReady => GenerationStatus::in_progress(SYNTHESIZING_MESSAGE, 30),
        GenerationEvent::Resolved(result) => {
            GenerationStatus::completed(SUCCESS_MESSAGE, result.clone())
        }
        GenerationEvent::Failed(message) => GenerationStatus::failed(format!("Error: {}", message)),
    }
}

/// Single-writer broadcast of the current status.
///
/// Subscribers always observe complete snapshots.
#[derive(Debug)]
pub struct StatusChannel {
    tx: watch::Sender<GenerationStatus>,
}

impl Default for StatusChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusChannel {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(GenerationStatus::idle());
        Self { tx }
    }

    /// Replace the current snapshot with the projection of `event`.
    pub fn publish(&self, event: &GenerationEvent) -> GenerationStatus {
        let status = project(event);
        self.tx.send_replace(status.clone());
        status
    }

    pub fn subscribe(&self) -> watch::Receiver<GenerationStatus> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> GenerationStatus {
        self.tx.borrow().clone()
    }
}
