//! Image-sequence to video generation pipeline.
//!
//! This crate provides:
//! - Prompt synthesis from an ordered image set
//! - Video job orchestration (submit, poll, resolve) with cancellation
//! - A single-shot image edit stage
//! - Status projection onto a single-writer broadcast channel
//! - Credential gating
//! - The [`Studio`] facade tying them together

pub mod config;
pub mod credentials;
pub mod editor;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod status;
pub mod studio;
pub mod synthesizer;

pub use config::StudioConfig;
pub use credentials::{CredentialGate, EnvCredentialGate};
pub use editor::ImageEditor;
pub use error::{StudioError, StudioResult};
pub use logging::GenerationLogger;
pub use orchestrator::VideoOrchestrator;
pub use status::{project, GenerationEvent, StatusChannel};
pub use studio::Studio;
pub use synthesizer::PromptSynthesizer;
