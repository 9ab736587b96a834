//! Client for the external generative services.
//!
//! This crate provides:
//! - [`ReasoningService`]: multimodal `generateContent` calls (text and image output)
//! - [`VideoJobService`]: long-running video jobs (submit, poll, fetch result)
//! - [`GenAiClient`]: the REST implementation of both
//! - Error taxonomy with credential-failure detection
//! - Request metrics

pub mod client;
pub mod error;
pub mod metrics;
pub mod reasoning;
pub mod types;
pub mod video;

pub use client::{GenAiClient, GenAiConfig};
pub use error::{GenAiError, GenAiResult, ENTITY_NOT_FOUND_MESSAGE};
pub use reasoning::{ContentPart, ContentRequest, ContentResponse, InlineImage, ReasoningService};
pub use video::{FrameInput, VideoJobConfig, VideoJobRequest, VideoJobService};
