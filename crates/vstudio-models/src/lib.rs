//! Shared data models for the Visionary Studio pipeline.
//!
//! This crate provides:
//! - Uploaded images and the ordered image set store
//! - Generation settings (transition style, pacing, aspect ratio)
//! - Long-running job handles
//! - The UI-facing generation status snapshot
//! - Resource references for generated media

pub mod image;
pub mod image_set;
pub mod job;
pub mod resource;
pub mod settings;
pub mod status;

// Re-export common types
pub use image::{CandidateFile, ImageError, ImageId, UploadedImage};
pub use image_set::{ImageSet, MAX_IMAGES, MIN_VIDEO_IMAGES};
pub use job::{JobFailure, JobHandle};
pub use resource::{DataUrl, DataUrlError, MediaBlob, ResourceId, ResourceRef};
pub use settings::{AspectRatio, GenerationSettings, Pacing, SettingParseError, TransitionStyle};
pub use status::GenerationStatus;
