//! Long-running video job service.

use async_trait::async_trait;

use vstudio_models::{AspectRatio, JobHandle, UploadedImage};

use crate::error::GenAiResult;
use crate::types::{ImageInput, PredictLongRunningRequest, VideoInstance, VideoParameters};

/// An anchor frame sent with a video job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInput {
    pub mime_type: String,
    /// Base64 payload.
    pub data: String,
}

impl FrameInput {
    pub fn from_image(image: &UploadedImage) -> Self {
        Self {
            mime_type: image.mime_type().to_string(),
            data: image.payload_base64(),
        }
    }

    fn to_wire(&self) -> ImageInput {
        ImageInput {
            bytes_base64_encoded: self.data.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Output configuration for a video job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoJobConfig {
    /// Number of videos to generate
    pub count: u32,
    pub resolution: String,
    pub aspect_ratio: AspectRatio,
}

impl Default for VideoJobConfig {
    fn default() -> Self {
        Self {
            count: 1,
            resolution: "1080p".to_string(),
            aspect_ratio: AspectRatio::default(),
        }
    }
}

/// A video generation request anchored on a start and an end frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoJobRequest {
    pub model: String,
    pub prompt: String,
    pub start_frame: FrameInput,
    pub end_frame: FrameInput,
    pub config: VideoJobConfig,
}

impl VideoJobRequest {
    pub(crate) fn to_wire(&self) -> PredictLongRunningRequest {
        PredictLongRunningRequest {
            instances: vec![VideoInstance {
                prompt: self.prompt.clone(),
                image: self.start_frame.to_wire(),
                last_frame: self.end_frame.to_wire(),
            }],
            parameters: VideoParameters {
                sample_count: self.config.count,
                resolution: self.config.resolution.clone(),
                aspect_ratio: self.config.aspect_ratio.to_string(),
            },
        }
    }
}

/// Long-running video job service.
#[async_trait]
pub trait VideoJobService: Send + Sync {
    /// Submit a job. Allocates external work that keeps running (and costing)
    /// even if the returned handle is never polled again.
    async fn submit(&self, request: &VideoJobRequest) -> GenAiResult<JobHandle>;

    /// Refresh a handle's status. Idempotent.
    async fn poll(&self, handle: &JobHandle) -> GenAiResult<JobHandle>;

    /// Download the binary content behind a result URI (authenticated).
    async fn fetch_result(&self, uri: &str) -> GenAiResult<Vec<u8>>;
}
