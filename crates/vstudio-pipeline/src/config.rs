//! Pipeline configuration.

use std::time::Duration;

use vstudio_models::MIN_VIDEO_IMAGES;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Model used to synthesize the transition prompt
    pub reasoning_model: String,
    /// Video engine model
    pub video_model: String,
    /// Image editing model
    pub edit_model: String,
    /// Fixed wait between job status polls
    pub poll_interval: Duration,
    /// Output resolution requested from the video engine
    pub video_resolution: String,
    /// Minimum images required to start a video generation
    pub min_video_images: usize,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            reasoning_model: "gemini-3-flash-preview".to_string(),
            video_model: "veo-3.1-fast-generate-preview".to_string(),
            edit_model: "gemini-2.5-flash-image".to_string(),
            poll_interval: Duration::from_secs(10),
            video_resolution: "1080p".to_string(),
            min_video_images: MIN_VIDEO_IMAGES,
        }
    }
}

impl StudioConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            reasoning_model: std::env::var("VSTUDIO_REASONING_MODEL")
                .unwrap_or(defaults.reasoning_model),
            video_model: std::env::var("VSTUDIO_VIDEO_MODEL").unwrap_or(defaults.video_model),
            edit_model: std::env::var("VSTUDIO_EDIT_MODEL").unwrap_or(defaults.edit_model),
            poll_interval: std::env::var("VSTUDIO_POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            video_resolution: std::env::var("VSTUDIO_VIDEO_RESOLUTION")
                .unwrap_or(defaults.video_resolution),
            min_video_images: std::env::var("VSTUDIO_MIN_IMAGES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n >= 1)
                .unwrap_or(defaults.min_video_images),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
