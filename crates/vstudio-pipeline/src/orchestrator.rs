//! Video job orchestration: submit, poll to completion, resolve the result.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{debug, info};

use vstudio_genai::{FrameInput, GenAiError, VideoJobConfig, VideoJobRequest, VideoJobService};
use vstudio_models::{AspectRatio, JobHandle, MediaBlob, UploadedImage};

use crate::config::StudioConfig;
use crate::error::{StudioError, StudioResult};

/// MIME type of the resolved video payload.
pub const VIDEO_MIME_TYPE: &str = "video/mp4";

/// Drives one long-running video job to a local media blob.
///
/// Polling is unbounded at a fixed interval; the job service alone decides
/// when the job is done. A failed submit, poll or fetch aborts the whole
/// orchestration without retry.
#[derive(Clone)]
pub struct VideoOrchestrator {
    service: Arc<dyn VideoJobService>,
    model: String,
    resolution: String,
    poll_interval: Duration,
}

impl VideoOrchestrator {
    pub fn new(service: Arc<dyn VideoJobService>, config: &StudioConfig) -> Self {
        Self {
            service,
            model: config.video_model.clone(),
            resolution: config.video_resolution.clone(),
            poll_interval: config.poll_interval,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Generate a video anchored on the first and last image.
    pub async fn generate(
        &self,
        images: &[UploadedImage],
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> StudioResult<MediaBlob> {
        self.generate_with_cancel(images, prompt, aspect_ratio, None)
            .await
    }

    /// Generate a video, stopping at the next wait once `cancel` reads `true`.
    ///
    /// Cancellation only stops local polling. The external job keeps running.
    pub async fn generate_with_cancel(
        &self,
        images: &[UploadedImage],
        prompt: &str,
        aspect_ratio: AspectRatio,
        mut cancel: Option<watch::Receiver<bool>>,
    ) -> StudioResult<MediaBlob> {
        let (Some(start), Some(end)) = (images.first(), images.last()) else {
            return Err(StudioError::validation(
                "At least one image is required to generate a video",
            ));
        };

        if is_cancelled(&cancel) {
            return Err(StudioError::Cancelled);
        }

        let request = VideoJobRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            start_frame: FrameInput::from_image(start),
            end_frame: FrameInput::from_image(end),
            config: VideoJobConfig {
                count: 1,
                resolution: self.resolution.clone(),
                aspect_ratio,
            },
        };

        let started = Instant::now();
        let mut handle = self.service.submit(&request).await?;
        info!(operation = %handle.name, model = %self.model, "Video job submitted");

        let mut polls: u32 = 0;
        while !handle.is_terminal() {
            self.wait(&mut cancel).await?;
            handle = self.service.poll(&handle).await?;
            polls += 1;
            debug!(operation = %handle.name, polls, done = handle.done, "Polled video job");
        }

        let uri = resolve_result(&handle)?;

        info!(
            operation = %handle.name,
            polls,
            elapsed_secs = started.elapsed().as_secs(),
            "Video job finished, fetching result"
        );

        let bytes = self.service.fetch_result(uri).await?;
        Ok(MediaBlob::new(VIDEO_MIME_TYPE, bytes))
    }

    /// Sleep one poll interval, returning early with `Cancelled` if signalled.
    async fn wait(&self, cancel: &mut Option<watch::Receiver<bool>>) -> StudioResult<()> {
        let Some(rx) = cancel.as_mut() else {
            tokio::time::sleep(self.poll_interval).await;
            return Ok(());
        };

        if *rx.borrow_and_update() {
            return Err(StudioError::Cancelled);
        }

        let sleep = tokio::time::sleep(self.poll_interval);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return Ok(()),
                changed = rx.changed() => match changed {
                    Ok(()) => {
                        if *rx.borrow_and_update() {
                            info!("Video generation cancelled while polling");
                            return Err(StudioError::Cancelled);
                        }
                    }
                    Err(_) => {
                        // Sender dropped, cancellation can no longer arrive
                        (&mut sleep).await;
                        *cancel = None;
                        return Ok(());
                    }
                }
            }
        }
    }
}

fn is_cancelled(cancel: &Option<watch::Receiver<bool>>) -> bool {
    cancel.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
}

fn resolve_result(handle: &JobHandle) -> StudioResult<&str> {
    if let Some(failure) = &handle.failure {
        return Err(GenAiError::OperationFailed {
            code: failure.code,
            message: failure.message.clone(),
        }
        .into());
    }

    handle.first_result().ok_or(StudioError::NoResult)
}
