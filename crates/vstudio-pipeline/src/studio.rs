//! Studio facade: owns the image set and user settings, drives both pipelines.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{watch, Mutex, RwLock};
use tracing::Instrument;

use vstudio_genai::{GenAiClient, GenAiError, ReasoningService, VideoJobService};
use vstudio_models::{
    CandidateFile, DataUrl, GenerationSettings, GenerationStatus, ImageId, ImageSet, MediaBlob,
};

use crate::config::StudioConfig;
use crate::credentials::CredentialGate;
use crate::editor::ImageEditor;
use crate::error::{StudioError, StudioResult};
use crate::logging::GenerationLogger;
use crate::orchestrator::VideoOrchestrator;
use crate::status::{GenerationEvent, StatusChannel};
use crate::synthesizer::PromptSynthesizer;

pub struct Studio {
    config: StudioConfig,
    images: RwLock<ImageSet>,
    instruction: RwLock<String>,
    settings: RwLock<GenerationSettings>,
    status: StatusChannel,
    /// Held for the lifetime of one video generation.
    generation: Mutex<()>,
    gate: Arc<dyn CredentialGate>,
    synthesizer: PromptSynthesizer,
    orchestrator: VideoOrchestrator,
    editor: ImageEditor,
}

impl Studio {
    pub fn new(
        config: StudioConfig,
        reasoning: Arc<dyn ReasoningService>,
        video: Arc<dyn VideoJobService>,
        gate: Arc<dyn CredentialGate>,
    ) -> Self {
        Self {
            synthesizer: PromptSynthesizer::new(reasoning.clone(), &config.reasoning_model),
            orchestrator: VideoOrchestrator::new(video, &config),
            editor: ImageEditor::new(reasoning, &config.edit_model),
            images: RwLock::new(ImageSet::new()),
            instruction: RwLock::new(String::new()),
            settings: RwLock::new(GenerationSettings::default()),
            status: StatusChannel::new(),
            generation: Mutex::new(()),
            gate,
            config,
        }
    }

    /// Studio backed by one REST client for every service.
    pub fn with_client(
        config: StudioConfig,
        client: GenAiClient,
        gate: Arc<dyn CredentialGate>,
    ) -> Self {
        let client = Arc::new(client);
        Self::new(config, client.clone(), client, gate)
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    // =========================================================================
    // Image set
    // =========================================================================

    /// Add candidate files; non-images are skipped and the set cap applies.
    pub async fn add_images(&self, files: impl IntoIterator<Item = CandidateFile>) -> Vec<ImageId> {
        self.images.write().await.add(files)
    }

    /// Read files from disk and add them in order.
    pub async fn add_image_paths<P: AsRef<Path>>(&self, paths: &[P]) -> StudioResult<Vec<ImageId>> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(CandidateFile::from_path(path).await?);
        }
        Ok(self.add_images(files).await)
    }

    pub async fn remove_image(&self, id: &ImageId) -> bool {
        self.images.write().await.remove(id)
    }

    pub async fn clear_images(&self) {
        self.images.write().await.clear();
    }

    /// Snapshot of the current image set.
    pub async fn images(&self) -> ImageSet {
        self.images.read().await.clone()
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub async fn set_instruction(&self, instruction: impl Into<String>) {
        *self.instruction.write().await = instruction.into();
    }

    pub async fn instruction(&self) -> String {
        self.instruction.read().await.clone()
    }

    pub async fn set_settings(&self, settings: GenerationSettings) {
        *self.settings.write().await = settings;
    }

    pub async fn settings(&self) -> GenerationSettings {
        *self.settings.read().await
    }

    // =========================================================================
    // Status
    // =========================================================================

    pub fn subscribe_status(&self) -> watch::Receiver<GenerationStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> GenerationStatus {
        self.status.current()
    }

    // =========================================================================
    // Pipelines
    // =========================================================================

    /// Run the full video pipeline over a snapshot of the current state.
    ///
    /// Validation and concurrency rejections return before any status is
    /// published. Every other outcome ends in a terminal status.
    pub async fn generate_video(
        &self,
        cancel: Option<watch::Receiver<bool>>,
    ) -> StudioResult<MediaBlob> {
        let images = self.images.read().await.clone();
        if images.len() < self.config.min_video_images {
            return Err(StudioError::validation(format!(
                "Please upload at least {} images.",
                self.config.min_video_images
            )));
        }

        let _guard = self
            .generation
            .try_lock()
            .map_err(|_| StudioError::GenerationInProgress)?;

        let instruction = self.instruction.read().await.clone();
        let settings = *self.settings.read().await;

        let logger = GenerationLogger::new("video_generation");
        let span = logger.create_span();

        async {
            logger.log_video_start(images.len(), &settings);

            let result = match self.ensure_credential().await {
                Ok(()) => {
                    let outcome = self
                        .run_video(&images, &instruction, settings, cancel, &logger)
                        .await;
                    if matches!(&outcome, Err(e) if e.is_credential_error()) {
                        self.gate.prompt_for_credential().await;
                    }
                    outcome
                }
                Err(e) => Err(e),
            };

            match &result {
                Ok(blob) => {
                    self.status
                        .publish(&GenerationEvent::Resolved(blob.clone().into()));
                    logger.log_completion(blob.mime_type(), blob.len());
                }
                Err(e) => {
                    self.status.publish(&GenerationEvent::Failed(e.to_string()));
                    logger.log_failure(e);
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    /// Check the gate, prompting at most once when no credential is present.
    async fn ensure_credential(&self) -> StudioResult<()> {
        if self.gate.has_credential().await {
            return Ok(());
        }

        self.gate.prompt_for_credential().await;
        if self.gate.has_credential().await {
            Ok(())
        } else {
            Err(GenAiError::MissingCredential.into())
        }
    }

    async fn run_video(
        &self,
        images: &ImageSet,
        instruction: &str,
        settings: GenerationSettings,
        cancel: Option<watch::Receiver<bool>>,
        logger: &GenerationLogger,
    ) -> StudioResult<MediaBlob> {
        self.status.publish(&GenerationEvent::Started);

        let prompt = self
            .synthesizer
            .synthesize(
                images.as_slice(),
                instruction,
                settings.transition_style,
                settings.pacing,
            )
            .await?;
        logger.log_progress(&format!("prompt synthesized ({} chars)", prompt.len()));

        self.status.publish(&GenerationEvent::PromptReady);

        self.orchestrator
            .generate_with_cancel(images.as_slice(), &prompt, settings.aspect_ratio, cancel)
            .await
    }

    /// Edit the first image of the set.
    pub async fn edit_first_image(&self, prompt: &str) -> StudioResult<DataUrl> {
        if prompt.trim().is_empty() {
            return Err(StudioError::validation("An edit prompt is required"));
        }

        let first = self
            .images
            .read()
            .await
            .first()
            .cloned()
            .ok_or_else(|| StudioError::validation("Upload an image to edit"))?;

        let logger = GenerationLogger::new("image_edit");
        let span = logger.create_span();

        async {
            logger.log_start(first.display_name());
            let result = self.editor.edit_image(&first, prompt).await;
            match &result {
                Ok(url) => logger.log_completion(
                    url.mime_type().unwrap_or(first.mime_type()),
                    url.decode().map(|bytes| bytes.len()).unwrap_or_default(),
                ),
                Err(e) => logger.log_failure(e),
            }
            result
        }
        .instrument(span)
        .await
    }
}
