//! Single-shot image edit stage.

use std::sync::Arc;

use tracing::{debug, warn};

use vstudio_genai::{ContentPart, ContentRequest, ReasoningService};
use vstudio_models::{DataUrl, UploadedImage};

use crate::error::{StudioError, StudioResult};

/// Edits one image per call. No polling and no state between calls.
#[derive(Clone)]
pub struct ImageEditor {
    service: Arc<dyn ReasoningService>,
    model: String,
}

impl ImageEditor {
    pub fn new(service: Arc<dyn ReasoningService>, model: impl Into<String>) -> Self {
        Self {
            service,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Apply `prompt` to the image and return the first image in the response.
    pub async fn edit(&self, image: &[u8], mime_type: &str, prompt: &str) -> StudioResult<DataUrl> {
        if prompt.trim().is_empty() {
            return Err(StudioError::validation("An edit prompt is required"));
        }

        let request = ContentRequest::new(&self.model)
            .with_part(ContentPart::bytes(mime_type, image))
            .with_part(ContentPart::text(prompt));

        debug!(model = %self.model, bytes = image.len(), mime_type, "Requesting image edit");

        let response = self.service.generate_content(&request).await?;

        let Some(edited) = response.inline_images().next() else {
            warn!(model = %self.model, "Edit response carried no image");
            return Err(StudioError::NoImageProduced);
        };

        let mime = if edited.mime_type.is_empty() {
            mime_type
        } else {
            edited.mime_type.as_str()
        };

        Ok(DataUrl::from_base64(mime, &edited.data))
    }

    pub async fn edit_image(&self, image: &UploadedImage, prompt: &str) -> StudioResult<DataUrl> {
        self.edit(image.payload(), image.mime_type(), prompt).await
    }
}
