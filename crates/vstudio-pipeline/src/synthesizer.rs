//! Prompt synthesis.
//!
//! Turns an ordered image set plus user intent into one video prompt by
//! asking a multimodal reasoning model to act as a film director.

use std::sync::Arc;

use tracing::{debug, warn};

use vstudio_genai::{ContentPart, ContentRequest, ReasoningService};
use vstudio_models::{Pacing, TransitionStyle, UploadedImage};

use crate::error::{StudioError, StudioResult};

/// Role given to the reasoning model.
pub const DIRECTOR_ROLE: &str = "You are an expert film director and AI prompt engineer. Your goal is to synthesize multiple images into a single cohesive video generation prompt with specific focus on transition aesthetics.";

/// Used when the user leaves the instruction blank.
pub const DEFAULT_INSTRUCTION: &str = "Create a cinematic transition through these images.";

/// Returned when the model produces no usable text.
pub const FALLBACK_PROMPT: &str = "A cinematic animation following the sequence of images.";

/// Build the directive sent alongside the images.
pub fn build_directive(
    image_count: usize,
    instruction: &str,
    transition_style: TransitionStyle,
    pacing: Pacing,
) -> String {
    let instruction = match instruction.trim() {
        "" => DEFAULT_INSTRUCTION,
        trimmed => trimmed,
    };

    format!(
        "I have a sequence of {count} images uploaded in order.\n\
         Please analyze the context, characters, setting, and movement between these images.\n\
         \n\
         User's Priority Instructions: \"{instruction}\"\n\
         \n\
         TECHNICAL REQUIREMENTS:\n\
         - Transition Style: {transition}\n\
         - Pacing: {pace}\n\
         \n\
         Based on the images and technical requirements, write a single, detailed cinematic prompt for a video generator (Veo).\n\
         The prompt MUST explicitly describe how the camera moves and how the scene transitions from one image's content to the next using the requested \"{style}\" style and \"{pacing}\" pace.\n\
         \n\
         Only return the final prompt text.",
        count = image_count,
        instruction = instruction,
        transition = transition_style.description(),
        pace = pacing.description(),
        style = transition_style.as_str(),
        pacing = pacing.as_str(),
    )
}

/// Synthesizes a single video prompt from an image sequence.
#[derive(Clone)]
pub struct PromptSynthesizer {
    service: Arc<dyn ReasoningService>,
    model: String,
}

impl PromptSynthesizer {
    pub fn new(service: Arc<dyn ReasoningService>, model: impl Into<String>) -> Self {
        Self {
            service,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Synthesize the prompt.
    ///
    /// A response without text yields [`FALLBACK_PROMPT`]; service errors
    /// are returned unchanged.
    pub async fn synthesize(
        &self,
        images: &[UploadedImage],
        instruction: &str,
        transition_style: TransitionStyle,
        pacing: Pacing,
    ) -> StudioResult<String> {
        if images.is_empty() {
            return Err(StudioError::validation(
                "At least one image is required to synthesize a prompt",
            ));
        }

        let directive = build_directive(images.len(), instruction, transition_style, pacing);
        let request = ContentRequest::new(&self.model)
            .with_parts(images.iter().map(ContentPart::image))
            .with_part(ContentPart::text(directive))
            .with_system_instruction(DIRECTOR_ROLE);

        debug!(
            model = %self.model,
            images = images.len(),
            style = %transition_style,
            pacing = %pacing,
            "Requesting prompt synthesis"
        );

        let response = self.service.generate_content(&request).await?;

        match response.text() {
            Some(prompt) => Ok(prompt),
            None => {
                warn!(model = %self.model, "Reasoning model returned no text, using fallback prompt");
                Ok(FALLBACK_PROMPT.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use vstudio_genai::{ContentResponse, GenAiError, GenAiResult};

    struct ScriptedReasoning {
        response: Mutex<Option<GenAiResult<ContentResponse>>>,
        requests: Mutex<Vec<ContentRequest>>,
    }

    impl ScriptedReasoning {
        fn new(response: GenAiResult<ContentResponse>) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(Some(response)),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ReasoningService for ScriptedReasoning {
        async fn generate_content(&self, request: &ContentRequest) -> GenAiResult<ContentResponse> {
            self.requests.lock().unwrap().push(request.clone());
            self.response
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(ContentResponse::default()))
        }
    }

    fn images(n: usize) -> Vec<UploadedImage> {
        (0..n)
            .map(|i| UploadedImage::new(vec![i as u8; 4], "image/png", format!("{}.png", i)).unwrap())
            .collect()
    }

    #[test]
    fn test_directive_embeds_canonical_phrases_for_every_pair() {
        for style in TransitionStyle::ALL {
            for pacing in Pacing::ALL {
                let directive = build_directive(6, "Tell a story", style, pacing);

                assert!(directive.contains("sequence of 6 images"));
                assert!(directive.contains("\"Tell a story\""));
                assert!(directive.contains(&format!("- Transition Style: {}\n", style.description())));
                assert!(directive.contains(&format!("- Pacing: {}\n", pacing.description())));
                assert!(directive.contains(&format!("\"{}\" style", style.as_str())));
                assert!(directive.contains(&format!("\"{}\" pace", pacing.as_str())));
            }
        }
    }

    #[test]
    fn test_directive_blank_instruction_uses_default() {
        let directive = build_directive(5, "   ", TransitionStyle::Fade, Pacing::Slow);
        assert!(directive.contains(DEFAULT_INSTRUCTION));
    }

    #[tokio::test]
    async fn test_synthesize_returns_model_text_verbatim() {
        let service = ScriptedReasoning::new(Ok(ContentResponse::single(vec![ContentPart::text(
            "  Slow dolly across the harbor. ",
        )])));
        let synthesizer = PromptSynthesizer::new(service.clone(), "gemini-3-flash-preview");

        let prompt = synthesizer
            .synthesize(&images(5), "", TransitionStyle::Pan, Pacing::Fast)
            .await
            .unwrap();
        assert_eq!(prompt, "  Slow dolly across the harbor. ");

        let requests = service.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gemini-3-flash-preview");
        assert_eq!(requests[0].inline_count(), 5);
        assert_eq!(requests[0].system_instruction.as_deref(), Some(DIRECTOR_ROLE));
    }

    #[tokio::test]
    async fn test_synthesize_falls_back_on_empty_text() {
        let service = ScriptedReasoning::new(Ok(ContentResponse::default()));
        let synthesizer = PromptSynthesizer::new(service, "m");

        let prompt = synthesizer
            .synthesize(&images(5), "x", TransitionStyle::Morph, Pacing::Normal)
            .await
            .unwrap();
        assert_eq!(prompt, FALLBACK_PROMPT);
    }

    #[tokio::test]
    async fn test_synthesize_propagates_service_error() {
        let service = ScriptedReasoning::new(Err(GenAiError::from_http_status(429, "quota")));
        let synthesizer = PromptSynthesizer::new(service, "m");

        let err = synthesizer
            .synthesize(&images(5), "x", TransitionStyle::Cut, Pacing::Rhythmic)
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::GenAi(GenAiError::Api { status: 429, .. })));
    }

    #[tokio::test]
    async fn test_synthesize_rejects_empty_images() {
        let service = ScriptedReasoning::new(Ok(ContentResponse::default()));
        let synthesizer = PromptSynthesizer::new(service.clone(), "m");

        let err = synthesizer
            .synthesize(&[], "x", TransitionStyle::None, Pacing::Slow)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(service.requests.lock().unwrap().is_empty());
    }
}
