//! Multimodal reasoning service.
//!
//! One call takes a model id, inline image parts plus text, and an optional
//! system role. The response carries free text, inline images, or both.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use vstudio_models::UploadedImage;

use crate::error::GenAiResult;
use crate::types::{Blob, Content, GenerateContentRequest, GenerateContentResponse, Part};

/// A single input or output part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// Inline binary data, base64 encoded.
    InlineData { mime_type: String, data: String },
    Text(String),
}

impl ContentPart {
    /// Inline part carrying an uploaded image.
    pub fn image(image: &UploadedImage) -> Self {
        ContentPart::InlineData {
            mime_type: image.mime_type().to_string(),
            data: image.payload_base64(),
        }
    }

    /// Inline part from raw bytes.
    pub fn bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        ContentPart::InlineData {
            mime_type: mime_type.into(),
            data: BASE64.encode(bytes),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text(text.into())
    }

    fn into_wire(self) -> Part {
        match self {
            ContentPart::InlineData { mime_type, data } => Part {
                text: None,
                inline_data: Some(Blob { mime_type, data }),
            },
            ContentPart::Text(text) => Part {
                text: Some(text),
                inline_data: None,
            },
        }
    }

    fn from_wire(part: Part) -> Option<Self> {
        match (part.inline_data, part.text) {
            (Some(blob), _) => Some(ContentPart::InlineData {
                mime_type: blob.mime_type,
                data: blob.data,
            }),
            (None, Some(text)) => Some(ContentPart::Text(text)),
            (None, None) => None,
        }
    }
}

/// Request for one `generateContent` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub model: String,
    pub parts: Vec<ContentPart>,
    pub system_instruction: Option<String>,
}

impl ContentRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            parts: Vec::new(),
            system_instruction: None,
        }
    }

    pub fn with_part(mut self, part: ContentPart) -> Self {
        self.parts.push(part);
        self
    }

    pub fn with_parts(mut self, parts: impl IntoIterator<Item = ContentPart>) -> Self {
        self.parts.extend(parts);
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Number of inline data parts.
    pub fn inline_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, ContentPart::InlineData { .. }))
            .count()
    }

    pub(crate) fn to_wire(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: self.parts.iter().cloned().map(ContentPart::into_wire).collect(),
            }],
            system_instruction: self.system_instruction.as_ref().map(|text| Content {
                role: None,
                parts: vec![Part {
                    text: Some(text.clone()),
                    inline_data: None,
                }],
            }),
        }
    }
}

/// Inline image returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 payload as returned on the wire.
    pub data: String,
}

impl InlineImage {
    pub fn decode(&self) -> GenAiResult<Vec<u8>> {
        Ok(BASE64.decode(&self.data)?)
    }
}

/// Parsed `generateContent` response: the parts of each candidate, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentResponse {
    pub candidates: Vec<Vec<ContentPart>>,
}

impl ContentResponse {
    /// Response with a single candidate.
    pub fn single(parts: Vec<ContentPart>) -> Self {
        Self {
            candidates: vec![parts],
        }
    }

    /// Concatenated text of the first candidate.
    ///
    /// Returns `None` when there is no candidate or the text is blank.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Inline image parts of the first candidate, in response order.
    pub fn inline_images(&self) -> impl Iterator<Item = InlineImage> + '_ {
        self.candidates.iter().take(1).flatten().filter_map(|part| match part {
            ContentPart::InlineData { mime_type, data } => Some(InlineImage {
                mime_type: mime_type.clone(),
                data: data.clone(),
            }),
            _ => None,
        })
    }
}

impl From<GenerateContentResponse> for ContentResponse {
    fn from(response: GenerateContentResponse) -> Self {
        Self {
            candidates: response
                .candidates
                .into_iter()
                .map(|c| {
                    c.content
                        .map(|content| content.parts.into_iter().filter_map(ContentPart::from_wire).collect())
                        .unwrap_or_default()
                })
                .collect(),
        }
    }
}

/// Multimodal reasoning service.
#[async_trait]
pub trait ReasoningService: Send + Sync {
    async fn generate_content(&self, request: &ContentRequest) -> GenAiResult<ContentResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_to_wire() {
        let request = ContentRequest::new("gemini-3-flash-preview")
            .with_part(ContentPart::bytes("image/png", b"abc"))
            .with_part(ContentPart::text("describe"))
            .with_system_instruction("director");

        assert_eq!(request.inline_count(), 1);

        let wire = request.to_wire();
        assert_eq!(wire.contents.len(), 1);
        assert_eq!(wire.contents[0].parts.len(), 2);
        assert_eq!(
            wire.contents[0].parts[0].inline_data.as_ref().unwrap().data,
            "YWJj"
        );
        let system = wire.system_instruction.unwrap();
        assert_eq!(system.parts[0].text.as_deref(), Some("director"));
    }

    #[test]
    fn test_text_concatenates_first_candidate() {
        let response = ContentResponse {
            candidates: vec![
                vec![ContentPart::text("Slow push in, "), ContentPart::text("then morph.")],
                vec![ContentPart::text("ignored")],
            ],
        };
        assert_eq!(response.text().as_deref(), Some("Slow push in, then morph."));
    }

    #[test]
    fn test_blank_text_is_none() {
        assert!(ContentResponse::default().text().is_none());
        assert!(ContentResponse::single(vec![ContentPart::text("  \n")]).text().is_none());
        assert!(ContentResponse::single(vec![ContentPart::bytes("image/png", b"x")])
            .text()
            .is_none());
    }

    #[test]
    fn test_inline_images_in_order() {
        let response = ContentResponse::single(vec![
            ContentPart::text("here you go"),
            ContentPart::bytes("image/png", b"first"),
            ContentPart::bytes("image/jpeg", b"second"),
        ]);

        let images: Vec<_> = response.inline_images().collect();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].mime_type, "image/png");
        assert_eq!(images[0].decode().unwrap(), b"first");
    }

    #[test]
    fn test_inline_images_ignore_later_candidates() {
        let response = ContentResponse {
            candidates: vec![
                vec![ContentPart::text("no image here")],
                vec![ContentPart::bytes("image/png", b"other")],
            ],
        };

        assert_eq!(response.inline_images().count(), 0);
    }
}
