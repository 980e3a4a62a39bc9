//! External generation services.
//!
//! The engine talks to two collaborators through narrow traits: an image
//! service that answers one prompt with an ordered sequence of content
//! parts, and a text service that answers one instruction with free-form
//! text. Both are implemented by [`gemini::GeminiClient`] in production and
//! by scripted mocks in tests.
//!
//! The image contract is: consume the FIRST part carrying inline binary
//! data, ignore the rest.

use crate::error::Result;
use crate::session::ImageResult;
use async_trait::async_trait;

pub mod gemini;

/// Environment variables checked for the API key, in order.
const CREDENTIAL_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Read the API credential from the environment.
///
/// Read once at process start; absence is a permanent condition for the
/// session and is not re-checked dynamically.
pub fn credential_from_env() -> Option<String> {
    for var in CREDENTIAL_VARS {
        if let Ok(value) = std::env::var(var)
            && !value.trim().is_empty()
        {
            return Some(value);
        }
    }
    None
}

/// Inline binary payload carried by a content part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineData {
    /// Mime type reported by the service, when present.
    pub mime_type: Option<String>,

    /// Decoded payload bytes.
    pub bytes: Vec<u8>,
}

/// One content part of a generation reply.
///
/// A part optionally carries text, inline data, neither, or both; order
/// within the reply is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPart {
    /// Free-form text, if this part carries any.
    pub text: Option<String>,

    /// Inline binary payload, if this part carries one.
    pub inline_data: Option<InlineData>,
}

/// An ordered sequence of content parts answering one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReply {
    /// Parts in the order the service produced them.
    pub parts: Vec<ContentPart>,
}

impl GenerationReply {
    /// Extract the first data-bearing part as an image result,
    /// first-match-wins; later image-bearing parts are ignored. The mime
    /// type defaults to `image/png` when the service omits it.
    pub fn first_inline_image(&self) -> Option<ImageResult> {
        self.parts
            .iter()
            .find_map(|part| part.inline_data.as_ref())
            .map(|data| ImageResult {
                bytes: data.bytes.clone(),
                mime: data
                    .mime_type
                    .clone()
                    .unwrap_or_else(|| "image/png".to_string()),
            })
    }
}

/// Image-generation collaborator: one text prompt in, content parts out.
#[async_trait]
pub trait ImageService {
    /// Generate an image for the composed prompt.
    async fn generate_image(&self, prompt: &str) -> Result<GenerationReply>;
}

/// Text-generation collaborator: one instruction in, free-form text out.
#[async_trait]
pub trait TextService {
    /// Generate a text reply for the instruction.
    async fn generate_text(&self, instruction: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_part(mime: Option<&str>, bytes: &[u8]) -> ContentPart {
        ContentPart {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime.map(String::from),
                bytes: bytes.to_vec(),
            }),
        }
    }

    fn text_part(text: &str) -> ContentPart {
        ContentPart {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    #[test]
    fn first_inline_image_skips_text_parts() {
        let reply = GenerationReply {
            parts: vec![
                text_part("here is your image"),
                data_part(Some("image/jpeg"), b"jpeg"),
            ],
        };
        let image = reply.first_inline_image().unwrap();
        assert_eq!(image.mime, "image/jpeg");
        assert_eq!(image.bytes, b"jpeg");
    }

    #[test]
    fn first_inline_image_is_first_match_wins() {
        let reply = GenerationReply {
            parts: vec![
                data_part(Some("image/png"), b"first"),
                data_part(Some("image/webp"), b"second"),
            ],
        };
        assert_eq!(reply.first_inline_image().unwrap().bytes, b"first");
    }

    #[test]
    fn missing_mime_defaults_to_png() {
        let reply = GenerationReply {
            parts: vec![data_part(None, b"raw")],
        };
        assert_eq!(reply.first_inline_image().unwrap().mime, "image/png");
    }

    #[test]
    fn reply_without_data_parts_yields_no_image() {
        let reply = GenerationReply {
            parts: vec![text_part("sorry, no image")],
        };
        assert!(reply.first_inline_image().is_none());
    }
}
