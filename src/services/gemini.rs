//! Gemini REST client.
//!
//! Implements both service traits over the `generateContent` endpoint:
//! the image model answers a prompt with content parts that may carry
//! inline base64 payloads, the text model answers an instruction with text
//! parts. Service failures pass the collaborator's message through
//! verbatim.

use crate::error::{CarouselError, Result};
use crate::services::{ContentPart, GenerationReply, ImageService, InlineData, TextService};
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Model used for image generation.
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Model used for idea-to-prompts text generation.
pub const TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default API endpoint prefix.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Client for Google's generative-language API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    /// Create a client with the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Create a client against a custom endpoint (tests, proxies).
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// POST one `generateContent` request and parse the reply envelope.
    async fn generate_content(&self, model: &str, prompt: &str) -> Result<GenerateContentResponse> {
        let url = format!("{}/{}:generateContent", self.endpoint, model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        debug!(model, prompt_len = prompt.len(), "sending generateContent request");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| CarouselError::Service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CarouselError::Service(format!("{}: {}", status, text)));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| CarouselError::Service(format!("malformed response: {}", e)))
    }
}

#[async_trait]
impl ImageService for GeminiClient {
    async fn generate_image(&self, prompt: &str) -> Result<GenerationReply> {
        let response = self.generate_content(IMAGE_MODEL, prompt).await?;
        response.into_reply()
    }
}

#[async_trait]
impl TextService for GeminiClient {
    async fn generate_text(&self, instruction: &str) -> Result<String> {
        let response = self.generate_content(TEXT_MODEL, instruction).await?;
        let reply = response.into_reply()?;
        let text: String = reply
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        Ok(text)
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineDataPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

impl GenerateContentResponse {
    /// Convert the first candidate's parts into the service-neutral reply,
    /// decoding inline base64 payloads.
    fn into_reply(self) -> Result<GenerationReply> {
        let parts = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let mut reply = GenerationReply::default();
        for part in parts {
            let inline_data = match part.inline_data {
                Some(payload) => {
                    let bytes = base64::engine::general_purpose::STANDARD
                        .decode(payload.data.as_bytes())
                        .map_err(|e| {
                            CarouselError::Service(format!("invalid inline payload: {}", e))
                        })?;
                    Some(InlineData {
                        mime_type: payload.mime_type,
                        bytes,
                    })
                }
                None => None,
            };
            reply.parts.push(ContentPart {
                text: part.text,
                inline_data,
            });
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_inline_data_with_camel_case_keys() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "rendered" },
                        { "inlineData": { "mimeType": "image/png", "data": "AQID" } }
                    ]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let reply = response.into_reply().unwrap();

        assert_eq!(reply.parts.len(), 2);
        assert_eq!(reply.parts[0].text.as_deref(), Some("rendered"));
        let data = reply.parts[1].inline_data.as_ref().unwrap();
        assert_eq!(data.mime_type.as_deref(), Some("image/png"));
        assert_eq!(data.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn response_without_candidates_is_an_empty_reply() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        let reply = response.into_reply().unwrap();
        assert!(reply.parts.is_empty());
        assert!(reply.first_inline_image().is_none());
    }

    #[test]
    fn invalid_base64_payload_is_a_service_error() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [{ "inlineData": { "data": "!!not-base64!!" } }]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            response.into_reply(),
            Err(CarouselError::Service(_))
        ));
    }
}
