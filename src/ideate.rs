//! Idea-to-prompts conversion for carousel.
//!
//! Sends free-form "idea" text to the text-generation service, asking for a
//! JSON object `{"prompts": [...]}` with exactly one entry per active slot,
//! phrased in the configured language. The reply is validated against that
//! contract and, on success, overwrites the active slots of the prompt
//! backing array in one go; slots beyond the active count are untouched.
//! Any failure leaves every prompt unchanged and is reported verbatim; there
//! are no automatic retries.
//!
//! Extraction is strict: a reply must contain one unambiguous JSON object.
//! Replies with several top-level JSON-looking fragments are rejected rather
//! than guessed at.

use crate::error::{CarouselError, Result};
use crate::services::TextService;
use crate::session::{AspectRatio, Configuration, Language, Session};
use serde::Deserialize;
use tracing::{debug, info};

/// The validated reply contract.
#[derive(Debug, Deserialize)]
struct PromptsPayload {
    prompts: Vec<String>,
}

/// Convert idea text into per-slot prompts and overwrite the active slots.
///
/// Preconditions: credential present, idea text non-blank. The aspect ratio
/// is mentioned in the instruction for the model's benefit but not enforced
/// against the reply.
pub async fn convert<S: TextService>(
    session: &mut Session,
    service: &S,
    credential_present: bool,
    idea: &str,
) -> Result<()> {
    if !credential_present {
        return Err(CarouselError::CredentialMissing);
    }
    if idea.trim().is_empty() {
        return Err(CarouselError::EmptyInput);
    }

    let instruction = build_instruction(idea, &session.config);
    debug!(instruction_len = instruction.len(), "requesting prompt conversion");

    let reply = service.generate_text(&instruction).await?;
    let prompts = parse_reply(&reply, session.config.slot_count)?;

    info!(count = prompts.len(), "prompts converted");
    session.overwrite_prompts(&prompts)
}

/// Build the conversion instruction in the configured language.
fn build_instruction(idea: &str, config: &Configuration) -> String {
    let count = config.slot_count;
    let ratio = match config.aspect_ratio {
        AspectRatio::Square => "1:1 square",
        AspectRatio::Portrait => "4:5 vertical",
    };

    match config.language {
        Language::En => format!(
            "You are helping plan an image carousel of {count} slides in {ratio} format. \
             Based on the following idea, write one image-generation prompt per slide, \
             in English, each describing a single self-contained scene.\n\
             Idea: {idea}\n\
             Reply with only a JSON object of the form \
             {{\"prompts\": [\"...\"]}} containing exactly {count} strings."
        ),
        Language::Ko => format!(
            "{ratio} 형식의 슬라이드 {count}장짜리 이미지 캐러셀을 기획하고 있습니다. \
             다음 아이디어를 바탕으로 슬라이드마다 하나씩, 한국어로 된 이미지 생성 \
             프롬프트를 작성해 주세요.\n\
             아이디어: {idea}\n\
             정확히 {count}개의 문자열을 담은 {{\"prompts\": [\"...\"]}} 형태의 JSON \
             객체로만 답해 주세요."
        ),
        Language::Ja => format!(
            "{ratio} 形式のスライド{count}枚の画像カルーセルを企画しています。\
             次のアイデアをもとに、スライドごとに1つずつ、日本語の画像生成プロンプトを\
             作成してください。\n\
             アイデア: {idea}\n\
             ちょうど{count}個の文字列を含む {{\"prompts\": [\"...\"]}} 形式のJSON\
             オブジェクトのみで回答してください。"
        ),
    }
}

/// Parse and validate a service reply against the prompts contract.
fn parse_reply(reply: &str, slot_count: usize) -> Result<Vec<String>> {
    let object = extract_json_object(reply)?;
    let payload: PromptsPayload = serde_json::from_str(&object).map_err(|e| {
        CarouselError::InvalidFormat(format!("expected a \"prompts\" list: {}", e))
    })?;

    if payload.prompts.len() != slot_count {
        return Err(CarouselError::InvalidFormat(format!(
            "expected exactly {} prompts, got {}",
            slot_count,
            payload.prompts.len()
        )));
    }

    Ok(payload.prompts)
}

/// Extract the single JSON object from a free-form reply.
///
/// Accepts, in order: the whole trimmed reply; the contents of a Markdown
/// code fence; otherwise exactly one balanced top-level `{...}` fragment
/// that parses as an object. Zero candidates or more than one parseable
/// candidate is a `ParseError`.
fn extract_json_object(reply: &str) -> Result<String> {
    let trimmed = strip_code_fence(reply.trim());

    if parses_as_object(trimmed) {
        return Ok(trimmed.to_string());
    }

    let candidates: Vec<&str> = balanced_objects(trimmed)
        .into_iter()
        .filter(|c| parses_as_object(c))
        .collect();

    match candidates.as_slice() {
        [single] => Ok((*single).to_string()),
        [] => Err(CarouselError::Parse(
            "reply contains no JSON object".to_string(),
        )),
        _ => Err(CarouselError::Parse(format!(
            "reply contains {} JSON objects, expected one",
            candidates.len()
        ))),
    }
}

/// Strip a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body_start) = rest.find('\n') else {
        return text;
    };
    let body = &rest[body_start + 1..];
    match body.rfind("```") {
        Some(end) => body[..end].trim(),
        None => text,
    }
}

fn parses_as_object(text: &str) -> bool {
    matches!(
        serde_json::from_str::<serde_json::Value>(text),
        Ok(serde_json::Value::Object(_))
    )
}

/// Find balanced top-level `{...}` fragments, honoring string literals and
/// escapes so braces inside prompt text do not confuse the scan.
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (pos, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = pos;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    fragments.push(&text[start..pos + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    fragments
}
