//! Session data model for carousel.
//!
//! A session is one carousel in progress: the configuration (aspect ratio,
//! slot count, style preset, global prompt, language) plus the slot state
//! (per-slot prompt text, generated image, loading flag).
//!
//! # Invariants
//!
//! - The prompt backing array is always sized to [`MAX_SLOTS`], even when the
//!   configured slot count is smaller, so switching the slot count down and
//!   back up never loses hidden text.
//! - An image result is set only by a successful generation and persists
//!   across unrelated mutations; it is never implicitly cleared.
//! - The loading flag is true only while that slot's request is in flight.
//! - Every read-modify-write of the slot collection is a full-collection
//!   copy-and-replace, so mutating one slot's loading/result state can never
//!   clobber an edit to another slot made while a batch is in flight.

use crate::error::{CarouselError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};

mod persistence;
mod snapshot;

pub use persistence::Session;
pub use snapshot::{SessionSnapshot, append_snapshot, read_snapshots};

/// Maximum supported slot count; the prompt backing array is always this size.
pub const MAX_SLOTS: usize = 5;

/// Slot counts the configuration accepts.
pub const ALLOWED_SLOT_COUNTS: &[usize] = &[1, 3, 5];

/// Output aspect ratio for every image in the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    /// 1:1, the classic square post.
    Square,
    /// 4:5 vertical, the taller Instagram post format.
    Portrait,
}

impl AspectRatio {
    /// Canonical string form used in the store and on the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "square",
            AspectRatio::Portrait => "portrait",
        }
    }

    /// Parse the canonical string form.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "square" => Ok(AspectRatio::Square),
            "portrait" => Ok(AspectRatio::Portrait),
            other => Err(CarouselError::User(format!(
                "invalid aspect ratio '{}': expected 'square' or 'portrait'",
                other
            ))),
        }
    }
}

/// Language the idea-to-prompts conversion is phrased in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    En,
    /// Korean.
    Ko,
    /// Japanese.
    Ja,
}

impl Language {
    /// Canonical string form used in the store and on the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ko => "ko",
            Language::Ja => "ja",
        }
    }

    /// Parse the canonical string form.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "en" => Ok(Language::En),
            "ko" => Ok(Language::Ko),
            "ja" => Ok(Language::Ja),
            other => Err(CarouselError::User(format!(
                "invalid language '{}': expected 'en', 'ko', or 'ja'",
                other
            ))),
        }
    }
}

/// Session configuration.
///
/// Scalars mirror into the store as plain values on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Shared output aspect ratio.
    pub aspect_ratio: AspectRatio,

    /// Number of active slots; one of [`ALLOWED_SLOT_COUNTS`].
    pub slot_count: usize,

    /// Selected style preset id.
    pub style_preset: String,

    /// Global prompt text appended to every slot's composition when non-empty.
    pub global_prompt: String,

    /// Language for idea-to-prompts conversion.
    pub language: Language,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::Square,
            slot_count: MAX_SLOTS,
            style_preset: crate::preset::DEFAULT_PRESET_ID.to_string(),
            global_prompt: String::new(),
            language: Language::En,
        }
    }
}

/// Validate a slot count against the allowed discrete values.
pub fn validate_slot_count(count: usize) -> Result<usize> {
    if ALLOWED_SLOT_COUNTS.contains(&count) {
        Ok(count)
    } else {
        Err(CarouselError::User(format!(
            "invalid slot count {}: expected one of 1, 3, 5",
            count
        )))
    }
}

/// A successfully generated image for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    /// Raw image bytes.
    pub bytes: Vec<u8>,

    /// Mime type reported by the service (`image/png` when absent).
    pub mime: String,
}

impl ImageResult {
    /// Render as a displayable `data:` URI.
    pub fn data_uri(&self) -> String {
        let payload = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime, payload)
    }

    /// File extension for this image's mime type.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

/// One generation unit: prompt text, optional image, loading flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    /// The slot's own prompt text.
    pub prompt: String,

    /// Result of the last successful generation, if any.
    pub image: Option<ImageResult>,

    /// True only while this slot's request is in flight.
    pub loading: bool,
}

/// The slot collection, always [`MAX_SLOTS`] entries long.
///
/// All mutation goes through copy-and-replace helpers: each one clones the
/// whole collection, edits the clone, and swaps it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotState {
    slots: Vec<Slot>,
}

impl SlotState {
    /// Create an empty slot state sized to [`MAX_SLOTS`].
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::default(); MAX_SLOTS],
        }
    }

    /// Borrow one slot.
    ///
    /// # Panics
    ///
    /// Panics if `index >= MAX_SLOTS`; callers validate indices at the
    /// command boundary.
    pub fn slot(&self, index: usize) -> &Slot {
        &self.slots[index]
    }

    /// Borrow all slots in index order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The full prompt backing array, including text hidden beyond the
    /// active slot count.
    pub fn prompts(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.prompt.clone()).collect()
    }

    /// Replace one slot's prompt text.
    pub fn set_prompt(&mut self, index: usize, prompt: impl Into<String>) {
        let mut next = self.slots.clone();
        next[index].prompt = prompt.into();
        self.slots = next;
    }

    /// Overwrite prompts at indices `0..values.len()`, leaving higher
    /// indices untouched. Used by the idea-to-prompts converter, which
    /// replaces all active slots at once.
    pub fn overwrite_prompts(&mut self, values: &[String]) {
        let mut next = self.slots.clone();
        for (slot, value) in next.iter_mut().zip(values) {
            slot.prompt = value.clone();
        }
        self.slots = next;
    }

    /// Restore the full backing array from persisted state.
    ///
    /// Missing entries default to empty; extras beyond [`MAX_SLOTS`] are
    /// dropped.
    pub fn restore_prompts(&mut self, values: &[String]) {
        let mut next = vec![Slot::default(); MAX_SLOTS];
        for (slot, value) in next.iter_mut().zip(values) {
            slot.prompt = value.clone();
        }
        // Carry over images and loading flags from the current state.
        for (slot, old) in next.iter_mut().zip(&self.slots) {
            slot.image = old.image.clone();
            slot.loading = old.loading;
        }
        self.slots = next;
    }

    /// Set one slot's image result. Only successful generations call this.
    pub fn set_image(&mut self, index: usize, image: ImageResult) {
        let mut next = self.slots.clone();
        next[index].image = Some(image);
        self.slots = next;
    }

    /// Restore one slot's image result from persisted state.
    pub fn restore_image(&mut self, index: usize, image: Option<ImageResult>) {
        let mut next = self.slots.clone();
        next[index].image = image;
        self.slots = next;
    }

    /// Flip one slot's loading flag.
    pub fn set_loading(&mut self, index: usize, loading: bool) {
        let mut next = self.slots.clone();
        next[index].loading = loading;
        self.slots = next;
    }
}
