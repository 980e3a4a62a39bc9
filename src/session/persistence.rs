//! Durable mirroring of session state.
//!
//! Every configuration field and the prompt backing array mirror into the
//! key-value store independently, on every mutation. Scalars are stored as
//! plain values; the prompt array and image records are JSON-encoded
//! strings. Generated image bytes are persisted as files under the session's
//! `images/` directory with a `{file, mime}` record in the store, so status
//! and export work across CLI invocations.

use super::{Configuration, ImageResult, Language, MAX_SLOTS, SlotState, validate_slot_count};
use crate::context::SessionContext;
use crate::error::Result;
use crate::fs::atomic_write;
use crate::session::AspectRatio;
use crate::store::{FileStore, Store};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Store key for the aspect ratio scalar.
const KEY_ASPECT_RATIO: &str = "aspect_ratio";
/// Store key for the slot count scalar.
const KEY_SLOT_COUNT: &str = "slot_count";
/// Store key for the selected style preset id.
const KEY_STYLE_PRESET: &str = "style_preset";
/// Store key for the global prompt text.
const KEY_GLOBAL_PROMPT: &str = "global_prompt";
/// Store key for the conversion language.
const KEY_LANGUAGE: &str = "language";
/// Store key for the JSON-encoded prompt backing array.
const KEY_PROMPTS: &str = "prompts";
/// Store key for the JSON-encoded per-slot image records.
const KEY_IMAGES: &str = "images";

/// Pointer from the store to one persisted image file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ImageRecord {
    /// Filename relative to the session `images/` directory.
    file: String,
    /// Mime type of the persisted bytes.
    mime: String,
}

/// A live session: configuration and slot state backed by durable storage.
///
/// All mutation goes through this type so the store mirror can never drift
/// from in-memory state.
pub struct Session {
    /// Current configuration.
    pub config: Configuration,

    /// Current slot state.
    pub slots: SlotState,

    store: Box<dyn Store>,
    images_dir: PathBuf,
}

impl Session {
    /// Open the session for a context, loading persisted state or defaulting.
    pub fn open(ctx: &SessionContext) -> Result<Self> {
        let store = FileStore::open(ctx.store_path())?;
        Self::from_store(Box::new(store), ctx.images_dir())
    }

    /// Build a session over an explicit store backend. Used by `open` and by
    /// tests with an in-memory store.
    pub fn from_store(store: Box<dyn Store>, images_dir: PathBuf) -> Result<Self> {
        let mut session = Self {
            config: Configuration::default(),
            slots: SlotState::new(),
            store,
            images_dir,
        };
        session.load()?;
        Ok(session)
    }

    /// Hydrate configuration, prompts, and image results from the store.
    ///
    /// Absent keys keep their defaults; an image record whose file has gone
    /// missing is treated as absent rather than an error.
    fn load(&mut self) -> Result<()> {
        if let Some(value) = self.store.get(KEY_ASPECT_RATIO) {
            self.config.aspect_ratio = AspectRatio::parse(&value)?;
        }
        if let Some(value) = self.store.get(KEY_SLOT_COUNT) {
            let count: usize = value.parse().map_err(|_| {
                crate::error::CarouselError::User(format!("invalid stored slot count '{}'", value))
            })?;
            self.config.slot_count = validate_slot_count(count)?;
        }
        if let Some(value) = self.store.get(KEY_STYLE_PRESET) {
            self.config.style_preset = value;
        }
        if let Some(value) = self.store.get(KEY_GLOBAL_PROMPT) {
            self.config.global_prompt = value;
        }
        if let Some(value) = self.store.get(KEY_LANGUAGE) {
            self.config.language = Language::parse(&value)?;
        }

        if let Some(value) = self.store.get(KEY_PROMPTS) {
            let prompts: Vec<String> = serde_json::from_str(&value)?;
            self.slots.restore_prompts(&prompts);
        }

        if let Some(value) = self.store.get(KEY_IMAGES) {
            let records: Vec<Option<ImageRecord>> = serde_json::from_str(&value)?;
            for (index, record) in records.into_iter().take(MAX_SLOTS).enumerate() {
                let image = record.and_then(|r| {
                    let path = self.images_dir.join(&r.file);
                    std::fs::read(path)
                        .ok()
                        .map(|bytes| ImageResult { bytes, mime: r.mime })
                });
                self.slots.restore_image(index, image);
            }
        }

        Ok(())
    }

    // ========================================================================
    // Configuration mutations (each mirrors its own field)
    // ========================================================================

    /// Set the aspect ratio and mirror it.
    pub fn set_aspect_ratio(&mut self, ratio: AspectRatio) -> Result<()> {
        self.config.aspect_ratio = ratio;
        self.store.set(KEY_ASPECT_RATIO, ratio.as_str())
    }

    /// Set the slot count and mirror it. Prompts beyond the new count stay
    /// in the backing array.
    pub fn set_slot_count(&mut self, count: usize) -> Result<()> {
        let count = validate_slot_count(count)?;
        self.config.slot_count = count;
        self.store.set(KEY_SLOT_COUNT, &count.to_string())
    }

    /// Set the style preset id and mirror it.
    pub fn set_style_preset(&mut self, id: impl Into<String>) -> Result<()> {
        self.config.style_preset = id.into();
        self.store.set(KEY_STYLE_PRESET, &self.config.style_preset)
    }

    /// Set the global prompt and mirror it.
    pub fn set_global_prompt(&mut self, prompt: impl Into<String>) -> Result<()> {
        self.config.global_prompt = prompt.into();
        self.store.set(KEY_GLOBAL_PROMPT, &self.config.global_prompt)
    }

    /// Set the conversion language and mirror it.
    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.config.language = language;
        self.store.set(KEY_LANGUAGE, language.as_str())
    }

    // ========================================================================
    // Slot mutations
    // ========================================================================

    /// Set one slot's prompt text and mirror the backing array.
    pub fn set_prompt(&mut self, index: usize, prompt: impl Into<String>) -> Result<()> {
        self.slots.set_prompt(index, prompt);
        self.mirror_prompts()
    }

    /// Overwrite prompts at indices `0..values.len()` and mirror the backing
    /// array. Higher indices keep their text.
    pub fn overwrite_prompts(&mut self, values: &[String]) -> Result<()> {
        self.slots.overwrite_prompts(values);
        self.mirror_prompts()
    }

    /// Record a successful generation: persist the bytes to the images
    /// directory and mirror the `{file, mime}` record.
    pub fn store_image(&mut self, index: usize, image: ImageResult) -> Result<()> {
        let file = format!("slot_{}.{}", index + 1, image.extension());
        atomic_write(self.images_dir.join(&file), &image.bytes)?;

        self.slots.set_image(index, image);
        self.mirror_images()
    }

    /// Flip one slot's loading flag. In-flight state only, never mirrored.
    pub fn set_loading(&mut self, index: usize, loading: bool) {
        self.slots.set_loading(index, loading);
    }

    fn mirror_prompts(&mut self) -> Result<()> {
        let encoded = serde_json::to_string(&self.slots.prompts())?;
        self.store.set(KEY_PROMPTS, &encoded)
    }

    fn mirror_images(&mut self) -> Result<()> {
        let records: Vec<Option<ImageRecord>> = self
            .slots
            .slots()
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.image.as_ref().map(|image| ImageRecord {
                    file: format!("slot_{}.{}", index + 1, image.extension()),
                    mime: image.mime.clone(),
                })
            })
            .collect();
        let encoded = serde_json::to_string(&records)?;
        self.store.set(KEY_IMAGES, &encoded)
    }

    /// Mirror every configuration field at once. Used by `init` to seed a
    /// fresh store.
    pub fn mirror_all(&mut self) -> Result<()> {
        let config = self.config.clone();
        self.store.set(KEY_ASPECT_RATIO, config.aspect_ratio.as_str())?;
        self.store
            .set(KEY_SLOT_COUNT, &config.slot_count.to_string())?;
        self.store.set(KEY_STYLE_PRESET, &config.style_preset)?;
        self.store.set(KEY_GLOBAL_PROMPT, &config.global_prompt)?;
        self.store.set(KEY_LANGUAGE, config.language.as_str())?;
        self.mirror_prompts()?;
        self.mirror_images()
    }
}
