//! Style preset registry for carousel.
//!
//! A style preset is a named bundle of shared style text, a footer template,
//! and a default global prompt, applied uniformly across every slot in a
//! run. The registry is data-driven: built-in presets are compiled in, and a
//! `presets.yaml` file in the session directory may add new presets or
//! override built-ins by id, so new styles require no code change.
//!
//! # Preset File Format
//!
//! `presets.yaml` holds a YAML list of presets:
//!
//! ```text
//! - id: my-style
//!   display_name: My Style
//!   description: Custom house style
//!   base_prompt: Hand-drawn ink sketch style, warm paper texture
//!   footer_template: tiny page marker reading {slide_number}
//!   default_global_prompt: muted colors, consistent line weight
//! ```

use crate::context::SessionContext;
use crate::error::{CarouselError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Token in a footer template replaced with the rendered slide number
/// (`NN/MM`) for each slot.
pub const SLIDE_NUMBER_TOKEN: &str = "{slide_number}";

/// Preset id of the built-in default, used for fresh sessions.
pub const DEFAULT_PRESET_ID: &str = "flat-illustration";

/// Regex pattern for valid preset ids.
static PRESET_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("Invalid preset id regex"));

/// A named visual style shared by all slots in a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylePreset {
    /// Stable identifier (lowercase, digits, `-`/`_`).
    pub id: String,

    /// Human-readable name shown in listings.
    pub display_name: String,

    /// One-line description of the style.
    #[serde(default)]
    pub description: String,

    /// Style text prepended to every composed prompt. Never empty.
    pub base_prompt: String,

    /// Footer text containing the `{slide_number}` token, rendered per-slot.
    pub footer_template: String,

    /// Global prompt adopted when the preset is selected and the session's
    /// global prompt is empty.
    #[serde(default)]
    pub default_global_prompt: String,
}

impl StylePreset {
    /// Validate id, base prompt, and footer template.
    fn validate(&self) -> Result<()> {
        if !PRESET_ID_REGEX.is_match(&self.id) {
            return Err(CarouselError::User(format!(
                "invalid preset id '{}': use lowercase letters, digits, '-' or '_'",
                self.id
            )));
        }
        if self.base_prompt.trim().is_empty() {
            return Err(CarouselError::User(format!(
                "preset '{}' has an empty base_prompt",
                self.id
            )));
        }
        if !self.footer_template.contains(SLIDE_NUMBER_TOKEN) {
            return Err(CarouselError::User(format!(
                "preset '{}' footer_template is missing the {} token",
                self.id, SLIDE_NUMBER_TOKEN
            )));
        }
        Ok(())
    }
}

/// Registry of style presets, keyed by id.
#[derive(Debug)]
pub struct PresetRegistry {
    presets: BTreeMap<String, StylePreset>,
}

impl PresetRegistry {
    /// Build the registry of built-in presets only.
    pub fn builtin() -> Self {
        let mut presets = BTreeMap::new();
        for preset in builtin_presets() {
            presets.insert(preset.id.clone(), preset);
        }
        Self { presets }
    }

    /// Build the registry for a session: built-ins overlaid with the
    /// session's `presets.yaml`, if present.
    ///
    /// User presets with a built-in id replace the built-in.
    pub fn load(ctx: &SessionContext) -> Result<Self> {
        let mut registry = Self::builtin();

        let path = ctx.presets_path();
        if path.is_file() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                CarouselError::User(format!(
                    "failed to read preset file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            for preset in Self::parse_presets(&content)? {
                registry.presets.insert(preset.id.clone(), preset);
            }
        }

        Ok(registry)
    }

    /// Parse and validate a YAML preset list.
    fn parse_presets(yaml: &str) -> Result<Vec<StylePreset>> {
        let presets: Vec<StylePreset> = serde_yaml::from_str(yaml)
            .map_err(|e| CarouselError::User(format!("failed to parse presets.yaml: {}", e)))?;
        for preset in &presets {
            preset.validate()?;
        }
        Ok(presets)
    }

    /// Look up a preset by id.
    pub fn get(&self, id: &str) -> Option<&StylePreset> {
        self.presets.get(id)
    }

    /// Look up a preset by id, or fail with the known ids listed.
    pub fn require(&self, id: &str) -> Result<&StylePreset> {
        self.get(id).ok_or_else(|| {
            let known: Vec<_> = self.presets.keys().map(String::as_str).collect();
            CarouselError::User(format!(
                "unknown style preset '{}'. Available: {}",
                id,
                known.join(", ")
            ))
        })
    }

    /// Iterate presets in id order.
    pub fn iter(&self) -> impl Iterator<Item = &StylePreset> {
        self.presets.values()
    }
}

/// The compiled-in preset set.
fn builtin_presets() -> Vec<StylePreset> {
    vec![
        StylePreset {
            id: "flat-illustration".to_string(),
            display_name: "Flat Illustration".to_string(),
            description: "Flat vector illustrations with a soft pastel palette".to_string(),
            base_prompt: "Flat vector illustration, soft pastel color palette, \
                          consistent character and object design across a slide series, \
                          clean geometric shapes"
                .to_string(),
            footer_template: "small page indicator in the bottom-right corner reading \
                              {slide_number}"
                .to_string(),
            default_global_prompt: "generous margins, uncluttered composition, no watermark"
                .to_string(),
        },
        StylePreset {
            id: "photo-editorial".to_string(),
            display_name: "Photo Editorial".to_string(),
            description: "Editorial photography with natural light".to_string(),
            base_prompt: "Professional editorial photograph, natural window light, \
                          shallow depth of field, cohesive color grading across the series"
                .to_string(),
            footer_template: "subtle caption strip along the bottom edge showing \
                              {slide_number}"
                .to_string(),
            default_global_prompt: "high quality, realistic detail, muted tones".to_string(),
        },
        StylePreset {
            id: "bold-typography".to_string(),
            display_name: "Bold Typography".to_string(),
            description: "Large display type on solid color blocks".to_string(),
            base_prompt: "Bold typographic poster design, oversized display lettering, \
                          solid color blocks, strong grid layout shared across all slides"
                .to_string(),
            footer_template: "small monospaced page number {slide_number} aligned to the \
                              baseline grid"
                .to_string(),
            default_global_prompt: String::new(),
        },
    ]
}
