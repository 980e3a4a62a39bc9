//! Prompt composition for carousel.
//!
//! Turns (style preset, configuration, slot) into the final request string
//! sent to the image service. Composition is a pure function with a fixed,
//! non-commutative segment order:
//!
//! 1. preset base prompt
//! 2. preset footer with the slide-number token rendered per-slot
//! 3. global prompt, only when non-empty
//! 4. the slot's own prompt
//! 5. the aspect-ratio descriptor
//!
//! Every slot in one run shares the style and global text verbatim; only the
//! footer's `NN/MM` slide number differs.

use crate::error::{CarouselError, Result};
use crate::preset::{SLIDE_NUMBER_TOKEN, StylePreset};
use crate::session::{AspectRatio, Configuration, Slot};

/// Aspect-ratio descriptor appended to every composed prompt.
pub fn aspect_descriptor(ratio: AspectRatio) -> &'static str {
    match ratio {
        AspectRatio::Square => "1:1 square ratio",
        AspectRatio::Portrait => "4:5 vertical ratio for Instagram post",
    }
}

/// Render the slide-number token for one slot: `(index+1)/(slot_count)`,
/// both zero-padded to two digits.
pub fn slide_number(index: usize, slot_count: usize) -> String {
    format!("{:02}/{:02}", index + 1, slot_count)
}

/// Compose the final request string for one slot.
///
/// Pure and deterministic: composing the same inputs twice yields
/// byte-identical strings. Fails with `EmptyPrompt` only if the trimmed
/// result is empty (in practice this requires a blank slot prompt, since
/// preset text is never empty).
pub fn compose(
    preset: &StylePreset,
    config: &Configuration,
    slot: &Slot,
    index: usize,
) -> Result<String> {
    let footer = preset
        .footer_template
        .replace(SLIDE_NUMBER_TOKEN, &slide_number(index, config.slot_count));

    let segments = [
        preset.base_prompt.as_str(),
        footer.as_str(),
        config.global_prompt.as_str(),
        slot.prompt.as_str(),
    ];

    let composed = segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(". ");

    // The emptiness check applies to the layered text; the descriptor is a
    // constant suffix and would otherwise mask a fully blank composition.
    if composed.trim().is_empty() {
        return Err(CarouselError::EmptyPrompt { slot: index + 1 });
    }

    Ok(format!(
        "{}. {}",
        composed,
        aspect_descriptor(config.aspect_ratio)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::PresetRegistry;
    use crate::session::{Language, SlotState};

    fn config_with(slot_count: usize, ratio: AspectRatio) -> Configuration {
        Configuration {
            aspect_ratio: ratio,
            slot_count,
            style_preset: "flat-illustration".to_string(),
            global_prompt: String::new(),
            language: Language::En,
        }
    }

    fn slot_with(prompt: &str) -> Slot {
        Slot {
            prompt: prompt.to_string(),
            ..Slot::default()
        }
    }

    #[test]
    fn slide_numbers_are_zero_padded() {
        assert_eq!(slide_number(0, 1), "01/01");
        assert_eq!(slide_number(1, 5), "02/05");
        assert_eq!(slide_number(4, 5), "05/05");
    }

    #[test]
    fn every_preset_and_slot_count_renders_base_and_footer_number() {
        let registry = PresetRegistry::builtin();
        for preset in registry.iter() {
            for &slot_count in crate::session::ALLOWED_SLOT_COUNTS {
                for index in 0..slot_count {
                    let config = config_with(slot_count, AspectRatio::Square);
                    let composed =
                        compose(preset, &config, &slot_with("a red fox"), index).unwrap();
                    assert!(composed.contains(preset.base_prompt.trim()));
                    assert!(composed.contains(&slide_number(index, slot_count)));
                }
            }
        }
    }

    #[test]
    fn segment_order_is_fixed() {
        let registry = PresetRegistry::builtin();
        let preset = registry.get("flat-illustration").unwrap();
        let mut config = config_with(3, AspectRatio::Square);
        config.global_prompt = "warm morning light".to_string();

        let composed = compose(preset, &config, &slot_with("a lighthouse"), 1).unwrap();

        let base_pos = composed.find("Flat vector illustration").unwrap();
        let footer_pos = composed.find("02/03").unwrap();
        let global_pos = composed.find("warm morning light").unwrap();
        let slot_pos = composed.find("a lighthouse").unwrap();
        let ratio_pos = composed.find("1:1 square ratio").unwrap();
        assert!(base_pos < footer_pos);
        assert!(footer_pos < global_pos);
        assert!(global_pos < slot_pos);
        assert!(slot_pos < ratio_pos);
    }

    #[test]
    fn empty_global_prompt_is_omitted() {
        let registry = PresetRegistry::builtin();
        let preset = registry.get("bold-typography").unwrap();
        let config = config_with(1, AspectRatio::Square);

        let composed = compose(preset, &config, &slot_with("launch teaser"), 0).unwrap();
        assert!(!composed.contains(". . "));
        assert!(composed.contains("launch teaser"));
    }

    #[test]
    fn portrait_descriptor_mentions_instagram() {
        let registry = PresetRegistry::builtin();
        let preset = registry.get("photo-editorial").unwrap();
        let config = config_with(5, AspectRatio::Portrait);

        let composed = compose(preset, &config, &slot_with("a quiet street"), 0).unwrap();
        assert!(composed.ends_with("4:5 vertical ratio for Instagram post"));
    }

    #[test]
    fn composing_twice_is_byte_identical() {
        let registry = PresetRegistry::builtin();
        let preset = registry.get("flat-illustration").unwrap();
        let mut config = config_with(5, AspectRatio::Portrait);
        config.global_prompt = "vivid accent colors".to_string();
        let slots = {
            let mut s = SlotState::new();
            s.set_prompt(2, "a paper boat on a puddle");
            s
        };

        let first = compose(preset, &config, slots.slot(2), 2).unwrap();
        let second = compose(preset, &config, slots.slot(2), 2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fully_blank_composition_fails_with_empty_prompt() {
        // A degenerate preset with whitespace-only text; only reachable
        // through hand-built data, but the guard is part of the contract.
        let preset = StylePreset {
            id: "blank".to_string(),
            display_name: "Blank".to_string(),
            description: String::new(),
            base_prompt: "   ".to_string(),
            footer_template: "   ".to_string(),
            default_global_prompt: String::new(),
        };
        let config = config_with(1, AspectRatio::Square);

        let err = compose(&preset, &config, &slot_with("  "), 0).unwrap_err();
        assert!(matches!(err, CarouselError::EmptyPrompt { slot: 1 }));
    }
}
