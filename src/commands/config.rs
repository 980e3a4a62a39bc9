//! Implementation of the `carousel config` command.
//!
//! Each subcommand changes one configuration field and mirrors it to the
//! store immediately. Selecting a preset additionally adopts the preset's
//! default global prompt when the session's global prompt is empty, so a
//! fresh session picks up the preset's voice without clobbering text the
//! user has already written.

use crate::cli::ConfigAction;
use crate::context::require_initialized_session;
use crate::error::Result;
use crate::preset::PresetRegistry;
use crate::session::{AspectRatio, Language, Session};

/// Execute the `carousel config` command.
pub fn cmd_config(action: ConfigAction) -> Result<()> {
    let ctx = require_initialized_session()?;
    let mut session = Session::open(&ctx)?;
    let registry = PresetRegistry::load(&ctx)?;

    apply(&mut session, &registry, action)
}

/// Apply one configuration change to a live session.
fn apply(session: &mut Session, registry: &PresetRegistry, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::AspectRatio { value } => {
            let ratio = AspectRatio::parse(&value)?;
            session.set_aspect_ratio(ratio)?;
            println!("Aspect ratio set to {}.", ratio.as_str());
        }
        ConfigAction::SlotCount { value } => {
            session.set_slot_count(value)?;
            println!("Slot count set to {}.", value);
        }
        ConfigAction::Preset { id } => {
            let preset = registry.require(&id)?;
            let adopt = session.config.global_prompt.is_empty()
                && !preset.default_global_prompt.is_empty();
            let default_global = preset.default_global_prompt.clone();
            session.set_style_preset(&id)?;
            if adopt {
                session.set_global_prompt(default_global)?;
                println!("Style preset set to {} (adopted its global prompt).", id);
            } else {
                println!("Style preset set to {}.", id);
            }
        }
        ConfigAction::GlobalPrompt { text } => {
            session.set_global_prompt(text)?;
            println!("Global prompt updated.");
        }
        ConfigAction::Language { value } => {
            let language = Language::parse(&value)?;
            session.set_language(language)?;
            println!("Language set to {}.", language.as_str());
        }
    }

    Ok(())
}
