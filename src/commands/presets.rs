//! Implementation of the `carousel presets` command.
//!
//! Lists every style preset the session can select: built-ins plus any
//! defined in the session's `presets.yaml`. Works without an initialized
//! session, in which case only built-ins are shown.

use crate::context::SessionContext;
use crate::error::Result;
use crate::preset::PresetRegistry;

/// Execute the `carousel presets` command.
pub fn cmd_presets() -> Result<()> {
    let registry = match SessionContext::resolve() {
        Ok(ctx) => PresetRegistry::load(&ctx)?,
        Err(_) => PresetRegistry::builtin(),
    };

    println!("Available style presets:");
    println!();
    for preset in registry.iter() {
        println!("  {:18} {}", preset.id, preset.display_name);
        println!("  {:18} {}", "", preset.description);
        println!();
    }

    Ok(())
}
