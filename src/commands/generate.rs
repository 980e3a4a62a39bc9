//! Implementation of the `carousel generate` command.
//!
//! Without `--slot`, runs the full batch through the orchestrator: snapshot
//! first, then every non-blank active slot in ascending order, fail-fast.
//! With `--slot N`, generates that one slot and propagates its failure.

use super::prompt::slot_index;
use crate::cli::GenerateArgs;
use crate::context::require_initialized_session;
use crate::error::{CarouselError, Result};
use crate::generate::Orchestrator;
use crate::preset::PresetRegistry;
use crate::services::gemini::GeminiClient;
use crate::session::Session;

/// Execute the `carousel generate` command.
pub async fn cmd_generate(args: GenerateArgs, credential: Option<String>) -> Result<()> {
    let ctx = require_initialized_session()?;
    let mut session = Session::open(&ctx)?;
    let registry = PresetRegistry::load(&ctx)?;

    let key = credential.ok_or(CarouselError::CredentialMissing)?;
    let client = GeminiClient::new(key);

    let mut orchestrator = Orchestrator::new(&mut session, &registry, &client, true);

    match args.slot {
        Some(slot) => {
            let index = slot_index(slot)?;
            println!("Generating slot {}...", slot);
            orchestrator.generate_slot(index, true).await?;
            println!("Slot {} generated.", slot);
        }
        None => {
            println!("Generating batch...");
            orchestrator.generate_all(&ctx).await?;
            drop(orchestrator);

            let generated = session
                .slots
                .slots()
                .iter()
                .take(session.config.slot_count)
                .filter(|slot| slot.image.is_some())
                .count();
            println!("Batch complete: {} image(s) generated.", generated);
        }
    }

    Ok(())
}
