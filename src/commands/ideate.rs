//! Implementation of the `carousel ideate` command.
//!
//! Converts free-form idea text into one prompt per active slot via the
//! text model, then prints the resulting prompts.

use crate::cli::IdeateArgs;
use crate::context::require_initialized_session;
use crate::error::{CarouselError, Result};
use crate::ideate::convert;
use crate::services::gemini::GeminiClient;
use crate::session::Session;

/// Execute the `carousel ideate` command.
pub async fn cmd_ideate(args: IdeateArgs, credential: Option<String>) -> Result<()> {
    let ctx = require_initialized_session()?;
    let mut session = Session::open(&ctx)?;

    let key = credential.ok_or(CarouselError::CredentialMissing)?;
    let client = GeminiClient::new(key);

    convert(&mut session, &client, true, &args.text).await?;

    println!("Converted idea into {} prompt(s):", session.config.slot_count);
    for index in 0..session.config.slot_count {
        println!("  {}. {}", index + 1, session.slots.slot(index).prompt);
    }

    Ok(())
}
