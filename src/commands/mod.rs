//! Command implementations for carousel.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. The credential is read exactly once at process start and
//! threaded through here; commands that call the generation service fail
//! with `CredentialMissing` when it is absent.

mod config;
mod export;
mod generate;
mod ideate;
mod init;
mod presets;
mod prompt;
mod status;

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
///
/// This is the main entry point for command execution. Each command
/// is routed to its handler function.
pub async fn dispatch(command: Command, credential: Option<String>) -> Result<()> {
    match command {
        Command::Init => init::cmd_init(),
        Command::Status(args) => status::cmd_status(args),
        Command::Presets => presets::cmd_presets(),
        Command::Config(action) => config::cmd_config(action),
        Command::Prompt(args) => prompt::cmd_prompt(args),
        Command::Ideate(args) => ideate::cmd_ideate(args, credential).await,
        Command::Generate(args) => generate::cmd_generate(args, credential).await,
        Command::Export(args) => export::cmd_export(args),
    }
}
