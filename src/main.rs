//! Carousel: CLI engine for generating styled AI image carousels.
//!
//! This is the main entry point for the `carousel` CLI. It parses arguments,
//! reads the API credential once, dispatches to the appropriate command
//! handler, and handles errors with proper exit codes.

mod cli;
mod commands;
pub mod compose;
pub mod context;
pub mod error;
pub mod exit_codes;
pub mod export;
pub mod fs;
pub mod generate;
pub mod ideate;
pub mod preset;
pub mod services;
pub mod session;
pub mod store;

use cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    // Credential is read exactly once per process; commands receive the
    // result rather than consulting the environment again.
    let credential = services::credential_from_env();

    match commands::dispatch(cli.command, credential).await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
