//! Error types for the carousel CLI.
//!
//! Uses thiserror for derive macros. Every failure is surfaced as one
//! user-facing message at the command boundary that produced it; the only
//! internal re-raise is the batch loop in `generate`, which propagates a
//! per-slot failure upward to abort the remaining slots.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for carousel operations.
///
/// Each variant maps to a specific exit code.
#[derive(Error, Debug)]
pub enum CarouselError {
    /// No API key was configured when the process started.
    #[error(
        "no API key configured.\n\n\
         Set GEMINI_API_KEY (or GOOGLE_API_KEY) in the environment and try again."
    )]
    CredentialMissing,

    /// The composed prompt for a slot was empty after trimming.
    #[error("slot {slot}: prompt is empty. Set one with `carousel prompt {slot} <text>`.")]
    EmptyPrompt {
        /// One-based slot number as shown to the user.
        slot: usize,
    },

    /// The idea text given to the converter was blank.
    #[error("idea text is empty. Provide a short description of the carousel to generate.")]
    EmptyInput,

    /// An external generation call failed. The collaborator's message is
    /// passed through verbatim.
    #[error("service call failed: {0}")]
    Service(String),

    /// The text service reply did not contain one parseable JSON object.
    #[error("could not parse AI reply: {0}")]
    Parse(String),

    /// The parsed reply did not match the expected prompts contract.
    #[error("AI reply has an invalid format: {0}")]
    InvalidFormat(String),

    /// An export was requested with no generated images present.
    #[error("no generated images to export. Run `carousel generate` first.")]
    NoImages,

    /// User provided invalid arguments or the session is in an invalid state.
    #[error("{0}")]
    User(String),

    /// Filesystem I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode failure in persisted state.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CarouselError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CarouselError::CredentialMissing => exit_codes::CREDENTIAL_MISSING,
            CarouselError::EmptyPrompt { .. }
            | CarouselError::EmptyInput
            | CarouselError::Parse(_)
            | CarouselError::InvalidFormat(_)
            | CarouselError::NoImages => exit_codes::CONTRACT_FAILURE,
            CarouselError::Service(_) => exit_codes::SERVICE_FAILURE,
            CarouselError::User(_) | CarouselError::Io(_) | CarouselError::Json(_) => {
                exit_codes::USER_ERROR
            }
        }
    }
}

/// Result type alias for carousel operations.
pub type Result<T> = std::result::Result<T, CarouselError>;
