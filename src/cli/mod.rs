//! CLI argument parsing for carousel.
//!
//! Uses clap derive macros for declarative argument definitions. This module
//! defines the command structure; actual implementations are in the
//! `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Carousel: generate a styled set of AI images from layered prompts.
///
/// A session lives in a `.carousel/` directory: configuration and prompts
/// mirror into it on every change, generated images are kept next to them,
/// and every batch run is snapshotted to an audit log before it starts.
#[derive(Parser, Debug)]
#[command(name = "carousel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse arguments from the process environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands for carousel.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a carousel session in the current directory.
    ///
    /// Creates the `.carousel/` directory with defaulted configuration.
    Init,

    /// Show session status.
    ///
    /// Displays the configuration and a per-slot summary of prompts,
    /// generated images, and in-flight state.
    Status(StatusArgs),

    /// List available style presets.
    ///
    /// Shows built-in presets plus any defined in the session's
    /// presets.yaml.
    Presets,

    /// Change a configuration field.
    ///
    /// Every change mirrors to durable storage immediately.
    #[command(subcommand)]
    Config(ConfigAction),

    /// Set one slot's prompt text.
    ///
    /// Slots are numbered 1 through 5. Text set on a slot beyond the active
    /// count is kept and becomes visible when the count is raised.
    Prompt(PromptArgs),

    /// Convert free-form idea text into one prompt per active slot.
    ///
    /// Asks the text model for exactly one prompt per slot in the
    /// configured language, then overwrites the active slots.
    Ideate(IdeateArgs),

    /// Generate images.
    ///
    /// Without `--slot`, runs the full batch: every non-blank active slot in
    /// ascending order, strictly sequential, stopping at the first failure.
    Generate(GenerateArgs),

    /// Export generated images as a ZIP archive.
    ///
    /// Bundles every present image; fails if none have been generated.
    Export(ExportArgs),
}

/// Arguments for the `status` command.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Also list the batch snapshot history.
    #[arg(long)]
    pub history: bool,
}

/// Configuration fields that can be changed.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Set the aspect ratio (square or portrait).
    AspectRatio {
        /// 'square' (1:1) or 'portrait' (4:5).
        value: String,
    },

    /// Set the number of active slots (1, 3, or 5).
    SlotCount {
        /// One of 1, 3, 5.
        value: usize,
    },

    /// Select a style preset by id.
    Preset {
        /// Preset id; see `carousel presets`.
        id: String,
    },

    /// Set the global prompt applied to every slot.
    GlobalPrompt {
        /// Global prompt text; pass '' to clear.
        text: String,
    },

    /// Set the idea-conversion language (en, ko, or ja).
    Language {
        /// One of en, ko, ja.
        value: String,
    },
}

/// Arguments for the `prompt` command.
#[derive(Parser, Debug)]
pub struct PromptArgs {
    /// Slot number, 1 through 5.
    pub slot: usize,

    /// Prompt text for the slot.
    pub text: String,
}

/// Arguments for the `ideate` command.
#[derive(Parser, Debug)]
pub struct IdeateArgs {
    /// Idea text to expand into per-slot prompts.
    pub text: String,
}

/// Arguments for the `generate` command.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Generate a single slot (1 through 5) instead of the batch.
    #[arg(long)]
    pub slot: Option<usize>,
}

/// Arguments for the `export` command.
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Output path; defaults to carousel_<timestamp>.zip in the session root.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
