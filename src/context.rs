//! Session directory resolution for carousel.
//!
//! All durable state for one carousel session lives in a `.carousel/`
//! directory. Commands may be invoked from anywhere inside a project, so the
//! context walks up from the working directory to find it, mirroring how
//! version-control tools locate their dot-directory.
//!
//! Layout:
//!
//! ```text
//! .carousel/
//!   store.json        # live per-field mirror of configuration + prompts
//!   snapshots.ndjson  # pre-batch audit snapshots, one JSON object per line
//!   images/           # persisted generation results (slot_<n>.<ext>)
//!   presets.yaml      # optional user-defined style presets
//! ```

use crate::error::{CarouselError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Session directory name relative to the session root.
pub const SESSION_DIR: &str = ".carousel";

/// Store filename within the session directory.
pub const STORE_FILE: &str = "store.json";

/// Snapshot log filename within the session directory.
pub const SNAPSHOTS_FILE: &str = "snapshots.ndjson";

/// Images subdirectory name within the session directory.
pub const IMAGES_DIR: &str = "images";

/// Optional user preset registry filename within the session directory.
pub const PRESETS_FILE: &str = "presets.yaml";

/// Resolved paths for one carousel session.
///
/// All paths are absolute.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Directory containing the `.carousel/` session directory.
    pub root: PathBuf,

    /// Absolute path to the session directory itself.
    pub session_dir: PathBuf,
}

impl SessionContext {
    /// Resolve the session context from the current working directory.
    ///
    /// Walks up from the working directory until a `.carousel/` directory is
    /// found.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            CarouselError::User(format!("failed to get current working directory: {}", e))
        })?;
        Self::resolve_from(&cwd)
    }

    /// Resolve the session context starting from a specific directory.
    ///
    /// This is useful for testing or when the starting directory is known.
    pub fn resolve_from<P: AsRef<Path>>(start: P) -> Result<Self> {
        let mut dir = start.as_ref().to_path_buf();
        loop {
            if dir.join(SESSION_DIR).is_dir() {
                return Ok(Self::at_root(dir));
            }
            if !dir.pop() {
                return Err(CarouselError::User(
                    "no carousel session found.\n\n\
                     Run `carousel init` to create one in the current directory."
                        .to_string(),
                ));
            }
        }
    }

    /// Build a context rooted at a known directory, without searching.
    ///
    /// Used by `init` before the session directory exists.
    pub fn at_root<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let session_dir = root.join(SESSION_DIR);
        Self { root, session_dir }
    }

    /// Path to the live store file.
    pub fn store_path(&self) -> PathBuf {
        self.session_dir.join(STORE_FILE)
    }

    /// Path to the snapshot audit log.
    pub fn snapshots_path(&self) -> PathBuf {
        self.session_dir.join(SNAPSHOTS_FILE)
    }

    /// Path to the persisted images directory.
    pub fn images_dir(&self) -> PathBuf {
        self.session_dir.join(IMAGES_DIR)
    }

    /// Path to the optional user preset registry.
    pub fn presets_path(&self) -> PathBuf {
        self.session_dir.join(PRESETS_FILE)
    }

    /// Whether this session has been initialized on disk.
    pub fn is_initialized(&self) -> bool {
        self.session_dir.is_dir()
    }
}

/// Resolve the session context and require it to be initialized.
///
/// Most commands call this first; only `init` works without an existing
/// session directory.
pub fn require_initialized_session() -> Result<SessionContext> {
    SessionContext::resolve()
}
