//! Implementation of the `carousel init` command.
//!
//! Creates the `.carousel/` session directory in the current working
//! directory and seeds the store with the default configuration:
//!
//! 1. Creates `.carousel/` and `.carousel/images/`
//! 2. Writes `store.json` with every configuration field at its default
//! 3. Prints the resulting layout

use crate::context::SessionContext;
use crate::error::{CarouselError, Result};
use crate::session::Session;
use std::env;
use std::fs;
use std::path::Path;

/// Execute the `carousel init` command.
pub fn cmd_init() -> Result<()> {
    let cwd = env::current_dir().map_err(|e| {
        CarouselError::User(format!("failed to get current working directory: {}", e))
    })?;
    let ctx = init_session_at(&cwd)?;

    println!("Initialized carousel session.");
    println!();
    println!("Session directory: {}", ctx.session_dir.display());
    println!();
    println!("Next steps:");
    println!("  carousel prompt 1 \"describe the first slide\"");
    println!("  carousel generate");

    Ok(())
}

/// Create and seed a session rooted at `root`.
///
/// Fails if a session directory already exists there.
pub(crate) fn init_session_at(root: &Path) -> Result<SessionContext> {
    let ctx = SessionContext::at_root(root);

    if ctx.is_initialized() {
        return Err(CarouselError::User(format!(
            "session already initialized at '{}'",
            ctx.session_dir.display()
        )));
    }

    fs::create_dir_all(ctx.images_dir())?;

    let mut session = Session::open(&ctx)?;
    session.mirror_all()?;

    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_scaffolds_session_directory() {
        let temp_dir = TempDir::new().unwrap();

        let ctx = init_session_at(temp_dir.path()).unwrap();

        assert!(ctx.session_dir.is_dir());
        assert!(ctx.images_dir().is_dir());
        assert!(ctx.store_path().is_file());
    }

    #[test]
    fn init_seeds_default_configuration() {
        let temp_dir = TempDir::new().unwrap();

        let ctx = init_session_at(temp_dir.path()).unwrap();

        let session = Session::open(&ctx).unwrap();
        assert_eq!(session.config.slot_count, 5);
        assert_eq!(session.config.style_preset, "flat-illustration");
    }

    #[test]
    fn init_refuses_existing_session() {
        let temp_dir = TempDir::new().unwrap();
        init_session_at(temp_dir.path()).unwrap();

        let result = init_session_at(temp_dir.path());
        assert!(matches!(result, Err(CarouselError::User(_))));
    }
}
