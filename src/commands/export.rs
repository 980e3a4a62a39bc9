//! Implementation of the `carousel export` command.
//!
//! Bundles every generated image into a ZIP archive. Without `--output`,
//! writes a timestamp-named archive in the session root.

use crate::cli::ExportArgs;
use crate::context::require_initialized_session;
use crate::error::Result;
use crate::export::export;
use crate::session::Session;

/// Execute the `carousel export` command.
pub fn cmd_export(args: ExportArgs) -> Result<()> {
    let ctx = require_initialized_session()?;
    let session = Session::open(&ctx)?;

    let path = export(session.slots.slots(), args.output, &ctx.root)?;

    println!("Exported archive: {}", path.display());
    Ok(())
}
