//! Implementation of the `carousel status` command.
//!
//! Displays the session configuration and a per-slot summary of prompts and
//! generated images. With `--history`, also lists the batch snapshot log.

use crate::cli::StatusArgs;
use crate::context::require_initialized_session;
use crate::error::Result;
use crate::session::{Session, read_snapshots};

/// Execute the `carousel status` command.
pub fn cmd_status(args: StatusArgs) -> Result<()> {
    let ctx = require_initialized_session()?;
    let session = Session::open(&ctx)?;

    print!("{}", render_status(&session));

    if args.history {
        let snapshots = read_snapshots(&ctx)?;
        println!();
        println!("Batch history:");
        if snapshots.is_empty() {
            println!("  (no batches run)");
        }
        for snapshot in &snapshots {
            println!(
                "  {}  {}  {} slot(s), preset {}",
                snapshot.ts.format("%Y-%m-%d %H:%M:%S UTC"),
                snapshot.actor,
                snapshot.config.slot_count,
                snapshot.config.style_preset
            );
        }
    }

    Ok(())
}

/// Render the configuration and slot table.
fn render_status(session: &Session) -> String {
    let config = &session.config;
    let mut out = String::new();

    out.push_str("Carousel Status\n");
    out.push_str("===============\n\n");
    out.push_str(&format!("Aspect ratio:  {}\n", config.aspect_ratio.as_str()));
    out.push_str(&format!("Slot count:    {}\n", config.slot_count));
    out.push_str(&format!("Style preset:  {}\n", config.style_preset));
    out.push_str(&format!("Language:      {}\n", config.language.as_str()));
    let global = if config.global_prompt.is_empty() {
        "(none)"
    } else {
        config.global_prompt.as_str()
    };
    out.push_str(&format!("Global prompt: {}\n\n", global));

    out.push_str("Slots:\n");
    for index in 0..config.slot_count {
        let slot = session.slots.slot(index);
        let image = match &slot.image {
            Some(image) => format!("[{} / {} bytes]", image.mime, image.bytes.len()),
            None => "[no image]".to_string(),
        };
        let prompt = if slot.prompt.trim().is_empty() {
            "(blank)"
        } else {
            slot.prompt.as_str()
        };
        out.push_str(&format!("  {}. {:20} {}\n", index + 1, image, prompt));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ImageResult;
    use crate::store::MemoryStore;
    use std::path::PathBuf;

    fn session() -> Session {
        Session::from_store(Box::new(MemoryStore::new()), PathBuf::from("/nonexistent"))
            .unwrap()
    }

    #[test]
    fn status_lists_only_active_slots() {
        let mut session = session();
        session.set_slot_count(3).unwrap();
        session.set_prompt(0, "a fox").unwrap();

        let rendered = render_status(&session);

        assert!(rendered.contains("  1. "));
        assert!(rendered.contains("  3. "));
        assert!(!rendered.contains("  4. "));
        assert!(rendered.contains("a fox"));
    }

    #[test]
    fn status_marks_generated_images() {
        let mut session = session();
        session.set_prompt(1, "b").unwrap();
        session.slots.set_image(
            1,
            ImageResult {
                bytes: vec![0u8; 10],
                mime: "image/png".to_string(),
            },
        );

        let rendered = render_status(&session);
        assert!(rendered.contains("[image/png / 10 bytes]"));
    }
}
