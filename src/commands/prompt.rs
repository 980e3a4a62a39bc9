//! Implementation of the `carousel prompt` command.
//!
//! Sets one slot's prompt text. Slot numbers are 1-based on the command
//! line. Setting a slot above the active count is allowed; the text stays in
//! the backing array and becomes visible when the count is raised.

use crate::cli::PromptArgs;
use crate::context::require_initialized_session;
use crate::error::{CarouselError, Result};
use crate::session::{MAX_SLOTS, Session};

/// Execute the `carousel prompt` command.
pub fn cmd_prompt(args: PromptArgs) -> Result<()> {
    let ctx = require_initialized_session()?;
    let mut session = Session::open(&ctx)?;

    let index = slot_index(args.slot)?;
    session.set_prompt(index, &args.text)?;

    if args.slot > session.config.slot_count {
        println!(
            "Prompt set on slot {} (hidden until slot count is at least {}).",
            args.slot, args.slot
        );
    } else {
        println!("Prompt set on slot {}.", args.slot);
    }

    Ok(())
}

/// Convert a 1-based CLI slot number into a backing-array index.
pub(crate) fn slot_index(slot: usize) -> Result<usize> {
    if slot == 0 || slot > MAX_SLOTS {
        return Err(CarouselError::User(format!(
            "slot must be between 1 and {}, got {}",
            MAX_SLOTS, slot
        )));
    }
    Ok(slot - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_numbers_are_one_based() {
        assert_eq!(slot_index(1).unwrap(), 0);
        assert_eq!(slot_index(5).unwrap(), 4);
    }

    #[test]
    fn out_of_range_slots_are_rejected() {
        assert!(slot_index(0).is_err());
        assert!(slot_index(6).is_err());
    }
}
