//! Generation orchestration for carousel.
//!
//! Drives one or many slot generations against the image service. A batch
//! run is strictly sequential: at most one request is in flight, slots
//! complete in ascending index order, and the first failure aborts the
//! remainder (fail-fast). The batch contract is an explicit state machine:
//!
//! ```text
//! Idle -> Running(current) -> Completed
//!                          -> Aborted(at)
//! ```
//!
//! # Transaction Steps (`generate_all`)
//!
//! 1. Append a session snapshot to the audit log
//! 2. For each slot index in ascending order:
//!    a. Skip silently if the slot's prompt is blank
//!    b. Generate with `raise_on_failure = true`, awaiting completion
//! 3. First failure aborts the loop; completed slots keep their results
//!
//! No cancellation and no timeouts: once started, a batch stops only by
//! finishing or failing.

use crate::compose::compose;
use crate::context::SessionContext;
use crate::error::{CarouselError, Result};
use crate::preset::PresetRegistry;
use crate::services::ImageService;
use crate::session::{Session, SessionSnapshot, append_snapshot};
use tracing::{debug, info, warn};

#[cfg(test)]
mod tests;

/// Where a batch run currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchState {
    /// No batch has run.
    Idle,
    /// A batch is generating the slot at `current`.
    Running {
        /// Zero-based index of the in-flight slot.
        current: usize,
    },
    /// The last batch finished every non-blank slot.
    Completed,
    /// The last batch failed at `at` and skipped the rest.
    Aborted {
        /// Zero-based index of the failing slot.
        at: usize,
    },
}

/// Drives slot generation against the image service.
pub struct Orchestrator<'a, S: ImageService> {
    session: &'a mut Session,
    registry: &'a PresetRegistry,
    service: &'a S,
    credential_present: bool,
    state: BatchState,
}

impl<'a, S: ImageService> Orchestrator<'a, S> {
    /// Create an orchestrator over a live session.
    ///
    /// `credential_present` reflects the one-time credential read at process
    /// start; it is not re-checked per call.
    pub fn new(
        session: &'a mut Session,
        registry: &'a PresetRegistry,
        service: &'a S,
        credential_present: bool,
    ) -> Self {
        Self {
            session,
            registry,
            service,
            credential_present,
            state: BatchState::Idle,
        }
    }

    /// The batch state after the last `generate_all`.
    pub fn state(&self) -> &BatchState {
        &self.state
    }

    /// Generate one slot.
    ///
    /// Failures are handled here when `raise_on_failure` is false (reported
    /// per-slot, `Ok` returned) and propagated to the caller otherwise, so a
    /// failure is surfaced exactly once either way. The loading flag is
    /// cleared on every exit path.
    pub async fn generate_slot(&mut self, index: usize, raise_on_failure: bool) -> Result<()> {
        match self.run_slot(index).await {
            Ok(()) => Ok(()),
            Err(err) if raise_on_failure => Err(err),
            Err(err) => {
                eprintln!("slot {}: {}", index + 1, err);
                Ok(())
            }
        }
    }

    /// The slot generation transaction: preconditions, service call, result
    /// write-back.
    async fn run_slot(&mut self, index: usize) -> Result<()> {
        if !self.credential_present {
            return Err(CarouselError::CredentialMissing);
        }

        let slot = self.session.slots.slot(index);
        if slot.prompt.trim().is_empty() {
            return Err(CarouselError::EmptyPrompt { slot: index + 1 });
        }

        let preset = self.registry.require(&self.session.config.style_preset)?;
        let prompt = compose(preset, &self.session.config, slot, index)?;

        debug!(slot = index + 1, prompt_len = prompt.len(), "generating image");

        self.session.set_loading(index, true);
        let outcome = self.service.generate_image(&prompt).await;
        // Cleared before the result is inspected so success, handled
        // failure, and rethrown failure all leave the flag down.
        self.session.set_loading(index, false);

        let reply = outcome?;
        let image = reply.first_inline_image().ok_or_else(|| {
            CarouselError::Service("reply contained no image data".to_string())
        })?;

        info!(slot = index + 1, mime = %image.mime, bytes = image.bytes.len(), "image generated");
        self.session.store_image(index, image)
    }

    /// Generate every non-blank slot, in ascending order, fail-fast.
    ///
    /// Snapshots configuration and prompts to the audit log before the first
    /// request. Blank slots are skipped silently and do not block later
    /// slots. The first failure aborts the batch; already-completed slots
    /// keep their results and exactly one error is surfaced.
    pub async fn generate_all(&mut self, ctx: &SessionContext) -> Result<()> {
        let snapshot =
            SessionSnapshot::capture(&self.session.config, self.session.slots.prompts());
        append_snapshot(ctx, &snapshot)?;

        for index in 0..self.session.config.slot_count {
            if self.session.slots.slot(index).prompt.trim().is_empty() {
                debug!(slot = index + 1, "skipping blank slot");
                continue;
            }

            self.state = BatchState::Running { current: index };
            if let Err(err) = self.generate_slot(index, true).await {
                warn!(slot = index + 1, "batch aborted: {}", err);
                self.state = BatchState::Aborted { at: index };
                return Err(err);
            }
        }

        self.state = BatchState::Completed;
        Ok(())
    }
}
