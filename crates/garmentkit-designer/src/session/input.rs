//! Pointer and wheel handling for the session.

use super::{log_failure, CustomizerSession};
use crate::interaction::{DownOutcome, MoveOutcome, PointerEvent};
use crate::model::DesignId;
use garmentkit_core::Point;
use std::time::Instant;

impl CustomizerSession {
    /// Pointer pressed over the editing panel.
    ///
    /// Hitting an element selects it and starts a gesture; the host should
    /// capture the pointer while [`crate::InteractionMachine::captured_pointer`]
    /// is set. Pressing empty panel area clears the selection.
    pub fn pointer_down(&mut self, event: PointerEvent) -> DownOutcome {
        let Some(panel) = self.panel else {
            tracing::debug!("Pointer down before the panel was laid out");
            return DownOutcome::Ignored;
        };
        let outcome =
            match self
                .interaction
                .pointer_down(event, self.current_zone, panel, &self.store)
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    log_failure("Pointer down aborted", &e);
                    return DownOutcome::Ignored;
                }
            };

        match outcome {
            DownOutcome::Started(id) => {
                self.select(Some(id));
                self.scheduler.begin_gesture();
            }
            DownOutcome::Missed => self.select(None),
            DownOutcome::Ignored => {}
        }
        outcome
    }

    /// Pointer moved; updates the dragged element and the preview only.
    pub fn pointer_move(&mut self, event: PointerEvent, now: Instant) -> MoveOutcome {
        let outcome = self.interaction.pointer_move(event, &mut self.store);
        match outcome {
            MoveOutcome::Updated(_) => {
                self.scheduler.request_preview();
                self.scheduler.request_bake(now);
            }
            MoveOutcome::Terminated => self.scheduler.end_gesture(),
            MoveOutcome::Ignored => {}
        }
        outcome
    }

    /// Pointer released; ends the gesture and bakes the final state.
    pub fn pointer_up(&mut self, event: PointerEvent) -> Option<DesignId> {
        let target = self.interaction.pointer_up(event)?;
        self.finish_gesture();
        Some(target)
    }

    /// Pointer capture lost (touch cancel, window blur).
    pub fn pointer_cancel(&mut self, pointer_id: u32) -> Option<DesignId> {
        let target = self.interaction.pointer_cancel(pointer_id)?;
        self.finish_gesture();
        Some(target)
    }

    fn finish_gesture(&mut self) {
        self.scheduler.end_gesture();
        self.scheduler.request_preview();
    }

    /// One wheel notch at `position` (panel pixels). Negative `delta_y` grows.
    pub fn wheel(&mut self, position: Point, delta_y: f64, now: Instant) -> Option<DesignId> {
        let panel = self.panel?;
        match self
            .interaction
            .wheel(position, delta_y, self.current_zone, panel, &mut self.store)
        {
            Ok(Some(id)) => {
                self.scheduler.request_preview();
                self.scheduler.request_bake(now);
                Some(id)
            }
            Ok(None) => None,
            Err(e) => {
                log_failure("Wheel ignored", &e);
                None
            }
        }
    }
}
