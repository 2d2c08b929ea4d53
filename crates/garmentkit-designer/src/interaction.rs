//! Pointer gesture state machine.
//!
//! ```text
//! Idle --pointer_down on element--> Dragging{Move|Rotate|Scale}
//! Dragging --pointer_move (captured pointer)--> Dragging
//! Dragging --pointer_up / pointer_cancel--> Idle
//! Idle --wheel on element--> Idle   (instant scale step)
//! ```
//!
//! The gesture mode is decided from the modifiers at pointer-down and never
//! re-evaluated. Every move is computed from the snapshot taken at
//! pointer-down, not from the previous move, so rounding never accumulates.

use crate::design_store::DesignStore;
use crate::model::{DesignId, ElementChanges};
use crate::transform::PanelMapping;
use garmentkit_core::constants::{WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};
use garmentkit_core::{PixelRect, Point, Result, Zone};

/// Below this pointer distance from the element center (panel pixels) the
/// scale ratio is unstable, so scale gestures hold their start value.
const MIN_SCALE_RADIUS_PX: f64 = 1.0;

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    /// Alt/Option, or a secondary mouse button.
    pub secondary: bool,
}

/// One pointer sample in panel pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub position: Point,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(pointer_id: u32, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            position: Point::new(x, y),
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    Move,
    Rotate,
    Scale,
}

impl GestureMode {
    pub fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.secondary {
            Self::Rotate
        } else if modifiers.shift {
            Self::Scale
        } else {
            Self::Move
        }
    }
}

/// Everything a gesture needs, captured once at pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSnapshot {
    pub pointer_id: u32,
    pub mode: GestureMode,
    pub target: DesignId,
    pub start_pointer: Point,
    pub start_position: Point,
    pub start_rotation: f64,
    pub start_scale: f64,
    pub mapping: PanelMapping,
}

impl GestureSnapshot {
    /// Element center at gesture start, in panel pixels.
    fn center_px(&self) -> Point {
        self.mapping
            .to_panel(self.start_position.x, self.start_position.y)
    }

    /// Changes implied by the pointer being at `pointer`.
    fn changes_at(&self, pointer: Point) -> ElementChanges {
        match self.mode {
            GestureMode::Move => {
                let from = self.mapping.to_uv(self.start_pointer.x, self.start_pointer.y);
                let to = self.mapping.to_uv(pointer.x, pointer.y);
                ElementChanges::position(Point::new(
                    self.start_position.x + (to.x - from.x),
                    self.start_position.y + (to.y - from.y),
                ))
            }
            GestureMode::Rotate => {
                let c = self.center_px();
                let a0 = (self.start_pointer.y - c.y).atan2(self.start_pointer.x - c.x);
                let a1 = (pointer.y - c.y).atan2(pointer.x - c.x);
                ElementChanges::rotation(self.start_rotation + (a1 - a0).to_degrees())
            }
            GestureMode::Scale => {
                let c = self.center_px();
                let d0 = self.start_pointer.distance_to(&c);
                if d0 < MIN_SCALE_RADIUS_PX {
                    return ElementChanges::scale(self.start_scale);
                }
                ElementChanges::scale(self.start_scale * pointer.distance_to(&c) / d0)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(GestureSnapshot),
}

/// Result of a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownOutcome {
    /// A gesture started on this element; the pointer is now captured.
    Started(DesignId),
    /// Nothing under the pointer.
    Missed,
    /// A gesture is already active.
    Ignored,
}

/// Result of a pointer-move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Updated(DesignId),
    /// Not dragging, or a different pointer.
    Ignored,
    /// The target disappeared; the gesture ended without mutation.
    Terminated,
}

/// Tracks the single active gesture.
#[derive(Debug, Clone)]
pub struct InteractionMachine {
    state: InteractionState,
    wheel_zoom_in: f64,
    wheel_zoom_out: f64,
}

impl InteractionMachine {
    pub fn new(wheel_zoom_in: f64, wheel_zoom_out: f64) -> Self {
        Self {
            state: InteractionState::Idle,
            wheel_zoom_in,
            wheel_zoom_out,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging(_))
    }

    /// Pointer currently captured by the active gesture.
    pub fn captured_pointer(&self) -> Option<u32> {
        match &self.state {
            InteractionState::Dragging(s) => Some(s.pointer_id),
            InteractionState::Idle => None,
        }
    }

    /// Element targeted by the active gesture.
    pub fn active_target(&self) -> Option<DesignId> {
        match &self.state {
            InteractionState::Dragging(s) => Some(s.target),
            InteractionState::Idle => None,
        }
    }

    /// Starts a gesture on the topmost element under the pointer.
    ///
    /// Fails only when the panel or zone rectangle is degenerate.
    pub fn pointer_down(
        &mut self,
        event: PointerEvent,
        zone: Zone,
        panel: PixelRect,
        store: &DesignStore,
    ) -> Result<DownOutcome> {
        if self.is_dragging() {
            return Ok(DownOutcome::Ignored);
        }
        let mapping = PanelMapping::new(panel, store.rules().layout.printable(zone))?;
        let uv = mapping.to_uv(event.position.x, event.position.y);
        let Some(target) = store.hit_test(zone, uv) else {
            return Ok(DownOutcome::Missed);
        };
        let Some(element) = store.get(target) else {
            return Ok(DownOutcome::Missed);
        };

        let mode = GestureMode::from_modifiers(event.modifiers);
        tracing::debug!("Starting {:?} gesture on design {}", mode, target);
        self.state = InteractionState::Dragging(GestureSnapshot {
            pointer_id: event.pointer_id,
            mode,
            target,
            start_pointer: event.position,
            start_position: element.position,
            start_rotation: element.rotation,
            start_scale: element.scale,
            mapping,
        });
        Ok(DownOutcome::Started(target))
    }

    /// Applies the pointer's offset from the gesture start to the target.
    pub fn pointer_move(&mut self, event: PointerEvent, store: &mut DesignStore) -> MoveOutcome {
        let InteractionState::Dragging(snapshot) = &self.state else {
            return MoveOutcome::Ignored;
        };
        if snapshot.pointer_id != event.pointer_id {
            return MoveOutcome::Ignored;
        }
        let target = snapshot.target;
        if !store.contains(target) {
            tracing::debug!("Design {} vanished mid-gesture, ending it", target);
            self.state = InteractionState::Idle;
            return MoveOutcome::Terminated;
        }
        let changes = snapshot.changes_at(event.position);
        store.update(target, changes);
        MoveOutcome::Updated(target)
    }

    /// Ends the gesture for the captured pointer, returning its target.
    pub fn pointer_up(&mut self, event: PointerEvent) -> Option<DesignId> {
        self.release(event.pointer_id)
    }

    /// Same as [`InteractionMachine::pointer_up`]; the last applied move stands.
    pub fn pointer_cancel(&mut self, pointer_id: u32) -> Option<DesignId> {
        self.release(pointer_id)
    }

    fn release(&mut self, pointer_id: u32) -> Option<DesignId> {
        match &self.state {
            InteractionState::Dragging(s) if s.pointer_id == pointer_id => {
                let target = s.target;
                self.state = InteractionState::Idle;
                Some(target)
            }
            _ => None,
        }
    }

    /// One wheel notch over the panel. Negative `delta_y` zooms in.
    ///
    /// Returns the element that was scaled, if any. Ignored mid-gesture.
    pub fn wheel(
        &mut self,
        position: Point,
        delta_y: f64,
        zone: Zone,
        panel: PixelRect,
        store: &mut DesignStore,
    ) -> Result<Option<DesignId>> {
        if self.is_dragging() || delta_y == 0.0 || !delta_y.is_finite() {
            return Ok(None);
        }
        let mapping = PanelMapping::new(panel, store.rules().layout.printable(zone))?;
        let uv = mapping.to_uv(position.x, position.y);
        let Some(target) = store.hit_test(zone, uv) else {
            return Ok(None);
        };
        let Some(current) = store.get(target).map(|e| e.scale) else {
            return Ok(None);
        };
        let factor = if delta_y < 0.0 {
            self.wheel_zoom_in
        } else {
            self.wheel_zoom_out
        };
        store.update(target, ElementChanges::scale(current * factor));
        Ok(Some(target))
    }

    /// Drops any active gesture without touching the store.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }
}

impl Default for InteractionMachine {
    fn default() -> Self {
        Self::new(WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT)
    }
}
