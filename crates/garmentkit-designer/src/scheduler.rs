//! Update scheduling for the two refresh tiers.
//!
//! The lightweight tier is a flag: set on every mutation, taken by the host
//! once per frame to redraw the panel preview. The heavy tier decides when a
//! texture bake runs:
//!
//! - debounced: a burst of requests fires once, `debounce` after the last one
//! - throttled: while a gesture is active, at most every `drag_interval`
//! - immediate: discrete edits and gesture end fire on the next poll
//!
//! The scheduler never sleeps or spawns. The host calls [`UpdateScheduler::poll`]
//! with the current time from its event loop; a returned [`BakeTicket`] must be
//! handed back to [`UpdateScheduler::finish`] once the bake has published.

use garmentkit_settings::SchedulingSettings;
use std::time::{Duration, Instant};

/// Why a bake was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakeReason {
    /// Quiet period after the last request elapsed.
    Debounced,
    /// Periodic bake during a long gesture.
    Throttled,
    /// Explicit "apply now" request or gesture end.
    Immediate,
    /// Requests arrived while the previous bake was running.
    FollowUp,
}

/// Permission to run one bake pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BakeTicket {
    generation: u64,
    pub reason: BakeReason,
}

#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    debounce: Duration,
    drag_interval: Option<Duration>,
    preview_pending: bool,
    /// Time of the most recent debounced request.
    last_request: Option<Instant>,
    /// Time the current burst of requests started.
    burst_start: Option<Instant>,
    immediate: Option<BakeReason>,
    gesture_active: bool,
    last_bake: Option<Instant>,
    in_flight: Option<u64>,
    rerun: bool,
    generation: u64,
}

impl UpdateScheduler {
    pub fn new(debounce: Duration, drag_interval: Option<Duration>) -> Self {
        Self {
            debounce,
            drag_interval,
            preview_pending: false,
            last_request: None,
            burst_start: None,
            immediate: None,
            gesture_active: false,
            last_bake: None,
            in_flight: None,
            rerun: false,
            generation: 0,
        }
    }

    pub fn from_settings(settings: &SchedulingSettings) -> Self {
        Self::new(settings.bake_debounce(), settings.drag_bake_interval())
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Marks the panel preview as stale.
    pub fn request_preview(&mut self) {
        self.preview_pending = true;
    }

    /// Returns whether a preview refresh was requested, clearing the flag.
    pub fn take_preview(&mut self) -> bool {
        std::mem::take(&mut self.preview_pending)
    }

    /// Requests a debounced bake; restarts the quiet period.
    pub fn request_bake(&mut self, now: Instant) {
        if self.in_flight.is_some() {
            self.rerun = true;
        }
        self.last_request = Some(now);
        self.burst_start.get_or_insert(now);
    }

    /// Requests a bake on the next poll, skipping the quiet period.
    pub fn request_bake_now(&mut self) {
        if self.in_flight.is_some() {
            self.rerun = true;
        }
        self.immediate = Some(BakeReason::Immediate);
    }

    /// Enables the drag throttle while a gesture is running.
    pub fn begin_gesture(&mut self) {
        self.gesture_active = true;
    }

    /// Ends a gesture; the final state is always baked on the next poll.
    pub fn end_gesture(&mut self) {
        self.gesture_active = false;
        self.request_bake_now();
    }

    pub fn gesture_active(&self) -> bool {
        self.gesture_active
    }

    /// True while a bake is requested but not yet released.
    pub fn bake_pending(&self) -> bool {
        self.immediate.is_some() || self.last_request.is_some()
    }

    pub fn bake_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Earliest instant at which [`UpdateScheduler::poll`] may release a bake.
    ///
    /// Hosts use this to arm a single timer instead of polling every frame.
    /// An immediate request is due at `now`.
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        if self.in_flight.is_some() {
            return None;
        }
        if self.immediate.is_some() {
            return Some(now);
        }
        let last = self.last_request?;
        let debounced = last + self.debounce;
        match (self.gesture_active, self.drag_interval, self.throttle_anchor()) {
            (true, Some(interval), Some(anchor)) => Some(debounced.min(anchor + interval)),
            _ => Some(debounced),
        }
    }

    fn throttle_anchor(&self) -> Option<Instant> {
        match (self.last_bake, self.burst_start) {
            (Some(bake), Some(start)) => Some(bake.max(start)),
            (None, start) => start,
            (bake, None) => bake,
        }
    }

    /// Releases a bake if one is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<BakeTicket> {
        if self.in_flight.is_some() {
            return None;
        }
        let reason = if let Some(reason) = self.immediate {
            reason
        } else if self
            .last_request
            .is_some_and(|last| now.saturating_duration_since(last) >= self.debounce)
        {
            BakeReason::Debounced
        } else if self.throttle_due(now) {
            BakeReason::Throttled
        } else {
            return None;
        };

        self.immediate = None;
        self.last_request = None;
        self.burst_start = None;
        self.rerun = false;
        self.in_flight = Some(self.generation);
        tracing::trace!("Releasing bake ({:?})", reason);
        Some(BakeTicket {
            generation: self.generation,
            reason,
        })
    }

    fn throttle_due(&self, now: Instant) -> bool {
        if !self.gesture_active || self.last_request.is_none() {
            return false;
        }
        match (self.drag_interval, self.throttle_anchor()) {
            (Some(interval), Some(anchor)) => now.saturating_duration_since(anchor) >= interval,
            _ => false,
        }
    }

    /// Completes a bake. Stale tickets (from before a cancel) are ignored.
    ///
    /// Returns `false` for a stale ticket.
    pub fn finish(&mut self, ticket: BakeTicket, now: Instant) -> bool {
        if ticket.generation != self.generation || self.in_flight != Some(ticket.generation) {
            tracing::debug!("Ignoring stale bake ticket");
            return false;
        }
        self.in_flight = None;
        self.last_bake = Some(now);
        if std::mem::take(&mut self.rerun) {
            self.immediate = Some(BakeReason::FollowUp);
        }
        true
    }

    /// Drops pending work and invalidates any outstanding ticket.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.immediate = None;
        self.last_request = None;
        self.burst_start = None;
        self.in_flight = None;
        self.rerun = false;
    }
}

impl Default for UpdateScheduler {
    fn default() -> Self {
        Self::from_settings(&SchedulingSettings::default())
    }
}
