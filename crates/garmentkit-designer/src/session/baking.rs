//! Preview projection and bake execution for the session.

use super::{log_failure, CustomizerSession};
use crate::model::PreviewItem;
use crate::renderer::BakeReport;
use crate::transform::PanelMapping;
use garmentkit_core::{CustomizerError, Result, Zone};
use std::time::Instant;

/// Receives the lightweight preview whenever it is refreshed.
pub trait PreviewSink {
    fn preview_changed(&mut self, zone: Zone, items: &[PreviewItem]);
}

impl<F> PreviewSink for F
where
    F: FnMut(Zone, &[PreviewItem]),
{
    fn preview_changed(&mut self, zone: Zone, items: &[PreviewItem]) {
        self(zone, items)
    }
}

impl CustomizerSession {
    pub fn set_preview_sink(&mut self, sink: Box<dyn PreviewSink>) {
        self.preview_sink = Some(sink);
        self.scheduler.request_preview();
    }

    /// Panel-space projection of a zone's elements, bottom to top.
    pub fn preview(&self, zone: Zone) -> Result<Vec<PreviewItem>> {
        let panel = self
            .panel
            .ok_or_else(|| CustomizerError::invalid_geometry(0.0, 0.0))?;
        let mapping = PanelMapping::new(panel, self.store.rules().layout.printable(zone))?;

        Ok(self
            .store
            .list_by_zone(zone)
            .iter()
            .map(|e| {
                let (width, height) =
                    mapping.uv_size_to_panel(2.0 * e.half_extent.0, 2.0 * e.half_extent.1);
                PreviewItem {
                    id: e.id,
                    center: mapping.to_panel(e.position.x, e.position.y),
                    width,
                    height,
                    rotation: e.rotation,
                    opacity: e.opacity,
                    selected: self.selection.is_selected(e.id),
                }
            })
            .collect())
    }

    /// Drives both refresh tiers. Call once per frame or when
    /// [`CustomizerSession::next_deadline`] passes.
    ///
    /// Returns the report if a bake ran.
    pub fn tick(&mut self, now: Instant) -> Option<BakeReport> {
        if self.scheduler.take_preview() {
            self.push_preview();
        }
        let ticket = self.scheduler.poll(now)?;
        let report = self.baker.bake(&self.store, self.backend.as_mut());
        self.scheduler.finish(ticket, now);
        self.last_report = Some(report.clone());
        Some(report)
    }

    /// Bakes now, regardless of pending debounce windows.
    pub fn bake_now(&mut self, now: Instant) -> Option<BakeReport> {
        self.scheduler.request_bake_now();
        self.tick(now)
    }

    /// When the host should call [`CustomizerSession::tick`] next, if a
    /// debounced bake is waiting. Immediate work is due right away.
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        self.scheduler.next_deadline(now)
    }

    /// Drops pending bakes, e.g. when the host tears the 3D view down.
    pub fn cancel_pending(&mut self) {
        self.scheduler.cancel();
    }

    fn push_preview(&mut self) {
        if self.preview_sink.is_none() {
            return;
        }
        let zone = self.current_zone;
        let items = match self.preview(zone) {
            Ok(items) => items,
            Err(e) => {
                log_failure("Preview skipped", &e);
                return;
            }
        };
        if let Some(sink) = self.preview_sink.as_mut() {
            sink.preview_changed(zone, &items);
        }
    }
}
