//! Customizer session for UI integration.
//! Owns every component of one customizer instance and routes host events
//! through them.
//!
//! This module is split into submodules for better organization:
//! - `elements`: Upload, property edits, delete, duplicate, zone switching
//! - `input`: Pointer and wheel gestures
//! - `baking`: Tick, preview projection, texture bakes

mod baking;
mod elements;
mod input;

pub use baking::PreviewSink;
pub use elements::UploadedImage;

use crate::design_store::{DesignStore, PlacementRules};
use crate::interaction::InteractionMachine;
use crate::model::DesignId;
use crate::renderer::{BakeReport, RenderBackend, TextureBaker};
use crate::scheduler::UpdateScheduler;
use crate::selection_manager::{
    ListenerHandle, ObserverRole, SelectionChange, SelectionListener, SelectionManager,
};
use garmentkit_core::{CustomizerError, PixelRect, Zone};
use garmentkit_settings::Config;

/// One customizer instance: store, selection, gestures, scheduling and baking.
///
/// All state lives here rather than in globals, so several sessions can
/// coexist (e.g. in tests). The session is single-threaded; the host calls
/// it from its UI event loop and drives time through [`CustomizerSession::tick`].
pub struct CustomizerSession {
    store: DesignStore,
    selection: SelectionManager,
    interaction: InteractionMachine,
    scheduler: UpdateScheduler,
    baker: TextureBaker,
    backend: Box<dyn RenderBackend>,
    preview_sink: Option<Box<dyn PreviewSink>>,
    current_zone: Zone,
    panel: Option<PixelRect>,
    last_report: Option<BakeReport>,
}

impl CustomizerSession {
    /// Creates a session with default settings.
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self::from_config(&Config::default(), backend)
    }

    /// Creates a session from configuration.
    ///
    /// An invalid configuration is logged and replaced by the defaults so a
    /// bad settings file never prevents the customizer from starting.
    pub fn from_config(config: &Config, backend: Box<dyn RenderBackend>) -> Self {
        let fallback;
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                tracing::warn!("Invalid customizer config, using defaults: {}", e);
                fallback = Config::default();
                &fallback
            }
        };

        Self {
            store: DesignStore::new(PlacementRules::from_config(config)),
            selection: SelectionManager::new(),
            interaction: InteractionMachine::new(
                config.interaction.wheel_zoom_in,
                config.interaction.wheel_zoom_out,
            ),
            scheduler: UpdateScheduler::from_settings(&config.scheduling),
            baker: TextureBaker::from_settings(&config.baking),
            backend,
            preview_sink: None,
            current_zone: Zone::Front,
            panel: None,
            last_report: None,
        }
    }

    pub fn store(&self) -> &DesignStore {
        &self.store
    }

    pub fn interaction(&self) -> &InteractionMachine {
        &self.interaction
    }

    pub fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    pub fn current_zone(&self) -> Zone {
        self.current_zone
    }

    pub fn selected_id(&self) -> Option<DesignId> {
        self.selection.selected_id()
    }

    pub fn panel_rect(&self) -> Option<PixelRect> {
        self.panel
    }

    /// Updates the editing panel's bounding rectangle (e.g. from a resize observer).
    ///
    /// A degenerate rectangle is kept but logged; gestures and previews
    /// abort until a usable size arrives.
    pub fn set_panel_rect(&mut self, rect: PixelRect) {
        if rect.is_degenerate() {
            tracing::debug!("Panel reported degenerate size {}x{}", rect.width, rect.height);
        }
        self.panel = Some(rect);
        self.scheduler.request_preview();
    }

    /// Selects an element (or nothing). Unknown ids are ignored.
    pub fn select(&mut self, id: Option<DesignId>) {
        match id {
            Some(id) if !self.store.contains(id) => {
                tracing::warn!("Ignoring selection of unknown design {}", id);
            }
            _ => {
                if self.selection.select(id) {
                    self.scheduler.request_preview();
                }
            }
        }
    }

    /// Subscribes to selection changes. Runs after the built-in views.
    pub fn on_selection_changed<F>(&mut self, callback: F) -> ListenerHandle
    where
        F: FnMut(SelectionChange) + 'static,
    {
        self.selection.on_selection_changed(callback)
    }

    /// Registers one of the built-in views (overlay, panel, 3D highlight).
    pub fn register_view(
        &mut self,
        role: ObserverRole,
        listener: Box<dyn SelectionListener>,
    ) -> ListenerHandle {
        self.selection.register(role, listener)
    }

    pub fn unregister(&mut self, handle: ListenerHandle) -> bool {
        self.selection.unregister(handle)
    }

    /// Report of the most recent bake pass.
    pub fn last_bake_report(&self) -> Option<&BakeReport> {
        self.last_report.as_ref()
    }
}

/// Transient failures recover on the next trigger and stay at debug level.
fn failure_level(err: &CustomizerError) -> tracing::Level {
    if err.is_transient() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    }
}

fn log_failure(context: &str, err: &CustomizerError) {
    if failure_level(err) == tracing::Level::DEBUG {
        tracing::debug!("{}: {}", context, err);
    } else {
        tracing::warn!("{}: {}", context, err);
    }
}
