//! # GarmentKit
//!
//! Design placement and texture baking core for an interactive 3D garment
//! customizer:
//! - Images placed on four print zones (front, back, left and right sleeve)
//! - Move, rotate and scale gestures with printable-area clamping
//! - One selection shared by every view
//! - Debounced and throttled texture bakes onto the garment's materials
//!
//! ## Architecture
//!
//! GarmentKit is organized as a workspace with multiple crates:
//!
//! 1. **garmentkit-core** - Zones, texture targets, geometry, layout table, errors
//! 2. **garmentkit-settings** - Configuration, validation, JSON/TOML persistence
//! 3. **garmentkit-designer** - Design store, selection, gestures, scheduling, baking
//! 4. **garmentkit** - Facade crate that re-exports the above and sets up logging
//!
//! The host application owns the UI and the 3D renderer. It implements
//! [`RenderBackend`], feeds pointer events and time into a
//! [`CustomizerSession`], and redraws when the session asks it to.

// Re-export crates
pub use garmentkit_core::{constants, data, geometry};
pub use garmentkit_designer as designer;
pub use garmentkit_settings as settings;

pub use garmentkit_core::{
    CustomizerError, PixelRect, Point, Result, TextureTarget, UvRect, Zone, ZoneLayout,
};

pub use garmentkit_designer::{
    BakeReport, CustomizerSession, DesignElement, DesignId, DesignStore, ElementProperty,
    ElementSummary, ImageRef, ImageStatus, Modifiers, ObserverRole, PointerEvent, PreviewItem,
    PreviewSink, PublishOptions, RenderBackend, SelectionChange, SelectionListener,
    UploadedImage,
};

pub use garmentkit_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines on stdout.
    #[default]
    Pretty,
    /// One JSON object per event, for hosts that ship logs elsewhere.
    Json,
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support (defaults to `info`)
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(LogFormat::Pretty)
}

/// Initialize logging in the given format.
///
/// Calling this after a global subscriber is installed (by an earlier call or
/// by the host) leaves the existing subscriber in place.
pub fn init_logging_with(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true)
                .with_level(true)
                .with_line_number(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stdout)
                .with_current_span(false);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        // lost a race with another initializer
        tracing::debug!("Logging already initialized: {}", e);
    }
    Ok(())
}
