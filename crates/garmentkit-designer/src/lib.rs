//! # GarmentKit Designer
//!
//! This crate provides the design placement and texture baking core of the
//! garment customizer: users place images inside named zones of a garment,
//! move, rotate and scale them with pointer gestures, and see the result
//! baked into the textures of a 3D model.
//!
//! ## Core Components
//!
//! ### Placement
//! - **Transform**: Pure conversions between panel pixels, zone UV and raster pixels
//! - **Design Store**: Per-zone element collections with invariant enforcement
//! - **Images**: Shared handles to decoded (or still decoding) images
//!
//! ### Interaction
//! - **Interaction Machine**: Move / rotate / scale gestures from a start snapshot
//! - **Selection Manager**: Single selection slot with ordered view notification
//!
//! ### Output
//! - **Scheduler**: Per-frame preview tier and debounced / throttled bake tier
//! - **Renderer**: tiny-skia texture baker and the 3D renderer boundary
//!
//! ## Architecture
//!
//! ```text
//! CustomizerSession (host entry point)
//!   ├── InteractionMachine ──> DesignStore <── Transform
//!   ├── SelectionManager ──> views (overlay, panel, 3D, external)
//!   └── UpdateScheduler
//!         ├── preview tier ──> PreviewSink
//!         └── bake tier ──> TextureBaker ──> RenderBackend
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use garmentkit_designer::{CustomizerSession, ImageRef, UploadedImage};
//!
//! let mut session = CustomizerSession::new(Box::new(renderer));
//! session.set_panel_rect(PixelRect::new(0.0, 0.0, 600.0, 800.0));
//!
//! let image = ImageRef::from_encoded(&png_bytes)?;
//! let upload = UploadedImage::ready(image, Some("logo.png".into())).unwrap();
//! let id = session.image_uploaded(upload);
//!
//! // From the event loop:
//! session.tick(Instant::now());
//! ```

pub mod design_store;
pub mod image_source;
pub mod interaction;
pub mod model;
pub mod renderer;
pub mod scheduler;
pub mod selection_manager;
pub mod session;
pub mod transform;

pub use design_store::{DesignStore, Insertion, PlacementRules};
pub use image_source::{ImageRef, ImageStatus};
pub use interaction::{
    DownOutcome, GestureMode, GestureSnapshot, InteractionMachine, InteractionState, Modifiers,
    MoveOutcome, PointerEvent,
};
pub use model::{
    DesignElement, DesignId, ElementChanges, ElementProperty, ElementSummary, PreviewItem,
    ProcessingFlags,
};
pub use renderer::{BakeReport, PublishOptions, RenderBackend, TextureBaker};
pub use scheduler::{BakeReason, BakeTicket, UpdateScheduler};
pub use selection_manager::{
    ListenerHandle, ObserverRole, SelectionChange, SelectionListener, SelectionManager,
};
pub use session::{CustomizerSession, PreviewSink, UploadedImage};
pub use transform::{
    clamp_scale, clamp_to_printable, compute_render_extent, half_extent_uv, normalize_rotation,
    panel_pixels_to_zone_uv, zone_uv_to_panel_pixels, PanelMapping,
};
