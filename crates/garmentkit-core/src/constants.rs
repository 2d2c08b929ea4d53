//! Canonical constants for the customizer core.
//!
//! Earlier handler code carried several near-duplicate scale bounds and
//! debounce delays. These are the single values every component defaults to;
//! `garmentkit-settings` can override them at runtime.

/// Smallest allowed element scale multiplier.
pub const MIN_SCALE: f64 = 0.1;

/// Largest allowed element scale multiplier.
pub const MAX_SCALE: f64 = 3.0;

/// Scale given to a freshly uploaded element.
pub const DEFAULT_SCALE: f64 = 1.5;

/// Multiplicative factor for one wheel notch towards the user (zoom in).
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Multiplicative factor for one wheel notch away from the user (zoom out).
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Fraction of the shorter printable dimension used as an element's base size.
pub const MAX_EXTENT_FRACTION: f64 = 0.4;

/// Quiet period after the last mutation before a bake fires.
pub const BAKE_DEBOUNCE_MS: u64 = 200;

/// Minimum spacing between bakes while a gesture keeps extending the debounce.
pub const DRAG_BAKE_INTERVAL_MS: u64 = 500;

/// Pixel size of the shared body texture (front and back halves).
pub const BODY_TEXTURE_RESOLUTION: u32 = 2048;

/// Pixel size of each sleeve texture.
pub const SLEEVE_TEXTURE_RESOLUTION: u32 = 1024;

/// UV offset applied to duplicated elements so the copy is visible.
pub const DUPLICATE_OFFSET: f64 = 0.04;

/// Alpha applied to the shading overlay pass, relative to element opacity.
pub const SHADING_STRENGTH: f32 = 0.35;

/// Opacity given to a freshly uploaded element, in percent.
pub const DEFAULT_OPACITY: u8 = 100;

/// Tolerance used when comparing normalized coordinates.
pub const UV_EPSILON: f64 = 1e-9;
