//! Coordinate transformation between panel pixels, zone UV space, and raster pixels.
//!
//! Handles conversion between pixel coordinates (the on-screen editing panel)
//! and UV coordinates (the texture space of a zone's target). The editing
//! panel always shows exactly one zone's printable rectangle, stretched to
//! fill it:
//!
//! ```text
//! u = zone.min_u + (px - panel.x) / panel.width  * zone.width
//! v = zone.min_v + (py - panel.y) / panel.height * zone.height
//! ```
//!
//! Every function here is pure. Degenerate rectangles are reported as
//! `CustomizerError::InvalidGeometry` instead of dividing by zero.

use garmentkit_core::constants::UV_EPSILON;
use garmentkit_core::{CustomizerError, PixelRect, Point, Result, UvRect};

fn check_panel(panel: &PixelRect) -> Result<()> {
    if panel.is_degenerate() {
        return Err(CustomizerError::invalid_geometry(panel.width, panel.height));
    }
    Ok(())
}

fn check_zone(zone: &UvRect) -> Result<()> {
    if !(zone.width() > 0.0 && zone.height() > 0.0) {
        return Err(CustomizerError::invalid_geometry(zone.width(), zone.height()));
    }
    Ok(())
}

/// Converts a pixel point inside the editing panel to zone UV coordinates.
///
/// Points outside the panel map to UV values outside the printable rect;
/// clamping is a separate step.
pub fn panel_pixels_to_zone_uv(
    px: f64,
    py: f64,
    panel: &PixelRect,
    zone: &UvRect,
) -> Result<Point> {
    check_panel(panel)?;
    check_zone(zone)?;
    let u = zone.min_u + (px - panel.x) / panel.width * zone.width();
    let v = zone.min_v + (py - panel.y) / panel.height * zone.height();
    Ok(Point::new(u, v))
}

/// Converts zone UV coordinates to a pixel point in the editing panel.
///
/// Exact inverse of [`panel_pixels_to_zone_uv`].
pub fn zone_uv_to_panel_pixels(u: f64, v: f64, panel: &PixelRect, zone: &UvRect) -> Result<Point> {
    check_panel(panel)?;
    check_zone(zone)?;
    let px = panel.x + (u - zone.min_u) / zone.width() * panel.width;
    let py = panel.y + (v - zone.min_v) / zone.height() * panel.height;
    Ok(Point::new(px, py))
}

/// Clamps a center point so the full extent stays inside the zone rectangle.
///
/// When an extent is larger than the rectangle on one axis there is no
/// inside placement; the center is pinned to the rectangle's center on that
/// axis. Clamping an already clamped point returns it unchanged.
pub fn clamp_to_printable(
    u: f64,
    v: f64,
    half_extent_u: f64,
    half_extent_v: f64,
    zone: &UvRect,
) -> Point {
    Point::new(
        clamp_axis(u, half_extent_u, zone.min_u, zone.max_u),
        clamp_axis(v, half_extent_v, zone.min_v, zone.max_v),
    )
}

fn clamp_axis(value: f64, half_extent: f64, min: f64, max: f64) -> f64 {
    let lo = min + half_extent;
    let hi = max - half_extent;
    if lo > hi + UV_EPSILON {
        return (min + max) / 2.0;
    }
    if !value.is_finite() {
        return (min + max) / 2.0;
    }
    value.max(lo).min(hi.max(lo))
}

/// Computes the rendered pixel size of an element inside `rect`.
///
/// The longer natural side is fitted to `max_fraction` of the rect's shorter
/// side, the aspect ratio is preserved, and the result is multiplied by
/// `scale`. Fitting (rather than only shrinking) keeps the size proportional
/// to the rect, so the panel preview and the high-resolution bake agree.
pub fn compute_render_extent(
    natural_width: f64,
    natural_height: f64,
    scale: f64,
    rect: &PixelRect,
    max_fraction: f64,
) -> Result<(f64, f64)> {
    check_panel(rect)?;
    if !(natural_width > 0.0 && natural_height > 0.0) {
        return Err(CustomizerError::invalid_geometry(natural_width, natural_height));
    }
    let cap = rect.shorter_side() * max_fraction;
    let fit = cap / natural_width.max(natural_height);
    Ok((natural_width * fit * scale, natural_height * fit * scale))
}

/// Half of an element's rendered extent, in UV units of its texture target.
///
/// The reference rectangle is the zone's printable rect in the pixel space of
/// the target raster, which makes the extent independent of the on-screen
/// panel size.
pub fn half_extent_uv(
    natural_width: f64,
    natural_height: f64,
    scale: f64,
    zone: &UvRect,
    raster_size: (u32, u32),
    max_fraction: f64,
) -> Result<(f64, f64)> {
    check_zone(zone)?;
    let (raster_w, raster_h) = (raster_size.0 as f64, raster_size.1 as f64);
    let reference = zone.to_raster(raster_w, raster_h);
    let (w, h) =
        compute_render_extent(natural_width, natural_height, scale, &reference, max_fraction)?;
    Ok((w / raster_w / 2.0, h / raster_h / 2.0))
}

/// Normalizes an angle in degrees to `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let r = degrees.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Clamps a scale multiplier to `[min, max]`; non-finite input falls back to `min`.
pub fn clamp_scale(scale: f64, min: f64, max: f64) -> f64 {
    if !scale.is_finite() {
        return min;
    }
    scale.clamp(min, max)
}

/// Panel/zone pairing captured for the lifetime of one gesture.
///
/// Capturing the panel rectangle once keeps every pointer move of a gesture
/// on the same basis, even if layout changes underneath it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelMapping {
    pub panel: PixelRect,
    pub zone: UvRect,
}

impl PanelMapping {
    /// Creates a mapping, rejecting degenerate rectangles up front.
    pub fn new(panel: PixelRect, zone: UvRect) -> Result<Self> {
        check_panel(&panel)?;
        check_zone(&zone)?;
        Ok(Self { panel, zone })
    }

    pub fn to_uv(&self, px: f64, py: f64) -> Point {
        let u = self.zone.min_u + (px - self.panel.x) / self.panel.width * self.zone.width();
        let v = self.zone.min_v + (py - self.panel.y) / self.panel.height * self.zone.height();
        Point::new(u, v)
    }

    pub fn to_panel(&self, u: f64, v: f64) -> Point {
        let px = self.panel.x + (u - self.zone.min_u) / self.zone.width() * self.panel.width;
        let py = self.panel.y + (v - self.zone.min_v) / self.zone.height() * self.panel.height;
        Point::new(px, py)
    }

    /// Converts a UV-space size to panel pixels.
    pub fn uv_size_to_panel(&self, du: f64, dv: f64) -> (f64, f64) {
        (
            du / self.zone.width() * self.panel.width,
            dv / self.zone.height() * self.panel.height,
        )
    }
}
