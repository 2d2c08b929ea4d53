//! Design element records and the values that flow in and out of them.

use crate::image_source::{ImageRef, ImageStatus};
use garmentkit_core::{CustomizerError, Point, Result, Zone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable element identifier. Assigned once, never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DesignId(pub u64);

impl DesignId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DesignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cosmetic toggles read only by the texture baker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessingFlags {
    /// Sample the source with a higher quality filter.
    pub supersample: bool,
    /// Multiply the design into the fabric color instead of painting over it.
    pub fabric_blend: bool,
    /// Overlay a soft-light pass that lets fabric shading show through.
    pub shading: bool,
}

/// One placed image inside one zone.
///
/// Elements are only ever handed out by shared reference; every change goes
/// through [`crate::DesignStore::update`], which re-establishes placement
/// invariants afterwards.
#[derive(Debug, Clone)]
pub struct DesignElement {
    pub id: DesignId,
    pub name: String,
    pub image: ImageRef,
    pub zone: Zone,
    /// Center in the UV space of the zone's texture target.
    pub position: Point,
    pub scale: f64,
    /// Degrees in `[0, 360)`.
    pub rotation: f64,
    /// Percent in `[0, 100]`.
    pub opacity: u8,
    pub natural_width: u32,
    pub natural_height: u32,
    /// Half of the rendered extent in UV units, kept in sync with `scale`.
    pub half_extent: (f64, f64),
    pub flags: ProcessingFlags,
}

impl DesignElement {
    /// True when drawing this element requires alpha compositing.
    pub fn needs_alpha(&self) -> bool {
        self.opacity < 100 || self.flags.shading
    }

    /// Whether `uv` falls inside the element's rotated rectangle.
    pub fn contains(&self, uv: Point) -> bool {
        let (hu, hv) = self.half_extent;
        let dx = uv.x - self.position.x;
        let dy = uv.y - self.position.y;
        let (sin, cos) = (-self.rotation.to_radians()).sin_cos();
        let local_x = dx * cos - dy * sin;
        let local_y = dx * sin + dy * cos;
        local_x.abs() <= hu && local_y.abs() <= hv
    }
}

/// A partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementChanges {
    pub name: Option<String>,
    pub position: Option<Point>,
    pub scale: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<u8>,
    pub flags: Option<ProcessingFlags>,
}

impl ElementChanges {
    pub fn position(p: Point) -> Self {
        Self {
            position: Some(p),
            ..Default::default()
        }
    }

    pub fn scale(scale: f64) -> Self {
        Self {
            scale: Some(scale),
            ..Default::default()
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Default::default()
        }
    }

    pub fn opacity(percent: u8) -> Self {
        Self {
            opacity: Some(percent),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when the change can alter the element's rendered size.
    pub fn affects_extent(&self) -> bool {
        self.scale.is_some()
    }
}

/// A single discrete edit coming from a property panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementProperty {
    Name(String),
    Scale(f64),
    Rotation(f64),
    Opacity(u8),
    PositionU(f64),
    PositionV(f64),
    Supersample(bool),
    FabricBlend(bool),
    Shading(bool),
}

impl ElementProperty {
    /// Parses a `(name, value)` pair as delivered by a form control.
    ///
    /// Numeric values outside their range are accepted and clamped later by
    /// the store; only values that are not numbers at all are rejected.
    pub fn parse(name: &str, value: &str) -> Result<Self> {
        let value = value.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name(value.to_string())),
            "scale" | "size" => number(name, value).map(Self::Scale),
            "rotation" | "angle" => number(name, value).map(Self::Rotation),
            "opacity" => {
                let percent = number(name, value)?.round().clamp(0.0, 100.0);
                Ok(Self::Opacity(percent as u8))
            }
            "x" | "u" => number(name, value).map(Self::PositionU),
            "y" | "v" => number(name, value).map(Self::PositionV),
            "supersample" => flag(name, value).map(Self::Supersample),
            "fabric_blend" | "blend" => flag(name, value).map(Self::FabricBlend),
            "shading" => flag(name, value).map(Self::Shading),
            _ => Err(CustomizerError::UnknownProperty(name.to_string())),
        }
    }

    /// Turns the edit into a partial update against the element's current state.
    pub fn to_changes(&self, current: &DesignElement) -> ElementChanges {
        let mut changes = ElementChanges::default();
        match self {
            Self::Name(name) => changes.name = Some(name.clone()),
            Self::Scale(s) => changes.scale = Some(*s),
            Self::Rotation(r) => changes.rotation = Some(*r),
            Self::Opacity(o) => changes.opacity = Some(*o),
            Self::PositionU(u) => changes.position = Some(Point::new(*u, current.position.y)),
            Self::PositionV(v) => changes.position = Some(Point::new(current.position.x, *v)),
            Self::Supersample(on) => {
                changes.flags = Some(ProcessingFlags {
                    supersample: *on,
                    ..current.flags
                })
            }
            Self::FabricBlend(on) => {
                changes.flags = Some(ProcessingFlags {
                    fabric_blend: *on,
                    ..current.flags
                })
            }
            Self::Shading(on) => {
                changes.flags = Some(ProcessingFlags {
                    shading: *on,
                    ..current.flags
                })
            }
        }
        changes
    }
}

fn number(property: &str, value: &str) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(CustomizerError::InvalidPropertyValue {
            property: property.to_string(),
            reason: format!("'{value}' is not a finite number"),
        }),
    }
}

fn flag(property: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(CustomizerError::InvalidPropertyValue {
            property: property.to_string(),
            reason: format!("'{value}' is not a boolean"),
        }),
    }
}

/// Row shown in an element list view.
#[derive(Debug, Clone)]
pub struct ElementSummary {
    pub id: DesignId,
    pub name: String,
    pub thumbnail: ImageRef,
    pub image_status: ImageStatus,
    pub opacity: u8,
    pub selected: bool,
}

/// Panel-space projection of one element for the lightweight preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewItem {
    pub id: DesignId,
    /// Center in panel pixels.
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub opacity: u8,
    pub selected: bool,
}
