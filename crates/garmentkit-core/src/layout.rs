//! Printable-area layout table.
//!
//! Each zone owns a printable rectangle in the UV space of its texture
//! target. The table mirrors the garment model's UV unwrap, so it is supplied
//! with the model rather than computed.

use crate::data::{TextureTarget, Zone};
use crate::geometry::UvRect;
use serde::{Deserialize, Serialize};

/// Printable rectangles for every zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneLayout {
    pub front: UvRect,
    pub back: UvRect,
    pub left: UvRect,
    pub right: UvRect,
}

impl ZoneLayout {
    /// Printable rectangle of a zone.
    pub fn printable(&self, zone: Zone) -> UvRect {
        match zone {
            Zone::Front => self.front,
            Zone::Back => self.back,
            Zone::Left => self.left,
            Zone::Right => self.right,
        }
    }

    /// Replaces the printable rectangle of a zone.
    pub fn set_printable(&mut self, zone: Zone, rect: UvRect) {
        match zone {
            Zone::Front => self.front = rect,
            Zone::Back => self.back = rect,
            Zone::Left => self.left = rect,
            Zone::Right => self.right = rect,
        }
    }

    /// Returns the first problem found, or `None` if the table is usable.
    ///
    /// Every rectangle must be valid, and zones sharing a texture target
    /// must not overlap.
    pub fn problem(&self) -> Option<String> {
        for zone in Zone::ALL {
            if !self.printable(zone).is_valid() {
                return Some(format!("printable area for '{zone}' is empty or outside [0,1]"));
            }
        }
        for target in TextureTarget::ALL {
            let zones = target.zones();
            for (i, a) in zones.iter().enumerate() {
                for b in &zones[i + 1..] {
                    if self.printable(*a).overlaps(&self.printable(*b)) {
                        return Some(format!(
                            "printable areas for '{a}' and '{b}' overlap on '{target}'"
                        ));
                    }
                }
            }
        }
        None
    }
}

impl Default for ZoneLayout {
    fn default() -> Self {
        Self {
            front: UvRect::new(0.05, 0.15, 0.45, 0.85),
            back: UvRect::new(0.55, 0.15, 0.95, 0.85),
            left: UvRect::new(0.20, 0.25, 0.80, 0.75),
            right: UvRect::new(0.20, 0.25, 0.80, 0.75),
        }
    }
}
