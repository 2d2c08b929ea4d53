//! Placement zones and texture targets.
//!
//! A zone is where a user places designs; a texture target is the material
//! region the 3D renderer maps a baked raster onto. Front and back share the
//! body texture, each sleeve owns its own.

use crate::error::CustomizerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named placement region on the garment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Front,
    Back,
    Left,
    Right,
}

impl Zone {
    /// All zones, in session creation order.
    pub const ALL: [Zone; 4] = [Zone::Front, Zone::Back, Zone::Left, Zone::Right];

    /// Lowercase identifier used by the UI collaborator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// The texture target this zone bakes into.
    pub fn texture_target(&self) -> TextureTarget {
        match self {
            Self::Front | Self::Back => TextureTarget::Body,
            Self::Left => TextureTarget::LeftSleeve,
            Self::Right => TextureTarget::RightSleeve,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = CustomizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            "left" | "left_sleeve" => Ok(Self::Left),
            "right" | "right_sleeve" => Ok(Self::Right),
            _ => Err(CustomizerError::UnknownZone(s.to_string())),
        }
    }
}

/// Material region that receives a baked texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureTarget {
    /// Shared body texture; front occupies one half, back the other.
    Body,
    LeftSleeve,
    RightSleeve,
}

impl TextureTarget {
    /// All targets, in bake order.
    pub const ALL: [TextureTarget; 3] = [
        TextureTarget::Body,
        TextureTarget::LeftSleeve,
        TextureTarget::RightSleeve,
    ];

    /// Name the renderer collaborator uses for this material region.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::LeftSleeve => "left_sleeve",
            Self::RightSleeve => "right_sleeve",
        }
    }

    /// Zones whose designs are baked into this target, in draw order.
    pub fn zones(&self) -> &'static [Zone] {
        match self {
            Self::Body => &[Zone::Front, Zone::Back],
            Self::LeftSleeve => &[Zone::Left],
            Self::RightSleeve => &[Zone::Right],
        }
    }
}

impl fmt::Display for TextureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
