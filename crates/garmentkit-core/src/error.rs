//! Error handling for GarmentKit
//!
//! The customizer degrades instead of interrupting the user: stale ids,
//! images that have not finished decoding, degenerate layout rectangles and
//! a renderer that is not ready yet are all reported through this type, then
//! logged and absorbed by the session layer.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Customizer error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CustomizerError {
    /// A mutation targeted an element id that no longer exists.
    #[error("Stale reference to design {id}")]
    StaleReference {
        /// The id that could not be resolved.
        id: u64,
    },

    /// A bake reached an element whose image is still decoding.
    #[error("Image for design {id} is not decoded yet")]
    DecodeNotReady {
        /// The element whose image is pending.
        id: u64,
    },

    /// A panel or raster rectangle had zero or negative size.
    #[error("Invalid geometry: {width}x{height}")]
    InvalidGeometry {
        /// Reported width.
        width: f64,
        /// Reported height.
        height: f64,
    },

    /// The 3D renderer could not provide a surface for a texture target.
    #[error("Render target '{target}' is unavailable")]
    RendererUnavailable {
        /// The texture target name.
        target: String,
    },

    /// A zone name did not match any placement zone.
    #[error("Unknown zone: {0}")]
    UnknownZone(String),

    /// A property name did not match any editable element property.
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// A property value could not be applied.
    #[error("Invalid value for '{property}': {reason}")]
    InvalidPropertyValue {
        /// The property name.
        property: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Uploaded bytes could not be decoded into an image.
    #[error("Image decode failed: {0}")]
    ImageDecode(String),
}

impl CustomizerError {
    /// Builds an `InvalidGeometry` error from a width/height pair.
    pub fn invalid_geometry(width: f64, height: f64) -> Self {
        Self::InvalidGeometry { width, height }
    }

    /// Returns true for errors that reflect a transient race rather than bad input.
    ///
    /// Transient errors are retried on the next natural trigger (next bake,
    /// next gesture, next resize) and are logged at a lower level.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::StaleReference { .. }
                | Self::DecodeNotReady { .. }
                | Self::InvalidGeometry { .. }
                | Self::RendererUnavailable { .. }
        )
    }
}

/// Result type alias for customizer operations.
pub type Result<T> = std::result::Result<T, CustomizerError>;
