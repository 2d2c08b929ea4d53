//! # GarmentKit Core
//!
//! Core types, constants, and errors shared by the GarmentKit crates.
//! Provides the placement-zone vocabulary, the texture-target vocabulary,
//! geometry primitives for the three coordinate spaces, the printable-area
//! layout table, the error taxonomy of the customizer core, and
//! single-threaded shared state aliases used by host views.

pub mod constants;
pub mod data;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod types;

pub use data::{TextureTarget, Zone};

pub use error::{CustomizerError, Result};

pub use geometry::{PixelRect, Point, UvRect};

pub use layout::ZoneLayout;

pub use types::{shared, shared_none, Shared, SharedOption, SharedVec};
