//! GarmentKit Settings Crate
//!
//! Handles customizer configuration: interaction limits, bake scheduling,
//! raster resolutions, and the printable-area layout table, persisted as
//! JSON or TOML.

pub mod config;
pub mod error;

pub use config::{BakingSettings, Config, InteractionSettings, SchedulingSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
