//! Configuration for the customizer core
//!
//! Provides configuration file handling, defaults, and validation.
//! Supports JSON and TOML file formats stored in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Interaction limits (scale bounds, wheel factors, base extent)
//! - Scheduling (bake debounce and drag throttle)
//! - Baking (raster resolutions, base garment color, shading)
//! - Layout (printable UV rectangle per zone)

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use garmentkit_core::constants;
use garmentkit_core::ZoneLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Limits applied by the entity store and the interaction state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Smallest scale multiplier
    pub min_scale: f64,
    /// Largest scale multiplier
    pub max_scale: f64,
    /// Scale of a newly uploaded element
    pub default_scale: f64,
    /// Factor applied per wheel notch when zooming in
    pub wheel_zoom_in: f64,
    /// Factor applied per wheel notch when zooming out
    pub wheel_zoom_out: f64,
    /// Base size as a fraction of the printable area's shorter side
    pub max_extent_fraction: f64,
    /// UV offset applied to duplicated elements
    pub duplicate_offset: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            min_scale: constants::MIN_SCALE,
            max_scale: constants::MAX_SCALE,
            default_scale: constants::DEFAULT_SCALE,
            wheel_zoom_in: constants::WHEEL_ZOOM_IN,
            wheel_zoom_out: constants::WHEEL_ZOOM_OUT,
            max_extent_fraction: constants::MAX_EXTENT_FRACTION,
            duplicate_offset: constants::DUPLICATE_OFFSET,
        }
    }
}

/// Timing of the heavy (bake) update tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingSettings {
    /// Quiet period after the last mutation before a bake fires
    pub bake_debounce_ms: u64,
    /// Minimum spacing between bakes during a gesture; 0 disables the throttle
    pub drag_bake_interval_ms: u64,
}

impl SchedulingSettings {
    pub fn bake_debounce(&self) -> Duration {
        Duration::from_millis(self.bake_debounce_ms)
    }

    /// The drag throttle interval, or `None` when disabled.
    pub fn drag_bake_interval(&self) -> Option<Duration> {
        (self.drag_bake_interval_ms > 0).then(|| Duration::from_millis(self.drag_bake_interval_ms))
    }
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            bake_debounce_ms: constants::BAKE_DEBOUNCE_MS,
            drag_bake_interval_ms: constants::DRAG_BAKE_INTERVAL_MS,
        }
    }
}

/// Raster and compositing settings of the texture baking pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakingSettings {
    /// Square resolution of the shared body texture
    pub body_resolution: u32,
    /// Square resolution of each sleeve texture
    pub sleeve_resolution: u32,
    /// Base garment color as RGB
    pub base_color: [u8; 3],
    /// Alpha of the shading overlay pass, relative to element opacity
    pub shading_strength: f32,
}

impl Default for BakingSettings {
    fn default() -> Self {
        Self {
            body_resolution: constants::BODY_TEXTURE_RESOLUTION,
            sleeve_resolution: constants::SLEEVE_TEXTURE_RESOLUTION,
            base_color: [255, 255, 255],
            shading_strength: constants::SHADING_STRENGTH,
        }
    }
}

/// Complete customizer configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Interaction limits
    pub interaction: InteractionSettings,
    /// Bake scheduling
    pub scheduling: SchedulingSettings,
    /// Texture baking
    pub baking: BakingSettings,
    /// Printable area per zone
    pub layout: ZoneLayout,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file in the platform config directory.
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no platform config directory".to_string())
        })?;
        Ok(dir.join("garmentkit").join("customizer.toml"))
    }

    /// Load config from file (JSON or TOML, chosen by extension)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::from_path(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::info!("Loaded customizer config from {}", path.display());
        Ok(config)
    }

    /// Load config from file, falling back to defaults when it is missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let i = &self.interaction;
        if !(i.min_scale.is_finite() && i.min_scale > 0.0) {
            return Err(ConfigError::out_of_range("interaction.min_scale", i.min_scale));
        }
        if !i.max_scale.is_finite() || i.max_scale < i.min_scale {
            return Err(ConfigError::Inconsistent(format!(
                "max_scale {} is below min_scale {}",
                i.max_scale, i.min_scale
            )));
        }
        if !(i.min_scale..=i.max_scale).contains(&i.default_scale) {
            return Err(ConfigError::out_of_range(
                "interaction.default_scale",
                i.default_scale,
            ));
        }
        if !(i.wheel_zoom_in > 1.0) {
            return Err(ConfigError::out_of_range("interaction.wheel_zoom_in", i.wheel_zoom_in));
        }
        if !(i.wheel_zoom_out > 0.0 && i.wheel_zoom_out < 1.0) {
            return Err(ConfigError::out_of_range(
                "interaction.wheel_zoom_out",
                i.wheel_zoom_out,
            ));
        }
        if !(i.max_extent_fraction > 0.0 && i.max_extent_fraction <= 1.0) {
            return Err(ConfigError::out_of_range(
                "interaction.max_extent_fraction",
                i.max_extent_fraction,
            ));
        }
        if !(i.duplicate_offset.is_finite() && i.duplicate_offset >= 0.0) {
            return Err(ConfigError::out_of_range(
                "interaction.duplicate_offset",
                i.duplicate_offset,
            ));
        }

        if self.scheduling.bake_debounce_ms == 0 {
            return Err(ConfigError::out_of_range("scheduling.bake_debounce_ms", 0));
        }

        let b = &self.baking;
        if b.body_resolution == 0 {
            return Err(ConfigError::out_of_range("baking.body_resolution", 0));
        }
        if b.sleeve_resolution == 0 {
            return Err(ConfigError::out_of_range("baking.sleeve_resolution", 0));
        }
        if !(0.0..=1.0).contains(&b.shading_strength) {
            return Err(ConfigError::out_of_range(
                "baking.shading_strength",
                b.shading_strength,
            ));
        }

        if let Some(problem) = self.layout.problem() {
            return Err(ConfigError::InvalidLayout(problem));
        }

        Ok(())
    }
}

/// On-disk config format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
