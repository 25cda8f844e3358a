//! Configuration file support for digitscriber.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/digitscriber/config.toml`. Settings include the pen width and
//! the classifier endpoint.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod types;

// Re-export commonly used types at module level
pub use types::{CanvasConfig, InferenceConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [canvas]
/// stroke_width = 30.0
///
/// [inference]
/// endpoint = "http://127.0.0.1:5000/predict"
/// default_feature = "f3"
/// connect_timeout_secs = 10
/// stale_responses = "discard"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Drawing surface settings
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Remote classifier settings
    #[serde(default)]
    pub inference: InferenceConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value (or replaced by the
    /// default) and a warning is logged.
    ///
    /// Validated ranges:
    /// - `canvas.stroke_width`: 5.0 - 60.0
    /// - `inference.connect_timeout_secs`: 1 - 300
    /// - `inference.endpoint`: absolute http(s) URL
    fn validate_and_clamp(&mut self) {
        if !(5.0..=60.0).contains(&self.canvas.stroke_width) {
            log::warn!(
                "Invalid stroke_width {:.1}, clamping to 5.0-60.0 range",
                self.canvas.stroke_width
            );
            self.canvas.stroke_width = if self.canvas.stroke_width.is_nan() {
                crate::draw::DEFAULT_STROKE_WIDTH
            } else {
                self.canvas.stroke_width.clamp(5.0, 60.0)
            };
        }

        if !(1..=300).contains(&self.inference.connect_timeout_secs) {
            log::warn!(
                "Invalid connect_timeout_secs {}, clamping to 1-300 range",
                self.inference.connect_timeout_secs
            );
            self.inference.connect_timeout_secs =
                self.inference.connect_timeout_secs.clamp(1, 300);
        }

        if let Err(e) = crate::inference::transport::parse_endpoint(&self.inference.endpoint) {
            log::warn!("{}, falling back to {}", e, types::default_endpoint());
            self.inference.endpoint = types::default_endpoint();
        }
    }

    /// Connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.inference.connect_timeout_secs)
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/digitscriber/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("digitscriber");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if the file is absent.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        // Validate and clamp values to acceptable ranges
        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// JSON schema of the config file, for editor integration.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}
