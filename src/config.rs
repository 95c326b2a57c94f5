use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::{Pixel, MAX_DIMENSION};
use crate::history::DEFAULT_MAX_UNDO_STATES;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "RASTER_PAINT_CONFIG";
/// Config file looked up in the working directory when the variable is unset
pub const DEFAULT_CONFIG_FILE: &str = "raster_paint.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Tunable application constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // missing keys keep their default values
pub struct PaintConfig {
    pub default_width: u32,
    pub default_height: u32,
    pub default_pen_size: u32,
    pub min_pen_size: u32,
    pub max_pen_size: u32,
    /// Relative change per zoom in/out step
    pub zoom_step: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub max_undo_states: usize,
    /// Edge length of a checkerboard square, in screen points
    pub checker_size: f32,
    /// Color transparent pixels are flattened onto for formats without alpha
    pub jpeg_background: Pixel,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            default_width: 800,
            default_height: 600,
            default_pen_size: 5,
            min_pen_size: 1,
            max_pen_size: 100,
            zoom_step: 0.15,
            min_zoom: 0.1,
            max_zoom: 16.0,
            max_undo_states: DEFAULT_MAX_UNDO_STATES,
            checker_size: 20.0,
            jpeg_background: Pixel::WHITE,
        }
    }
}

impl PaintConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: PaintConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Path from the environment, falling back to the working directory
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load the config file if present. Problems are logged and defaults used.
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Ignoring config file {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_pen_size == 0 || self.min_pen_size > self.max_pen_size {
            return Err(ConfigError::InvalidValue(format!(
                "pen size range {}..={}",
                self.min_pen_size, self.max_pen_size
            )));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= 1.0 && self.max_zoom >= 1.0) {
            return Err(ConfigError::InvalidValue(format!(
                "zoom range {}..={}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_step <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "zoom step {}",
                self.zoom_step
            )));
        }
        if !(1..=MAX_DIMENSION).contains(&self.default_width)
            || !(1..=MAX_DIMENSION).contains(&self.default_height)
        {
            return Err(ConfigError::InvalidValue(format!(
                "default canvas size {}x{}",
                self.default_width, self.default_height
            )));
        }
        if self.max_undo_states == 0 {
            return Err(ConfigError::InvalidValue("max_undo_states must be at least 1".into()));
        }
        Ok(())
    }
}
