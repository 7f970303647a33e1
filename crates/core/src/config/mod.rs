use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{contrast::ContrastConfig, oscillator::OscillatorConfig, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    pub background: OscillatorConfig,
    pub contrast: ContrastConfig,
    pub presentation: PresentationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            background: OscillatorConfig {
                light_min: 35.0,
                light_max: 65.0,
                ..OscillatorConfig::default()
            },
            contrast: ContrastConfig::default(),
            presentation: PresentationConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn live_defaults() -> Self {
        Self::default()
    }

    /// Reads a JSON config; absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&raw)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded config");
        Ok(config)
    }
}

/// Drawing dimensions. Stroke widths scale with the canvas relative to
/// `base_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub size: f64,
    pub base_stroke: f64,
    pub base_size: f64,
    pub min_stroke: f64,
    /// Outer circle radius as a fraction of the canvas size.
    pub radius_ratio: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            size: 800.0,
            base_stroke: 3.0,
            base_size: 800.0,
            min_stroke: 2.0,
            radius_ratio: 0.42,
        }
    }
}

impl CanvasConfig {
    pub fn stroke_width(&self, size: f64) -> f64 {
        (self.base_stroke * size / self.base_size).max(self.min_stroke)
    }
}

/// Timing of the combo cycle, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub interval_ms: f64,
    pub fade_ms: f64,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            interval_ms: 25_000.0,
            fade_ms: 2_000.0,
        }
    }
}
