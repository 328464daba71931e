use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{state::StateScope, Result, VisualiserError, VisualizerMode};

/// Largest sensitivity a configuration may ask for. Renderers take whatever
/// they are given; this bound only applies to loaded or parsed settings.
pub const MAX_SENSITIVITY: f32 = 10.0;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub visualizer: VisualizerConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file. Missing sections and fields fall back
    /// to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        if !(0.0..=MAX_SENSITIVITY).contains(&self.visualizer.sensitivity) {
            return Err(VisualiserError::InvalidConfig("sensitivity must lie in [0, 10]"));
        }
        Ok(())
    }
}

/// What is drawn and how strongly it reacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizerConfig {
    #[serde(default)]
    pub mode: VisualizerMode,
    /// Nominally 0.5 to 2.0. Validation rejects values outside
    /// `[0, MAX_SENSITIVITY]`; nothing is clamped.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    #[serde(default)]
    pub state_scope: StateScope,
    /// Seed for explosion placement and particle kinematics. Random when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            mode: VisualizerMode::default(),
            sensitivity: default_sensitivity(),
            state_scope: StateScope::default(),
            seed: None,
        }
    }
}

/// Settings handed to the sample source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fft_size: default_fft_size(),
            smoothing: default_smoothing(),
        }
    }
}

impl AnalysisConfig {
    /// Buffer length delivered every frame.
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    pub fn validate(&self) -> Result<()> {
        if self.fft_size < 32 || !self.fft_size.is_power_of_two() {
            return Err(VisualiserError::InvalidConfig(
                "fft size must be a power of two of at least 32",
            ));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(VisualiserError::InvalidConfig("smoothing must lie in [0, 1]"));
        }
        Ok(())
    }
}

/// Initial size of the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_sensitivity() -> f32 {
    1.0
}

fn default_fft_size() -> usize {
    2048
}

fn default_smoothing() -> f32 {
    0.85
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}
