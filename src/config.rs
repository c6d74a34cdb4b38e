use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid beam {0}, must be positive and finite")]
    InvalidBeam(f32),
    #[error("Invalid acoustic scale {0}, must be non-negative and finite")]
    InvalidAcousticScale(f32),
    #[error("max_active must be at least 1")]
    InvalidMaxActive,
    #[error("Feature dimension mismatch: model expects {expected}, got {actual}")]
    FeatureDim { expected: usize, actual: usize },
}

/// Recognized decoding options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Pruning margin: tokens costlier than best + beam are dropped.
    pub beam: f32,
    /// Global multiplier on acoustic costs, applied once in the scorer.
    pub acoustic_scale: f32,
    /// Hard cap on surviving tokens per frame, applied after beam pruning.
    pub max_active: usize,
    /// Decode backwards in time; requires a graph built over the
    /// reversed language model.
    pub time_reversed: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            beam: 16.0,
            acoustic_scale: 0.1,
            max_active: usize::MAX,
            time_reversed: false,
        }
    }
}

impl DecoderConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides("DECODE_");
        config
    }

    fn apply_env_overrides(&mut self, prefix: &str) {
        let parse_env = |suffix: &str| std::env::var(format!("{prefix}{suffix}")).ok();
        let apply = |suffix: &str, target: &mut f32| {
            if let Some(v) = parse_env(suffix).and_then(|s| s.parse().ok()) {
                *target = v;
            }
        };

        apply("BEAM", &mut self.beam);
        apply("ACOUSTIC_SCALE", &mut self.acoustic_scale);

        if let Some(v) = parse_env("MAX_ACTIVE").and_then(|s| s.parse::<usize>().ok()) {
            self.max_active = v.max(1);
        }
        if let Some(v) = parse_env("TIME_REVERSED").and_then(|s| s.parse::<bool>().ok()) {
            self.time_reversed = v;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.beam.is_finite() || self.beam <= 0.0 {
            return Err(ConfigError::InvalidBeam(self.beam));
        }
        if !self.acoustic_scale.is_finite() || self.acoustic_scale < 0.0 {
            return Err(ConfigError::InvalidAcousticScale(self.acoustic_scale));
        }
        if self.max_active == 0 {
            return Err(ConfigError::InvalidMaxActive);
        }
        Ok(())
    }
}
