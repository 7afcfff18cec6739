//! Configuration management
//!
//! Defaults match the tuned constants; a TOML file and CLI flags may
//! override any of them.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    gesture::DEFAULT_FINGER_MARGIN,
    pipeline::{
        dispatcher::{Key, KeyBindings},
        stability::{DEFAULT_CONSISTENCY_THRESHOLD, DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE},
    },
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub filter: FilterConfig,
    pub classifier: ClassifierConfig,
    pub session: SessionConfig,
    pub keys: KeyBindings,
}

/// Stability filter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Number of recent frames voted over
    pub window_size: usize,
    /// Fraction of the window the winning label must hold
    pub consistency_threshold: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Normalized distance a fingertip must clear past its pip joint
    pub finger_margin: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds after start during which no action is dispatched
    pub calibration_secs: f32,
    /// Fixed delay between frames (0 = no pacing)
    pub frame_interval_ms: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            consistency_threshold: DEFAULT_CONSISTENCY_THRESHOLD,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            finger_margin: DEFAULT_FINGER_MARGIN,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            calibration_secs: 2.0,
            frame_interval_ms: 30,
        }
    }
}

impl SessionConfig {
    pub fn calibration(&self) -> Duration {
        Duration::try_from_secs_f32(self.calibration_secs).unwrap_or(Duration::ZERO)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Per-field overrides, typically from the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub window_size: Option<usize>,
    pub consistency_threshold: Option<f32>,
    pub finger_margin: Option<f32>,
    pub calibration_secs: Option<f32>,
    pub frame_interval_ms: Option<u64>,
    pub next_key: Option<Key>,
    pub prev_key: Option<Key>,
    pub home_key: Option<Key>,
    pub end_key: Option<Key>,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let window_size = self.filter.window_size;
        if window_size == 0 || window_size > MAX_WINDOW_SIZE {
            return Err(ConfigError::Invalid(format!(
                "window_size must be in 1..={MAX_WINDOW_SIZE}, got {window_size}"
            )));
        }
        let threshold = self.filter.consistency_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "consistency_threshold must be in (0, 1], got {threshold}"
            )));
        }
        let margin = self.classifier.finger_margin;
        if !margin.is_finite() || margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "finger_margin must be >= 0, got {margin}"
            )));
        }
        let calibration = self.session.calibration_secs;
        if !calibration.is_finite() || calibration < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "calibration_secs must be >= 0, got {calibration}"
            )));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the optional file, then the overrides.
    pub fn resolve(path: Option<&PathBuf>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(window_size) = overrides.window_size {
            self.filter.window_size = window_size;
        }
        if let Some(threshold) = overrides.consistency_threshold {
            self.filter.consistency_threshold = threshold;
        }
        if let Some(margin) = overrides.finger_margin {
            self.classifier.finger_margin = margin;
        }
        if let Some(calibration) = overrides.calibration_secs {
            self.session.calibration_secs = calibration;
        }
        if let Some(interval) = overrides.frame_interval_ms {
            self.session.frame_interval_ms = interval;
        }
        if let Some(key) = overrides.next_key {
            self.keys.next = key;
        }
        if let Some(key) = overrides.prev_key {
            self.keys.prev = key;
        }
        if let Some(key) = overrides.home_key {
            self.keys.home = key;
        }
        if let Some(key) = overrides.end_key {
            self.keys.end = key;
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
