#![forbid(unsafe_code)]

//! Tunable parameters for the presentation engine.
//!
//! [`DeckConfig::default()`] reproduces the classic layout: a 2000px grid,
//! a 1000px base perspective, 1s transitions split into two 500ms phases, and
//! a 1s debounce before the URL fragment is rewritten.
//!
//! With the `config` feature the same struct loads from TOML or JSON:
//!
//! ```toml
//! grid_spacing = 1500.0
//! transition_ms = 800
//! phase_delay_ms = 400
//! ```

use core::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct DeckConfig {
    /// Distance between grid cells for steps without explicit coordinates.
    pub grid_spacing: f64,
    /// Container perspective for a step of scale 1, in pixels.
    pub base_perspective_px: f64,
    /// Duration of a camera transition after the first selection.
    pub transition_ms: u64,
    /// Delay of the second animation phase.
    pub phase_delay_ms: u64,
    /// Quiet period before the active step is written to the URL fragment.
    pub fragment_debounce_ms: u64,
    /// Prefix of written fragments; `#/` keeps hosts from scrolling to the id.
    pub fragment_prefix: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            grid_spacing: 2000.0,
            base_perspective_px: 1000.0,
            transition_ms: 1000,
            phase_delay_ms: 500,
            fragment_debounce_ms: 1000,
            fragment_prefix: "#/".to_owned(),
        }
    }
}

impl DeckConfig {
    /// Transition duration.
    #[must_use]
    pub const fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Second-phase delay.
    #[must_use]
    pub const fn phase_delay(&self) -> Duration {
        Duration::from_millis(self.phase_delay_ms)
    }

    /// Fragment write debounce.
    #[must_use]
    pub const fn fragment_debounce(&self) -> Duration {
        Duration::from_millis(self.fragment_debounce_ms)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.grid_spacing.is_finite() {
            errors.push(format!(
                "grid_spacing must be finite, got {}",
                self.grid_spacing
            ));
        }
        if !(self.base_perspective_px.is_finite() && self.base_perspective_px > 0.0) {
            errors.push(format!(
                "base_perspective_px must be finite and > 0, got {}",
                self.base_perspective_px
            ));
        }
        if self.phase_delay_ms > self.transition_ms {
            errors.push(format!(
                "phase_delay_ms ({}) must not exceed transition_ms ({})",
                self.phase_delay_ms, self.transition_ms
            ));
        }
        if !self.fragment_prefix.starts_with('#') {
            errors.push(format!(
                "fragment_prefix must start with '#', got {:?}",
                self.fragment_prefix
            ));
        }
        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }
}

/// Errors from loading a [`DeckConfig`].
#[cfg(feature = "config")]
#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read.
    Io(std::io::Error),
    /// TOML parse failure.
    Toml(toml::de::Error),
    /// JSON parse failure.
    Json(serde_json::Error),
}

#[cfg(feature = "config")]
impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            Self::Toml(e) => write!(f, "config TOML error: {e}"),
            Self::Json(e) => write!(f, "config JSON error: {e}"),
        }
    }
}

#[cfg(feature = "config")]
impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}
