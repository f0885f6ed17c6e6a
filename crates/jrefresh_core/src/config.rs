//! Refresh controller configuration
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! damping_ratio = 0.45
//! min_trigger_distance = 100.0
//! max_over_pull = 50.0
//! animate_to_start_ms = 200
//! animate_to_trigger_ms = 200
//! touch_slop = 8.0
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Tunables for the pull gesture and its snaps
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RefreshConfig {
    /// Fraction of raw pointer/scroll delta converted into visible offset
    #[serde(default = "default_damping_ratio")]
    pub damping_ratio: f32,
    /// Lower bound for the trigger distance when the header is short
    #[serde(default = "default_min_trigger_distance")]
    pub min_trigger_distance: f32,
    /// Extra distance beyond the trigger the user may still drag
    #[serde(default = "default_max_over_pull")]
    pub max_over_pull: f32,
    /// Duration of the snap back to offset 0
    #[serde(default = "default_snap_ms")]
    pub animate_to_start_ms: u32,
    /// Duration of the snap to the trigger position
    #[serde(default = "default_snap_ms")]
    pub animate_to_trigger_ms: u32,
    /// Distance a pointer must travel before a drag is recognized
    #[serde(default = "default_touch_slop")]
    pub touch_slop: f32,
}

fn default_damping_ratio() -> f32 {
    0.45
}

fn default_min_trigger_distance() -> f32 {
    100.0
}

fn default_max_over_pull() -> f32 {
    50.0
}

fn default_snap_ms() -> u32 {
    200
}

fn default_touch_slop() -> f32 {
    8.0
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            damping_ratio: default_damping_ratio(),
            min_trigger_distance: default_min_trigger_distance(),
            max_over_pull: default_max_over_pull(),
            animate_to_start_ms: default_snap_ms(),
            animate_to_trigger_ms: default_snap_ms(),
            touch_slop: default_touch_slop(),
        }
    }
}

impl RefreshConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: RefreshConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!("Loaded refresh config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Check that every value keeps the pull geometry well-formed
    pub fn validate(&self) -> Result<()> {
        if !(self.damping_ratio > 0.0 && self.damping_ratio <= 1.0) {
            return Err(ConfigError::InvalidDampingRatio(self.damping_ratio));
        }
        for (name, value) in [
            ("min_trigger_distance", self.min_trigger_distance),
            ("max_over_pull", self.max_over_pull),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidDistance { name, value });
            }
        }
        if self.animate_to_start_ms == 0 {
            return Err(ConfigError::InvalidDuration("animate_to_start_ms"));
        }
        if self.animate_to_trigger_ms == 0 {
            return Err(ConfigError::InvalidDuration("animate_to_trigger_ms"));
        }
        if !(self.touch_slop.is_finite() && self.touch_slop >= 0.0) {
            return Err(ConfigError::InvalidTouchSlop(self.touch_slop));
        }
        Ok(())
    }

    pub fn with_damping_ratio(mut self, ratio: f32) -> Self {
        self.damping_ratio = ratio;
        self
    }

    pub fn with_min_trigger_distance(mut self, distance: f32) -> Self {
        self.min_trigger_distance = distance;
        self
    }

    pub fn with_max_over_pull(mut self, distance: f32) -> Self {
        self.max_over_pull = distance;
        self
    }

    /// Set both snap durations
    pub fn with_snap_duration(mut self, ms: u32) -> Self {
        self.animate_to_start_ms = ms;
        self.animate_to_trigger_ms = ms;
        self
    }

    pub fn with_touch_slop(mut self, slop: f32) -> Self {
        self.touch_slop = slop;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = RefreshConfig::from_toml_str("").unwrap();
        assert_eq!(config, RefreshConfig::default());
        assert_eq!(config.damping_ratio, 0.45);
        assert_eq!(config.animate_to_trigger_ms, 200);
    }

    #[test]
    fn test_partial_override() {
        let config = RefreshConfig::from_toml_str(
            r#"
            min_trigger_distance = 64.0
            animate_to_start_ms = 300
            "#,
        )
        .unwrap();

        assert_eq!(config.min_trigger_distance, 64.0);
        assert_eq!(config.animate_to_start_ms, 300);
        assert_eq!(config.animate_to_trigger_ms, 200);
        assert_eq!(config.max_over_pull, 50.0);
    }

    #[test]
    fn test_rejects_bad_damping() {
        let err = RefreshConfig::from_toml_str("damping_ratio = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDampingRatio(_)));

        let err = RefreshConfig::default()
            .with_damping_ratio(1.5)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDampingRatio(_)));
    }

    #[test]
    fn test_rejects_bad_distances_and_durations() {
        let err = RefreshConfig::default()
            .with_max_over_pull(0.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDistance {
                name: "max_over_pull",
                ..
            }
        ));

        let err = RefreshConfig::default()
            .with_snap_duration(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration(_)));

        let err = RefreshConfig::default()
            .with_touch_slop(-1.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTouchSlop(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = RefreshConfig::from_toml_str("damping_ratio = \"high\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
