//! Engine configuration
//!
//! Trend and severity cut points are defaults, not fixed law: all of them can
//! be overridden from a JSON file or by the embedding server.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{EngineError, Result};

/// Trend analysis settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrendConfig {
    /// Enable the rolling deviation check
    pub enabled: bool,
    /// Ring buffer capacity per (exhibit, sensor)
    pub window_capacity: usize,
    /// Prior samples needed before a deviation is computed
    pub min_samples: usize,
    /// Deviation (σ) above which a trend violation is recorded
    pub deviation_multiple: f64,
    /// Standard deviation floor; at or below it the check is skipped
    pub min_stddev: f64,
    /// Deviation is measured against at least this fraction of the
    /// sensor's policy band
    pub min_stddev_fraction: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_capacity: constants::DEFAULT_WINDOW_CAPACITY,
            min_samples: constants::DEFAULT_MIN_SAMPLES,
            deviation_multiple: constants::DEFAULT_DEVIATION_MULTIPLE,
            min_stddev: constants::DEFAULT_MIN_STDDEV,
            min_stddev_fraction: constants::DEFAULT_MIN_STDDEV_FRACTION,
        }
    }
}

/// Upper bounds (inclusive) of the low/medium/high buckets.
/// Anything above `high` is critical, exactly zero is none.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeverityBands {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for SeverityBands {
    fn default() -> Self {
        Self {
            low: constants::SEVERITY_LOW_MAX,
            medium: constants::SEVERITY_MEDIUM_MAX,
            high: constants::SEVERITY_HIGH_MAX,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub trend: TrendConfig,
    pub severity: SeverityBands,
    pub explanation_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trend: TrendConfig::default(),
            severity: SeverityBands::default(),
            explanation_timeout_ms: constants::DEFAULT_EXPLANATION_TIMEOUT_MS,
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: EngineConfig = serde_json::from_str(&content).map_err(|e| {
            EngineError::config(format!("cannot parse {}: {}", path.display(), e))
        })?;
        config.validate()?;

        log::info!("Engine config loaded from: {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.trend;
        if t.window_capacity == 0 {
            return Err(EngineError::config("trend.window_capacity must be > 0"));
        }
        if t.min_samples < 2 {
            return Err(EngineError::config("trend.min_samples must be >= 2"));
        }
        if t.min_samples > t.window_capacity {
            return Err(EngineError::config(format!(
                "trend.min_samples ({}) exceeds window_capacity ({})",
                t.min_samples, t.window_capacity
            )));
        }
        if !(t.deviation_multiple.is_finite() && t.deviation_multiple > 0.0) {
            return Err(EngineError::config("trend.deviation_multiple must be > 0"));
        }
        if !(t.min_stddev.is_finite() && t.min_stddev >= 0.0) {
            return Err(EngineError::config("trend.min_stddev must be >= 0"));
        }
        if !(0.0..1.0).contains(&t.min_stddev_fraction) {
            return Err(EngineError::config("trend.min_stddev_fraction must be within [0, 1)"));
        }

        let s = &self.severity;
        let ascending = 0.0 < s.low && s.low < s.medium && s.medium < s.high && s.high < 1.0;
        if !ascending {
            return Err(EngineError::config(format!(
                "severity bands must satisfy 0 < low < medium < high < 1 (got {} / {} / {})",
                s.low, s.medium, s.high
            )));
        }

        if self.explanation_timeout_ms == 0 {
            return Err(EngineError::config("explanation_timeout_ms must be > 0"));
        }
        Ok(())
    }

    pub fn explanation_timeout(&self) -> Duration {
        Duration::from_millis(self.explanation_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trend.window_capacity, 20);
        assert_eq!(config.trend.deviation_multiple, 2.5);
        assert_eq!(config.explanation_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_reject_unordered_bands() {
        let config = EngineConfig {
            severity: SeverityBands { low: 0.5, medium: 0.25, high: 0.8 },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_reject_zero_capacity() {
        let mut config = EngineConfig::default();
        config.trend.window_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_stddev_fraction_out_of_range() {
        let mut config = EngineConfig::default();
        assert_eq!(config.trend.min_stddev_fraction, 0.05);

        config.trend.min_stddev_fraction = 1.0;
        assert!(config.validate().is_err());
        config.trend.min_stddev_fraction = -0.1;
        assert!(config.validate().is_err());
        config.trend.min_stddev_fraction = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{ "trend": { "deviation_multiple": 3.0 } }"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.trend.deviation_multiple, 3.0);
        assert_eq!(config.trend.window_capacity, 20);
        assert_eq!(config.severity, SeverityBands::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{ "trend": { "min_samples": 50 } }"#).unwrap();

        let err = EngineConfig::load(&path).unwrap_err();
        assert!(err.is_configuration());
    }
}
