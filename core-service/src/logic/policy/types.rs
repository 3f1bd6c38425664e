use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{EngineError, Result};
use crate::logic::reading::{ExhibitId, SensorKind};
use super::validate::validate_bounds;

// ============================================================================
// THRESHOLD POLICY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolicyConfig", into = "PolicyConfig")]
pub struct ThresholdPolicy {
    exhibit_id: ExhibitId,
    temperature_min: f64,
    temperature_max: f64,
    humidity_min: f64,
    humidity_max: f64,
    vibration_max: f64,
}

impl ThresholdPolicy {
    pub fn new(
        exhibit_id: ExhibitId,
        temperature: (f64, f64),
        humidity: (f64, f64),
        vibration_max: f64,
    ) -> Result<Self> {
        let policy = Self {
            exhibit_id,
            temperature_min: temperature.0,
            temperature_max: temperature.1,
            humidity_min: humidity.0,
            humidity_max: humidity.1,
            vibration_max,
        };
        validate_bounds(&policy)?;
        Ok(policy)
    }

    /// Conservation defaults for exhibits without an explicit policy
    pub fn default_for(exhibit_id: ExhibitId) -> Self {
        Self {
            exhibit_id,
            temperature_min: constants::DEFAULT_TEMPERATURE_MIN,
            temperature_max: constants::DEFAULT_TEMPERATURE_MAX,
            humidity_min: constants::DEFAULT_HUMIDITY_MIN,
            humidity_max: constants::DEFAULT_HUMIDITY_MAX,
            vibration_max: constants::DEFAULT_VIBRATION_MAX,
        }
    }

    pub fn exhibit_id(&self) -> ExhibitId {
        self.exhibit_id
    }

    pub fn temperature_min(&self) -> f64 {
        self.temperature_min
    }

    pub fn temperature_max(&self) -> f64 {
        self.temperature_max
    }

    pub fn humidity_min(&self) -> f64 {
        self.humidity_min
    }

    pub fn humidity_max(&self) -> f64 {
        self.humidity_max
    }

    pub fn vibration_max(&self) -> f64 {
        self.vibration_max
    }

    /// Same bounds, rebound to another exhibit
    pub fn for_exhibit(mut self, exhibit_id: ExhibitId) -> Self {
        self.exhibit_id = exhibit_id;
        self
    }

    /// Bounds for one sensor. Vibration is max-only.
    pub fn bounds(&self, kind: SensorKind) -> SensorBounds {
        match kind {
            SensorKind::Temperature => SensorBounds {
                min: Some(self.temperature_min),
                max: self.temperature_max,
            },
            SensorKind::Humidity => SensorBounds {
                min: Some(self.humidity_min),
                max: self.humidity_max,
            },
            SensorKind::Vibration => SensorBounds {
                min: None,
                max: self.vibration_max,
            },
        }
    }

    /// Apply a partial update; unset fields keep their current value
    pub fn apply(&self, update: &PolicyConfig) -> Result<Self> {
        PolicyConfig {
            exhibit_id: update.exhibit_id.or(Some(self.exhibit_id)),
            temperature_min: update.temperature_min.or(Some(self.temperature_min)),
            temperature_max: update.temperature_max.or(Some(self.temperature_max)),
            humidity_min: update.humidity_min.or(Some(self.humidity_min)),
            humidity_max: update.humidity_max.or(Some(self.humidity_max)),
            vibration_max: update.vibration_max.or(Some(self.vibration_max)),
        }
        .try_into()
    }
}

// ============================================================================
// SENSOR BOUNDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorBounds {
    pub min: Option<f64>,
    pub max: f64,
}

impl SensorBounds {
    /// Width of the safe band; for max-only sensors the band starts at zero
    pub fn range(&self) -> f64 {
        match self.min {
            Some(min) => self.max - min,
            None => self.max,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value <= self.max && self.min.map_or(true, |min| value >= min)
    }
}

// ============================================================================
// WIRE FORM
// ============================================================================

/// Loose policy shape as stored by exhibit management. Missing values fall
/// back to the conservation defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exhibit_id: Option<ExhibitId>,
    #[serde(default)]
    pub temperature_min: Option<f64>,
    #[serde(default)]
    pub temperature_max: Option<f64>,
    #[serde(default)]
    pub humidity_min: Option<f64>,
    #[serde(default)]
    pub humidity_max: Option<f64>,
    #[serde(default)]
    pub vibration_max: Option<f64>,
}

impl TryFrom<PolicyConfig> for ThresholdPolicy {
    type Error = EngineError;

    fn try_from(raw: PolicyConfig) -> Result<Self> {
        let defaults = ThresholdPolicy::default_for(raw.exhibit_id.unwrap_or_default());
        let policy = ThresholdPolicy {
            exhibit_id: defaults.exhibit_id,
            temperature_min: raw.temperature_min.unwrap_or(defaults.temperature_min),
            temperature_max: raw.temperature_max.unwrap_or(defaults.temperature_max),
            humidity_min: raw.humidity_min.unwrap_or(defaults.humidity_min),
            humidity_max: raw.humidity_max.unwrap_or(defaults.humidity_max),
            vibration_max: raw.vibration_max.unwrap_or(defaults.vibration_max),
        };
        validate_bounds(&policy)?;
        Ok(policy)
    }
}

impl From<ThresholdPolicy> for PolicyConfig {
    fn from(p: ThresholdPolicy) -> Self {
        Self {
            exhibit_id: Some(p.exhibit_id),
            temperature_min: Some(p.temperature_min),
            temperature_max: Some(p.temperature_max),
            humidity_min: Some(p.humidity_min),
            humidity_max: Some(p.humidity_max),
            vibration_max: Some(p.vibration_max),
        }
    }
}
