//! Sensor Readings
//!
//! Every sensor field is optional: absent means "not measured", which is not
//! the same as zero. Absent fields are never evaluated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, Result};

pub type ExhibitId = u64;

// ============================================================================
// SENSOR KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Temperature,
    Humidity,
    Vibration,
}

impl SensorKind {
    pub const ALL: [SensorKind; 3] = [
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::Vibration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Humidity => "humidity",
            SensorKind::Vibration => "vibration",
        }
    }

    /// Capitalized name for human-facing text
    pub fn label(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "Temperature",
            SensorKind::Humidity => "Humidity",
            SensorKind::Vibration => "Vibration",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "°C",
            SensorKind::Humidity => "%",
            SensorKind::Vibration => "",
        }
    }

    /// Field name inside a reading payload
    pub fn field(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature_c",
            SensorKind::Humidity => "humidity_pct",
            SensorKind::Vibration => "vibration",
        }
    }

    /// Older payloads (device firmware, the first dashboard) use these names
    fn legacy_field(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Humidity => "humidity",
            SensorKind::Vibration => "vibration_value",
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SENSOR READING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub exhibit_id: ExhibitId,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibration: Option<f64>,
}

impl SensorReading {
    /// Empty reading stamped now
    pub fn new(exhibit_id: ExhibitId) -> Self {
        Self {
            exhibit_id,
            timestamp: Utc::now(),
            temperature_c: None,
            humidity_pct: None,
            vibration: None,
        }
    }

    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature_c = Some(celsius);
        self
    }

    pub fn with_humidity(mut self, percent: f64) -> Self {
        self.humidity_pct = Some(percent);
        self
    }

    pub fn with_vibration(mut self, value: f64) -> Self {
        self.vibration = Some(value);
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn value(&self, kind: SensorKind) -> Option<f64> {
        match kind {
            SensorKind::Temperature => self.temperature_c,
            SensorKind::Humidity => self.humidity_pct,
            SensorKind::Vibration => self.vibration,
        }
    }

    /// Present fields in fixed sensor order
    pub fn present(&self) -> impl Iterator<Item = (SensorKind, f64)> + '_ {
        SensorKind::ALL
            .into_iter()
            .filter_map(move |kind| self.value(kind).map(|v| (kind, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    /// Domain checks run before evaluation
    pub fn validate(&self) -> Result<()> {
        for (kind, value) in self.present() {
            if !value.is_finite() {
                return Err(EngineError::invalid(kind.field(), "must be a finite number"));
            }
            match kind {
                SensorKind::Humidity if !(0.0..=100.0).contains(&value) => {
                    return Err(EngineError::invalid(
                        kind.field(),
                        format!("relative humidity must be within 0-100, got {}", value),
                    ));
                }
                SensorKind::Vibration if value < 0.0 => {
                    return Err(EngineError::invalid(
                        kind.field(),
                        format!("vibration cannot be negative, got {}", value),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Build a reading from an untyped JSON payload with field-level errors.
    ///
    /// `exhibit_id` is taken from the payload unless the caller already knows
    /// it (e.g. from the request path). A missing timestamp means "now".
    pub fn from_json(payload: &Value, exhibit_id: Option<ExhibitId>) -> Result<Self> {
        let obj = payload
            .as_object()
            .ok_or_else(|| EngineError::invalid("body", "reading must be a JSON object"))?;

        let exhibit_id = match exhibit_id {
            Some(id) => id,
            None => match obj.get("exhibit_id") {
                Some(v) => v
                    .as_u64()
                    .ok_or_else(|| EngineError::invalid("exhibit_id", "must be a non-negative integer"))?,
                None => return Err(EngineError::invalid("exhibit_id", "is required")),
            },
        };

        let timestamp = match obj.get("timestamp") {
            None | Some(Value::Null) => Utc::now(),
            Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| EngineError::invalid("timestamp", format!("not RFC 3339: {}", e)))?,
            Some(_) => return Err(EngineError::invalid("timestamp", "must be an RFC 3339 string")),
        };

        let mut reading = SensorReading {
            exhibit_id,
            timestamp,
            temperature_c: None,
            humidity_pct: None,
            vibration: None,
        };

        for kind in SensorKind::ALL {
            let raw = obj.get(kind.field()).or_else(|| obj.get(kind.legacy_field()));
            let value = match raw {
                None | Some(Value::Null) => None,
                Some(Value::Number(n)) => n.as_f64(),
                Some(other) => {
                    return Err(EngineError::invalid(
                        kind.field(),
                        format!("must be a number, got {}", json_type(other)),
                    ))
                }
            };
            match kind {
                SensorKind::Temperature => reading.temperature_c = value,
                SensorKind::Humidity => reading.humidity_pct = value,
                SensorKind::Vibration => reading.vibration = value,
            }
        }

        reading.validate()?;
        Ok(reading)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_is_not_zero() {
        let r = SensorReading::new(1).with_vibration(0.0);
        assert_eq!(r.vibration, Some(0.0));
        assert_eq!(r.temperature_c, None);

        let present: Vec<_> = r.present().collect();
        assert_eq!(present, vec![(SensorKind::Vibration, 0.0)]);
    }

    #[test]
    fn test_from_json_partial() {
        let r = SensorReading::from_json(&json!({ "exhibit_id": 4, "humidity_pct": 52.5 }), None).unwrap();
        assert_eq!(r.exhibit_id, 4);
        assert_eq!(r.humidity_pct, Some(52.5));
        assert!(r.temperature_c.is_none());
    }

    #[test]
    fn test_from_json_legacy_names() {
        let r = SensorReading::from_json(
            &json!({ "temperature": 21.0, "humidity": 50.0, "vibration_value": 0.1 }),
            Some(1),
        )
        .unwrap();
        assert_eq!(r.temperature_c, Some(21.0));
        assert_eq!(r.vibration, Some(0.1));
    }

    #[test]
    fn test_from_json_rejects_non_numeric() {
        let err = SensorReading::from_json(&json!({ "temperature_c": "hot" }), Some(1)).unwrap_err();
        match err {
            EngineError::InputValidation { field, message } => {
                assert_eq!(field, "temperature_c");
                assert!(message.contains("string"));
            }
            _ => panic!("Expected InputValidation error"),
        }
    }

    #[test]
    fn test_from_json_requires_exhibit() {
        let err = SensorReading::from_json(&json!({ "temperature_c": 20.0 }), None).unwrap_err();
        assert!(matches!(err, EngineError::InputValidation { ref field, .. } if field == "exhibit_id"));
    }

    #[test]
    fn test_validate_domain() {
        assert!(SensorReading::new(1).with_humidity(120.0).validate().is_err());
        assert!(SensorReading::new(1).with_vibration(-0.1).validate().is_err());
        assert!(SensorReading::new(1).with_temperature(f64::NAN).validate().is_err());
        assert!(SensorReading::new(1).with_temperature(-5.0).validate().is_ok());
    }
}
