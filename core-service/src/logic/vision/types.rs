//! Vision Types
//!
//! Data structures only - no decision logic.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CONFIDENCE_FLOOR;
use crate::error::EngineError;

// ============================================================================
// DETECTIONS (from the classifier)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    /// Dimensionless score in [0, 1]; not treated as a calibrated probability
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
            bounding_box: None,
        }
    }

    pub fn with_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    /// Caller-supplied detections must carry a finite confidence in [0, 1]
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.confidence.is_finite() && (0.0..=1.0).contains(&self.confidence)) {
            return Err(EngineError::invalid(
                "confidence",
                format!("must be within 0-1, got {} for '{}'", self.confidence, self.label),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// RULES
// ============================================================================

/// Local opening hours, `[open, close)`. `close < open` wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub open_hour: u32,
    pub close_hour: u32,
}

impl OpeningHours {
    pub fn new(open_hour: u32, close_hour: u32) -> Result<Self, EngineError> {
        if open_hour > 23 || close_hour > 24 {
            return Err(EngineError::config(format!(
                "opening hours out of range: {}-{}",
                open_hour, close_hour
            )));
        }
        Ok(Self { open_hour, close_hour })
    }

    pub fn is_open(&self, hour: u32) -> bool {
        if self.open_hour <= self.close_hour {
            hour >= self.open_hour && hour < self.close_hour
        } else {
            hour >= self.open_hour || hour < self.close_hour
        }
    }
}

impl FromStr for OpeningHours {
    type Err = EngineError;

    /// Parses `"9-17"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (open, close) = s
            .split_once('-')
            .ok_or_else(|| EngineError::config(format!("opening hours must look like 9-17, got {:?}", s)))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| EngineError::config(format!("invalid hour {:?} in opening hours", part)))
        };
        OpeningHours::new(parse(open)?, parse(close)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionRule {
    pub label: String,
    /// Only anomalous outside opening hours (e.g. visitors after closing)
    #[serde(default)]
    pub after_hours_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionRuleSet {
    pub rules: Vec<VisionRule>,
    #[serde(default = "default_floor")]
    pub confidence_floor: f64,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
}

fn default_floor() -> f64 {
    DEFAULT_CONFIDENCE_FLOOR
}

impl Default for VisionRuleSet {
    fn default() -> Self {
        Self {
            rules: vec![VisionRule {
                label: "person".to_string(),
                after_hours_only: false,
            }],
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            opening_hours: None,
        }
    }
}

impl VisionRuleSet {
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            opening_hours: None,
        }
    }

    pub fn flag(mut self, label: impl Into<String>) -> Self {
        self.rules.push(VisionRule {
            label: label.into(),
            after_hours_only: false,
        });
        self
    }

    pub fn flag_after_hours(mut self, label: impl Into<String>) -> Self {
        self.rules.push(VisionRule {
            label: label.into(),
            after_hours_only: true,
        });
        self
    }

    pub fn with_floor(mut self, confidence_floor: f64) -> Self {
        self.confidence_floor = confidence_floor;
        self
    }

    pub fn with_opening_hours(mut self, hours: OpeningHours) -> Self {
        self.opening_hours = Some(hours);
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(EngineError::config(format!(
                "confidence_floor must be within 0-1, got {}",
                self.confidence_floor
            )));
        }
        if self.rules.iter().any(|r| r.label.trim().is_empty()) {
            return Err(EngineError::config("vision rule labels cannot be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// VERDICT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisionVerdict {
    pub anomaly_detected: bool,
    pub matched: Vec<Detection>,
    pub status: String,
}
