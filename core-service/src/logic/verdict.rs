//! Anomaly Verdict
//!
//! The single output shape for sensor and vision evaluation. A verdict is a
//! value object: it is fully determined by what it was built from, and the
//! only way to "change" one is `with_explanation`, which yields a new value.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SeverityBands;
use crate::logic::reading::{ExhibitId, SensorKind};
use crate::logic::vision::VisionVerdict;

// ============================================================================
// SEVERITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Bucket a score in [0, 1]. Upper bounds are inclusive.
    pub fn from_score(score: f64, bands: &SeverityBands) -> Self {
        if score <= 0.0 {
            Severity::None
        } else if score <= bands.low {
            Severity::Low
        } else if score <= bands.medium {
            Severity::Medium
        } else if score <= bands.high {
            Severity::High
        } else {
            Severity::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// VIOLATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    AboveMax,
    BelowMin,
    /// Soft signal from the rolling deviation check
    Trend,
}

impl ViolationKind {
    pub fn is_hard(&self) -> bool {
        !matches!(self, ViolationKind::Trend)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub sensor_type: SensorKind,
    pub kind: ViolationKind,
    pub value: f64,
    /// Policy boundary, or the trend band edge for trend violations
    pub threshold_breached: f64,
    /// Normalized overshoot, >= 0
    pub magnitude: f64,
}

impl Violation {
    /// Absolute distance between the value and the breached threshold
    pub fn overshoot(&self) -> f64 {
        (self.value - self.threshold_breached).abs()
    }
}

// ============================================================================
// VERDICT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyVerdict {
    exhibit_id: ExhibitId,
    evaluated_at: DateTime<Utc>,
    is_anomaly: bool,
    severity: Severity,
    violations: Vec<Violation>,
    score: f64,
    explanation: Option<String>,
    vision_flagged: bool,
}

impl AnomalyVerdict {
    /// Aggregate violations into a scored verdict.
    ///
    /// A trend violation on a sensor that also breached a hard bound stays in
    /// the list but does not enter the score.
    pub fn from_violations(
        exhibit_id: ExhibitId,
        evaluated_at: DateTime<Utc>,
        violations: Vec<Violation>,
        bands: &SeverityBands,
    ) -> Self {
        let hard_sensors: HashSet<SensorKind> = violations
            .iter()
            .filter(|v| v.kind.is_hard())
            .map(|v| v.sensor_type)
            .collect();

        let score = violations
            .iter()
            .filter(|v| v.kind.is_hard() || !hard_sensors.contains(&v.sensor_type))
            .map(|v| v.magnitude.max(0.0))
            .fold(0.0_f64, f64::max)
            .min(1.0);

        Self {
            exhibit_id,
            evaluated_at,
            is_anomaly: score > 0.0,
            severity: Severity::from_score(score, bands),
            violations,
            score,
            explanation: None,
            vision_flagged: false,
        }
    }

    /// Vision path: no sensor violations, score is the strongest match
    pub fn from_vision(exhibit_id: ExhibitId, vision: &VisionVerdict, bands: &SeverityBands) -> Self {
        let score = if vision.anomaly_detected {
            vision
                .matched
                .iter()
                .map(|d| d.confidence)
                .fold(0.0_f64, f64::max)
                .clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            exhibit_id,
            evaluated_at: Utc::now(),
            is_anomaly: vision.anomaly_detected,
            severity: Severity::from_score(score, bands),
            violations: Vec::new(),
            score,
            explanation: None,
            vision_flagged: vision.anomaly_detected,
        }
    }

    pub fn with_explanation(self, explanation: impl Into<String>) -> Self {
        Self {
            explanation: Some(explanation.into()),
            ..self
        }
    }

    pub fn exhibit_id(&self) -> ExhibitId {
        self.exhibit_id
    }

    pub fn evaluated_at(&self) -> DateTime<Utc> {
        self.evaluated_at
    }

    pub fn is_anomaly(&self) -> bool {
        self.is_anomaly
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    pub fn vision_flagged(&self) -> bool {
        self.vision_flagged
    }

    pub fn violations_for(&self, kind: SensorKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.sensor_type == kind)
    }

    /// Distinct sensors in violation order
    pub fn affected_sensors(&self) -> Vec<SensorKind> {
        let mut seen = Vec::new();
        for v in &self.violations {
            if !seen.contains(&v.sensor_type) {
                seen.push(v.sensor_type);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(sensor_type: SensorKind, kind: ViolationKind, magnitude: f64) -> Violation {
        Violation {
            sensor_type,
            kind,
            value: 0.0,
            threshold_breached: 0.0,
            magnitude,
        }
    }

    #[test]
    fn test_severity_buckets() {
        let bands = SeverityBands::default();
        assert_eq!(Severity::from_score(0.0, &bands), Severity::None);
        assert_eq!(Severity::from_score(0.01, &bands), Severity::Low);
        assert_eq!(Severity::from_score(0.25, &bands), Severity::Low);
        assert_eq!(Severity::from_score(0.26, &bands), Severity::Medium);
        assert_eq!(Severity::from_score(0.5, &bands), Severity::Medium);
        assert_eq!(Severity::from_score(0.8, &bands), Severity::High);
        assert_eq!(Severity::from_score(0.81, &bands), Severity::Critical);
        assert_eq!(Severity::from_score(1.0, &bands), Severity::Critical);
    }

    #[test]
    fn test_severity_non_decreasing() {
        let bands = SeverityBands::default();
        let mut previous = Severity::None;
        for i in 0..=1000 {
            let s = Severity::from_score(i as f64 / 1000.0, &bands);
            assert!(s >= previous);
            previous = s;
        }
    }

    #[test]
    fn test_score_clamped() {
        let v = AnomalyVerdict::from_violations(
            1,
            Utc::now(),
            vec![violation(SensorKind::Vibration, ViolationKind::AboveMax, 4.2)],
            &SeverityBands::default(),
        );
        assert_eq!(v.score(), 1.0);
        assert_eq!(v.severity(), Severity::Critical);
    }

    #[test]
    fn test_hard_violation_is_rule_of_record() {
        let v = AnomalyVerdict::from_violations(
            1,
            Utc::now(),
            vec![
                violation(SensorKind::Temperature, ViolationKind::AboveMax, 0.1),
                violation(SensorKind::Temperature, ViolationKind::Trend, 0.9),
            ],
            &SeverityBands::default(),
        );
        assert_eq!(v.violations().len(), 2);
        assert_eq!(v.score(), 0.1);
        assert_eq!(v.severity(), Severity::Low);
    }

    #[test]
    fn test_trend_counts_without_hard_breach() {
        let v = AnomalyVerdict::from_violations(
            1,
            Utc::now(),
            vec![violation(SensorKind::Humidity, ViolationKind::Trend, 0.3)],
            &SeverityBands::default(),
        );
        assert!(v.is_anomaly());
        assert_eq!(v.severity(), Severity::Medium);
    }

    #[test]
    fn test_with_explanation_keeps_verdict() {
        let v = AnomalyVerdict::from_violations(
            1,
            Utc::now(),
            vec![violation(SensorKind::Temperature, ViolationKind::BelowMin, 0.4)],
            &SeverityBands::default(),
        );
        let explained = v.clone().with_explanation("cold");
        assert_eq!(explained.explanation(), Some("cold"));
        assert_eq!(explained.score(), v.score());
        assert_eq!(explained.severity(), v.severity());
        assert_eq!(explained.is_anomaly(), v.is_anomaly());
    }

    #[test]
    fn test_affected_sensors_distinct() {
        let v = AnomalyVerdict::from_violations(
            1,
            Utc::now(),
            vec![
                violation(SensorKind::Humidity, ViolationKind::AboveMax, 0.2),
                violation(SensorKind::Humidity, ViolationKind::Trend, 0.2),
                violation(SensorKind::Vibration, ViolationKind::AboveMax, 0.2),
            ],
            &SeverityBands::default(),
        );
        assert_eq!(
            v.affected_sensors(),
            vec![SensorKind::Humidity, SensorKind::Vibration]
        );
    }
}
