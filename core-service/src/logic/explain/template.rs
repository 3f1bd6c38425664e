//! Deterministic explanations
//!
//! Built only from `verdict.violations`, so the same verdict always renders
//! the same text and it never needs the network.

use async_trait::async_trait;

use crate::constants::ALL_CLEAR_TEXT;
use crate::logic::reading::{SensorKind, SensorReading};
use crate::logic::verdict::{AnomalyVerdict, Violation, ViolationKind};
use crate::logic::vision::VisionVerdict;
use super::types::{ExplainError, ExplanationProvider};

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateProvider;

#[async_trait]
impl ExplanationProvider for TemplateProvider {
    async fn explain(
        &self,
        verdict: &AnomalyVerdict,
        _reading: &SensorReading,
    ) -> Result<String, ExplainError> {
        Ok(render(verdict))
    }

    fn name(&self) -> &str {
        "template"
    }
}

/// Render a verdict. Never returns an empty string.
pub fn render(verdict: &AnomalyVerdict) -> String {
    let sentences: Vec<String> = verdict.violations().iter().map(describe_violation).collect();

    match sentences.len() {
        0 if verdict.vision_flagged() => "Visual anomaly detected at the exhibit.".to_string(),
        0 => ALL_CLEAR_TEXT.to_string(),
        1 => sentences[0].clone(),
        _ => format!("Multiple issues detected: {}", sentences.join(" | ")),
    }
}

/// e.g. "Temperature 26.5°C exceeds maximum 24.0°C by 2.5°C"
pub fn describe_violation(v: &Violation) -> String {
    let label = v.sensor_type.label();
    let value = fmt_value(v.sensor_type, v.value);
    let threshold = fmt_value(v.sensor_type, v.threshold_breached);
    let diff = fmt_value(v.sensor_type, v.overshoot());

    match v.kind {
        ViolationKind::AboveMax => format!("{} {} exceeds maximum {} by {}", label, value, threshold, diff),
        ViolationKind::BelowMin => format!("{} {} is below minimum {} by {}", label, value, threshold, diff),
        ViolationKind::Trend => format!(
            "{} {} departs from its recent trend (expected within {})",
            label, value, threshold
        ),
    }
}

/// Text for a vision-path verdict
pub fn describe_vision(vision: &VisionVerdict) -> String {
    if vision.anomaly_detected {
        let labels: Vec<String> = vision
            .matched
            .iter()
            .map(|d| format!("{} ({:.0}% confidence)", d.label, d.confidence * 100.0))
            .collect();
        format!("Visual anomaly detected: {}", labels.join(", "))
    } else {
        format!("No visual anomaly ({})", vision.status)
    }
}

fn fmt_value(kind: SensorKind, value: f64) -> String {
    match kind {
        SensorKind::Vibration => format!("{:.2}{}", value, kind.unit()),
        _ => format!("{:.1}{}", value, kind.unit()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeverityBands;
    use crate::logic::vision::Detection;
    use chrono::Utc;

    fn verdict(violations: Vec<Violation>) -> AnomalyVerdict {
        AnomalyVerdict::from_violations(1, Utc::now(), violations, &SeverityBands::default())
    }

    fn above(kind: SensorKind, value: f64, max: f64) -> Violation {
        Violation {
            sensor_type: kind,
            kind: ViolationKind::AboveMax,
            value,
            threshold_breached: max,
            magnitude: 0.4,
        }
    }

    #[test]
    fn test_temperature_sentence() {
        let text = render(&verdict(vec![above(SensorKind::Temperature, 26.5, 24.0)]));
        assert_eq!(text, "Temperature 26.5°C exceeds maximum 24.0°C by 2.5°C");
    }

    #[test]
    fn test_below_min_sentence() {
        let v = Violation {
            sensor_type: SensorKind::Humidity,
            kind: ViolationKind::BelowMin,
            value: 35.0,
            threshold_breached: 40.0,
            magnitude: 0.25,
        };
        assert_eq!(describe_violation(&v), "Humidity 35.0% is below minimum 40.0% by 5.0%");
    }

    #[test]
    fn test_multiple_sentences() {
        let text = render(&verdict(vec![
            above(SensorKind::Temperature, 26.5, 24.0),
            above(SensorKind::Vibration, 0.8, 0.5),
        ]));
        assert!(text.starts_with("Multiple issues detected: "));
        assert!(text.contains("Vibration 0.80 exceeds maximum 0.50 by 0.30"));
    }

    #[test]
    fn test_all_clear() {
        assert_eq!(render(&verdict(Vec::new())), ALL_CLEAR_TEXT);
    }

    #[test]
    fn test_deterministic() {
        let v = verdict(vec![above(SensorKind::Humidity, 75.0, 60.0)]);
        assert_eq!(render(&v), render(&v.clone()));
    }

    #[test]
    fn test_vision_text() {
        let vision = VisionVerdict {
            anomaly_detected: true,
            matched: vec![Detection::new("person", 0.9)],
            status: "anomaly: person (0.90)".to_string(),
        };
        assert_eq!(describe_vision(&vision), "Visual anomaly detected: person (90% confidence)");

        let flagged = AnomalyVerdict::from_vision(1, &vision, &SeverityBands::default());
        assert!(!render(&flagged).is_empty());
    }
}
