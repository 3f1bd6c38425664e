use chrono::{Local, Timelike};

use super::types::{Detection, VisionRuleSet, VisionVerdict};

/// Decide at the current local hour
pub fn decide(detections: &[Detection], rules: &VisionRuleSet) -> VisionVerdict {
    decide_at(detections, rules, Local::now().hour())
}

/// Keep detections at or above the confidence floor whose label matches an
/// active rule. Matching is boolean: several hits do not raise severity.
///
/// An `after_hours_only` rule is active when the hour falls outside the
/// opening hours; with no opening hours configured it is always active.
pub fn decide_at(detections: &[Detection], rules: &VisionRuleSet, hour: u32) -> VisionVerdict {
    let is_open = rules.opening_hours.map_or(false, |h| h.is_open(hour));

    let matched: Vec<Detection> = detections
        .iter()
        .filter(|d| d.confidence >= rules.confidence_floor)
        .filter(|d| {
            rules.rules.iter().any(|rule| {
                rule.label.eq_ignore_ascii_case(d.label.trim()) && !(rule.after_hours_only && is_open)
            })
        })
        .cloned()
        .collect();

    let status = if !matched.is_empty() {
        let labels: Vec<String> = matched
            .iter()
            .map(|d| format!("{} ({:.2})", d.label, d.confidence))
            .collect();
        format!("anomaly: {}", labels.join(", "))
    } else if detections.is_empty() {
        "no detections".to_string()
    } else {
        "clear".to_string()
    };

    if !matched.is_empty() {
        log::debug!("Vision anomaly at hour {}: {}", hour, status);
    }

    VisionVerdict {
        anomaly_detected: !matched.is_empty(),
        matched,
        status,
    }
}
