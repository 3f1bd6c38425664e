//! Single-sensor rules
//!
//! Per-sensor checks only. Aggregation lives in `AnomalyVerdict`.

use crate::config::TrendConfig;
use crate::constants::EPSILON;
use crate::logic::policy::SensorBounds;
use crate::logic::reading::SensorKind;
use crate::logic::trend::HistoryWindow;
use crate::logic::verdict::{Violation, ViolationKind};

/// Hard threshold check.
///
/// Magnitude is the overshoot normalized by the width of the safe band, so
/// temperature (°C) and vibration (fractions of a unit) compare directly.
pub fn check_bounds(kind: SensorKind, value: f64, bounds: SensorBounds) -> Option<Violation> {
    let range = bounds.range().max(EPSILON);

    let (boundary, violation_kind) = if value > bounds.max {
        (bounds.max, ViolationKind::AboveMax)
    } else {
        match bounds.min {
            Some(min) if value < min => (min, ViolationKind::BelowMin),
            _ => return None,
        }
    };

    Some(Violation {
        sensor_type: kind,
        kind: violation_kind,
        value,
        threshold_breached: boundary,
        magnitude: ((value - boundary).abs() / range).max(0.0),
    })
}

/// Deviation check against the samples that preceded `value`.
///
/// Skipped (returns `None`) when the window has fewer than `min_samples`
/// values or its standard deviation is at or below `min_stddev`: a flat
/// history carries no information about spread.
///
/// The deviation is measured against `max(stddev, band * min_stddev_fraction)`
/// where `band` is the width of the policy range, so a history that is much
/// tighter than the band cannot turn a tenth of a degree into a violation.
pub fn check_trend(
    kind: SensorKind,
    value: f64,
    window: &HistoryWindow,
    bounds: SensorBounds,
    config: &TrendConfig,
) -> Option<Violation> {
    if window.sample_count() < config.min_samples {
        return None;
    }

    let mean = window.mean()?;
    let stddev = window.stddev()?;
    if stddev <= config.min_stddev.max(EPSILON) {
        log::trace!("{} trend skipped: stddev {:.3e} below floor", kind, stddev);
        return None;
    }
    let spread = stddev.max(bounds.range() * config.min_stddev_fraction);

    let deviation = (value - mean).abs() / spread;
    if deviation <= config.deviation_multiple {
        return None;
    }

    let band = config.deviation_multiple * spread;
    let edge = if value > mean { mean + band } else { mean - band };

    Some(Violation {
        sensor_type: kind,
        kind: ViolationKind::Trend,
        value,
        threshold_breached: edge,
        magnitude: (deviation / config.deviation_multiple - 1.0).max(0.0),
    })
}
