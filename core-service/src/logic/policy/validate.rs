use crate::error::{EngineError, Result};
use crate::logic::reading::SensorKind;
use super::types::ThresholdPolicy;

/// Reject malformed policies instead of correcting them
pub fn validate_bounds(policy: &ThresholdPolicy) -> Result<()> {
    for kind in SensorKind::ALL {
        let bounds = policy.bounds(kind);

        let finite = bounds.max.is_finite() && bounds.min.map_or(true, f64::is_finite);
        if !finite {
            return Err(EngineError::config(format!(
                "exhibit {}: {} bounds must be finite",
                policy.exhibit_id(),
                kind
            )));
        }

        if let Some(min) = bounds.min {
            if min > bounds.max {
                return Err(EngineError::config(format!(
                    "exhibit {}: {}_min ({}) is greater than {}_max ({})",
                    policy.exhibit_id(),
                    kind,
                    min,
                    kind,
                    bounds.max
                )));
            }
        }
    }

    if policy.vibration_max() < 0.0 {
        return Err(EngineError::config(format!(
            "exhibit {}: vibration_max ({}) cannot be negative",
            policy.exhibit_id(),
            policy.vibration_max()
        )));
    }

    Ok(())
}
