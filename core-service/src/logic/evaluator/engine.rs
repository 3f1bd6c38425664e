use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::logic::policy::ThresholdPolicy;
use crate::logic::reading::SensorReading;
use crate::logic::trend::{ExhibitHistory, HistoryRegistry};
use crate::logic::verdict::AnomalyVerdict;
use super::rules::{check_bounds, check_trend};

// ============================================================================
// MAIN EVALUATION FUNCTION
// ============================================================================

/// Classify one reading against a policy and the exhibit's history.
///
/// Every present value is appended to its history window whether or not it
/// breaches anything. The trend check looks at the window as it was before
/// the current value, so a reading never dilutes its own deviation.
pub fn evaluate(
    reading: &SensorReading,
    policy: &ThresholdPolicy,
    history: &mut ExhibitHistory,
    config: &EngineConfig,
) -> AnomalyVerdict {
    let mut violations = Vec::new();

    for (kind, value) in reading.present() {
        let bounds = policy.bounds(kind);
        if let Some(v) = check_bounds(kind, value, bounds) {
            violations.push(v);
        }

        let window = history.window_mut(kind);
        if config.trend.enabled {
            if let Some(v) = check_trend(kind, value, window, bounds, &config.trend) {
                violations.push(v);
            }
        }
        window.push(value);
    }

    AnomalyVerdict::from_violations(
        reading.exhibit_id,
        reading.timestamp,
        violations,
        &config.severity,
    )
}

// ============================================================================
// EVALUATOR (owns the history registry)
// ============================================================================

pub struct RuleEvaluator {
    config: EngineConfig,
    registry: Arc<HistoryRegistry>,
}

impl RuleEvaluator {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let registry = Arc::new(HistoryRegistry::new(config.trend.window_capacity));
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<HistoryRegistry> {
        &self.registry
    }

    /// Validate the reading, then evaluate under the exhibit's history lock
    pub fn evaluate(&self, reading: &SensorReading, policy: &ThresholdPolicy) -> Result<AnomalyVerdict> {
        reading.validate()?;

        if policy.exhibit_id() != reading.exhibit_id {
            log::debug!(
                "Reading for exhibit {} evaluated with policy of exhibit {}",
                reading.exhibit_id,
                policy.exhibit_id()
            );
        }

        let handle = self.registry.handle(reading.exhibit_id);
        let verdict = {
            let mut history = handle.lock();
            evaluate(reading, policy, &mut history, &self.config)
        };

        log::debug!(
            "Exhibit {}: anomaly={} severity={} score={:.3} violations={}",
            verdict.exhibit_id(),
            verdict.is_anomaly(),
            verdict.severity(),
            verdict.score(),
            verdict.violations().len()
        );

        Ok(verdict)
    }

    /// Hard thresholds only; the registry is neither read nor written
    pub fn evaluate_detached(&self, reading: &SensorReading, policy: &ThresholdPolicy) -> Result<AnomalyVerdict> {
        reading.validate()?;
        let mut scratch = ExhibitHistory::new(self.config.trend.window_capacity);
        Ok(evaluate(reading, policy, &mut scratch, &self.config))
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        let config = EngineConfig::default();
        let registry = Arc::new(HistoryRegistry::new(config.trend.window_capacity));
        Self { config, registry }
    }
}
