//! Anomaly Service
//!
//! Glue around the pure pieces:
//! 1. validate + evaluate (synchronous, under the exhibit's history lock)
//! 2. explain (the only suspension point, bounded by a timeout)
//!
//! A verdict is always returned for valid input, and it always carries an
//! explanation: when the provider fails the template text is used.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::constants;
use crate::error::Result;
use crate::logic::evaluator::RuleEvaluator;
use crate::logic::explain::{self, ExplainError, ExplanationProvider, TemplateProvider};
use crate::logic::policy::ThresholdPolicy;
use crate::logic::reading::{ExhibitId, SensorKind, SensorReading};
use crate::logic::trend::WindowStats;
use crate::logic::verdict::AnomalyVerdict;
use crate::logic::vision::{self, Detection, VisionClassifier, VisionRuleSet, VisionVerdict};

pub struct AnomalyService {
    evaluator: RuleEvaluator,
    explainer: Arc<dyn ExplanationProvider>,
    classifier: Option<Arc<dyn VisionClassifier>>,
    vision_timeout: Duration,
}

impl AnomalyService {
    /// Template explanations, no vision classifier
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self {
            evaluator: RuleEvaluator::new(config)?,
            explainer: Arc::new(TemplateProvider),
            classifier: None,
            vision_timeout: Duration::from_millis(constants::DEFAULT_VISION_TIMEOUT_MS),
        })
    }

    pub fn with_explainer(mut self, explainer: Arc<dyn ExplanationProvider>) -> Self {
        self.explainer = explainer;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn VisionClassifier>, timeout: Duration) -> Self {
        self.classifier = Some(classifier);
        self.vision_timeout = timeout;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        self.evaluator.config()
    }

    pub fn explainer_name(&self) -> &str {
        self.explainer.name()
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    // ========================================================================
    // SENSOR PATH
    // ========================================================================

    /// Classification only; `explanation` stays empty
    pub fn evaluate(&self, reading: &SensorReading, policy: &ThresholdPolicy) -> Result<AnomalyVerdict> {
        self.evaluator.evaluate(reading, policy)
    }

    /// Evaluate and attach an explanation
    pub async fn ingest(&self, reading: &SensorReading, policy: &ThresholdPolicy) -> Result<AnomalyVerdict> {
        let verdict = self.evaluate(reading, policy)?;
        Ok(self.explain(verdict, reading).await)
    }

    /// One-off check that leaves trend history untouched
    pub async fn check(&self, reading: &SensorReading, policy: &ThresholdPolicy) -> Result<AnomalyVerdict> {
        let verdict = self.evaluator.evaluate_detached(reading, policy)?;
        Ok(self.explain(verdict, reading).await)
    }

    /// Attach an explanation. Provider failure, timeout or blank output all
    /// degrade to the template; the classification is never touched.
    pub async fn explain(&self, verdict: AnomalyVerdict, reading: &SensorReading) -> AnomalyVerdict {
        let timeout = self.config().explanation_timeout();

        let outcome = match tokio::time::timeout(timeout, self.explainer.explain(&verdict, reading)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => Ok(text),
            Ok(Ok(_)) => Err(ExplainError::Empty),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ExplainError::Timeout(timeout)),
        };

        let text = match outcome {
            Ok(text) => text,
            Err(e) => {
                log::warn!(
                    "Explanation via '{}' failed for exhibit {}: {}",
                    self.explainer.name(),
                    verdict.exhibit_id(),
                    e
                );
                explain::render(&verdict)
            }
        };

        verdict.with_explanation(text)
    }

    // ========================================================================
    // VISION PATH
    // ========================================================================

    /// Decide on detections the caller already has
    pub fn decide_vision(
        &self,
        exhibit_id: ExhibitId,
        detections: &[Detection],
        rules: &VisionRuleSet,
    ) -> Result<(VisionVerdict, AnomalyVerdict)> {
        rules.validate()?;
        for detection in detections {
            detection.validate()?;
        }
        let vision = vision::decide(detections, rules);
        Ok(self.vision_verdict(exhibit_id, vision))
    }

    /// Run the configured classifier on a frame, then decide. Without a
    /// classifier, or when it fails, the frame counts as "no detections".
    pub async fn analyze_frame(
        &self,
        exhibit_id: ExhibitId,
        image: &[u8],
        rules: &VisionRuleSet,
    ) -> Result<(VisionVerdict, AnomalyVerdict)> {
        rules.validate()?;

        let vision = match &self.classifier {
            Some(classifier) => {
                vision::analyze_frame(classifier.as_ref(), image, rules, self.vision_timeout).await
            }
            None => {
                let mut verdict = vision::decide(&[], rules);
                verdict.status = "classifier unavailable: not configured".to_string();
                verdict
            }
        };

        Ok(self.vision_verdict(exhibit_id, vision))
    }

    fn vision_verdict(&self, exhibit_id: ExhibitId, vision: VisionVerdict) -> (VisionVerdict, AnomalyVerdict) {
        let verdict = AnomalyVerdict::from_vision(exhibit_id, &vision, &self.config().severity)
            .with_explanation(explain::describe_vision(&vision));
        (vision, verdict)
    }

    // ========================================================================
    // HISTORY LIFECYCLE
    // ========================================================================

    pub fn history(&self, exhibit_id: ExhibitId) -> Option<BTreeMap<SensorKind, WindowStats>> {
        self.evaluator.registry().snapshot(exhibit_id)
    }

    /// Drop trend history, e.g. when an exhibit is deleted
    pub fn forget_exhibit(&self, exhibit_id: ExhibitId) -> bool {
        self.evaluator.registry().evict(exhibit_id)
    }

    pub fn tracked_exhibits(&self) -> usize {
        self.evaluator.registry().len()
    }
}
