//! Vision Classifier boundary
//!
//! The model runtime lives elsewhere. `HttpVisionClassifier` posts a raw
//! frame to an inference endpoint that answers with detections.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::decision::decide;
use super::types::{Detection, VisionRuleSet, VisionVerdict};

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("network error: {0}")]
    Network(String),
    #[error("classifier returned HTTP {0}")]
    Server(u16),
    #[error("cannot parse classifier response: {0}")]
    Parse(String),
    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait VisionClassifier: Send + Sync {
    async fn detect(&self, image: &[u8]) -> Result<Vec<Detection>, VisionError>;

    fn name(&self) -> &str;
}

// ============================================================================
// HTTP CLASSIFIER
// ============================================================================

pub struct HttpVisionClassifier {
    endpoint: String,
    http_client: reqwest::Client,
}

/// Accepts either `{"detections": [...]}` or a bare list
#[derive(Deserialize)]
#[serde(untagged)]
enum DetectResponse {
    Wrapped { detections: Vec<Detection> },
    Bare(Vec<Detection>),
}

impl HttpVisionClassifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, VisionError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VisionError::Network(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            http_client,
        })
    }
}

#[async_trait]
impl VisionClassifier for HttpVisionClassifier {
    async fn detect(&self, image: &[u8]) -> Result<Vec<Detection>, VisionError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| VisionError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VisionError::Server(response.status().as_u16()));
        }

        let parsed: DetectResponse = response
            .json()
            .await
            .map_err(|e| VisionError::Parse(e.to_string()))?;

        Ok(match parsed {
            DetectResponse::Wrapped { detections } => detections,
            DetectResponse::Bare(detections) => detections,
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

// ============================================================================
// FRAME ANALYSIS
// ============================================================================

/// Run the classifier under a timeout and decide. Classifier failure is
/// treated as "no detections", with the reason carried in `status`.
pub async fn analyze_frame(
    classifier: &dyn VisionClassifier,
    image: &[u8],
    rules: &VisionRuleSet,
    timeout: Duration,
) -> VisionVerdict {
    let detections = match tokio::time::timeout(timeout, classifier.detect(image)).await {
        Ok(Ok(detections)) => detections,
        Ok(Err(e)) => return unavailable(classifier, rules, e),
        Err(_) => return unavailable(classifier, rules, VisionError::Timeout(timeout)),
    };

    decide(&detections, rules)
}

fn unavailable(classifier: &dyn VisionClassifier, rules: &VisionRuleSet, err: VisionError) -> VisionVerdict {
    log::warn!("Vision classifier '{}' unavailable: {}", classifier.name(), err);
    let mut verdict = decide(&[], rules);
    verdict.status = format!("classifier unavailable: {}", err);
    verdict
}
