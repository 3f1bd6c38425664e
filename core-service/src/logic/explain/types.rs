use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::logic::reading::SensorReading;
use crate::logic::verdict::AnomalyVerdict;

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("explanation provider not configured: {0}")]
    NotConfigured(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("provider returned HTTP {0}")]
    Server(u16),
    #[error("cannot parse provider response: {0}")]
    Parse(String),
    #[error("provider returned an empty explanation")]
    Empty,
    #[error("provider timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait ExplanationProvider: Send + Sync {
    async fn explain(
        &self,
        verdict: &AnomalyVerdict,
        reading: &SensorReading,
    ) -> Result<String, ExplainError>;

    /// Short name for logs and health output
    fn name(&self) -> &str;
}
