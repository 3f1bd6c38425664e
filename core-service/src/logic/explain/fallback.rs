use std::time::Duration;

use async_trait::async_trait;

use crate::logic::reading::SensorReading;
use crate::logic::verdict::AnomalyVerdict;
use super::template::TemplateProvider;
use super::types::{ExplainError, ExplanationProvider};

/// Decorator: try `primary` within `timeout`, use `fallback` on timeout,
/// error or blank text. Dropping the timed-out future cancels the call.
pub struct FallbackProvider<P, F = TemplateProvider> {
    primary: P,
    fallback: F,
    timeout: Duration,
    name: String,
}

impl<P: ExplanationProvider> FallbackProvider<P, TemplateProvider> {
    pub fn with_template(primary: P, timeout: Duration) -> Self {
        Self::new(primary, TemplateProvider, timeout)
    }
}

impl<P: ExplanationProvider, F: ExplanationProvider> FallbackProvider<P, F> {
    pub fn new(primary: P, fallback: F, timeout: Duration) -> Self {
        let name = format!("{}+{}", primary.name(), fallback.name());
        Self {
            primary,
            fallback,
            timeout,
            name,
        }
    }
}

#[async_trait]
impl<P: ExplanationProvider, F: ExplanationProvider> ExplanationProvider for FallbackProvider<P, F> {
    async fn explain(
        &self,
        verdict: &AnomalyVerdict,
        reading: &SensorReading,
    ) -> Result<String, ExplainError> {
        let failure = match tokio::time::timeout(self.timeout, self.primary.explain(verdict, reading)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => return Ok(text),
            Ok(Ok(_)) => ExplainError::Empty,
            Ok(Err(e)) => e,
            Err(_) => ExplainError::Timeout(self.timeout),
        };

        log::warn!(
            "Explanation provider '{}' failed for exhibit {}: {} - using '{}'",
            self.primary.name(),
            verdict.exhibit_id(),
            failure,
            self.fallback.name()
        );

        self.fallback.explain(verdict, reading).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
