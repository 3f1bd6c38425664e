//! Remote (language model) explanations
//!
//! OpenAI-compatible chat-completions endpoint. The request carries the
//! verdict and the raw reading; the answer is used verbatim.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::reading::SensorReading;
use crate::logic::verdict::AnomalyVerdict;
use super::types::{ExplainError, ExplanationProvider};

const SYSTEM_PROMPT: &str = "You are a museum conservation assistant. Explain environmental \
sensor anomalies for exhibit staff in two sentences or fewer. Mention the affected sensors \
and a concrete next step. Do not speculate beyond the data given.";

#[derive(Debug, Clone)]
pub struct RemoteProviderConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl Default for RemoteProviderConfig {
    fn default() -> Self {
        Self {
            api_url: constants::DEFAULT_LLM_API_URL.to_string(),
            api_key: None,
            model: constants::DEFAULT_LLM_MODEL.to_string(),
            timeout: Duration::from_millis(constants::DEFAULT_EXPLANATION_TIMEOUT_MS),
            max_tokens: 200,
        }
    }
}

pub struct RemoteProvider {
    config: RemoteProviderConfig,
    http_client: reqwest::Client,
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl RemoteProvider {
    pub fn new(config: RemoteProviderConfig) -> Result<Self, ExplainError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExplainError::Network(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    pub fn config(&self) -> &RemoteProviderConfig {
        &self.config
    }

    fn user_prompt(verdict: &AnomalyVerdict, reading: &SensorReading) -> Result<String, ExplainError> {
        let verdict_json =
            serde_json::to_string(verdict).map_err(|e| ExplainError::Parse(e.to_string()))?;
        let reading_json =
            serde_json::to_string(reading).map_err(|e| ExplainError::Parse(e.to_string()))?;
        Ok(format!(
            "Reading: {}\nVerdict: {}\nExplain this verdict.",
            reading_json, verdict_json
        ))
    }
}

#[async_trait]
impl ExplanationProvider for RemoteProvider {
    async fn explain(
        &self,
        verdict: &AnomalyVerdict,
        reading: &SensorReading,
    ) -> Result<String, ExplainError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ExplainError::NotConfigured("missing API key".to_string()))?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Self::user_prompt(verdict, reading)?,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: 0.3,
        };

        let response = self
            .http_client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExplainError::Timeout(self.config.timeout)
                } else {
                    ExplainError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ExplainError::Server(response.status().as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExplainError::Parse(e.to_string()))?;

        extract_text(body)
    }

    fn name(&self) -> &str {
        "remote"
    }
}

fn extract_text(body: ChatResponse) -> Result<String, ExplainError> {
    let text = body
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        Err(ExplainError::Empty)
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeverityBands;
    use chrono::Utc;

    #[test]
    fn test_extract_text() {
        let body: ChatResponse = serde_json::from_str(
            r#"{ "choices": [{ "message": { "role": "assistant", "content": "  Too warm.  " } }] }"#,
        )
        .unwrap();
        assert_eq!(extract_text(body).unwrap(), "Too warm.");
    }

    #[test]
    fn test_extract_empty() {
        let body: ChatResponse = serde_json::from_str(r#"{ "choices": [] }"#).unwrap();
        assert!(matches!(extract_text(body), Err(ExplainError::Empty)));

        let blank: ChatResponse = serde_json::from_str(
            r#"{ "choices": [{ "message": { "role": "assistant", "content": "   " } }] }"#,
        )
        .unwrap();
        assert!(matches!(extract_text(blank), Err(ExplainError::Empty)));
    }

    #[tokio::test]
    async fn test_missing_key_not_configured() {
        let provider = RemoteProvider::new(RemoteProviderConfig::default()).unwrap();
        let reading = SensorReading::new(1).with_temperature(30.0);
        let verdict = AnomalyVerdict::from_violations(1, Utc::now(), Vec::new(), &SeverityBands::default());

        let result = provider.explain(&verdict, &reading).await;
        assert!(matches!(result, Err(ExplainError::NotConfigured(_))));
    }

    #[test]
    fn test_prompt_contains_reading() {
        let reading = SensorReading::new(3).with_humidity(75.0);
        let verdict = AnomalyVerdict::from_violations(3, Utc::now(), Vec::new(), &SeverityBands::default());
        let prompt = RemoteProvider::user_prompt(&verdict, &reading).unwrap();
        assert!(prompt.contains("\"humidity_pct\":75.0"));
    }
}
