//! Configuration module

use std::env;
use std::time::Duration;

use exhibit_guard_core::constants;
use exhibit_guard_core::{EngineConfig, OpeningHours, RemoteProviderConfig, VisionRuleSet};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Chat-completions endpoint for explanations
    pub llm_api_url: String,

    /// API key; without it explanations use the template only
    pub llm_api_key: Option<String>,

    /// Language model name
    pub llm_model: String,

    /// Object-detection inference endpoint (optional)
    pub vision_api_url: Option<String>,

    /// Vision classifier call budget
    pub vision_timeout_ms: u64,

    /// Optional engine config file (JSON); env overrides apply on top
    pub engine_config_path: Option<String>,

    /// Evaluation engine settings
    pub engine: EngineConfig,

    /// Rules applied when a vision request carries none
    pub vision_rules: VisionRuleSet,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let engine_config_path = env::var("ENGINE_CONFIG").ok();
        let mut engine = match &engine_config_path {
            Some(path) => EngineConfig::load(std::path::Path::new(path))?,
            None => EngineConfig::default(),
        };

        if let Some(v) = parse_var("TREND_WINDOW") {
            engine.trend.window_capacity = v;
        }
        if let Some(v) = parse_var("TREND_MIN_SAMPLES") {
            engine.trend.min_samples = v;
        }
        if let Some(v) = parse_var("TREND_MULTIPLE") {
            engine.trend.deviation_multiple = v;
        }
        if let Some(v) = parse_var("TREND_MIN_STDDEV_FRACTION") {
            engine.trend.min_stddev_fraction = v;
        }
        if let Some(v) = parse_var("TREND_ENABLED") {
            engine.trend.enabled = v;
        }
        if let Some(v) = parse_var("EXPLANATION_TIMEOUT_MS") {
            engine.explanation_timeout_ms = v;
        }
        engine.validate()?;

        let mut vision_rules = VisionRuleSet::default();
        if let Some(floor) = parse_var("VISION_CONFIDENCE_FLOOR") {
            vision_rules.confidence_floor = floor;
        }
        if let Ok(hours) = env::var("OPENING_HOURS") {
            // visitors are expected while open; a person is only anomalous after hours
            let hours: OpeningHours = hours.parse()?;
            vision_rules = VisionRuleSet::empty()
                .flag_after_hours("person")
                .with_floor(vision_rules.confidence_floor)
                .with_opening_hours(hours);
        }
        vision_rules.validate()?;

        Ok(Self {
            port: parse_var("PORT").unwrap_or(8000),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            llm_api_url: env::var("LLM_API_URL")
                .unwrap_or_else(|_| constants::DEFAULT_LLM_API_URL.to_string()),

            llm_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()),

            llm_model: env::var("LLM_MODEL")
                .unwrap_or_else(|_| constants::DEFAULT_LLM_MODEL.to_string()),

            vision_api_url: env::var("VISION_API_URL").ok().filter(|u| !u.trim().is_empty()),

            vision_timeout_ms: parse_var("VISION_TIMEOUT_MS")
                .unwrap_or(constants::DEFAULT_VISION_TIMEOUT_MS),

            engine_config_path,
            engine,
            vision_rules,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn remote_explanations(&self) -> Option<RemoteProviderConfig> {
        let api_key = self.llm_api_key.clone()?;
        Some(RemoteProviderConfig {
            api_url: self.llm_api_url.clone(),
            api_key: Some(api_key),
            model: self.llm_model.clone(),
            timeout: self.engine.explanation_timeout(),
            ..Default::default()
        })
    }

    pub fn vision_timeout(&self) -> Duration {
        Duration::from_millis(self.vision_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            environment: "development".to_string(),
            llm_api_url: constants::DEFAULT_LLM_API_URL.to_string(),
            llm_api_key: None,
            llm_model: constants::DEFAULT_LLM_MODEL.to_string(),
            vision_api_url: None,
            vision_timeout_ms: constants::DEFAULT_VISION_TIMEOUT_MS,
            engine_config_path: None,
            engine: EngineConfig::default(),
            vision_rules: VisionRuleSet::default(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {}={:?}", name, raw);
            None
        }
    }
}
