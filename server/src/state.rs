//! Shared application state

use std::sync::Arc;

use exhibit_guard_core::{
    AnomalyService, FallbackProvider, HttpVisionClassifier, RemoteProvider,
};

use crate::config::Config;
use crate::models::ExhibitStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub service: Arc<AnomalyService>,
    pub exhibits: Arc<ExhibitStore>,
}

impl AppState {
    /// Wire the engine and its optional collaborators from configuration
    pub fn build(config: Config) -> anyhow::Result<Self> {
        let mut service = AnomalyService::new(config.engine.clone())?;

        if let Some(remote) = config.remote_explanations() {
            let timeout = remote.timeout;
            tracing::info!("Remote explanations enabled (model: {})", remote.model);
            let provider = RemoteProvider::new(remote)?;
            service = service.with_explainer(Arc::new(FallbackProvider::with_template(provider, timeout)));
        } else {
            tracing::info!("OPENAI_API_KEY not set - template explanations only");
        }

        if let Some(url) = &config.vision_api_url {
            tracing::info!("Vision classifier: {}", url);
            let classifier = HttpVisionClassifier::new(url.clone(), config.vision_timeout())?;
            service = service.with_classifier(Arc::new(classifier), config.vision_timeout());
        }

        Ok(Self::with_service(config, service))
    }

    pub fn with_service(config: Config, service: AnomalyService) -> Self {
        Self {
            config,
            service: Arc::new(service),
            exhibits: Arc::new(ExhibitStore::with_samples()),
        }
    }
}
