//! Exhibit Guard Monitoring Server
//!
//! HTTP front for the anomaly engine: exhibits register threshold
//! policies, sensor gateways post readings, cameras post frames or
//! detections, and every call returns an explained verdict.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    EXHIBIT GUARD                         │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌─────────────────┐  │
//! │  │  API      │──▶│  Anomaly     │──▶│  Explanation    │  │
//! │  │  (Axum)   │   │  Service     │   │  (LLM/template) │  │
//! │  └─────┬─────┘   └──────┬───────┘   └─────────────────┘  │
//! │        ▼                ▼                                │
//! │  ┌───────────┐   ┌──────────────┐   ┌─────────────────┐  │
//! │  │  Exhibit  │   │  History     │   │  Vision         │  │
//! │  │  Store    │   │  Registry    │   │  Classifier     │  │
//! │  └───────────┘   └──────────────┘   └─────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;
mod state;


use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;

pub use error::{AppError, AppResult};
pub use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let json_logs = std::env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false);

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "exhibit_guard_server=debug,exhibit_guard_core=info,tower_http=debug".into()))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    let config = config::Config::from_env()?;

    tracing::info!("Exhibit Guard server starting ({})...", config.environment);
    tracing::info!(
        "Trend window: {} samples, min {} before judging, {}σ",
        config.engine.trend.window_capacity,
        config.engine.trend.min_samples,
        config.engine.trend.deviation_multiple
    );
    if config.is_production() && config.llm_api_key.is_none() {
        tracing::warn!("Production without OPENAI_API_KEY: explanations fall back to templates");
    }
    if let Some(path) = &config.engine_config_path {
        tracing::info!("Engine config loaded from {}", path);
    }

    // Build application state
    let state = AppState::build(config.clone())?;
    tracing::info!("{} exhibits in directory", state.exhibits.len());

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))

        // Exhibits
        .route("/api/v1/exhibits", get(handlers::exhibits::list).post(handlers::exhibits::create))
        .route("/api/v1/exhibits/:id", get(handlers::exhibits::get).delete(handlers::exhibits::delete))
        .route("/api/v1/exhibits/:id/policy", put(handlers::exhibits::update_policy))
        .route("/api/v1/exhibits/:id/history", get(handlers::exhibits::history))

        // Evaluation
        .route("/api/v1/exhibits/:id/readings", post(handlers::readings::ingest))
        .route("/api/v1/anomaly/check", post(handlers::anomaly::check))

        // Vision
        .route("/api/v1/vision/decide", post(handlers::vision::decide))
        .route("/api/v1/vision/frame", post(handlers::vision::frame))

        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
