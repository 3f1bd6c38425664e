//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    engine_version: &'static str,
    timestamp: i64,
    explainer: String,
    vision_classifier: bool,
    exhibits: usize,
    tracked_exhibits: usize,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        engine_version: exhibit_guard_core::constants::ENGINE_VERSION,
        timestamp: chrono::Utc::now().timestamp(),
        explainer: state.service.explainer_name().to_string(),
        vision_classifier: state.service.has_classifier(),
        exhibits: state.exhibits.len(),
        tracked_exhibits: state.service.tracked_exhibits(),
    })
}
