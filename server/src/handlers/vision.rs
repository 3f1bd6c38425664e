//! Vision handlers

use axum::{body::Bytes, extract::{State, Query}, Json};

use crate::{AppState, AppResult, AppError};
use crate::models::{VisionDecideRequest, FrameQuery, VisionResponse};

/// Decide on detections produced elsewhere
pub async fn decide(
    State(state): State<AppState>,
    Json(req): Json<VisionDecideRequest>,
) -> AppResult<Json<VisionResponse>> {
    let rules = req.rules.unwrap_or_else(|| state.config.vision_rules.clone());

    let result = state
        .service
        .decide_vision(req.exhibit_id, &req.detections, &rules)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    Ok(Json(result.into()))
}

/// Run the configured classifier on a raw frame
pub async fn frame(
    State(state): State<AppState>,
    Query(query): Query<FrameQuery>,
    body: Bytes,
) -> AppResult<Json<VisionResponse>> {
    if body.is_empty() {
        return Err(AppError::ValidationError("frame body is empty".to_string()));
    }

    let result = state
        .service
        .analyze_frame(query.exhibit_id, &body, &state.config.vision_rules)
        .await?;

    if result.0.anomaly_detected {
        tracing::warn!("Exhibit {} visual anomaly: {}", query.exhibit_id, result.0.status);
    }

    Ok(Json(result.into()))
}
