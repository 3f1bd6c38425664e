//! Ad-hoc anomaly check handler

use axum::{extract::State, Json};
use exhibit_guard_core::{SensorReading, ThresholdPolicy};

use crate::{AppState, AppResult, AppError};
use crate::models::{AnomalyCheckRequest, VerdictResponse};

/// Check one reading without touching trend history.
///
/// Thresholds: inline `threshold_config` (unset bounds from the defaults),
/// else the registered exhibit's policy, else the defaults.
pub async fn check(
    State(state): State<AppState>,
    Json(req): Json<AnomalyCheckRequest>,
) -> AppResult<Json<VerdictResponse>> {
    let exhibit_id = req
        .exhibit_id
        .or_else(|| req.sensor_data.get("exhibit_id").and_then(|v| v.as_u64()))
        .unwrap_or_default();

    let reading = SensorReading::from_json(&req.sensor_data, Some(exhibit_id))?;

    let policy = match req.threshold_config {
        Some(config) => ThresholdPolicy::try_from(config)
            .map_err(|e| AppError::ValidationError(e.to_string()))?
            .for_exhibit(exhibit_id),
        None => state
            .exhibits
            .policy(exhibit_id)
            .unwrap_or_else(|| ThresholdPolicy::default_for(exhibit_id)),
    };

    let verdict = state.service.check(&reading, &policy).await?;

    Ok(Json(verdict.into()))
}
