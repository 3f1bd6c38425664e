//! Exhibit handlers

use axum::{extract::{State, Path}, http::StatusCode, Json};
use exhibit_guard_core::{ExhibitId, PolicyConfig};
use validator::Validate;

use crate::{AppState, AppResult, AppError};
use crate::models::{Exhibit, CreateExhibit, HistoryResponse};

/// List exhibits
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Exhibit>>> {
    Ok(Json(state.exhibits.list()))
}

/// Get single exhibit
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ExhibitId>,
) -> AppResult<Json<Exhibit>> {
    let exhibit = state
        .exhibits
        .get(id)
        .ok_or_else(|| AppError::NotFound("Exhibit not found".to_string()))?;

    Ok(Json(exhibit))
}

/// Create new exhibit
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateExhibit>,
) -> AppResult<(StatusCode, Json<Exhibit>)> {
    req.validate()?;

    // bad thresholds are the caller's fault here, not a server misconfiguration
    let exhibit = state
        .exhibits
        .create(req)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    tracing::info!("Exhibit created: {} ({})", exhibit.name, exhibit.id);

    Ok((StatusCode::CREATED, Json(exhibit)))
}

/// Update an exhibit's threshold policy (partial)
pub async fn update_policy(
    State(state): State<AppState>,
    Path(id): Path<ExhibitId>,
    Json(req): Json<PolicyConfig>,
) -> AppResult<Json<Exhibit>> {
    let exhibit = state
        .exhibits
        .update_policy(id, &req)
        .ok_or_else(|| AppError::NotFound("Exhibit not found".to_string()))?
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    tracing::info!("Policy updated for exhibit {}", id);

    Ok(Json(exhibit))
}

/// Delete exhibit and drop its trend history
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ExhibitId>,
) -> AppResult<StatusCode> {
    let exhibit = state
        .exhibits
        .delete(id)
        .ok_or_else(|| AppError::NotFound("Exhibit not found".to_string()))?;

    let evicted = state.service.forget_exhibit(id);
    tracing::info!("Exhibit deleted: {} ({}), history evicted: {}", exhibit.name, id, evicted);

    Ok(StatusCode::NO_CONTENT)
}

/// Trend statistics per sensor
pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<ExhibitId>,
) -> AppResult<Json<HistoryResponse>> {
    if state.exhibits.get(id).is_none() {
        return Err(AppError::NotFound("Exhibit not found".to_string()));
    }

    let sensors = state.service.history(id).unwrap_or_default();

    Ok(Json(HistoryResponse {
        exhibit_id: id,
        sensors,
    }))
}
