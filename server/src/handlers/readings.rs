//! Reading ingestion handler

use axum::{extract::{State, Path}, Json};
use exhibit_guard_core::{ExhibitId, SensorReading};

use crate::{AppState, AppResult, AppError};
use crate::models::VerdictResponse;

/// Evaluate a reading against the exhibit's policy and history
pub async fn ingest(
    State(state): State<AppState>,
    Path(id): Path<ExhibitId>,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<Json<VerdictResponse>> {
    let policy = state
        .exhibits
        .policy(id)
        .ok_or_else(|| AppError::NotFound("Exhibit not found".to_string()))?;

    let reading = SensorReading::from_json(&payload, Some(id))?;
    let verdict = state.service.ingest(&reading, &policy).await?;

    if evict_if_deleted(&state, id) {
        return Err(AppError::NotFound("Exhibit not found".to_string()));
    }

    if verdict.is_anomaly() {
        tracing::warn!(
            "Exhibit {} anomaly: severity={} sensors={:?}",
            id,
            verdict.severity(),
            verdict.affected_sensors()
        );
    }

    Ok(Json(verdict.into()))
}

/// Drop history the evaluation just recreated for an exhibit deleted
/// mid-request. Delete removes the store entry before evicting, so either
/// this check sees it gone or the delete's own eviction runs after our push.
fn evict_if_deleted(state: &AppState, id: ExhibitId) -> bool {
    if state.exhibits.get(id).is_some() {
        return false;
    }
    state.service.forget_exhibit(id);
    tracing::debug!("Exhibit {} deleted during ingest, history dropped", id);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use exhibit_guard_core::{AnomalyService, EngineConfig, ThresholdPolicy};

    fn state() -> AppState {
        let service = AnomalyService::new(EngineConfig::default()).unwrap();
        AppState::with_service(Config::default(), service)
    }

    #[tokio::test]
    async fn test_history_dropped_when_exhibit_deleted_mid_ingest() {
        let state = state();
        let policy = state.exhibits.policy(2).unwrap();

        // evaluation lands after the exhibit was removed from the directory
        assert!(state.exhibits.delete(2).is_some());
        state
            .service
            .ingest(&SensorReading::new(2).with_temperature(20.0), &policy)
            .await
            .unwrap();
        assert!(state.service.history(2).is_some());

        assert!(evict_if_deleted(&state, 2));
        assert!(state.service.history(2).is_none());
        assert_eq!(state.service.tracked_exhibits(), 0);
    }

    #[tokio::test]
    async fn test_live_exhibit_keeps_history() {
        let state = state();
        state
            .service
            .ingest(&SensorReading::new(1).with_temperature(25.0), &ThresholdPolicy::default_for(1))
            .await
            .unwrap();

        assert!(!evict_if_deleted(&state, 1));
        assert!(state.service.history(1).is_some());
    }
}
