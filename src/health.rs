use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::app_state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub models: String,
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Models loaded", body = HealthResponse),
        (status = 503, description = "Running without models", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.models_loaded() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "OK".to_string(),
                models: "loaded".to_string(),
            }),
        )
    } else {
        warn!("Health check: models not loaded");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "DEGRADED".to_string(),
                models: "not loaded".to_string(),
            }),
        )
    }
}
