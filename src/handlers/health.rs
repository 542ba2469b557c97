use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// Liveness plus a database ping. No auth.
///
/// A dead database still answers 200 here; load balancers read the
/// `database` field, and the status code only says the process is up.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.db.health().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "database health check failed");
            "disconnected"
        }
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            database: database.to_string(),
        }),
    )
}
