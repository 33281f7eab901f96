use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /health - liveness plus a database ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            let error = ApiError::service_unavailable("database unavailable");
            let mut body = error.to_json();
            body["status"] = json!("degraded");
            body["timestamp"] = json!(now);
            body["database_error"] = json!(e.to_string());
            (error.status_code(), Json(body)).into_response()
        }
    }
}
