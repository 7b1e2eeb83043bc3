use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api::AppState;

/// GET /health - liveness plus a gateway reachability check
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.gateway.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "gateway": "ok"
                }
            })),
        ),
        Err(e) => {
            // Cause stays in the log; the body only says the gateway is down.
            tracing::warn!("Health check: gateway ping failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "gateway unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "gateway": "unavailable"
                    }
                })),
            )
        }
    }
}
