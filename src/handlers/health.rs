use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;

use crate::server::Service;
use crate::state::AppState;

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health(
    State(state): State<AppState>,
    Extension(service): Extension<Service>,
) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.health.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": service.name(),
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "service": service.name(),
                    "version": env!("CARGO_PKG_VERSION"),
                    "timestamp": now,
                    "error": "database unavailable"
                })),
            )
        }
    }
}
