use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::database::DatabaseManager;

/// GET /health - liveness plus database reachability
pub async fn get() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database": "unavailable",
                "database_error": e.to_string()
            })),
        ),
    }
}
