pub mod auth;
pub mod jobs;
pub mod users;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// GET / - service banner
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Jobly API (Rust)",
        "version": version,
        "endpoints": {
            "auth": "/auth/token, /auth/register (public - token acquisition)",
            "jobs": "/jobs[/:id] (list/show public; mutations require admin)",
            "users": "/users[/:username] (admin, or the user themselves)",
        }
    }))
}

/// GET /health - liveness plus a database probe
pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::health_check().await {
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
                "database_error": e.to_string()
            })),
        ),
    }
}
