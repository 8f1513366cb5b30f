use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::app::services::AppServices;

/// Unprefixed service endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

pub async fn root(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "message": services.project_name,
        "status": "running",
        "docs": "/docs",
    }))
}

/// Always 200; a failed store probe is reported as `degraded`.
pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let body = match services.catalog.ping().await {
        Ok(()) => serde_json::json!({
            "status": "healthy",
            "database": "connected",
        }),
        Err(e) => {
            tracing::warn!(error = %e, "health check: store unreachable");
            serde_json::json!({
                "status": "degraded",
                "database": format!("error: {e}"),
            })
        }
    };
    (StatusCode::OK, Json(body))
}
