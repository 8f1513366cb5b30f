//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and the shared service handle
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{build_services, AppServices};

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// Product routes are mounted under `api_prefix` (e.g. `/api/v1`); `/` and
/// `/health` stay at the root.
pub fn build_app(services: AppServices, api_prefix: &str) -> Router {
    let services = Arc::new(services);

    Router::new()
        .merge(routes::system::router())
        .merge(routes::products::router(api_prefix))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(services)),
        )
}
