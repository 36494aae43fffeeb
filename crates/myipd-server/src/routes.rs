// ABOUTME: Route definitions for the myipd HTTP server.
// ABOUTME: Mounts the dispatcher at `/` and an unauthenticated health check.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;

/// Body of the health check response.
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

/// Build the complete Axum router with all routes and shared state.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(api::ip::handle_request))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler. Returns 200 OK with the running version.
async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: myipd_core::VERSION,
    })
}
