//! Router configuration for the web server.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/extract", get(handlers::extract))
        // Downloadable exports
        .route("/export.csv", get(handlers::export_csv))
        .route("/export.json", get(handlers::export_json))
        // JSON API
        .route("/api/results", get(handlers::api_results))
        .route("/api/queries", get(handlers::api_queries))
        .route("/api/status", get(handlers::api_status))
        // Static assets
        .route("/static/style.css", get(handlers::serve_css))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
