use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::handlers::AppState;

/// Health check endpoint
/// Returns 200 OK if the process is serving
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "service": "pricing-simulator",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Readiness check endpoint
/// Returns 503 until the price catalog has been loaded once
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.catalogs.is_loaded() {
        (StatusCode::OK, Json(json!({
            "status": "ready",
            "service": "pricing-simulator",
        })))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({
            "status": "loading",
            "service": "pricing-simulator",
        })))
    }
}
