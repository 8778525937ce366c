//! HTTP routes for the metrics server.
//!
//! - `/metrics` - Prometheus text exposition of every compliance gauge
//! - `/health` - Liveness check

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::validation::metrics::SharedMetricsRegistry;

const TEXT_FORMAT: &str = "text/plain; version=0.0.4";

/// Health check endpoint.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "compliance-ctl",
    }))
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(registry): State<SharedMetricsRegistry>) -> Response {
    match registry.encode_text() {
        Ok(body) => ([(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            log::error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
