// GET handlers: metrics, root redirect, version

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use prometheus::{Encoder, TextEncoder};

use super::AppState;
use crate::version::{NAME, VERSION};

/// GET <metrics_path> — text exposition of every registered collector.
pub(super) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let families = state.registry.gather();
    let encoder = TextEncoder::new();
    let mut body = Vec::new();
    if let Err(e) = encoder.encode(&families, &mut body) {
        tracing::warn!(error = %e, operation = "encode_metrics", "metrics encoding failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain".to_string())],
            e.to_string().into_bytes(),
        );
    }
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        body,
    )
}

/// GET / — permanent redirect to the metrics path.
pub(super) async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, state.metrics_path.to_string())],
    )
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}
