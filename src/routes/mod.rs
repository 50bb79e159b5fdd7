// HTTP routes: metrics exposition, root redirect, version

mod http;

use axum::{Router, routing::get};
use prometheus::Registry;
use std::sync::Arc;

use crate::config::ServerConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) registry: Registry,
    pub(crate) metrics_path: Arc<str>,
}

pub fn app(registry: Registry, config: &ServerConfig) -> Router {
    let state = AppState {
        registry,
        metrics_path: Arc::from(config.metrics_path.as_str()),
    };
    Router::new()
        .route("/", get(http::root_handler)) // GET / -> metrics path
        .route("/version", get(http::version_handler)) // GET /version
        .route(&config.metrics_path, get(http::metrics_handler)) // GET /metrics
        .with_state(state)
}
