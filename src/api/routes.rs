//! Router construction

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::api::handlers;
use crate::config::SecurityConfig;
use crate::middleware::IpAllowLayer;
use crate::AppState;

/// Build the full application router with middleware and static image serving
pub fn create_router(state: Arc<AppState>) -> Router {
    let settings = state.settings.clone();

    let api = Router::new()
        .route("/generate", post(handlers::generate))
        .route("/task/:task_id", get(handlers::task_status))
        .route("/health", get(handlers::health));

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/docs", get(handlers::docs))
        .merge(api.clone())
        .nest(
            "/api/v1",
            api.route("/generate-mockup", post(handlers::generate)),
        )
        .nest_service(
            &settings.storage.public_path,
            ServeDir::new(&settings.storage.base_path),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(
            settings.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&settings.security))
        .layer(IpAllowLayer::from_config(&settings.security.allowed_ips))
        .with_state(state)
}

/// CORS restricted to the configured origins; invalid entries are skipped
pub fn build_cors_layer(config: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
