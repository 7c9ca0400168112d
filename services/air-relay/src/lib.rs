use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod types;

use crate::registry::Registry;

/// State shared by every handler. Dropping it discards all stored readings.
#[derive(Debug, Default)]
pub struct AppState {
    pub registry: Registry,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Fresh, empty state ready to hand to [`build_router`].
    pub fn shared() -> SharedState {
        Arc::new(Self::default())
    }
}

pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/esp32/readings", post(handlers::submit_reading))
        .route("/esp32/latest", get(handlers::latest))
        .route("/esp32/devices", get(handlers::devices))
        .route("/esp32/devices/:device_id", get(handlers::device))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                let request_id = req
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http",
                    %request_id,
                    method = %req.method(),
                    uri = %req.uri(),
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
