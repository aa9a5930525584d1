//! Router construction for the health-check API.
use axum::routing::get;
use axum::Router;
use swarmcast_server_lib::registar::Registar;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::health_check;

/// Builds the health-check API router, with `registar` as shared state.
#[must_use]
pub fn router(registar: Registar) -> Router {
    Router::new()
        .route("/health_check", get(health_check))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(registar)
}
