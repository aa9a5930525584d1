//! Router construction for the peer-session server.
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::socket;
use crate::state::AppState;

/// `GET /`: a cached, auto-refreshing HTML view of the current swarm
/// status table (spec §4.2).
async fn status(State(state): State<AppState>) -> Html<String> {
    let table = state.swarm.lock().await.get_status_table();
    let page = state.status_cache.lock().await.get_or_render(&table);
    Html(page)
}

/// Builds the peer-session router, with `state` as shared state.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/join", get(socket::join))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
