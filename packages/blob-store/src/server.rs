//! The out-of-scope chunk file server: `GET /blob/{hash}` plus a cheap
//! `GET /` used only as this server's own health-check probe target (spec
//! deliberately does not describe this server beyond "serves `/blob/{hash}`,
//! counts active uploads, measures per-upload duration").
use std::io::SeekFrom;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/blob/{hash}", get(blob))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn blob(State(state): State<AppState>, Path(hash): Path<String>) -> Result<Vec<u8>, StatusCode> {
    let chunk = {
        let batch = state.batch.lock().await;
        batch.chunks.iter().find(|c| c.hash.as_str() == hash).cloned()
    };

    let Some(chunk) = chunk else {
        return Err(StatusCode::NOT_FOUND);
    };

    state.stats.upload_started();
    let started = Instant::now();

    let result = read_chunk(&state.root_dir, &chunk.path, chunk.pos, chunk.size).await;

    state.stats.upload_finished(started.elapsed().as_secs_f64()).await;

    result.map_err(|err| {
        tracing::warn!("failed to read blob {hash}: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

async fn read_chunk(root_dir: &str, relative_path: &str, pos: u64, size: u64) -> std::io::Result<Vec<u8>> {
    let path = std::path::Path::new(root_dir).join(relative_path);

    let mut file = tokio::fs::File::open(path).await?;
    file.seek(SeekFrom::Start(pos)).await?;

    let mut buffer = vec![0u8; size as usize];
    file.read_exact(&mut buffer).await?;

    Ok(buffer)
}
