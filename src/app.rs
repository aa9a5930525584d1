//! Master loop composition (spec §4.5 "Master loop").
//!
//! Boots configuration and logging, starts the three axum servers
//! (peer-session, blob-store, health-check API) and the two background
//! jobs that drive the swarm (batch scan, planner tick), and hands the
//! binary's `main` a [`JobManager`] to cancel and drain on shutdown.
use std::sync::Arc;

use swarmcast_axum_health_check_api_server::environment as health_check_api_environment;
use swarmcast_axum_peer_session_server::environment as peer_session_environment;
use swarmcast_blob_store::environment as blob_store_environment;
use tracing::instrument;

use crate::bootstrap::jobs::manager::JobManager;
use crate::bootstrap::jobs::{batch_scan, planner_tick};
use crate::bootstrap::{self};
use crate::container::AppContainer;

pub async fn run() -> (Arc<AppContainer>, JobManager) {
    let (_config, app_container) = bootstrap::app::setup();

    let app_container = Arc::new(app_container);

    let jobs = start(&app_container).await;

    (app_container, jobs)
}

/// Starts every server and background job the master loop needs.
#[instrument(skip(app_container))]
pub async fn start(app_container: &Arc<AppContainer>) -> JobManager {
    let mut job_manager = JobManager::new();

    start_health_check_api(app_container, &mut job_manager).await;
    let blob_stats = start_blob_store_server(app_container, &mut job_manager).await;
    start_peer_session_server(app_container, &mut job_manager).await;

    start_batch_scan(app_container, &mut job_manager);
    start_planner_tick(app_container, blob_stats, &mut job_manager);

    job_manager
}

async fn start_peer_session_server(app_container: &Arc<AppContainer>, job_manager: &mut JobManager) {
    let config = peer_session_environment::Config::new(&app_container.peer_session_config, &app_container.core);

    let started = peer_session_environment::Started::new(
        &config,
        app_container.swarm.clone(),
        app_container.batch.clone(),
        app_container.replan.clone(),
        app_container.registar.clone(),
    )
    .await;

    tracing::info!(target: "PEER_SESSION", binding = %started.state.binding, "listening");

    let cancellation_token = job_manager.new_cancellation_token();
    let handle = tokio::spawn(async move {
        cancellation_token.cancelled().await;
        if let Err(err) = started.stop().await {
            tracing::warn!(target: "PEER_SESSION", %err, "server task did not shut down cleanly");
        }
    });

    job_manager.push("peer_session_server", handle);
}

async fn start_blob_store_server(app_container: &Arc<AppContainer>, job_manager: &mut JobManager) -> Arc<swarmcast_blob_store::stats::Stats> {
    let config = blob_store_environment::Config::from(app_container.blob_store_config.clone());

    let started = blob_store_environment::Started::new(&config, app_container.batch.clone(), app_container.registar.clone()).await;

    tracing::info!(target: "BLOB_STORE", binding = %started.state.binding, "listening");

    let stats = started.app_state.stats.clone();

    let cancellation_token = job_manager.new_cancellation_token();
    let handle = tokio::spawn(async move {
        cancellation_token.cancelled().await;
        if let Err(err) = started.stop().await {
            tracing::warn!(target: "BLOB_STORE", %err, "server task did not shut down cleanly");
        }
    });

    job_manager.push("blob_store_server", handle);

    stats
}

async fn start_health_check_api(app_container: &Arc<AppContainer>, job_manager: &mut JobManager) {
    let config = health_check_api_environment::Config::from(app_container.health_check_api_config.clone());

    let started = health_check_api_environment::Started::new(&config, app_container.registar.clone()).await;

    tracing::info!(target: "HEALTH_CHECK_API", binding = %started.state.binding, "listening");

    let cancellation_token = job_manager.new_cancellation_token();
    let handle = tokio::spawn(async move {
        cancellation_token.cancelled().await;
        if let Err(err) = started.stop().await {
            tracing::warn!(target: "HEALTH_CHECK_API", %err, "server task did not shut down cleanly");
        }
    });

    job_manager.push("health_check_api", handle);
}

fn start_batch_scan(app_container: &Arc<AppContainer>, job_manager: &mut JobManager) {
    let handle = batch_scan::start_job(app_container.clone(), job_manager.new_cancellation_token());

    job_manager.push("batch_scan", handle);
}

fn start_planner_tick(app_container: &Arc<AppContainer>, blob_stats: Arc<swarmcast_blob_store::stats::Stats>, job_manager: &mut JobManager) {
    let handle = planner_tick::start_job(app_container.clone(), blob_stats, job_manager.new_cancellation_token());

    job_manager.push("planner_tick", handle);
}
