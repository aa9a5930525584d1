use std::time::Duration;

use swarmcast_master_lib::app;

#[tokio::main]
async fn main() {
    let (_app_container, jobs) = app::run().await;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("swarmcast master shutting down ...");

            jobs.cancel();

            jobs.wait_for_all(Duration::from_secs(10)).await;

            tracing::info!("swarmcast master successfully shut down.");
        }
    }
}
