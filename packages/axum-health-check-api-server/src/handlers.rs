//! The `GET /health_check` handler.
use axum::extract::State;
use axum::Json;
use swarmcast_server_lib::registar::Registar;

use crate::resources::{Detail, Report, Status};

/// Probes every service registered in `registar` and reports the result.
pub async fn health_check(State(registar): State<Registar>) -> Json<Report> {
    let client = reqwest::Client::new();

    let mut details = Vec::new();
    let mut status = Status::None;

    for job in registar.entries() {
        let result = match client.get(&job.health_check_url).send().await {
            Ok(response) => Ok(response.status().to_string()),
            Err(err) => Err(err.to_string()),
        };

        status = if result.is_err() {
            Status::Error
        } else if status == Status::None {
            Status::Ok
        } else {
            status
        };

        details.push(Detail {
            binding: job.binding,
            result,
            info: job.info,
        });
    }

    let message = if status == Status::Error {
        "health check failed".to_string()
    } else {
        String::new()
    };

    Json(Report { status, message, details })
}
