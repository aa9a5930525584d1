//! A bare-bones HTTP client for exercising a running server in tests.
use reqwest::Response;

/// # Panics
///
/// Panics if the request cannot be sent at all (connection refused, DNS
/// failure, ...).
pub async fn get(url: &str) -> Response {
    reqwest::get(url).await.expect("it should be able to send the request")
}
