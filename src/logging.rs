use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let scrape = is_scrape_path(&path);
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started_at.elapsed().as_millis();

    info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = elapsed_ms,
        scrape,
        "request summary"
    );

    if status.as_u16() == 401 {
        warn!(method = %method, path = %path, "rejected scrape without valid token");
    }

    response
}

/// Paths that run the status command once per configured tunnel.
fn is_scrape_path(path: &str) -> bool {
    matches!(path, "/metrics" | "/tunnels")
}
