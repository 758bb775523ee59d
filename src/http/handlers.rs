//! Axum HTTP handlers for the exporter

use std::{sync::Arc, time::Instant};

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use prometheus::TEXT_FORMAT;
use serde::Serialize;
use tracing::info;

use crate::{
    errors::AppError,
    metrics::{self, ScrapeReport},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub metrics_endpoint: &'static str,
    pub tunnels_endpoint: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery() -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        metrics_endpoint: "/metrics",
        tunnels_endpoint: "/tunnels",
    })
}

pub async fn scrape(State(state): State<AppState>) -> Result<Response, AppError> {
    let started_at = Instant::now();
    let report = metrics::collect(Arc::clone(&state.ipsec_provider)).await;
    let body = metrics::render(&report)?;

    info!(
        up = report.up,
        tunnels = report.tunnels.len(),
        scrape_ms = started_at.elapsed().as_millis(),
        "scrape completed"
    );

    Ok(([(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response())
}

/// Same data as `/metrics`, as JSON with state names instead of numbers.
pub async fn tunnels(State(state): State<AppState>) -> Json<ScrapeReport> {
    Json(metrics::collect(Arc::clone(&state.ipsec_provider)).await)
}
