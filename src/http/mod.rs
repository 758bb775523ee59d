//! HTTP surface of the exporter
//!
//! Serves the Prometheus scrape endpoint plus health and discovery metadata.

pub mod handlers;
