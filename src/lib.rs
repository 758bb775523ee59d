use std::sync::Arc;

use axum::{middleware, routing::get, Router};

pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod ipsec;
pub mod ipsec_client;
pub mod logging;
pub mod metrics;

use ipsec_client::IpsecProvider;

#[derive(Clone)]
pub struct AppState {
    pub api_token: Option<Arc<str>>,
    pub ipsec_provider: Arc<dyn IpsecProvider>,
}

impl AppState {
    pub fn new(api_token: Option<String>, ipsec_provider: Arc<dyn IpsecProvider>) -> Self {
        Self {
            api_token: api_token.map(Arc::<str>::from),
            ipsec_provider,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/metrics", get(http::handlers::scrape))
        .route("/tunnels", get(http::handlers::tunnels))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token,
        ));

    Router::new()
        .route("/", get(http::handlers::discovery))
        .route("/health", get(http::handlers::health))
        .merge(protected)
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
