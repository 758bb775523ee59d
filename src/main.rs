use std::sync::Arc;

use ipsec_exporter::{
    build_app,
    config::Config,
    ipsec_client::{ensure_ipsec_available, CliIpsecClient},
    logging, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let client = CliIpsecClient::new(
        config.ipsec_config_path.clone(),
        config.ipsec_binary.clone(),
        config.status_timeout,
    );
    ensure_ipsec_available(&client).await;

    let bind_socket = config.bind_socket()?;
    let state = AppState::new(config.api_token.clone(), Arc::new(client));
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        ipsec_config = %config.ipsec_config_path.display(),
        auth = config.api_token.is_some(),
        "exporter starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
