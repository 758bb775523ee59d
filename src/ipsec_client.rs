use std::{path::PathBuf, process::Output, time::Duration};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Access to the running IPsec daemon: its configuration and its status reports.
#[async_trait]
pub trait IpsecProvider: Send + Sync {
    async fn read_configuration(&self) -> Result<String, AppError>;
    async fn query_status(&self, tunnel: &str) -> Result<Vec<u8>, AppError>;
}

/// Reads `ipsec.conf` from disk and shells out to `ipsec status <name>`.
#[derive(Debug, Clone)]
pub struct CliIpsecClient {
    config_path: PathBuf,
    binary: String,
    timeout: Duration,
}

impl CliIpsecClient {
    pub fn new(
        config_path: impl Into<PathBuf>,
        binary: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            config_path: config_path.into(),
            binary: binary.into(),
            timeout,
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Output, String> {
        let child = Command::new(&self.binary)
            .args(args)
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(err)) => Err(format!("failed to run {}: {err}", self.binary)),
            Err(_) => Err(format!("timed out after {:?}", self.timeout)),
        }
    }
}

#[async_trait]
impl IpsecProvider for CliIpsecClient {
    async fn read_configuration(&self) -> Result<String, AppError> {
        let raw = tokio::fs::read(&self.config_path).await.map_err(|err| {
            AppError::config_read(self.config_path.display().to_string(), err.to_string())
        })?;

        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    async fn query_status(&self, tunnel: &str) -> Result<Vec<u8>, AppError> {
        // The name is passed as an argument; keep it from being read as a flag.
        if tunnel.starts_with('-') {
            return Err(AppError::status_command(
                tunnel,
                "refusing tunnel name that starts with '-'",
            ));
        }

        let output = self
            .run(&["status", tunnel])
            .await
            .map_err(|message| AppError::status_command(tunnel, message))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::status_command(
                tunnel,
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }

        debug!(tunnel, bytes = output.stdout.len(), "status command finished");
        Ok(output.stdout)
    }
}

/// Probes `<binary> version` so a missing daemon shows up in the logs at startup.
///
/// Scrapes still run without it; every tunnel then reports as unknown.
pub async fn ensure_ipsec_available(client: &CliIpsecClient) {
    match client.run(&["version"]).await {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout);
            debug!(version = %version.trim(), "ipsec binary available");
        }
        Ok(output) => {
            warn!(binary = %client.binary, status = %output.status, "ipsec version check failed");
        }
        Err(message) => {
            warn!(binary = %client.binary, error = %message, "ipsec binary not usable");
        }
    }
}
