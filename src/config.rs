use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/ipsec.conf";
pub const DEFAULT_IPSEC_BINARY: &str = "ipsec";
pub const DEFAULT_BIND_PORT: u16 = 9536;
pub const DEFAULT_STATUS_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub ipsec_config_path: PathBuf,
    pub ipsec_binary: String,
    pub bind_addr: String,
    pub bind_port: u16,
    pub api_token: Option<String>,
    pub status_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IPSEC_CONFIG_PATH must not be empty")]
    EmptyConfigPath,
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("STATUS_TIMEOUT_SECS must be a positive integer")]
    InvalidTimeout,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let ipsec_config_path = match env::var("IPSEC_CONFIG_PATH") {
            Ok(value) if value.trim().is_empty() => return Err(ConfigError::EmptyConfigPath),
            Ok(value) => PathBuf::from(value.trim()),
            Err(_) => PathBuf::from(DEFAULT_CONFIG_PATH),
        };

        let ipsec_binary = env::var("IPSEC_BINARY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_IPSEC_BINARY.to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let bind_port = env::var("BIND_PORT")
            .ok()
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(DEFAULT_BIND_PORT);

        let api_token = env::var("EXPORTER_API_TOKEN")
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        let status_timeout_secs = env::var("STATUS_TIMEOUT_SECS")
            .ok()
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or(ConfigError::InvalidTimeout)
            })
            .transpose()?
            .unwrap_or(DEFAULT_STATUS_TIMEOUT_SECS);

        let config = Self {
            ipsec_config_path,
            ipsec_binary,
            bind_addr,
            bind_port,
            api_token,
            status_timeout: Duration::from_secs(status_timeout_secs),
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
