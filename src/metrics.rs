//! Scrape collection and Prometheus exposition
//!
//! One scrape reads the configuration, classifies every monitored tunnel and
//! renders the result into a fresh registry, so nothing survives between
//! scrapes.

use std::{collections::HashSet, sync::Arc};

use prometheus::{Encoder, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use serde::{Serialize, Serializer};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::{
    errors::AppError,
    ipsec::{classify_status, extract_lines, parse_connections, TunnelStatus},
    ipsec_client::IpsecProvider,
};

/// What a single tunnel contributes to `ipsec_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelReport {
    Status(TunnelStatus),
    /// The status command could not be run or failed.
    Unknown,
    /// Excluded with `auto=ignore`; never queried.
    Ignored,
}

impl TunnelReport {
    pub fn metric_value(self) -> i64 {
        match self {
            Self::Status(status) => status.metric_value(),
            Self::Unknown => 3,
            Self::Ignored => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Status(status) => status.as_str(),
            Self::Unknown => "unknown",
            Self::Ignored => "ignored",
        }
    }
}

impl Serialize for TunnelReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TunnelMetric {
    pub name: String,
    #[serde(rename = "state")]
    pub report: TunnelReport,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ScrapeReport {
    pub up: bool,
    pub tunnels: Vec<TunnelMetric>,
}

/// Reads the configuration and queries every monitored tunnel concurrently.
///
/// A name declared twice is reported once, from its first declaration, so
/// each `ipsec_status` series and each status query maps to one tunnel.
pub async fn collect(provider: Arc<dyn IpsecProvider>) -> ScrapeReport {
    let configuration = match provider.read_configuration().await {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "could not read ipsec configuration");
            return ScrapeReport::default();
        }
    };

    let mut seen = HashSet::new();
    let connections: Vec<_> = parse_connections(&extract_lines(&configuration))
        .into_iter()
        .filter(|connection| {
            let first = seen.insert(connection.name.clone());
            if !first {
                debug!(tunnel = %connection.name, "skipping duplicate connection");
            }
            first
        })
        .collect();
    let mut tunnels: Vec<TunnelMetric> = connections
        .iter()
        .map(|connection| TunnelMetric {
            name: connection.name.clone(),
            report: if connection.ignored {
                TunnelReport::Ignored
            } else {
                TunnelReport::Unknown
            },
        })
        .collect();

    let mut queries = JoinSet::new();
    for (index, connection) in connections.into_iter().enumerate() {
        if connection.ignored {
            continue;
        }

        let provider = Arc::clone(&provider);
        queries.spawn(async move {
            let report = match provider.query_status(&connection.name).await {
                Ok(output) => {
                    let status = classify_status(&output);
                    debug!(tunnel = %connection.name, status = %status, "tunnel classified");
                    TunnelReport::Status(status)
                }
                Err(err) => {
                    warn!(tunnel = %connection.name, error = %err, "status query failed");
                    TunnelReport::Unknown
                }
            };
            (index, report)
        });
    }

    while let Some(joined) = queries.join_next().await {
        match joined {
            Ok((index, report)) => tunnels[index].report = report,
            Err(err) => warn!(error = %err, "status query task aborted"),
        }
    }

    debug!(tunnels = tunnels.len(), "scrape collected");
    ScrapeReport { up: true, tunnels }
}

/// Renders a report in the Prometheus text format.
pub fn render(report: &ScrapeReport) -> Result<String, AppError> {
    let registry = Registry::new();

    let up = IntGauge::with_opts(Opts::new(
        "ipsec_up",
        "Whether the ipsec configuration could be read.",
    ))
    .map_err(encoding_error)?;
    let configured = IntGauge::with_opts(Opts::new(
        "ipsec_configured_tunnels",
        "Number of tunnels declared in the ipsec configuration.",
    ))
    .map_err(encoding_error)?;
    let status = IntGaugeVec::new(
        Opts::new(
            "ipsec_status",
            "Tunnel state: 0 tunnel installed, 1 connection established, 2 down, 3 unknown, 4 ignored.",
        ),
        &["tunnel"],
    )
    .map_err(encoding_error)?;

    registry
        .register(Box::new(up.clone()))
        .map_err(encoding_error)?;
    registry
        .register(Box::new(configured.clone()))
        .map_err(encoding_error)?;
    registry
        .register(Box::new(status.clone()))
        .map_err(encoding_error)?;

    up.set(i64::from(report.up));
    configured.set(i64::try_from(report.tunnels.len()).unwrap_or(i64::MAX));
    for tunnel in &report.tunnels {
        status
            .with_label_values(&[tunnel.name.as_str()])
            .set(tunnel.report.metric_value());
    }

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .map_err(encoding_error)?;
    String::from_utf8(buffer).map_err(encoding_error)
}

fn encoding_error(err: impl std::fmt::Display) -> AppError {
    AppError::internal(format!("failed to encode metrics: {err}"))
}
