//! Prometheus metrics HTTP server.
//!
//! Uses the built-in HTTP listener from `metrics-exporter-prometheus`
//! to expose the line counters and self-telemetry on `/metrics`.

use std::net::SocketAddr;

use anyhow::Result;
use logrecycler_core::config::PrometheusConfig;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Resolve the listen address from the Prometheus section.
pub fn listen_addr(config: &PrometheusConfig) -> Result<SocketAddr> {
    format!("{}:{}", config.listen_addr, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid prometheus listen address: {}", e))
}

/// Install the global metrics recorder and start the HTTP listener.
///
/// Must run inside a tokio runtime and at most once per process.
///
/// # Errors
///
/// - The listen address is invalid
/// - Socket binding fails
/// - A global recorder is already installed
pub fn install_metrics_recorder(config: &PrometheusConfig) -> Result<()> {
    let addr = listen_addr(config)?;

    if addr.ip().is_unspecified() {
        tracing::warn!(
            listen_addr = %addr,
            "metrics endpoint is exposed on all interfaces; restrict listen_addr in untrusted networks"
        );
    }

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {}", e))?;

    logrecycler_core::metrics::describe_all();

    tracing::info!(
        listen_addr = %addr,
        metric = config.metric.as_str(),
        "Prometheus metrics endpoint active"
    );

    Ok(())
}
