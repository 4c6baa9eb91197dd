//! Metric sink assembly from configuration.

use anyhow::Result;
use logrecycler_core::config::RecyclerConfig;
use logrecycler_pipeline::{MetricSink, PrometheusSink, StatsdSink};

use crate::metrics_server;

/// Build the sinks enabled in `config`, in Prometheus then StatsD order.
///
/// Installing the Prometheus recorder starts its HTTP listener, so this
/// must run inside the tokio runtime.
pub fn build_sinks(config: &RecyclerConfig) -> Result<Vec<Box<dyn MetricSink>>> {
    let mut sinks: Vec<Box<dyn MetricSink>> = Vec::new();

    if let Some(ref prometheus) = config.prometheus {
        metrics_server::install_metrics_recorder(prometheus)?;
        sinks.push(Box::new(PrometheusSink::new(prometheus.metric.clone())));
    }

    if let Some(ref statsd) = config.statsd {
        let sink = StatsdSink::connect(&statsd.address, statsd.metric.clone())
            .map_err(|e| anyhow::anyhow!("failed to set up statsd sink: {}", e))?;
        sinks.push(Box::new(sink));
    }

    Ok(sinks)
}
