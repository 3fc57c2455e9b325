//! Prometheus metrics HTTP server.
//!
//! Uses the built-in HTTP listener from `metrics-exporter-prometheus`
//! to expose a Prometheus scrape endpoint on a separate port.

use std::net::SocketAddr;

use anyhow::Result;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

use purlin_core::metrics::{ENRICH_DURATION_BUCKETS, ENRICH_DURATION_SECONDS};

/// Install the global metrics recorder and start the HTTP listener.
///
/// This function should be called once per process. After calling it,
/// all `metrics::counter!()` / `metrics::histogram!()` macros record to
/// the Prometheus format.
///
/// # Errors
///
/// - Socket binding fails
/// - Global recorder is already installed
pub fn install_metrics_recorder(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::warn!(
        listen_addr = %addr,
        "metrics endpoint is exposed on all interfaces; restrict access in untrusted networks"
    );

    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(ENRICH_DURATION_SECONDS.to_owned()),
            &ENRICH_DURATION_BUCKETS,
        )
        .map_err(|e| anyhow::anyhow!("failed to configure histogram buckets: {}", e))?
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {}", e))?;

    // Register metric descriptions
    purlin_core::metrics::describe_all();

    tracing::info!(listen_addr = %addr, "Prometheus metrics endpoint active");

    Ok(())
}
