//! Prometheus export and portal-level counters.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Call once at startup.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("metrics recorder already initialized"))
}

/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

pub fn record_upload(outcome: &'static str) {
    counter!("portal_uploads_total", "outcome" => outcome).increment(1);
}

pub fn record_delete(outcome: &'static str) {
    counter!("portal_deletes_total", "outcome" => outcome).increment(1);
}

pub fn record_download(outcome: &'static str) {
    counter!("portal_downloads_total", "outcome" => outcome).increment(1);
}
