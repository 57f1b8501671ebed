//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    ATTACHMENTS_SKIPPED_TOTAL, ATTACHMENTS_WRITTEN_TOTAL, ATTACHMENT_BYTES_TOTAL,
    PREVIEWS_LOADED, REGISTRY_ID_COLLISIONS_TOTAL, REGISTRY_LOADS_TOTAL, RENDERS_TOTAL,
    RENDER_LATENCY,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for registry metrics
pub struct RegistryMetrics;

impl RegistryMetrics {
    /// Record a successful load and the new snapshot size
    pub fn record_loaded(previews: usize) {
        REGISTRY_LOADS_TOTAL.with_label_values(&["ok"]).inc();
        PREVIEWS_LOADED.set(previews as i64);
    }

    /// Record a load that failed and left the old snapshot in place
    pub fn record_load_failed() {
        REGISTRY_LOADS_TOTAL.with_label_values(&["error"]).inc();
    }

    pub fn record_id_collision() {
        REGISTRY_ID_COLLISIONS_TOTAL.inc();
    }
}

/// Helper struct for render metrics
pub struct RenderMetrics;

impl RenderMetrics {
    pub fn record_success(elapsed: Duration) {
        RENDERS_TOTAL.with_label_values(&["ok"]).inc();
        RENDER_LATENCY.observe(elapsed.as_secs_f64());
    }

    pub fn record_failure() {
        RENDERS_TOTAL.with_label_values(&["error"]).inc();
    }
}

/// Helper struct for attachment metrics
pub struct AttachmentMetrics;

impl AttachmentMetrics {
    pub fn record_written(bytes: usize) {
        ATTACHMENTS_WRITTEN_TOTAL.inc();
        ATTACHMENT_BYTES_TOTAL.inc_by(bytes as u64);
    }

    pub fn record_skipped() {
        ATTACHMENTS_SKIPPED_TOTAL.inc();
    }
}
