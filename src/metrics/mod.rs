//! Prometheus metrics for the preview registry.
//!
//! This module tracks:
//! - Registry metrics (previews loaded, reloads)
//! - Render metrics (renders by outcome, render latency)
//! - Attachment metrics (files written, duplicates skipped, bytes)

mod helpers;

pub use helpers::{encode_metrics, AttachmentMetrics, RegistryMetrics, RenderMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "ara_preview";

lazy_static! {
    // ============================================================================
    // Registry Metrics
    // ============================================================================

    /// Previews in the current registry snapshot
    pub static ref PREVIEWS_LOADED: IntGauge = register_int_gauge!(
        format!("{}_previews_loaded", METRIC_PREFIX),
        "Number of previews in the current registry snapshot"
    ).unwrap();

    /// Registry loads by outcome
    pub static ref REGISTRY_LOADS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_registry_loads_total", METRIC_PREFIX),
        "Total registry load attempts",
        &["outcome"]
    ).unwrap();

    /// Duplicate preview ids seen while loading
    pub static ref REGISTRY_ID_COLLISIONS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_registry_id_collisions_total", METRIC_PREFIX),
        "Total preview id collisions during load"
    ).unwrap();

    // ============================================================================
    // Render Metrics
    // ============================================================================

    /// Renders by outcome
    pub static ref RENDERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_renders_total", METRIC_PREFIX),
        "Total preview renders",
        &["outcome"]
    ).unwrap();

    /// Render latency (generation + attachments + hooks)
    pub static ref RENDER_LATENCY: Histogram = register_histogram!(
        format!("{}_render_latency_seconds", METRIC_PREFIX),
        "Preview render latency in seconds",
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    ).unwrap();

    // ============================================================================
    // Attachment Metrics
    // ============================================================================

    /// Attachments written to disk
    pub static ref ATTACHMENTS_WRITTEN_TOTAL: IntCounter = register_int_counter!(
        format!("{}_attachments_written_total", METRIC_PREFIX),
        "Total attachments written to the attachments directory"
    ).unwrap();

    /// Attachments skipped because the file already existed or the name was unusable
    pub static ref ATTACHMENTS_SKIPPED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_attachments_skipped_total", METRIC_PREFIX),
        "Total attachments skipped"
    ).unwrap();

    /// Attachment bytes written
    pub static ref ATTACHMENT_BYTES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_attachment_bytes_total", METRIC_PREFIX),
        "Total attachment bytes written"
    ).unwrap();
}
