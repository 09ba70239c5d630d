//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Metadata file writes
//! - Bytes stored from uploads
//! - View/download counter increments

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

// =============================================================================
// Metadata Store Metrics
// =============================================================================

/// Metadata file writes by result.
pub static METADATA_WRITES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "examcat_metadata_writes_total",
            "Total metadata file writes",
        ),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Counter increments by field.
pub static COUNTER_INCREMENTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "examcat_counter_increments_total",
            "Total view/download counter increments",
        ),
        &["field"], // "views", "downloads"
    )
    .unwrap()
});

// =============================================================================
// Upload Metrics
// =============================================================================

/// Bytes written to the uploads directory.
pub static UPLOAD_BYTES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "examcat_upload_bytes_total",
        "Total bytes stored from uploads",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Metadata
        Box::new(METADATA_WRITES.clone()),
        Box::new(COUNTER_INCREMENTS.clone()),
        // Uploads
        Box::new(UPLOAD_BYTES.clone()),
    ]
}
