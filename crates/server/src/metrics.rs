//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the exam catalog server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Upload outcomes and exam file sizes
//! - Catalog size (collected on scrape)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "examcat_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("examcat_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "examcat_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Upload Metrics
// =============================================================================

/// Upload requests by result.
pub static UPLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("examcat_uploads_total", "Total upload requests"),
        &["result"], // "success", "file_type", "file_too_large", "too_many_files", ...
    )
    .unwrap()
});

/// Size of accepted exam documents.
pub static EXAM_FILE_SIZE: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "examcat_exam_file_size_bytes",
            "Size of uploaded exam documents",
        )
        .buckets(vec![
            64_000.0,
            256_000.0,
            1_000_000.0,
            5_000_000.0,
            20_000_000.0,
            50_000_000.0,
        ]),
        &["format"],
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics (collected dynamically)
// =============================================================================

/// Entries in the metadata file.
pub static CATALOG_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "examcat_catalog_entries",
        "Number of entries in the exam catalog",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Uploads
    registry.register(Box::new(UPLOADS_TOTAL.clone())).unwrap();
    registry.register(Box::new(EXAM_FILE_SIZE.clone())).unwrap();

    // Catalog
    registry
        .register(Box::new(CATALOG_ENTRIES.clone()))
        .unwrap();

    // Core metrics (metadata writes, counters, stored bytes)
    for metric in exam_catalog_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// Called right before encoding so gauges reflect the metadata file as it
/// is now.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(count) = state.metadata().count() {
        CATALOG_ENTRIES.set(count as i64);
    }
}

static SEARCH_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/api/exams/search/[^/]+").unwrap());
static EXAM_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/api/exams/[^/]+").unwrap());
static UPLOAD_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/uploads/.+").unwrap());

/// Normalize a path for metric labels (replace ids, keywords and stored
/// file names with placeholders).
pub fn normalize_path(path: &str) -> String {
    if SEARCH_PATH.is_match(path) {
        return SEARCH_PATH
            .replace(path, "/api/exams/search/{keyword}")
            .to_string();
    }
    if UPLOAD_PATH.is_match(path) {
        return "/uploads/{file}".to_string();
    }
    EXAM_PATH.replace(path, "/api/exams/{id}").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_exam_id() {
        assert_eq!(normalize_path("/api/exams/exam-1a2b3c4d5e6f"), "/api/exams/{id}");
        assert_eq!(
            normalize_path("/api/exams/exam-1a2b3c4d5e6f/download"),
            "/api/exams/{id}/download"
        );
    }

    #[test]
    fn test_normalize_path_search_keyword() {
        assert_eq!(
            normalize_path("/api/exams/search/%E5%87%BD%E6%95%B0"),
            "/api/exams/search/{keyword}"
        );
    }

    #[test]
    fn test_normalize_path_uploads() {
        assert_eq!(
            normalize_path("/uploads/files/paper_1700000000000-42.pdf"),
            "/uploads/{file}"
        );
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/exams"), "/api/exams");
        assert_eq!(normalize_path("/health"), "/health");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("examcat_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_all_metrics() {
        // Prometheus only outputs metrics that have been touched.
        HTTP_REQUEST_DURATION
            .with_label_values(&["GET", "/test", "200"])
            .observe(0.1);
        HTTP_REQUESTS_IN_FLIGHT.set(0);
        UPLOADS_TOTAL.with_label_values(&["success"]).inc();
        CATALOG_ENTRIES.set(0);
        exam_catalog_core::metrics::METADATA_WRITES
            .with_label_values(&["success"])
            .inc();

        let output = encode_metrics();

        assert!(output.contains("examcat_http_request_duration_seconds"));
        assert!(output.contains("examcat_http_requests_in_flight"));
        assert!(output.contains("examcat_uploads_total"));
        assert!(output.contains("examcat_catalog_entries"));
        assert!(output.contains("examcat_metadata_writes_total"));
    }
}
