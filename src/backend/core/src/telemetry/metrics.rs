//! Prometheus metrics for requests, record creation and report computation.
//!
//! # Example
//!
//! ```rust,no_run
//! use campus_core::telemetry::metrics::{BusinessMetrics, RequestDurationHistogram};
//!
//! RequestDurationHistogram::record("GET", "/events", 200, 0.002);
//! BusinessMetrics::record_created("event");
//! ```

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Global metrics registry.
static METRICS_REGISTRY: OnceLock<MetricsRegistry> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,

    /// Histogram buckets for request durations (in seconds)
    #[serde(default = "default_duration_buckets")]
    pub duration_buckets: Vec<f64>,

    /// Global labels to add to all metrics
    #[serde(default)]
    pub global_labels: HashMap<String, String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            duration_buckets: default_duration_buckets(),
            global_labels: HashMap::new(),
        }
    }
}

fn default_metrics_enabled() -> bool {
    true
}

fn default_duration_buckets() -> Vec<f64> {
    vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
}

/// Handle to the installed Prometheus recorder, if any.
#[derive(Clone, Default)]
pub struct MetricsRegistry {
    prometheus_handle: Option<PrometheusHandle>,
}

impl std::fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRegistry")
            .field("prometheus_handle", &self.prometheus_handle.is_some())
            .finish()
    }
}

impl MetricsRegistry {
    /// Get the global metrics registry. Empty until [`init_metrics`] runs.
    pub fn global() -> &'static MetricsRegistry {
        METRICS_REGISTRY.get_or_init(MetricsRegistry::default)
    }

    pub fn is_enabled(&self) -> bool {
        self.prometheus_handle.is_some()
    }

    /// Render all metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.prometheus_handle
            .as_ref()
            .map(PrometheusHandle::render)
            .unwrap_or_default()
    }
}

/// Initialize the metrics subsystem and publish the handle globally.
///
/// # Errors
///
/// Returns an error if the buckets are invalid or a recorder is already
/// installed.
pub fn init_metrics(config: &MetricsConfig, service_name: &str) -> anyhow::Result<MetricsRegistry> {
    if !config.enabled {
        return Ok(MetricsRegistry::default());
    }

    let mut builder = PrometheusBuilder::new();
    for (key, value) in &config.global_labels {
        builder = builder.add_global_label(key, value);
    }
    builder = builder.set_buckets(&config.duration_buckets)?;

    let handle = builder.install_recorder()?;
    register_metric_descriptions();

    let registry = MetricsRegistry {
        prometheus_handle: Some(handle),
    };
    if METRICS_REGISTRY.set(registry.clone()).is_err() {
        tracing::warn!("Metrics registry already initialized; keeping the first handle");
    }

    tracing::info!(service_name = %service_name, "Metrics initialized");

    Ok(registry)
}

fn register_metric_descriptions() {
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_counter!("http_request_errors_total", "Total number of HTTP error responses");

    describe_counter!("campus_errors_total", "Total number of errors by code");
    describe_counter!(
        "campus_records_created_total",
        "Records created, by entity"
    );
    describe_counter!("campus_reports_total", "Reports computed, by report");
    describe_counter!("campus_seed_total", "Calls to the seed operation, by outcome");
}

/// Request duration histogram for HTTP requests.
pub struct RequestDurationHistogram;

impl RequestDurationHistogram {
    /// Record one finished request.
    ///
    /// `path` should be the matched route template, not the raw URI, to keep
    /// label cardinality bounded.
    pub fn record(method: &str, path: &str, status_code: u16, duration_seconds: f64) {
        histogram!(
            "http_request_duration_seconds",
            "method" => method.to_string(),
            "path" => path.to_string(),
            "status_code" => status_code.to_string(),
        )
        .record(duration_seconds);

        counter!(
            "http_requests_total",
            "method" => method.to_string(),
            "path" => path.to_string(),
            "status_code" => status_code.to_string(),
        )
        .increment(1);

        if status_code >= 400 {
            counter!(
                "http_request_errors_total",
                "method" => method.to_string(),
                "path" => path.to_string(),
                "status_code" => status_code.to_string(),
            )
            .increment(1);
        }
    }
}

/// Domain counters.
pub struct BusinessMetrics;

impl BusinessMetrics {
    pub fn record_created(entity: &'static str) {
        counter!("campus_records_created_total", "entity" => entity).increment(1);
    }

    pub fn record_report(report: &'static str) {
        counter!("campus_reports_total", "report" => report).increment(1);
    }

    pub fn record_seed(loaded: bool) {
        let outcome = if loaded { "loaded" } else { "skipped" };
        counter!("campus_seed_total", "outcome" => outcome).increment(1);
    }
}
