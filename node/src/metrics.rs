//! # Prometheus Metrics
//!
//! Operational metrics for the node, scraped at the `/metrics` HTTP
//! endpoint on the configured metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so they
//! do not collide with any default global registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the node.
///
/// Clone-friendly (wraps `Arc` internally via prometheus handles) so it can
/// be shared across request handlers.
#[derive(Clone)]
pub struct NodeMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Height of the chain currently hosted by this node.
    pub chain_height: IntGauge,
    /// Total number of blocks appended since startup, across chain resets.
    pub blocks_appended_total: IntCounter,
    /// Total number of chain validations performed.
    pub validations_total: IntCounter,
    /// Total number of validations that reported a failure.
    pub validation_failures_total: IntCounter,
    /// Histogram of chain validation latency in seconds.
    pub validate_latency_seconds: Histogram,
}

impl NodeMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("strata".into()), None)
            .expect("failed to create prometheus registry");

        let chain_height = IntGauge::new("chain_height", "Height of the hosted chain")
            .expect("metric creation");
        registry
            .register(Box::new(chain_height.clone()))
            .expect("metric registration");

        let blocks_appended_total = IntCounter::new(
            "blocks_appended_total",
            "Total number of blocks appended since startup",
        )
        .expect("metric creation");
        registry
            .register(Box::new(blocks_appended_total.clone()))
            .expect("metric registration");

        let validations_total = IntCounter::new(
            "validations_total",
            "Total number of chain validations performed",
        )
        .expect("metric creation");
        registry
            .register(Box::new(validations_total.clone()))
            .expect("metric registration");

        let validation_failures_total = IntCounter::new(
            "validation_failures_total",
            "Total number of chain validations that reported a failure",
        )
        .expect("metric creation");
        registry
            .register(Box::new(validation_failures_total.clone()))
            .expect("metric registration");

        let validate_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "validate_latency_seconds",
                "Chain validation latency in seconds",
            )
            .buckets(vec![
                0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1,
            ]),
        )
        .expect("metric creation");
        registry
            .register(Box::new(validate_latency_seconds.clone()))
            .expect("metric registration");

        Self {
            registry,
            chain_height,
            blocks_appended_total,
            validations_total,
            validation_failures_total,
            validate_latency_seconds,
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("prometheus output is valid utf-8"))
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<NodeMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
///
/// Returns HTTP 500 if encoding fails (should never happen in practice).
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
