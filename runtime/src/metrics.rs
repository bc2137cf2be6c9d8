//! Prometheus metrics for observability and monitoring.
//!
//! Metric collection for the Store and the registry built on it:
//! - Store actions, rejections and reducer latency
//! - Notifications published
//! - Registry events created and registrations accepted or rejected
//!
//! # Example
//!
//! ```rust,no_run
//! use gated_registry_runtime::metrics::PrometheusMetrics;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut metrics = PrometheusMetrics::new();
//! metrics.install()?;
//!
//! // Serve this from whatever HTTP endpoint the host application exposes
//! let scrape = metrics.render().unwrap_or_default();
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other crates
pub use metrics::{counter, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus recorder.
///
/// Installs the global `metrics` recorder and renders the scrape text.
#[derive(Default)]
pub struct PrometheusMetrics {
    handle: Option<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Create an uninstalled recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Register metric descriptions and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a recorder is already installed (e.g., by another test), the call
    /// succeeds without a handle and [`PrometheusMetrics::render`] returns `None`.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                register_metrics();
                tracing::info!("Prometheus metrics recorder installed");
                Ok(())
            },
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            },
        }
    }

    /// Get the Prometheus handle.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns `None` if this instance did not install the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Store Metrics
    describe_counter!("store_actions_total", "Total number of actions sent to the store");
    describe_counter!(
        "store_actions_rejected_total",
        "Total number of actions rejected by the reducer"
    );
    describe_counter!(
        "store_shutdown_rejections_total",
        "Total number of actions refused because the store was closed"
    );
    describe_counter!(
        "store_notifications_published_total",
        "Total number of notifications published to subscribers"
    );
    describe_histogram!(
        "store_reducer_duration_seconds",
        "Time spent inside the reducer, including the ownership check"
    );

    // Registry Metrics
    describe_counter!(
        "registry_events_created_total",
        "Total number of gated events created"
    );
    describe_counter!(
        "registry_registrations_total",
        "Total number of successful registrations"
    );
    describe_counter!(
        "registry_registrations_rejected_total",
        "Total number of rejected registrations, labelled by reason"
    );
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record an action passing through the reducer.
    pub fn record_action(duration: Duration) {
        counter!("store_actions_total").increment(1);
        histogram!("store_reducer_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a reducer rejection.
    pub fn record_rejection() {
        counter!("store_actions_rejected_total").increment(1);
    }

    /// Record an action refused after shutdown.
    pub fn record_shutdown_rejection() {
        counter!("store_shutdown_rejections_total").increment(1);
    }

    /// Record a published notification.
    pub fn record_notification() {
        counter!("store_notifications_published_total").increment(1);
    }
}
