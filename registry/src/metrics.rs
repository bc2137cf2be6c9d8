//! Registry metrics, recorded through the `metrics` facade.
//!
//! Descriptions are registered by
//! `gated_registry_runtime::metrics::PrometheusMetrics::install`.

use crate::error::RegistryError;
use metrics::counter;

/// Registry metrics recorder.
pub struct RegistryMetrics;

impl RegistryMetrics {
    /// Record a created event.
    pub fn record_event_created() {
        counter!("registry_events_created_total").increment(1);
    }

    /// Record an accepted registration.
    pub fn record_registration() {
        counter!("registry_registrations_total").increment(1);
    }

    /// Record a rejected registration, labelled with the error code.
    pub fn record_rejection(error: &RegistryError) {
        counter!("registry_registrations_rejected_total", "reason" => error.code())
            .increment(1);
    }
}
