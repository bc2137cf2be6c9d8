//! Registry configuration.
//!
//! Loads limits from environment variables with sensible defaults.

use gated_registry_runtime::StoreConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Default number of notifications buffered per subscriber
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 1024;

/// Largest accepted per-subscriber notification buffer
pub const MAX_NOTIFICATION_CAPACITY: usize = gated_registry_runtime::MAX_BROADCAST_CAPACITY;

/// Registry configuration.
///
/// Name lengths are unlimited unless a maximum is set.
///
/// # Example
///
/// ```
/// use gated_registry::RegistryConfig;
///
/// let config = RegistryConfig::default().with_max_event_name_len(32);
/// assert_eq!(config.max_event_name_len, Some(32));
/// assert_eq!(config.max_display_name_len, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Longest accepted event name, in characters; `None` for no limit
    pub max_event_name_len: Option<usize>,
    /// Longest accepted display name, in characters; `None` for no limit
    pub max_display_name_len: Option<usize>,
    /// Broadcast buffer per subscriber, capped at [`MAX_NOTIFICATION_CAPACITY`]
    pub notification_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_event_name_len: None,
            max_display_name_len: None,
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `REGISTRY_MAX_EVENT_NAME_LEN`, `REGISTRY_MAX_DISPLAY_NAME_LEN` and
    /// `REGISTRY_NOTIFICATION_CAPACITY`. Missing or unparsable values fall
    /// back to the defaults; an unset name limit means no limit.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_event_name_len: env::var("REGISTRY_MAX_EVENT_NAME_LEN")
                .ok()
                .and_then(|s| s.parse().ok()),
            max_display_name_len: env::var("REGISTRY_MAX_DISPLAY_NAME_LEN")
                .ok()
                .and_then(|s| s.parse().ok()),
            notification_capacity: env::var("REGISTRY_NOTIFICATION_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_NOTIFICATION_CAPACITY),
        }
    }

    /// Set the maximum event name length
    #[must_use]
    pub const fn with_max_event_name_len(mut self, max: usize) -> Self {
        self.max_event_name_len = Some(max);
        self
    }

    /// Set the maximum display name length
    #[must_use]
    pub const fn with_max_display_name_len(mut self, max: usize) -> Self {
        self.max_display_name_len = Some(max);
        self
    }

    /// Set the per-subscriber notification buffer
    #[must_use]
    pub const fn with_notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity;
        self
    }

    /// Store configuration derived from this one
    ///
    /// The notification buffer is clamped to `1..=MAX_NOTIFICATION_CAPACITY`.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.notification_capacity.clamp(1, MAX_NOTIFICATION_CAPACITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();

        assert_eq!(config.max_event_name_len, None);
        assert_eq!(config.max_display_name_len, None);
        assert_eq!(config.store_config().broadcast_capacity, 1024);
    }

    #[test]
    fn test_builders() {
        let config = RegistryConfig::default()
            .with_max_event_name_len(10)
            .with_max_display_name_len(5)
            .with_notification_capacity(8);

        assert_eq!(config.max_event_name_len, Some(10));
        assert_eq!(config.max_display_name_len, Some(5));
        assert_eq!(config.store_config(), StoreConfig::new(8));
    }

    #[test]
    fn test_notification_capacity_is_clamped() {
        let huge = RegistryConfig::default().with_notification_capacity(usize::MAX);
        let zero = RegistryConfig::default().with_notification_capacity(0);

        assert_eq!(
            huge.store_config().broadcast_capacity,
            MAX_NOTIFICATION_CAPACITY
        );
        assert_eq!(zero.store_config().broadcast_capacity, 1);
    }
}
