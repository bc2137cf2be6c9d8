//! # Gated Registry Testing
//!
//! Testing utilities and helpers for the NFT-gated event registry.
//!
//! This crate provides:
//! - Mock implementations of Environment traits ([`FixedClock`], [`MockOwnershipOracle`])
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Address helpers and proptest strategies
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use gated_registry_testing::{MockOwnershipOracle, collection, principal, test_clock};
//!
//! #[tokio::test]
//! async fn test_holder_registers() {
//!     let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
//!     let registry = EventRegistry::new(RegistryEnvironment::new(oracle, test_clock()));
//!
//!     let id = registry
//!         .create_event(&principal(9), collection(1), "Devfest", Category::FREE)
//!         .await?;
//!     registry.register_for_event(&principal(1), id, "Ada").await?;
//!     assert!(registry.has_registered(&principal(1), id).await);
//! }
//! ```

use chrono::{DateTime, Utc};
use gated_registry_core::environment::Clock;
use gated_registry_core::identity::{ADDRESS_LEN, CollectionAddress, Principal};

/// Mock ownership oracle
pub mod oracle_mocks;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    pub use crate::oracle_mocks::MockOwnershipOracle;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use gated_registry_testing::mocks::FixedClock;
    /// use gated_registry_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2024-11-16 09:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2024-11-16T09:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and utilities
pub mod helpers {
    use super::{ADDRESS_LEN, CollectionAddress, Principal};
    use tokio::sync::broadcast;

    fn address_bytes(n: u64) -> [u8; ADDRESS_LEN] {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 8..].copy_from_slice(&n.to_be_bytes());
        bytes
    }

    /// Deterministic principal whose address ends in `n`
    #[must_use]
    pub fn principal(n: u64) -> Principal {
        Principal::new(address_bytes(n))
    }

    /// Deterministic collection whose address ends in `n`
    ///
    /// `collection(0)` is the null collection.
    #[must_use]
    pub fn collection(n: u64) -> CollectionAddress {
        CollectionAddress::new(address_bytes(n))
    }

    /// Drain every notification currently buffered in a receiver
    ///
    /// Lagged gaps are skipped; the drain stops when the buffer is empty or
    /// the channel is closed.
    pub fn drain_notifications<N: Clone>(rx: &mut broadcast::Receiver<N>) -> Vec<N> {
        let mut drained = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(notification) => drained.push(notification),
                Err(broadcast::error::TryRecvError::Lagged(_)) => {},
                Err(_) => return drained,
            }
        }
    }

    /// Install a `tracing` subscriber for tests
    ///
    /// Honours `RUST_LOG`, defaults to `warn`, writes through the test
    /// harness so output is captured per test. Safe to call repeatedly.
    pub fn init_test_tracing() {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        // A second call finds the global subscriber already set; that is fine
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use super::{ADDRESS_LEN, CollectionAddress, Principal};
    use proptest::prelude::*;

    /// Any principal
    pub fn arb_principal() -> impl Strategy<Value = Principal> {
        proptest::array::uniform20(any::<u8>()).prop_map(Principal::new)
    }

    /// One of the first `n` deterministic principals, so collisions are likely
    pub fn arb_small_principal(n: u64) -> impl Strategy<Value = Principal> {
        (1..=n).prop_map(super::helpers::principal)
    }

    /// Any collection that is not the null handle
    pub fn arb_collection() -> impl Strategy<Value = CollectionAddress> {
        proptest::array::uniform20(any::<u8>())
            .prop_filter("null collection", |bytes| bytes != &[0u8; ADDRESS_LEN])
            .prop_map(CollectionAddress::new)
    }
}

// Re-export commonly used items
pub use helpers::{collection, drain_notifications, init_test_tracing, principal};
pub use mocks::{FixedClock, MockOwnershipOracle, test_clock};
pub use reducer_test::{ReducerTest, assertions};
