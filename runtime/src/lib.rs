//! # Gated Registry Runtime
//!
//! Runtime for the NFT-gated event registry.
//!
//! This crate provides the Store that owns registry state and serializes
//! every mutating action through a single write lock.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs the reducer, executes effects
//! - **Notifications**: `Publish` effects are broadcast to subscribers in the
//!   order actions were serialized
//! - **Metrics**: Prometheus recorder and metric descriptions
//!
//! ## Example
//!
//! ```ignore
//! use gated_registry_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! let output = store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use gated_registry_core::reducer::Reducer;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Prometheus metrics for observability
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors raised by the Store itself, independent of any reducer
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// Returned by `send()` once `close()` has been called.
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }
}

pub use error::StoreError;
pub use store::Store;

/// Largest broadcast buffer a store allocates per subscriber
pub const MAX_BROADCAST_CAPACITY: usize = 1 << 16;

/// Store configuration
///
/// # Example
///
/// ```
/// use gated_registry_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_broadcast_capacity(1024);
/// assert_eq!(config.broadcast_capacity, 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of notifications buffered per subscriber before it lags
    ///
    /// Clamped to `1..=MAX_BROADCAST_CAPACITY` when the store is built.
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Create a configuration with the given broadcast capacity
    #[must_use]
    pub const fn new(broadcast_capacity: usize) -> Self {
        Self { broadcast_capacity }
    }

    /// Set the broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
        }
    }
}

/// Store runtime for coordinating reducer execution and notification delivery.
pub mod store {
    use super::{Arc, MAX_BROADCAST_CAPACITY, Reducer, RwLock, StoreConfig, StoreError};
    use crate::metrics::StoreMetrics;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; writers are fully serialized)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Notification delivery (`tokio::sync::broadcast`)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        closed: AtomicBool,
        notifications: broadcast::Sender<R::Notification>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        R::Notification: Clone + std::fmt::Debug,
        R::Error: From<StoreError> + std::fmt::Display,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        ///
        /// The broadcast capacity is clamped to `1..=MAX_BROADCAST_CAPACITY`.
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (notifications, _) = broadcast::channel(
                config.broadcast_capacity.clamp(1, MAX_BROADCAST_CAPACITY),
            );

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                closed: AtomicBool::new(false),
                notifications,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. On success, publishes every notification effect in order
        /// 4. Releases the lock and returns the reducer output
        ///
        /// Concurrent `send()` calls serialize on the write lock, so each
        /// action sees every write made by the actions ordered before it, and
        /// notifications reach subscribers in that same order.
        ///
        /// # Errors
        ///
        /// Returns the reducer's error verbatim when the action is rejected,
        /// or [`StoreError::ShutdownInProgress`] (converted into the reducer's
        /// error type) after [`Store::close`].
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<R::Output, R::Error> {
            if self.closed.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                StoreMetrics::record_shutdown_rejection();
                return Err(StoreError::ShutdownInProgress.into());
            }

            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            // close() may have run while this call waited for the lock
            if self.closed.load(Ordering::Acquire) {
                drop(state);
                tracing::warn!("Rejected queued action: store is shutting down");
                StoreMetrics::record_shutdown_rejection();
                return Err(StoreError::ShutdownInProgress.into());
            }

            let start = std::time::Instant::now();
            let result = self.reducer.reduce(&mut *state, action, &self.environment);
            StoreMetrics::record_action(start.elapsed());

            let reduction = match result {
                Ok(reduction) => reduction,
                Err(error) => {
                    tracing::debug!(%error, "Action rejected by reducer");
                    StoreMetrics::record_rejection();
                    return Err(error);
                },
            };

            tracing::trace!("Reducer completed, executing {} effects", reduction.effects.len());
            for effect in reduction.effects {
                effect.for_each_notification(&mut |notification| self.publish(notification));
            }

            drop(state);
            Ok(reduction.output)
        }

        fn publish(&self, notification: R::Notification) {
            tracing::debug!(?notification, "Publishing notification");
            StoreMetrics::record_notification();

            // No subscribers is not an error: notifications are fire-and-forget
            if self.notifications.send(notification).is_err() {
                tracing::trace!("Notification dropped, no subscribers");
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let event_count = store.state(|s| s.event_count()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Subscribe to notifications published after this call
        ///
        /// A receiver that falls more than the configured broadcast capacity
        /// behind gets `RecvError::Lagged` and skips ahead.
        #[must_use]
        pub fn subscribe(&self) -> broadcast::Receiver<R::Notification> {
            self.notifications.subscribe()
        }

        /// Stop accepting actions; reads keep working
        ///
        /// Actions still waiting for the write lock are rejected as well.
        pub fn close(&self) {
            tracing::info!("Store closed to new actions");
            self.closed.store(true, Ordering::Release);
        }

        /// Whether [`Store::close`] has been called
        #[must_use]
        pub fn is_closed(&self) -> bool {
            self.closed.load(Ordering::Acquire)
        }

        /// The injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }
    }
}
