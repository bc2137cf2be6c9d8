//! Async facade over the registry store.

use crate::action::RegistryAction;
use crate::config::RegistryConfig;
use crate::environment::RegistryEnvironment;
use crate::error::Result;
use crate::metrics::RegistryMetrics;
use crate::notification::RegistryNotification;
use crate::reducer::RegistryReducer;
use crate::state::RegistryState;
use crate::types::{Category, Event, EventId, EventStatus, Registration};
use gated_registry_core::environment::{Clock, OwnershipOracle, SystemClock};
use gated_registry_core::identity::{CollectionAddress, Principal};
use gated_registry_runtime::Store;
use tokio::sync::broadcast;

type RegistryStore<O, C> =
    Store<RegistryState, RegistryAction, RegistryEnvironment<O, C>, RegistryReducer<O, C>>;

/// NFT-gated event registry.
///
/// Mutations are serialized through a single [`Store`]; concurrent calls
/// observe each other's writes in a total order, and notifications are
/// published in that same order. Queries take the read lock and return
/// owned copies.
///
/// # Example
///
/// ```ignore
/// let registry = EventRegistry::new(RegistryEnvironment::with_system_clock(oracle));
///
/// let id = registry
///     .create_event_with_capacity(&organizer, collection, "Devfest", Category::FREE, 200)
///     .await?;
/// registry.register_for_event(&holder, id, "Ada").await?;
/// assert!(registry.has_registered(&holder, id).await);
/// ```
pub struct EventRegistry<O, C = SystemClock>
where
    O: OwnershipOracle,
    C: Clock,
{
    store: RegistryStore<O, C>,
}

impl<O, C> EventRegistry<O, C>
where
    O: OwnershipOracle,
    C: Clock,
{
    /// Empty registry with the default configuration
    #[must_use]
    pub fn new(environment: RegistryEnvironment<O, C>) -> Self {
        Self::with_config(environment, RegistryConfig::default())
    }

    /// Empty registry with a custom configuration
    #[must_use]
    pub fn with_config(environment: RegistryEnvironment<O, C>, config: RegistryConfig) -> Self {
        Self::from_state(RegistryState::default(), environment, config)
    }

    /// Registry resumed from a [`EventRegistry::snapshot`]
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Snapshot`] if the bytes do not decode
    /// into a consistent state.
    pub fn restore(
        bytes: &[u8],
        environment: RegistryEnvironment<O, C>,
        config: RegistryConfig,
    ) -> Result<Self> {
        let state = RegistryState::from_snapshot(bytes)?;
        tracing::info!(
            event_count = state.event_count(),
            user_count = state.user_count(),
            "Registry restored from snapshot"
        );
        Ok(Self::from_state(state, environment, config))
    }

    fn from_state(
        state: RegistryState,
        environment: RegistryEnvironment<O, C>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            store: Store::with_config(
                state,
                RegistryReducer::new(&config),
                environment,
                config.store_config(),
            ),
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Mutations
    // ═══════════════════════════════════════════════════════════

    /// Create an event with unlimited capacity; returns its id
    ///
    /// # Errors
    ///
    /// [`crate::RegistryError::InvalidCollection`] for the zero collection,
    /// or a name validation error.
    pub async fn create_event(
        &self,
        caller: &Principal,
        nft_collection: CollectionAddress,
        name: impl Into<String>,
        category: Category,
    ) -> Result<EventId> {
        self.create(caller, nft_collection, name.into(), category, None)
            .await
    }

    /// Create an event accepting at most `max_registrations`; returns its id
    ///
    /// # Errors
    ///
    /// As [`EventRegistry::create_event`], plus
    /// [`crate::RegistryError::InvalidCapacity`] when `max_registrations` is zero.
    pub async fn create_event_with_capacity(
        &self,
        caller: &Principal,
        nft_collection: CollectionAddress,
        name: impl Into<String>,
        category: Category,
        max_registrations: u64,
    ) -> Result<EventId> {
        self.create(
            caller,
            nft_collection,
            name.into(),
            category,
            Some(max_registrations),
        )
        .await
    }

    async fn create(
        &self,
        caller: &Principal,
        nft_collection: CollectionAddress,
        name: String,
        category: Category,
        max_registrations: Option<u64>,
    ) -> Result<EventId> {
        let outcome = self
            .store
            .send(RegistryAction::CreateEvent {
                caller: *caller,
                nft_collection,
                name,
                category,
                max_registrations,
            })
            .await?;

        let event_id = outcome.event_id();
        tracing::info!(%event_id, manager = %caller, collection = %nft_collection, "Event created");
        RegistryMetrics::record_event_created();
        Ok(event_id)
    }

    /// Register `caller` for `event_id`
    ///
    /// Preconditions are checked in order and the first failure is returned:
    /// the event exists, the caller holds a token of its collection, the
    /// caller is not yet registered, and the event has room.
    ///
    /// # Errors
    ///
    /// `InvalidEventId`, `NotEligible`, `OracleUnavailable`,
    /// `AlreadyRegistered`, `EventFull` or `DisplayNameTooLong`; state is
    /// unchanged in every case.
    pub async fn register_for_event(
        &self,
        caller: &Principal,
        event_id: EventId,
        display_name: impl Into<String>,
    ) -> Result<()> {
        self.store
            .send(RegistryAction::RegisterForEvent {
                caller: *caller,
                event_id,
                display_name: display_name.into(),
            })
            .await
            .inspect_err(|error| {
                tracing::warn!(%event_id, participant = %caller, %error, "Registration rejected");
                RegistryMetrics::record_rejection(error);
            })?;

        tracing::info!(%event_id, participant = %caller, "Registered for event");
        RegistryMetrics::record_registration();
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════

    /// Whether `participant` is registered for `event_id`; unknown ids yield `false`
    pub async fn has_registered(&self, participant: &Principal, event_id: EventId) -> bool {
        self.store
            .state(|s| s.has_registered(participant, event_id))
            .await
    }

    /// Number of events created
    pub async fn event_count(&self) -> u64 {
        self.store.state(RegistryState::event_count).await
    }

    /// Total successful registrations
    pub async fn user_count(&self) -> u64 {
        self.store.state(RegistryState::user_count).await
    }

    /// Copy of an event
    pub async fn event(&self, event_id: EventId) -> Option<Event> {
        self.store.state(|s| s.event(event_id).cloned()).await
    }

    /// Open or full; `None` for unknown ids
    pub async fn event_status(&self, event_id: EventId) -> Option<EventStatus> {
        self.store
            .state(|s| s.event(event_id).map(Event::status))
            .await
    }

    /// Registrations still accepted; `None` for unknown ids
    pub async fn remaining_capacity(&self, event_id: EventId) -> Option<u64> {
        self.store
            .state(|s| s.event(event_id).map(Event::remaining_capacity))
            .await
    }

    /// Registrations for an event, ordered by participant
    pub async fn registrations(&self, event_id: EventId) -> Vec<Registration> {
        self.store
            .state(|s| s.registrations_for(event_id).cloned().collect())
            .await
    }

    /// A single registration record
    pub async fn registration(
        &self,
        participant: &Principal,
        event_id: EventId,
    ) -> Option<Registration> {
        self.store
            .state(|s| s.registration(participant, event_id).cloned())
            .await
    }

    /// Events created by `manager`, ordered by id
    pub async fn events_managed_by(&self, manager: &Principal) -> Vec<Event> {
        self.store
            .state(|s| s.events_managed_by(manager).cloned().collect())
            .await
    }

    // ═══════════════════════════════════════════════════════════
    // Lifecycle
    // ═══════════════════════════════════════════════════════════

    /// Receive notifications published after this call
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryNotification> {
        self.store.subscribe()
    }

    /// Encode the current state
    ///
    /// Taken under the read lock, so it reflects a point between two actions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegistryError::Snapshot`] if encoding fails.
    pub async fn snapshot(&self) -> Result<Vec<u8>> {
        self.store.state(RegistryState::to_snapshot).await
    }

    /// Stop accepting mutations; queries keep working
    pub fn close(&self) {
        self.store.close();
    }

    /// The injected environment
    #[must_use]
    pub const fn environment(&self) -> &RegistryEnvironment<O, C> {
        self.store.environment()
    }
}
