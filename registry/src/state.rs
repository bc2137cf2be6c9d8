//! Registry state: events, registrations and the two global counters.
//!
//! The state is a plain value owned by the Store. Reads go through the
//! query methods; writes are crate-private and only called by the reducer
//! once every precondition has passed.

use crate::error::{RegistryError, Result};
use crate::types::{Event, EventId, Registration};
use gated_registry_core::identity::{ADDRESS_LEN, Principal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const LOWEST_PRINCIPAL: Principal = Principal::new([0x00; ADDRESS_LEN]);
const HIGHEST_PRINCIPAL: Principal = Principal::new([0xff; ADDRESS_LEN]);

/// All registry data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    events: BTreeMap<EventId, Event>,
    registrations: BTreeMap<(EventId, Principal), Registration>,
    event_count: u64,
    user_count: u64,
}

impl RegistryState {
    /// Number of events ever created; also the id of the latest event
    #[must_use]
    pub const fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Total successful registrations across all events
    #[must_use]
    pub const fn user_count(&self) -> u64 {
        self.user_count
    }

    /// Look up an event
    #[must_use]
    pub fn event(&self, event_id: EventId) -> Option<&Event> {
        self.events.get(&event_id)
    }

    /// Whether `participant` is registered for `event_id`; unknown ids yield `false`
    #[must_use]
    pub fn has_registered(&self, participant: &Principal, event_id: EventId) -> bool {
        self.registrations.contains_key(&(event_id, *participant))
    }

    /// Look up a registration record
    #[must_use]
    pub fn registration(
        &self,
        participant: &Principal,
        event_id: EventId,
    ) -> Option<&Registration> {
        self.registrations.get(&(event_id, *participant))
    }

    /// Registrations for one event, ordered by participant
    pub fn registrations_for(&self, event_id: EventId) -> impl Iterator<Item = &Registration> {
        self.registrations
            .range((event_id, LOWEST_PRINCIPAL)..=(event_id, HIGHEST_PRINCIPAL))
            .map(|(_, registration)| registration)
    }

    /// Events created by `manager`, ordered by id
    pub fn events_managed_by<'a>(
        &'a self,
        manager: &'a Principal,
    ) -> impl Iterator<Item = &'a Event> + 'a {
        self.events
            .values()
            .filter(move |event| event.manager == *manager)
    }

    /// Id the next created event will receive
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CounterOverflow`] when the id space is exhausted.
    pub fn next_event_id(&self) -> Result<EventId> {
        self.event_count
            .checked_add(1)
            .map(EventId::new)
            .ok_or(RegistryError::CounterOverflow)
    }

    /// Store a new event and bump `event_count`
    ///
    /// The event's id must come from [`RegistryState::next_event_id`].
    pub(crate) fn insert_event(&mut self, event: Event) {
        self.event_count = event.id.get();
        self.events.insert(event.id, event);
    }

    /// Store a registration and bump the event's and the global counters
    ///
    /// Either every counter moves and the record is stored, or nothing changes.
    pub(crate) fn insert_registration(&mut self, registration: Registration) -> Result<()> {
        let user_count = self
            .user_count
            .checked_add(1)
            .ok_or(RegistryError::CounterOverflow)?;

        let event_id = registration.event_id;
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or(RegistryError::InvalidEventId { event_id })?;
        let registration_count = event
            .registration_count
            .checked_add(1)
            .ok_or(RegistryError::CounterOverflow)?;

        event.registration_count = registration_count;
        self.user_count = user_count;
        self.registrations
            .insert((event_id, registration.participant), registration);

        Ok(())
    }

    /// Encode the state with `bincode`
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Snapshot`] if encoding fails.
    pub fn to_snapshot(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| RegistryError::Snapshot(e.to_string()))
    }

    /// Decode and validate a snapshot produced by [`RegistryState::to_snapshot`]
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Snapshot`] if the bytes do not decode or the
    /// decoded state breaks a registry invariant.
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self> {
        let state: Self =
            bincode::deserialize(bytes).map_err(|e| RegistryError::Snapshot(e.to_string()))?;
        state.validate()?;
        Ok(state)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(RegistryError::Snapshot(reason));

        if u64::try_from(self.events.len()).ok() != Some(self.event_count) {
            return invalid(format!(
                "event_count is {} but {} events are stored",
                self.event_count,
                self.events.len()
            ));
        }

        let mut total = 0u64;
        for (expected, (id, event)) in (1..).map(EventId::new).zip(&self.events) {
            if *id != expected || event.id != expected {
                return invalid(format!("event ids are not sequential at {expected}"));
            }
            if event.nft_collection.is_zero() {
                return invalid(format!("event {id} is gated on the zero collection"));
            }
            if event.registration_count > event.max_registrations() {
                return invalid(format!("event {id} is over capacity"));
            }

            let recorded = self.registrations_for(*id).count();
            if u64::try_from(recorded).ok() != Some(event.registration_count) {
                return invalid(format!(
                    "event {id} counts {} registrations but {recorded} are stored",
                    event.registration_count
                ));
            }
            total = total.saturating_add(event.registration_count);
        }

        // Per-event ranges summing to the map size means no record is orphaned.
        let stored = u64::try_from(self.registrations.len()).unwrap_or(u64::MAX);
        if total != self.user_count || stored != total {
            return invalid(format!(
                "user_count is {} but events hold {total} registrations",
                self.user_count
            ));
        }

        if let Some(((event_id, participant), _)) = self
            .registrations
            .iter()
            .find(|((event_id, participant), registration)| {
                registration.event_id != *event_id || registration.participant != *participant
            })
        {
            return invalid(format!(
                "registration of {participant} for event {event_id} is stored under the wrong key"
            ));
        }

        Ok(())
    }
}
