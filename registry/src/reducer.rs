//! Registry reducer: validates requests against state, then applies them.
//!
//! Every check runs before the first write, so a rejected action leaves
//! [`RegistryState`] exactly as it was.

use crate::action::{RegistryAction, RegistryOutcome};
use crate::config::RegistryConfig;
use crate::environment::RegistryEnvironment;
use crate::error::{RegistryError, Result};
use crate::notification::RegistryNotification;
use crate::state::RegistryState;
use crate::types::{Capacity, Event, EventId, Registration};
use gated_registry_core::effect::Effect;
use gated_registry_core::environment::{Clock, OwnershipOracle};
use gated_registry_core::identity::{CollectionAddress, Principal};
use gated_registry_core::reducer::{Reducer, Reduction};

/// Reducer for the event registry
///
/// Holds the name limits from [`RegistryConfig`]; everything else comes
/// from state and the injected environment.
#[derive(Debug, Clone)]
pub struct RegistryReducer<O, C> {
    max_event_name_len: Option<usize>,
    max_display_name_len: Option<usize>,
    _phantom: std::marker::PhantomData<(O, C)>,
}

impl<O, C> RegistryReducer<O, C> {
    /// Creates a new `RegistryReducer`
    #[must_use]
    pub const fn new(config: &RegistryConfig) -> Self {
        Self {
            max_event_name_len: config.max_event_name_len,
            max_display_name_len: config.max_display_name_len,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Validates `CreateEvent` and resolves the capacity
    fn validate_create_event(
        &self,
        nft_collection: &CollectionAddress,
        name: &str,
        max_registrations: Option<u64>,
    ) -> Result<Capacity> {
        if nft_collection.is_zero() {
            return Err(RegistryError::InvalidCollection);
        }

        let capacity = match max_registrations {
            None => Capacity::Unlimited,
            Some(max) => Capacity::limited(max).ok_or(RegistryError::InvalidCapacity)?,
        };

        if name.trim().is_empty() {
            return Err(RegistryError::EmptyEventName);
        }

        if let Some(max) = self.max_event_name_len {
            let len = name.chars().count();
            if len > max {
                return Err(RegistryError::EventNameTooLong { len, max });
            }
        }

        Ok(capacity)
    }

    /// Validates `RegisterForEvent`; first failure wins
    fn validate_register_for_event<'s>(
        &self,
        state: &'s RegistryState,
        oracle: &O,
        caller: &Principal,
        event_id: EventId,
        display_name: &str,
    ) -> Result<&'s Event>
    where
        O: OwnershipOracle,
    {
        let event = state
            .event(event_id)
            .ok_or(RegistryError::InvalidEventId { event_id })?;

        let eligible = oracle
            .owns(caller, &event.nft_collection)
            .map_err(|e| RegistryError::OracleUnavailable {
                reason: e.to_string(),
            })?;
        if !eligible {
            return Err(RegistryError::NotEligible {
                participant: *caller,
                collection: event.nft_collection,
            });
        }

        if state.has_registered(caller, event_id) {
            return Err(RegistryError::AlreadyRegistered {
                event_id,
                participant: *caller,
            });
        }

        if !event.capacity.has_room(event.registration_count) {
            return Err(RegistryError::EventFull {
                event_id,
                max_registrations: event.max_registrations(),
            });
        }

        if let Some(max) = self.max_display_name_len {
            let len = display_name.chars().count();
            if len > max {
                return Err(RegistryError::DisplayNameTooLong { len, max });
            }
        }

        Ok(event)
    }
}

impl<O, C> Reducer for RegistryReducer<O, C>
where
    O: OwnershipOracle,
    C: Clock,
{
    type State = RegistryState;
    type Action = RegistryAction;
    type Environment = RegistryEnvironment<O, C>;
    type Output = RegistryOutcome;
    type Notification = RegistryNotification;
    type Error = RegistryError;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Result<Reduction<RegistryOutcome, RegistryNotification>> {
        match action {
            RegistryAction::CreateEvent {
                caller,
                nft_collection,
                name,
                category,
                max_registrations,
            } => {
                let capacity =
                    self.validate_create_event(&nft_collection, &name, max_registrations)?;
                let event_id = state.next_event_id()?;

                tracing::debug!(%event_id, %caller, %nft_collection, "Creating event");

                let notification = RegistryNotification::EventCreated {
                    event_id,
                    name: name.clone(),
                    creator: caller,
                    collection: nft_collection,
                };
                state.insert_event(Event {
                    id: event_id,
                    manager: caller,
                    name,
                    nft_collection,
                    category,
                    capacity,
                    registration_count: 0,
                    created_at: env.clock.now(),
                });

                Ok(Reduction::new(RegistryOutcome::EventCreated { event_id })
                    .with_effect(Effect::Publish(notification)))
            },

            RegistryAction::RegisterForEvent {
                caller,
                event_id,
                display_name,
            } => {
                let event_name = match self.validate_register_for_event(
                    state,
                    &env.oracle,
                    &caller,
                    event_id,
                    &display_name,
                ) {
                    Ok(event) => event.name.clone(),
                    Err(error) => {
                        if let RegistryError::OracleUnavailable { reason } = &error {
                            tracing::warn!(%event_id, %caller, %reason, "Ownership oracle failed");
                        }
                        return Err(error);
                    },
                };

                state.insert_registration(Registration {
                    event_id,
                    participant: caller,
                    display_name,
                    registered_at: env.clock.now(),
                })?;

                tracing::debug!(%event_id, %caller, "Registration stored");

                Ok(Reduction::new(RegistryOutcome::Registered {
                    event_id,
                    participant: caller,
                })
                .with_effect(Effect::Publish(
                    RegistryNotification::EventRegistrationSuccessful {
                        event_id,
                        participant: caller,
                        event_name,
                    },
                )))
            },
        }
    }
}
