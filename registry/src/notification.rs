//! Notifications broadcast to observers after a successful action.

use crate::types::EventId;
use gated_registry_core::identity::{CollectionAddress, Principal};
use serde::{Deserialize, Serialize};

/// Observable record of a state change.
///
/// Published in the order the underlying actions were serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryNotification {
    /// An event was created
    EventCreated {
        /// Id of the new event
        event_id: EventId,
        /// Event name
        name: String,
        /// The manager
        creator: Principal,
        /// Gate collection
        collection: CollectionAddress,
    },

    /// A participant registered for an event
    EventRegistrationSuccessful {
        /// Event registered for
        event_id: EventId,
        /// Registered principal
        participant: Principal,
        /// Name of the event at registration time
        event_name: String,
    },
}

impl RegistryNotification {
    /// The event the notification refers to
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        match self {
            Self::EventCreated { event_id, .. }
            | Self::EventRegistrationSuccessful { event_id, .. } => *event_id,
        }
    }
}
