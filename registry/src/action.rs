//! Mutating requests and their results.

use crate::types::{Category, EventId};
use gated_registry_core::identity::{CollectionAddress, Principal};
use serde::{Deserialize, Serialize};

/// A mutating request sent through the store.
///
/// `caller` is the authenticated principal supplied by the host; the
/// registry never derives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryAction {
    /// Create a gated event
    CreateEvent {
        /// Becomes the event's manager
        caller: Principal,
        /// Collection participants must hold
        nft_collection: CollectionAddress,
        /// Display name
        name: String,
        /// Category tag
        category: Category,
        /// `None` for unlimited; `Some(0)` is rejected
        max_registrations: Option<u64>,
    },

    /// Register the caller for an event
    RegisterForEvent {
        /// Participant
        caller: Principal,
        /// Target event
        event_id: EventId,
        /// Name stored with the registration
        display_name: String,
    },
}

/// Result of an accepted [`RegistryAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryOutcome {
    /// A new event was stored
    EventCreated {
        /// Id assigned to the event
        event_id: EventId,
    },
    /// A registration was stored
    Registered {
        /// Event registered for
        event_id: EventId,
        /// Registered principal
        participant: Principal,
    },
}

impl RegistryOutcome {
    /// The event the outcome refers to
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        match self {
            Self::EventCreated { event_id } | Self::Registered { event_id, .. } => *event_id,
        }
    }
}
