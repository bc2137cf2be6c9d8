//! Error types for registry operations.

use crate::types::EventId;
use gated_registry_core::identity::{CollectionAddress, Principal};
use gated_registry_runtime::StoreError;
use thiserror::Error;

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Every way a registry call can be rejected.
///
/// All variants except [`RegistryError::OracleUnavailable`] are
/// deterministic functions of state and input. The registry never retries;
/// retry policy belongs to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    // ═══════════════════════════════════════════════════════════
    // Event Creation Errors
    // ═══════════════════════════════════════════════════════════

    /// The gate collection is the zero address.
    #[error("NFT collection must not be the zero address")]
    InvalidCollection,

    /// An explicit capacity of zero was supplied.
    #[error("Maximum registrations must be greater than zero")]
    InvalidCapacity,

    /// The event name is empty or whitespace.
    #[error("Event name cannot be empty")]
    EmptyEventName,

    /// The event name exceeds the configured limit.
    #[error("Event name is {len} characters, maximum is {max}")]
    EventNameTooLong {
        /// Supplied length in characters
        len: usize,
        /// Configured maximum
        max: usize,
    },

    // ═══════════════════════════════════════════════════════════
    // Registration Errors
    // ═══════════════════════════════════════════════════════════

    /// No event with this id was ever created.
    #[error("Invalid event id: {event_id}")]
    InvalidEventId {
        /// Requested id
        event_id: EventId,
    },

    /// The caller holds no token of the event's collection.
    #[error("{participant} does not own a token of collection {collection}")]
    NotEligible {
        /// Caller that was checked
        participant: Principal,
        /// Required collection
        collection: CollectionAddress,
    },

    /// The caller already has a registration for this event.
    #[error("{participant} is already registered for event {event_id}")]
    AlreadyRegistered {
        /// Event id
        event_id: EventId,
        /// Caller
        participant: Principal,
    },

    /// The event reached its capacity.
    #[error("Event {event_id} is full ({max_registrations} registrations)")]
    EventFull {
        /// Event id
        event_id: EventId,
        /// The event's capacity
        max_registrations: u64,
    },

    /// The display name exceeds the configured limit.
    #[error("Display name is {len} characters, maximum is {max}")]
    DisplayNameTooLong {
        /// Supplied length in characters
        len: usize,
        /// Configured maximum
        max: usize,
    },

    /// The ownership check could not be completed.
    #[error("Ownership check failed: {reason}")]
    OracleUnavailable {
        /// Oracle's description of the failure
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Infrastructure Errors
    // ═══════════════════════════════════════════════════════════

    /// A 64-bit counter would wrap.
    #[error("Registry counter overflow")]
    CounterOverflow,

    /// A snapshot could not be encoded, decoded or validated.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// The store refused the call.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryError {
    /// Stable snake_case code, used as a metrics label.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidCollection => "invalid_collection",
            Self::InvalidCapacity => "invalid_capacity",
            Self::EmptyEventName => "empty_event_name",
            Self::EventNameTooLong { .. } => "event_name_too_long",
            Self::InvalidEventId { .. } => "invalid_event_id",
            Self::NotEligible { .. } => "not_eligible",
            Self::AlreadyRegistered { .. } => "already_registered",
            Self::EventFull { .. } => "event_full",
            Self::DisplayNameTooLong { .. } => "display_name_too_long",
            Self::OracleUnavailable { .. } => "oracle_unavailable",
            Self::CounterOverflow => "counter_overflow",
            Self::Snapshot(_) => "snapshot",
            Self::Store(_) => "store",
        }
    }

    /// Whether the failure came from the environment rather than from state and input.
    #[must_use]
    pub const fn is_environmental(&self) -> bool {
        matches!(self, Self::OracleUnavailable { .. } | Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_parties() {
        let participant = Principal::new([1; 20]);
        let error = RegistryError::AlreadyRegistered {
            event_id: EventId::new(4),
            participant,
        };

        assert_eq!(
            error.to_string(),
            format!("{participant} is already registered for event 4")
        );
        assert_eq!(error.code(), "already_registered");
    }

    #[test]
    fn test_only_oracle_and_store_are_environmental() {
        assert!(
            RegistryError::OracleUnavailable {
                reason: "timeout".to_string()
            }
            .is_environmental()
        );
        assert!(RegistryError::from(StoreError::ShutdownInProgress).is_environmental());
        assert!(!RegistryError::InvalidCollection.is_environmental());
        assert!(
            !RegistryError::EventFull {
                event_id: EventId::new(1),
                max_registrations: 1
            }
            .is_environmental()
        );
    }
}
