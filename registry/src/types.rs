//! Domain types for gated events and registrations.

use chrono::{DateTime, Utc};
use gated_registry_core::identity::{CollectionAddress, Principal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Sequential event identifier, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    /// Wrap a raw id
    ///
    /// Any value is accepted; ids that were never assigned are rejected by
    /// the registry when used.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event category tag.
///
/// Stored and returned as-is; the registry attaches no behaviour to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category(u8);

impl Category {
    /// Free admission
    pub const FREE: Self = Self(0);
    /// Paid admission
    pub const PAID: Self = Self(1);

    /// Wrap a raw category code
    #[must_use]
    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    /// The raw category code
    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }
}

/// How many registrations an event accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capacity {
    /// No limit beyond the counter width
    Unlimited,
    /// At most this many registrations
    Limited(NonZeroU64),
}

impl Capacity {
    /// Value reported as the maximum for [`Capacity::Unlimited`]
    pub const UNLIMITED_SENTINEL: u64 = u64::MAX;

    /// A limited capacity, `None` for zero
    #[must_use]
    pub const fn limited(max_registrations: u64) -> Option<Self> {
        match NonZeroU64::new(max_registrations) {
            Some(max) => Some(Self::Limited(max)),
            None => None,
        }
    }

    /// Maximum number of registrations, [`Capacity::UNLIMITED_SENTINEL`] when unlimited
    #[must_use]
    pub const fn max_registrations(self) -> u64 {
        match self {
            Self::Unlimited => Self::UNLIMITED_SENTINEL,
            Self::Limited(max) => max.get(),
        }
    }

    /// Whether one more registration fits after `registration_count`
    #[must_use]
    pub const fn has_room(self, registration_count: u64) -> bool {
        registration_count < self.max_registrations()
    }
}

/// Whether an event still accepts registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    /// Fewer registrations than capacity
    Open,
    /// Registrations reached capacity; final
    Full,
}

/// A gated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Sequential id
    pub id: EventId,
    /// Principal that created the event
    pub manager: Principal,
    /// Display name, not unique
    pub name: String,
    /// Collection a participant must hold a token of
    pub nft_collection: CollectionAddress,
    /// Category tag
    pub category: Category,
    /// Registration limit
    pub capacity: Capacity,
    /// Successful registrations so far
    pub registration_count: u64,
    /// When the event was created
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Maximum number of registrations
    #[must_use]
    pub const fn max_registrations(&self) -> u64 {
        self.capacity.max_registrations()
    }

    /// Open or full
    #[must_use]
    pub const fn status(&self) -> EventStatus {
        if self.capacity.has_room(self.registration_count) {
            EventStatus::Open
        } else {
            EventStatus::Full
        }
    }

    /// Registrations still accepted
    #[must_use]
    pub const fn remaining_capacity(&self) -> u64 {
        self.max_registrations()
            .saturating_sub(self.registration_count)
    }
}

/// A participant's registration for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Event registered for
    pub event_id: EventId,
    /// Registered principal
    pub participant: Principal,
    /// Name supplied at registration, for display only
    pub display_name: String,
    /// When the registration was accepted
    pub registered_at: DateTime<Utc>,
}
