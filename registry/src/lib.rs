//! # Gated Registry
//!
//! An event registry gated by NFT ownership. An organizer creates an event
//! tied to one NFT collection; holders of that collection register once per
//! event, up to the event's capacity.
//!
//! ## Architecture
//!
//! - [`RegistryReducer`] validates a [`RegistryAction`] against
//!   [`RegistryState`] and the injected [`RegistryEnvironment`], then applies it
//! - [`EventRegistry`] owns a `Store` that serializes every mutation and
//!   broadcasts [`RegistryNotification`]s in commit order
//! - Ownership is answered by an
//!   [`OwnershipOracle`](gated_registry_core::oracle::OwnershipOracle)
//!
//! ## Example
//!
//! ```ignore
//! use gated_registry::{Category, EventRegistry, RegistryEnvironment};
//!
//! let registry = EventRegistry::new(RegistryEnvironment::with_system_clock(oracle));
//! let id = registry
//!     .create_event(&organizer, collection, "Devfest", Category::FREE)
//!     .await?;
//!
//! registry.register_for_event(&holder, id, "Ada").await?;
//! assert_eq!(registry.user_count().await, 1);
//! ```

pub mod action;
pub mod config;
pub mod environment;
pub mod error;
pub mod metrics;
pub mod notification;
pub mod reducer;
pub mod registry;
pub mod state;
pub mod types;

pub use action::{RegistryAction, RegistryOutcome};
pub use config::RegistryConfig;
pub use environment::RegistryEnvironment;
pub use error::{RegistryError, Result};
pub use notification::RegistryNotification;
pub use reducer::RegistryReducer;
pub use registry::EventRegistry;
pub use state::RegistryState;
pub use types::{Capacity, Category, Event, EventId, EventStatus, Registration};

pub use gated_registry_core::identity::{CollectionAddress, Principal};
