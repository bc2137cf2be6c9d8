//! Injected dependencies of the registry reducer.

use gated_registry_core::environment::{Clock, OwnershipOracle, SystemClock};

/// Environment for the registry reducer.
///
/// Generic over the oracle and the clock so tests can inject
/// `MockOwnershipOracle` and `FixedClock`.
#[derive(Debug, Clone)]
pub struct RegistryEnvironment<O, C = SystemClock>
where
    O: OwnershipOracle,
    C: Clock,
{
    /// NFT ownership lookups
    pub oracle: O,
    /// Timestamps for events and registrations
    pub clock: C,
}

impl<O, C> RegistryEnvironment<O, C>
where
    O: OwnershipOracle,
    C: Clock,
{
    /// Creates a new `RegistryEnvironment`
    #[must_use]
    pub const fn new(oracle: O, clock: C) -> Self {
        Self { oracle, clock }
    }
}

impl<O: OwnershipOracle> RegistryEnvironment<O> {
    /// Environment using the system clock
    #[must_use]
    pub const fn with_system_clock(oracle: O) -> Self {
        Self::new(oracle, SystemClock)
    }
}
