//! In-memory ownership oracle for tests.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Mutex poisoning only follows a test panic

use gated_registry_core::identity::{CollectionAddress, Principal};
use gated_registry_core::oracle::{OracleError, OwnershipOracle};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct OracleBook {
    holdings: HashSet<(CollectionAddress, Principal)>,
    outage: Option<String>,
    calls: Vec<(Principal, CollectionAddress)>,
}

/// Scriptable ownership oracle.
///
/// Clones share the same holdings, so a test can keep a handle and change
/// ownership or simulate an outage after the oracle was moved into an
/// environment.
///
/// # Example
///
/// ```
/// use gated_registry_testing::{MockOwnershipOracle, collection, principal};
/// use gated_registry_core::oracle::OwnershipOracle;
///
/// let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
///
/// assert_eq!(oracle.owns(&principal(1), &collection(1)), Ok(true));
/// assert_eq!(oracle.owns(&principal(2), &collection(1)), Ok(false));
/// assert_eq!(oracle.call_count(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockOwnershipOracle {
    book: Arc<Mutex<OracleBook>>,
}

impl MockOwnershipOracle {
    /// Create an oracle where nobody owns anything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MockOwnershipOracle::grant`]
    #[must_use]
    pub fn with_holder(self, collection: CollectionAddress, holder: Principal) -> Self {
        self.grant(collection, holder);
        self
    }

    /// Make `holder` own a token of `collection`
    pub fn grant(&self, collection: CollectionAddress, holder: Principal) {
        self.book
            .lock()
            .unwrap()
            .holdings
            .insert((collection, holder));
    }

    /// Remove `holder`'s token of `collection`
    pub fn revoke(&self, collection: CollectionAddress, holder: Principal) {
        self.book
            .lock()
            .unwrap()
            .holdings
            .remove(&(collection, holder));
    }

    /// Fail every lookup with [`OracleError::Unavailable`] until [`MockOwnershipOracle::restore`]
    pub fn fail_with(&self, reason: impl Into<String>) {
        self.book.lock().unwrap().outage = Some(reason.into());
    }

    /// End a simulated outage
    pub fn restore(&self) {
        self.book.lock().unwrap().outage = None;
    }

    /// Number of lookups made so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.book.lock().unwrap().calls.len()
    }

    /// Every lookup made so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<(Principal, CollectionAddress)> {
        self.book.lock().unwrap().calls.clone()
    }
}

impl OwnershipOracle for MockOwnershipOracle {
    fn owns(
        &self,
        principal: &Principal,
        collection: &CollectionAddress,
    ) -> Result<bool, OracleError> {
        let mut book = self.book.lock().unwrap();
        book.calls.push((*principal, *collection));

        if let Some(reason) = &book.outage {
            return Err(OracleError::Unavailable(reason.clone()));
        }

        Ok(book.holdings.contains(&(*collection, *principal)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{collection, principal};

    #[test]
    fn test_grant_and_revoke() {
        let oracle = MockOwnershipOracle::new();
        let handle = oracle.clone();

        handle.grant(collection(1), principal(1));
        assert_eq!(oracle.owns(&principal(1), &collection(1)), Ok(true));
        assert_eq!(oracle.owns(&principal(1), &collection(2)), Ok(false));

        handle.revoke(collection(1), principal(1));
        assert_eq!(oracle.owns(&principal(1), &collection(1)), Ok(false));
    }

    #[test]
    fn test_outage_is_reported_and_recorded() {
        let oracle = MockOwnershipOracle::new().with_holder(collection(1), principal(1));
        oracle.fail_with("node offline");

        assert_eq!(
            oracle.owns(&principal(1), &collection(1)),
            Err(OracleError::Unavailable("node offline".to_string()))
        );

        oracle.restore();
        assert_eq!(oracle.owns(&principal(1), &collection(1)), Ok(true));
        assert_eq!(
            oracle.calls(),
            vec![(principal(1), collection(1)), (principal(1), collection(1))]
        );
    }
}
