//! NFT ownership oracle.
//!
//! The registry never talks to an NFT contract directly. It asks an
//! [`OwnershipOracle`] a single question: does this principal hold at least
//! one token of this collection? Answers are treated as untrusted input from
//! outside the registry, and a failed lookup is reported as an
//! [`OracleError`] rather than guessed either way.
//!
//! Two adapters cover the usual ERC-721 read surfaces:
//!
//! - [`BalanceOracle`] wraps a [`BalanceSource`] (`balanceOf(owner)`)
//! - [`TokenListOracle`] wraps a [`TokenOwnerSource`] (`ownerOf(tokenId)`)
//!   and checks a configured set of token ids per collection
//!
//! # Example
//!
//! ```
//! use gated_registry_core::identity::{CollectionAddress, Principal};
//! use gated_registry_core::oracle::{BalanceOracle, BalanceSource, OracleError, OwnershipOracle};
//!
//! struct OneHolder(Principal);
//!
//! impl BalanceSource for OneHolder {
//!     fn balance_of(
//!         &self,
//!         _collection: &CollectionAddress,
//!         owner: &Principal,
//!     ) -> Result<u64, OracleError> {
//!         Ok(u64::from(*owner == self.0))
//!     }
//! }
//!
//! let holder = Principal::new([7; 20]);
//! let oracle = BalanceOracle::new(OneHolder(holder));
//! let collection = CollectionAddress::new([1; 20]);
//!
//! assert_eq!(oracle.owns(&holder, &collection), Ok(true));
//! assert_eq!(oracle.owns(&Principal::new([8; 20]), &collection), Ok(false));
//! ```

use crate::identity::{CollectionAddress, Principal};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors an ownership lookup can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The backing source could not be reached
    #[error("Ownership oracle unavailable: {0}")]
    Unavailable(String),

    /// The backing source answered with something that cannot be interpreted
    #[error("Ownership oracle returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Answers whether a principal holds a token of a collection.
///
/// Implementations must be side-effect free from the caller's point of view
/// and return promptly; the registry calls them while holding its write lock.
pub trait OwnershipOracle: Send + Sync {
    /// Check whether `principal` owns at least one token of `collection`
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if the answer cannot be determined.
    fn owns(&self, principal: &Principal, collection: &CollectionAddress)
    -> Result<bool, OracleError>;
}

impl<T: OwnershipOracle + ?Sized> OwnershipOracle for Arc<T> {
    fn owns(
        &self,
        principal: &Principal,
        collection: &CollectionAddress,
    ) -> Result<bool, OracleError> {
        (**self).owns(principal, collection)
    }
}

/// Token balance lookup, mirroring ERC-721 `balanceOf`.
pub trait BalanceSource: Send + Sync {
    /// Number of tokens of `collection` held by `owner`
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if the balance cannot be read.
    fn balance_of(&self, collection: &CollectionAddress, owner: &Principal)
    -> Result<u64, OracleError>;
}

/// Ownership oracle backed by a balance lookup: a positive balance means ownership.
#[derive(Debug, Clone)]
pub struct BalanceOracle<S> {
    source: S,
}

impl<S> BalanceOracle<S> {
    /// Wrap a balance source
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// The wrapped balance source
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }
}

impl<S: BalanceSource> OwnershipOracle for BalanceOracle<S> {
    fn owns(
        &self,
        principal: &Principal,
        collection: &CollectionAddress,
    ) -> Result<bool, OracleError> {
        Ok(self.source.balance_of(collection, principal)? > 0)
    }
}

/// Per-token owner lookup, mirroring ERC-721 `ownerOf`.
pub trait TokenOwnerSource: Send + Sync {
    /// Current owner of `token_id` in `collection`, `None` if the token does not exist
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if the owner cannot be read.
    fn owner_of(
        &self,
        collection: &CollectionAddress,
        token_id: u64,
    ) -> Result<Option<Principal>, OracleError>;
}

/// Ownership oracle that checks a known set of token ids per collection.
///
/// Useful when the collection does not expose `balanceOf` or when only some
/// token ids (for example a ticket series) should grant access. A collection
/// with no configured tokens never grants ownership.
#[derive(Debug, Clone)]
pub struct TokenListOracle<S> {
    source: S,
    tokens: HashMap<CollectionAddress, Vec<u64>>,
}

impl<S> TokenListOracle<S> {
    /// Create an oracle with no configured tokens
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            tokens: HashMap::new(),
        }
    }

    /// Add token ids that grant access to `collection`
    #[must_use]
    pub fn with_tokens(
        mut self,
        collection: CollectionAddress,
        token_ids: impl IntoIterator<Item = u64>,
    ) -> Self {
        self.tokens.entry(collection).or_default().extend(token_ids);
        self
    }
}

impl<S: TokenOwnerSource> OwnershipOracle for TokenListOracle<S> {
    fn owns(
        &self,
        principal: &Principal,
        collection: &CollectionAddress,
    ) -> Result<bool, OracleError> {
        let Some(token_ids) = self.tokens.get(collection) else {
            return Ok(false);
        };

        for token_id in token_ids {
            if self.source.owner_of(collection, *token_id)? == Some(*principal) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
