//! Principal and collection identifiers.
//!
//! Both are 20-byte addresses rendered as `0x`-prefixed lowercase hex. A
//! [`Principal`] is whoever initiates a call (supplied by the execution
//! environment, never constructed from user input inside the registry). A
//! [`CollectionAddress`] names the NFT collection an event is gated on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length in bytes of every address handled by the registry.
pub const ADDRESS_LEN: usize = 20;

/// Errors produced when parsing an address from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    /// The text did not start with `0x`
    #[error("Address must start with 0x: {0}")]
    MissingPrefix(String),

    /// The hex payload decoded to the wrong number of bytes
    #[error("Address must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required byte length
        expected: usize,
        /// Decoded byte length
        actual: usize,
    },

    /// The payload contained non-hex characters or an odd digit count
    #[error("Address is not valid hex: {0}")]
    InvalidHex(String),
}

fn parse_address(s: &str) -> Result<[u8; ADDRESS_LEN], AddressParseError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| AddressParseError::MissingPrefix(s.to_string()))?;

    let bytes = hex::decode(digits).map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;

    <[u8; ADDRESS_LEN]>::try_from(bytes.as_slice()).map_err(|_| {
        AddressParseError::InvalidLength {
            expected: ADDRESS_LEN,
            actual: bytes.len(),
        }
    })
}

/// Authenticated identity of a caller.
///
/// Opaque to the registry: it is compared, hashed and stored, nothing else.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Principal([u8; ADDRESS_LEN]);

impl Principal {
    /// Wrap raw address bytes
    #[must_use]
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({self})")
    }
}

impl FromStr for Principal {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s).map(Self)
    }
}

/// Address of an NFT collection.
///
/// The all-zero address is the null handle and is never a valid gate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectionAddress([u8; ADDRESS_LEN]);

impl CollectionAddress {
    /// The null collection handle
    pub const ZERO: Self = Self([0; ADDRESS_LEN]);

    /// Wrap raw address bytes
    #[must_use]
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the null handle
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for CollectionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for CollectionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CollectionAddress({self})")
    }
}

impl FromStr for CollectionAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s).map(Self)
    }
}
