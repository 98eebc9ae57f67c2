//! Core traits and error types
//!
//! [`MembershipSet`] is the seam a storage engine programs against when it
//! needs a membership filter. [`ByteSet`](crate::ByteSet) implements it exactly;
//! a probabilistic filter could implement it with a nonzero
//! [`false_positive_rate`](MembershipSet::false_positive_rate).

use core::fmt::Debug;

#[cfg(feature = "std")]
use std::string::String;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::string::String;

/// Error during set encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A length does not fit the wire format's 32-bit length prefix
    LengthOverflow {
        field: &'static str,
        len: usize,
    },
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EncodeError::LengthOverflow { field, len } => {
                write!(f, "{} length {} exceeds u32::MAX", field, len)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// Error during set decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended before a field could be read
    BufferTooShort { expected: usize, found: usize },
    /// Input does not start with the set's magic bytes
    InvalidHeader,
    /// Encoding written by an unknown format version
    UnsupportedVersion(u32),
    /// Fields parse but describe a set `serialize` could not have written:
    /// a capacity other than 32 times a power of two, a load factor above
    /// 0.7, an element outside its hash bucket, a duplicate element, a size
    /// that disagrees with the stored elements, or trailing bytes
    Corrupted(String),
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::BufferTooShort { expected, found } => {
                write!(f, "buffer too short: expected {}, found {}", expected, found)
            }
            DecodeError::InvalidHeader => write!(f, "invalid header"),
            DecodeError::UnsupportedVersion(v) => write!(f, "unsupported version: {}", v),
            DecodeError::Corrupted(msg) => write!(f, "corrupted data: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Set membership over byte-string keys
///
/// Mutating operations take `&mut self`; implementations are not expected to
/// synchronize internally.
pub trait MembershipSet: Clone + Debug {
    /// The type of item this set holds
    type Item: ?Sized;

    /// Add an item to the set
    ///
    /// Returns `true` if the item was not already present
    fn insert(&mut self, item: &Self::Item) -> bool;

    /// Remove an item from the set
    ///
    /// Returns `true` if the item was present
    fn remove(&mut self, item: &Self::Item) -> bool;

    /// Test whether an item is in the set
    fn contains(&self, item: &Self::Item) -> bool;

    /// Add every item of `other` to this set
    fn merge(&mut self, other: &Self);

    /// Reset to empty state
    fn clear(&mut self);

    /// Number of distinct items held
    fn len(&self) -> usize;

    /// Memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Probability that `contains` reports an item that was never inserted
    fn false_positive_rate(&self) -> f64;

    /// Check if the set is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
