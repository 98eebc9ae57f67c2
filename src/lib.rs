//! # Byteset
//!
//! An exact, in-memory set of byte strings.
//!
//! Byteset is meant to sit where a storage engine would otherwise keep a Bloom
//! filter: it answers the same membership question, but with zero false
//! positives and zero false negatives, at the cost of storing every key verbatim.
//!
//! ## Features
//!
//! - **Exact membership**: separate chaining over a seeded MurmurHash64A
//! - **Dynamic growth**: capacity doubles once the load factor passes 0.7
//! - **Persistence**: self-describing binary encoding with magic and version header
//! - **Filter compatible**: implements [`MembershipSet`](traits::MembershipSet),
//!   so code written against a membership filter can hold a `ByteSet` instead
//!
//! ## Quick Start
//!
//! ```rust
//! use byteset::prelude::*;
//!
//! let mut set = ByteSet::new();
//! set.insert(b"sstable-0001:key-a");
//! set.insert(b"sstable-0001:key-b");
//!
//! assert!(set.contains(b"sstable-0001:key-a"));
//! assert!(!set.contains(b"sstable-0001:key-c"));
//!
//! let bytes = set.serialize().unwrap();
//! let restored = ByteSet::deserialize(&bytes).unwrap();
//! assert_eq!(restored.len(), 2);
//! ```
//!
//! ## Thread Safety
//!
//! A `ByteSet` does no internal synchronization. Mutating operations take
//! `&mut self`; wrap the set in a `Mutex` (or keep a single writer) to share it.
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support. Without it the crate is `no_std` + `alloc`
//! - `serde`: `Serialize`/`Deserialize` for [`ByteSet`]

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Core traits always available
pub mod traits;

pub mod hash;

mod codec;

pub mod membership;

pub mod prelude {
    pub use crate::traits::*;

    pub use crate::membership::ByteSet;
}

pub use membership::ByteSet;
pub use traits::{DecodeError, EncodeError, MembershipSet};
