//! Membership testing data structures
//!
//! [`ByteSet`] answers the same question as a Bloom filter, exactly. It stores
//! every key, so it costs more memory than a filter of the same capacity but
//! never reports a key that was not inserted.
//!
//! # Example
//!
//! ```
//! use byteset::membership::ByteSet;
//!
//! let mut set = ByteSet::new();
//! set.insert(b"hello");
//! assert!(set.contains(b"hello"));
//! assert!(!set.contains(b"world"));
//! ```

mod byte_set;

pub use byte_set::{ByteSet, INITIAL_CAPACITY, LOAD_FACTOR_THRESHOLD};
