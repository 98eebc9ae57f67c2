//! Exact set of byte strings
//!
//! A hash table with separate chaining. Each bucket is a short list of owned
//! byte strings scanned linearly, so membership answers are exact: no false
//! positives and no false negatives.

use crate::codec::{Reader, Writer};
use crate::hash::{self, DEFAULT_SEED};
use crate::traits::{DecodeError, EncodeError, MembershipSet};
use tracing::{debug, trace};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{format, vec, vec::Vec};

/// Number of buckets in a new or cleared set
pub const INITIAL_CAPACITY: usize = 32;

/// Load factor above which the bucket array doubles
pub const LOAD_FACTOR_THRESHOLD: f64 = 0.7;

const MAGIC: &[u8; 4] = b"BSET";
const VERSION: u8 = 1;
// magic + version + seed + capacity + size
const HEADER_LEN: usize = 4 + 1 + 8 + 8 + 8;

type Bucket = Vec<Vec<u8>>;

/// Exact set of byte strings
///
/// # Example
///
/// ```
/// use byteset::ByteSet;
///
/// let mut set = ByteSet::new();
///
/// set.insert(b"apple");
/// set.insert(b"banana");
/// set.insert(b"apple"); // already present, no-op
///
/// assert_eq!(set.len(), 2);
/// assert!(set.contains(b"apple"));
/// assert!(!set.contains(b"cherry")); // never a false positive
/// ```
///
/// # Growth
///
/// The set starts with [`INITIAL_CAPACITY`] buckets. The insert that pushes
/// `len / capacity` above [`LOAD_FACTOR_THRESHOLD`] doubles the bucket array
/// and redistributes every element. Removal never shrinks it.
#[derive(Clone, Debug)]
pub struct ByteSet {
    /// Bucket array, `capacity` entries long
    buckets: Vec<Bucket>,
    /// Number of distinct elements
    size: usize,
    /// Number of buckets
    capacity: usize,
    /// Hash seed
    seed: u64,
}

impl ByteSet {
    /// Create an empty set with the default hash seed
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create an empty set that hashes with `seed`
    ///
    /// Use a random seed when keys come from an untrusted source.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            buckets: vec![Vec::new(); INITIAL_CAPACITY],
            size: 0,
            capacity: INITIAL_CAPACITY,
            seed,
        }
    }

    /// Insert a byte string
    ///
    /// Returns `true` if it was not already present.
    pub fn insert(&mut self, value: &[u8]) -> bool {
        let index = hash::bucket_index(value, self.seed, self.capacity);
        let bucket = &mut self.buckets[index];

        if bucket.iter().any(|item| item.as_slice() == value) {
            return false;
        }

        bucket.push(value.to_vec());
        self.size += 1;

        if self.load_factor() > LOAD_FACTOR_THRESHOLD {
            self.grow();
        }
        true
    }

    /// Double the bucket array and redistribute every element
    fn grow(&mut self) {
        let new_capacity = self.capacity * 2;
        let mut new_buckets: Vec<Bucket> = vec![Vec::new(); new_capacity];

        for value in self.buckets.drain(..).flatten() {
            let index = hash::bucket_index(&value, self.seed, new_capacity);
            new_buckets[index].push(value);
        }

        debug!(
            old_capacity = self.capacity,
            new_capacity,
            size = self.size,
            "grew byte set"
        );

        self.buckets = new_buckets;
        self.capacity = new_capacity;
    }

    /// Remove a byte string
    ///
    /// Returns `true` if it was present. Removing an absent value is a no-op.
    pub fn remove(&mut self, value: &[u8]) -> bool {
        let index = hash::bucket_index(value, self.seed, self.capacity);
        let bucket = &mut self.buckets[index];

        match bucket.iter().position(|item| item.as_slice() == value) {
            Some(pos) => {
                // Vec::remove keeps the rest of the chain in order
                bucket.remove(pos);
                self.size -= 1;
                true
            }
            None => false,
        }
    }

    /// Check whether a byte string is in the set
    pub fn contains(&self, value: &[u8]) -> bool {
        let index = hash::bucket_index(value, self.seed, self.capacity);
        self.buckets[index]
            .iter()
            .any(|item| item.as_slice() == value)
    }

    /// Remove everything and return to [`INITIAL_CAPACITY`] buckets
    ///
    /// The hash seed is kept.
    pub fn clear(&mut self) {
        trace!(size = self.size, capacity = self.capacity, "clearing byte set");
        *self = Self::with_seed(self.seed);
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.size
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of buckets
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Hash seed
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current `len / capacity`
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.capacity as f64
    }

    /// Iterate over all elements
    ///
    /// Order follows bucket layout and is not meaningful.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.buckets.iter().flatten().map(Vec::as_slice)
    }

    /// Insert every element of `other`
    ///
    /// The two sets may use different seeds.
    pub fn merge(&mut self, other: &ByteSet) {
        for value in other.iter() {
            self.insert(value);
        }
    }

    /// Approximate heap and inline memory usage in bytes
    pub fn size_bytes(&self) -> usize {
        let buckets: usize = self
            .buckets
            .iter()
            .map(|bucket| {
                bucket.capacity() * core::mem::size_of::<Vec<u8>>()
                    + bucket.iter().map(Vec::capacity).sum::<usize>()
            })
            .sum();
        core::mem::size_of::<Self>()
            + self.buckets.capacity() * core::mem::size_of::<Bucket>()
            + buckets
    }

    /// Encode the full set state
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::LengthOverflow`] if a bucket holds more than
    /// `u32::MAX` elements or an element is longer than `u32::MAX` bytes.
    pub fn serialize(&self) -> Result<Vec<u8>, EncodeError> {
        let payload: usize = self
            .buckets
            .iter()
            .map(|bucket| 4 + bucket.iter().map(|v| 4 + v.len()).sum::<usize>())
            .sum();

        let mut w = Writer::with_capacity(HEADER_LEN + payload);
        w.put_slice(MAGIC);
        w.put_u8(VERSION);
        w.put_u64(self.seed);
        w.put_u64(self.capacity as u64);
        w.put_u64(self.size as u64);

        for bucket in &self.buckets {
            w.put_len("bucket", bucket.len())?;
            for value in bucket {
                w.put_len("element", value.len())?;
                w.put_slice(value);
            }
        }

        let bytes = w.into_inner();
        trace!(len = bytes.len(), size = self.size, "encoded byte set");
        Ok(bytes)
    }

    /// Rebuild a set from the output of [`serialize`](Self::serialize)
    ///
    /// Decoding is all-or-nothing: any truncation, corruption or layout that
    /// a real set could not have produced is rejected. That includes a
    /// capacity other than [`INITIAL_CAPACITY`] times a power of two and a
    /// load factor above [`LOAD_FACTOR_THRESHOLD`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self, DecodeError> {
        match Self::decode(bytes) {
            Ok(set) => {
                trace!(len = bytes.len(), size = set.size, "decoded byte set");
                Ok(set)
            }
            Err(err) => {
                debug!(len = bytes.len(), error = %err, "rejected byte set encoding");
                Err(err)
            }
        }
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);

        if r.take(MAGIC.len())? != MAGIC {
            return Err(DecodeError::InvalidHeader);
        }
        let version = r.get_u8()?;
        if version != VERSION {
            return Err(DecodeError::UnsupportedVersion(version as u32));
        }

        let seed = r.get_u64()?;
        let capacity = r.get_u64()?;
        let size = r.get_u64()?;

        // Every bucket costs at least its 4-byte count
        let max_buckets = (r.remaining() / 4) as u64;
        if capacity > max_buckets {
            return Err(DecodeError::Corrupted(format!(
                "capacity {} exceeds what {} remaining bytes can hold",
                capacity,
                r.remaining()
            )));
        }

        let mut buckets = Vec::with_capacity(capacity as usize);
        for _ in 0..capacity {
            let count = r.get_len()?;
            if count > r.remaining() / 4 {
                return Err(DecodeError::Corrupted(format!(
                    "bucket of {} elements exceeds remaining input",
                    count
                )));
            }

            let mut bucket = Vec::with_capacity(count);
            for _ in 0..count {
                let len = r.get_len()?;
                bucket.push(r.take(len)?.to_vec());
            }
            buckets.push(bucket);
        }

        if r.remaining() != 0 {
            return Err(DecodeError::Corrupted(format!(
                "{} trailing bytes",
                r.remaining()
            )));
        }

        Self::from_parts(seed, capacity, size, buckets)
    }

    /// Validate decoded fields and assemble a set
    fn from_parts(
        seed: u64,
        capacity: u64,
        size: u64,
        buckets: Vec<Bucket>,
    ) -> Result<Self, DecodeError> {
        let capacity = usize::try_from(capacity)
            .map_err(|_| DecodeError::Corrupted(format!("capacity {} overflows usize", capacity)))?;
        let size = usize::try_from(size)
            .map_err(|_| DecodeError::Corrupted(format!("size {} overflows usize", size)))?;

        // Only construction and doubling produce capacities
        if capacity < INITIAL_CAPACITY
            || capacity % INITIAL_CAPACITY != 0
            || !(capacity / INITIAL_CAPACITY).is_power_of_two()
        {
            return Err(DecodeError::Corrupted(format!(
                "capacity {} is not {} times a power of two",
                capacity, INITIAL_CAPACITY
            )));
        }
        if size as f64 / capacity as f64 > LOAD_FACTOR_THRESHOLD {
            return Err(DecodeError::Corrupted(format!(
                "size {} overloads {} buckets",
                size, capacity
            )));
        }
        if buckets.len() != capacity {
            return Err(DecodeError::Corrupted(format!(
                "capacity {} but {} buckets",
                capacity,
                buckets.len()
            )));
        }

        let mut total = 0usize;
        for (index, bucket) in buckets.iter().enumerate() {
            for value in bucket {
                let home = hash::bucket_index(value, seed, capacity);
                if home != index {
                    return Err(DecodeError::Corrupted(format!(
                        "element in bucket {} belongs in bucket {}",
                        index, home
                    )));
                }
            }
            // Equal values share a bucket, so a per-bucket check is enough
            if has_duplicates(bucket) {
                return Err(DecodeError::Corrupted(format!(
                    "duplicate element in bucket {}",
                    index
                )));
            }
            total += bucket.len();
        }

        if total != size {
            return Err(DecodeError::Corrupted(format!(
                "size {} but {} elements stored",
                size, total
            )));
        }

        Ok(Self {
            buckets,
            size,
            capacity,
            seed,
        })
    }
}

fn has_duplicates(bucket: &[Vec<u8>]) -> bool {
    if bucket.len() < 2 {
        return false;
    }
    let mut sorted: Vec<&[u8]> = bucket.iter().map(Vec::as_slice).collect();
    sorted.sort_unstable();
    sorted.windows(2).any(|pair| pair[0] == pair[1])
}

impl Default for ByteSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Extend<&'a [u8]> for ByteSet {
    fn extend<I: IntoIterator<Item = &'a [u8]>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a> FromIterator<&'a [u8]> for ByteSet {
    fn from_iter<I: IntoIterator<Item = &'a [u8]>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl MembershipSet for ByteSet {
    type Item = [u8];

    fn insert(&mut self, item: &Self::Item) -> bool {
        self.insert(item)
    }

    fn remove(&mut self, item: &Self::Item) -> bool {
        self.remove(item)
    }

    fn contains(&self, item: &Self::Item) -> bool {
        self.contains(item)
    }

    fn merge(&mut self, other: &Self) {
        self.merge(other)
    }

    fn clear(&mut self) {
        self.clear()
    }

    fn len(&self) -> usize {
        self.size
    }

    fn size_bytes(&self) -> usize {
        self.size_bytes()
    }

    fn false_positive_rate(&self) -> f64 {
        0.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ByteSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ByteSet", 4)?;
        state.serialize_field("seed", &self.seed)?;
        state.serialize_field("capacity", &(self.capacity as u64))?;
        state.serialize_field("size", &(self.size as u64))?;
        state.serialize_field("buckets", &self.buckets)?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ByteSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::Deserialize;

        #[derive(Deserialize)]
        struct ByteSetData {
            seed: u64,
            capacity: u64,
            size: u64,
            buckets: Vec<Bucket>,
        }

        let data = ByteSetData::deserialize(deserializer)?;
        ByteSet::from_parts(data.seed, data.capacity, data.size, data.buckets)
            .map_err(serde::de::Error::custom)
    }
}
