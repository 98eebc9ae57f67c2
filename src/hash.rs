//! Seeded 64-bit MurmurHash64A
//!
//! Fast and non-cryptographic. With a fixed seed an adversary who controls the
//! keys can pile them into one bucket; pick a random seed per set
//! ([`ByteSet::with_seed`](crate::ByteSet::with_seed)) when keys are untrusted.

/// Seed used by [`ByteSet::new`](crate::ByteSet::new)
pub const DEFAULT_SEED: u64 = 4;

const M: u64 = 0xc6a4a7935bd1e995;
const R: u32 = 47;

/// Hash `data` with MurmurHash64A
pub fn murmur64a(data: &[u8], seed: u64) -> u64 {
    let mut h = seed ^ (data.len() as u64).wrapping_mul(M);

    let mut chunks = data.chunks_exact(8);
    for chunk in &mut chunks {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);

        let mut k = u64::from_le_bytes(word);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        for (i, &byte) in tail.iter().enumerate() {
            h ^= (byte as u64) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}

/// Bucket index of `data` in a table of `capacity` buckets
///
/// `capacity` is passed explicitly so growth can place keys into the new
/// table while the old one is still in use.
#[inline]
pub fn bucket_index(data: &[u8], seed: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "capacity must be positive");
    (murmur64a(data, seed) % capacity as u64) as usize
}
