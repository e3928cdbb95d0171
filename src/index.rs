//! Hash-to-bucket index normalization.

/// Map a raw hash onto `[0, buckets)`.
///
/// The hash is read as a signed two's-complement value, reduced modulo the
/// bucket count, and a negative remainder is negated. Two hashes that differ
/// only in sign therefore land in the same bucket.
#[inline]
pub fn normalize(hash: u64, buckets: usize) -> usize {
    debug_assert!(buckets > 0);
    let rem = (hash as i64) % (buckets as i64);
    // |rem| < buckets, so neither the negation nor the cast can overflow.
    if rem < 0 {
        (-rem) as usize
    } else {
        rem as usize
    }
}
