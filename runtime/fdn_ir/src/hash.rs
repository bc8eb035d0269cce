//! Hashing primitives.
//!
//! All structural identity in the runtime (interned values, typeinfo keys,
//! foreign contents) is derived from these functions. They are built on
//! `FxHasher` and are deterministic, but hash values are not stable across
//! versions: never persist one, recompute it instead.

use std::hash::Hasher;

use rustc_hash::FxHasher;

/// A computed hash value.
pub type HashCode = u64;

/// Doubles in this range with no fractional part hash as integers.
const INTEGRAL_DOUBLE_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Hash a signed integer.
#[inline]
pub fn hash_integer(i: i64) -> HashCode {
    let mut hasher = FxHasher::default();
    hasher.write_i64(i);
    hasher.finish()
}

/// Hash a double.
///
/// An integral double hashes exactly like the equal integer, so numbers
/// that compare equal across representations also hash equal. All NaNs
/// share one hash.
pub fn hash_double(d: f64) -> HashCode {
    if d.is_finite() && d.fract() == 0.0 && d.abs() < INTEGRAL_DOUBLE_LIMIT {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "range checked above, value is integral"
        )]
        let integral = d as i64;
        return hash_integer(integral);
    }

    let bits = if d.is_nan() {
        f64::NAN.to_bits()
    } else {
        d.to_bits()
    };
    let mut hasher = FxHasher::default();
    hasher.write_u64(bits);
    hasher.finish()
}

/// Hash a byte sequence.
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> HashCode {
    hash_bytes_stream(0, bytes)
}

/// Continue a hash with a byte sequence.
///
/// The length is mixed in, so splitting the same bytes differently across
/// calls produces different results.
pub fn hash_bytes_stream(seed: HashCode, bytes: &[u8]) -> HashCode {
    let mut hasher = FxHasher::default();
    hasher.write_u64(seed);
    hasher.write_usize(bytes.len());
    hasher.write(bytes);
    hasher.finish()
}

/// Combine two hashes where order must not matter (map entries, sets).
#[inline]
pub fn combine_unordered(a: HashCode, b: HashCode) -> HashCode {
    a.wrapping_add(b)
}

/// Incremental builder over already-hashed sub-values.
///
/// ```text
/// let h = HashStream::new()
///     .hash(kind_tag)
///     .hash(hash_bytes(name))
///     .finish();
/// ```
#[derive(Clone, Default)]
pub struct HashStream {
    hasher: FxHasher,
}

impl HashStream {
    /// Start an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mix in an already-computed hash.
    #[must_use]
    pub fn hash(mut self, code: HashCode) -> Self {
        self.hasher.write_u64(code);
        self
    }

    /// Mix in an integer.
    #[must_use]
    pub fn integer(self, i: i64) -> Self {
        self.hash(hash_integer(i))
    }

    /// Mix in raw bytes.
    #[must_use]
    pub fn bytes(self, bytes: &[u8]) -> Self {
        self.hash(hash_bytes(bytes))
    }

    /// Finish the stream.
    pub fn finish(&self) -> HashCode {
        self.hasher.finish()
    }
}

impl std::fmt::Debug for HashStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashStream")
            .field("state", &self.finish())
            .finish()
    }
}
