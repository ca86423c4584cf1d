//! PRNG Keys - Splittable Random State
//!
//! Randomness in augpipe is never ambient. Every draw consumes its own
//! sub-key, handed out by a [`KeyStream`] in a fixed order, so a pipeline
//! call is a pure function of `(images, config, key)`.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

// =============================================================================
// Mixing
// =============================================================================

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finalizer. Bijective on `u64`.
const fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// =============================================================================
// PrngKey
// =============================================================================

/// An opaque random key. Equal keys always produce equal draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrngKey(u64);

impl PrngKey {
    /// Creates a root key from a seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(splitmix64(seed))
    }

    /// Returns the raw 64-bit state, suitable for seeding an RNG.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Derives a new key from this key and an integer.
    #[must_use]
    pub const fn fold_in(self, data: u64) -> Self {
        Self(splitmix64(self.0 ^ splitmix64(data)))
    }

    /// Splits this key into two independent keys.
    #[must_use]
    pub const fn split(self) -> (Self, Self) {
        (self.fold_in(0), self.fold_in(1))
    }
}

// =============================================================================
// KeyStream
// =============================================================================

/// Hands out one fresh sub-key per draw.
///
/// Sub-key `i` is `root.fold_in(i)`, so the sequence depends only on the root
/// key and on how many keys were requested before it.
#[derive(Debug, Clone)]
pub struct KeyStream {
    root: PrngKey,
    counter: u64,
}

impl KeyStream {
    /// Creates a stream rooted at `root`.
    #[must_use]
    pub const fn new(root: PrngKey) -> Self {
        Self { root, counter: 0 }
    }

    /// Returns the next unused sub-key.
    pub fn next_key(&mut self) -> PrngKey {
        let key = self.root.fold_in(self.counter);
        self.counter += 1;
        key
    }

    /// Number of sub-keys handed out so far.
    #[must_use]
    pub const fn consumed(&self) -> u64 {
        self.counter
    }
}

// =============================================================================
// Tests
// =============================================================================
