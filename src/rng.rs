//! Injectable random number generator.
//!
//! Uses the `rand` crate with `SmallRng` (xoshiro256++) which is fast and
//! works with WASM. Entropy is sourced from `getrandom` (browser crypto API
//! or the OS). Seed it to make board generation and guesses replayable.

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// A seedable RNG wrapper.
pub struct AgentRng {
    inner: SmallRng,
}

impl AgentRng {
    /// Create from system entropy.
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Create with a specific seed for deterministic behavior.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeded if `seed` is given, from entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::from_seed)
    }

    /// Generate a random usize in [0, max).
    #[inline(always)]
    pub fn gen_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }

    /// Pick one element uniformly, or `None` for an empty slice.
    pub fn choose<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        items.choose(&mut self.inner).copied()
    }
}

impl Default for AgentRng {
    fn default() -> Self {
        Self::new()
    }
}
