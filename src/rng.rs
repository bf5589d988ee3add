//! WASM-compatible random number generator.
//!
//! Uses the `rand` crate with `SmallRng` (xoshiro256++) which is fast and
//! works with WASM. Entropy is sourced from `getrandom` (browser crypto API).
//! Every generator in the crate takes `&mut WasmRng` instead of reaching for
//! ambient randomness, so tests can seed it and replay outcomes.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// A seedable RNG wrapper for WASM.
///
/// Can be seeded for deterministic replay, or created from system entropy.
pub struct WasmRng {
    inner: SmallRng,
}

impl WasmRng {
    /// Create from system entropy (browser crypto.getRandomValues or OS).
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

    /// Generate a uniform f64 in [0, 1).
    #[inline(always)]
    pub fn next_f64(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// Generate a raw 64-bit value (used for opaque identifiers).
    #[inline(always)]
    pub fn next_u64(&mut self) -> u64 {
        self.inner.random::<u64>()
    }

    /// Generate a random usize in [0, len).
    #[inline(always)]
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.random_range(0..len)
    }

    /// Generate a uniform integer in [lo, hi], swapping reversed bounds.
    pub fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.inner.random_range(lo..=hi)
    }

    /// Fair coin.
    #[inline(always)]
    pub fn chance(&mut self) -> bool {
        self.inner.random_bool(0.5)
    }

    /// Shuffle a slice in place (Fisher-Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

impl Default for WasmRng {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_deterministic() {
        let mut rng1 = WasmRng::from_seed(42);
        let mut rng2 = WasmRng::from_seed(42);
        for _ in 0..100 {
            assert_eq!(rng1.index(1000), rng2.index(1000));
        }
    }

    #[test]
    fn test_next_f64_bounds() {
        let mut rng = WasmRng::from_seed(123);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_range_inclusive_swaps_bounds() {
        let mut rng = WasmRng::from_seed(7);
        for _ in 0..1000 {
            let v = rng.range_inclusive(100, 1);
            assert!((1..=100).contains(&v));
        }
    }

    #[test]
    fn test_range_inclusive_hits_endpoints() {
        let mut rng = WasmRng::from_seed(9);
        let mut saw_lo = false;
        let mut saw_hi = false;
        for _ in 0..200 {
            match rng.range_inclusive(1, 3) {
                1 => saw_lo = true,
                3 => saw_hi = true,
                _ => {}
            }
        }
        assert!(saw_lo && saw_hi);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = WasmRng::from_seed(5);
        let mut values: Vec<u32> = (0..50).collect();
        rng.shuffle(&mut values);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<u32>>());
    }
}
