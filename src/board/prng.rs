/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

// This file is shared with `build.rs` through `#[path]`, so it must not depend on anything else in the crate.

/// Seed that every table in this crate is derived from.
pub const DEFAULT_SEED: u64 = 694202137;

/// A pseudo-random number generator using the "xoshiro256**" algorithm.
///
/// The state is expanded from a single `u64` seed with SplitMix64, so the same seed always
/// produces the same stream on every platform.
///
/// Algorithm from <https://prng.di.unimi.it/xoshiro256starstar.c>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XoShiRo([u64; 4]);

impl XoShiRo {
    /// Construct a new generator from [`DEFAULT_SEED`].
    ///
    /// # Example
    /// ```
    /// # use gambit::XoShiRo;
    /// let mut a = XoShiRo::new();
    /// let mut b = XoShiRo::new();
    /// assert_eq!(a.get_next(), b.get_next());
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self::from_seed(DEFAULT_SEED)
    }

    /// Construct a new generator whose state is expanded from `seed`.
    pub const fn from_seed(seed: u64) -> Self {
        let mut state = [0; 4];
        let mut sm = seed;
        let mut i = 0;
        while i < state.len() {
            let value;
            (value, sm) = splitmix64(sm);
            state[i] = value;
            i += 1;
        }
        Self(state)
    }

    /// `const` analog of [`XoShiRo::get_next`], returning `(next, Self)`.
    #[inline(always)]
    pub const fn get_next_const(self) -> (u64, Self) {
        let (result, s) = Self::xoshiro(self.0);
        (result, Self(s))
    }

    /// Advance the generator, returning the next number in the stream.
    #[inline(always)]
    pub fn get_next(&mut self) -> u64 {
        let (result, s) = Self::xoshiro(self.0);
        self.0 = s;
        result
    }

    /// Returns a number with roughly an eighth of its bits set.
    ///
    /// Magic number candidates with few set bits are far more likely to hash without collisions.
    #[inline(always)]
    pub fn get_sparse(&mut self) -> u64 {
        self.get_next() & self.get_next() & self.get_next()
    }

    const fn xoshiro(mut s: [u64; 4]) -> (u64, [u64; 4]) {
        let result = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);

        let t = s[1] << 17;

        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];

        s[2] ^= t;

        s[3] = s[3].rotate_left(45);
        (result, s)
    }
}

/// One step of SplitMix64, returning `(output, next_state)`.
const fn splitmix64(state: u64) -> (u64, u64) {
    let next = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = next;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    (z ^ (z >> 31), next)
}

impl Default for XoShiRo {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_and_mut_streams_agree() {
        let mut rng = XoShiRo::from_seed(42);
        let mut prng = XoShiRo::from_seed(42);
        for _ in 0..16 {
            let next;
            (next, prng) = prng.get_next_const();
            assert_eq!(rng.get_next(), next);
        }
    }

    #[test]
    fn test_seeds_diverge() {
        let mut a = XoShiRo::from_seed(1);
        let mut b = XoShiRo::from_seed(2);
        assert_ne!(a.get_next(), b.get_next());
    }

    #[test]
    fn test_sparse_draws_are_sparse() {
        let mut rng = XoShiRo::new();
        let total: u32 = (0..256).map(|_| rng.get_sparse().count_ones()).sum();
        // Expected population is 8 bits per draw
        assert!(total / 256 < 16);
    }
}
