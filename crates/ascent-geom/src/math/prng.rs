// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// Stateful `xoroshiro128+` pseudo-random number generator for reproducible levels.
///
/// * Not cryptographically secure; use only for content generation.
/// * Matching seeds yield identical sequences across supported platforms, so a
///   seed string fully determines a generated level.
#[derive(Debug, Clone)]
pub struct Prng {
    state: [u64; 2],
}

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

impl Prng {
    /// Constructs a PRNG from two 64-bit seeds.
    pub fn from_seed(seed0: u64, seed1: u64) -> Self {
        let mut state = [seed0, seed1];
        if state[0] == 0 && state[1] == 0 {
            state[0] = GOLDEN_GAMMA;
        }
        Self { state }
    }

    /// Constructs a PRNG from a single 64-bit seed via SplitMix64 expansion.
    pub fn from_seed_u64(seed: u64) -> Self {
        fn splitmix64(state: &mut u64) -> u64 {
            *state = state.wrapping_add(GOLDEN_GAMMA);
            let mut z = *state;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
            z ^ (z >> 31)
        }

        let mut sm_state = seed;
        Self::from_seed(splitmix64(&mut sm_state), splitmix64(&mut sm_state))
    }

    /// Constructs a PRNG from a textual seed (e.g. a user-supplied level seed
    /// combined with a stage name).
    pub fn from_label(label: &str) -> Self {
        Self::from_seed_u64(seed_from_label(label))
    }

    /// Returns the next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(55) ^ s1 ^ (s1 << 14);
        self.state[1] = s1.rotate_left(36);

        result
    }

    /// Returns the next float in `[0, 1)`.
    ///
    /// Uses the high 23 bits of the state to fill the mantissa.
    pub fn next_f32(&mut self) -> f32 {
        let raw = self.next_u64();
        #[allow(clippy::cast_possible_truncation)]
        let bits = ((raw >> 41) as u32) | 0x3f80_0000;
        f32::from_bits(bits) - 1.0
    }

    /// Returns a float uniformly drawn from `[lo, hi)`.
    pub fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Returns `true` with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Returns a value uniformly drawn from `[0, bound)` without modulo bias.
    ///
    /// Returns `0` when `bound` is `0`.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        if bound <= 1 {
            return 0;
        }
        if bound.is_power_of_two() {
            return self.next_u64() & (bound - 1);
        }
        let limit = u64::MAX - u64::MAX % bound;
        loop {
            let candidate = self.next_u64();
            if candidate < limit {
                break candidate % bound;
            }
        }
    }

    /// Returns the next integer in the inclusive range `[min, max]`.
    ///
    /// Bounds are swapped if given out of order.
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        #[allow(clippy::cast_sign_loss)]
        let span = (i64::from(hi) - i64::from(lo)) as u64 + 1;
        #[allow(clippy::cast_possible_wrap)]
        let offset = self.next_below(span) as i64 + i64::from(lo);
        #[allow(clippy::cast_possible_truncation)]
        let value = offset as i32;
        value
    }

    /// Returns a uniformly chosen index into a collection of length `len`.
    pub fn next_index(&mut self, len: usize) -> usize {
        #[allow(clippy::cast_possible_truncation)]
        let idx = self.next_below(len as u64) as usize;
        idx
    }

    /// Picks a uniformly random element of `items`, or `None` if it is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_index(items.len()))
    }
}

/// Folds a textual label into a 64-bit seed using BLAKE3.
///
/// The first eight digest bytes are read little-endian, so the mapping is
/// stable across platforms and releases.
pub fn seed_from_label(label: &str) -> u64 {
    let digest = blake3::hash(label.as_bytes());
    let mut first = [0u8; 8];
    first.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(first)
}
