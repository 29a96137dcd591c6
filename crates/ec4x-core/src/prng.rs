// SPDX-License-Identifier: Apache-2.0
//! Deterministic pseudo-random numbers for turn resolution.
//!
//! One `xoroshiro128+` stream per `(turn, system, phase)` triple, seeded via a
//! domain-separated BLAKE3 hash so that independent theaters never share a
//! stream and replaying a turn with the same base seed reproduces every roll.

use crate::ident::SystemId;

/// Stateful `xoroshiro128+` pseudo-random number generator.
///
/// * Not cryptographically secure; use only for gameplay resolution.
/// * Matching seeds yield identical sequences across supported platforms as
///   long as numbers are consumed in the same order.
#[derive(Debug, Clone, Copy)]
pub struct Prng {
    state: [u64; 2],
}

impl Prng {
    /// Constructs a PRNG from two 64-bit seeds.
    pub fn from_seed(seed0: u64, seed1: u64) -> Self {
        let mut state = [seed0, seed1];
        if state[0] == 0 && state[1] == 0 {
            state[0] = 0x9e37_79b9_7f4a_7c15;
        }
        Self { state }
    }

    /// Constructs a PRNG from a single 64-bit seed via SplitMix64 expansion.
    pub fn from_seed_u64(seed: u64) -> Self {
        fn splitmix64(state: &mut u64) -> u64 {
            *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
            let mut z = *state;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
            z ^ (z >> 31)
        }

        let mut sm_state = seed;
        let mut state = [splitmix64(&mut sm_state), splitmix64(&mut sm_state)];
        if state[0] == 0 && state[1] == 0 {
            state[0] = 0x9e37_79b9_7f4a_7c15;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
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
    /// Uses the high 52 bits of the generator output to fill a float64
    /// mantissa, ensuring uniform sampling without platform RNGs.
    pub fn next_f64(&mut self) -> f64 {
        let raw = self.next_u64();
        let bits = (raw >> 12) | 0x3ff0_0000_0000_0000;
        f64::from_bits(bits) - 1.0
    }

    /// Returns the next integer in the inclusive range `[min, max]`.
    ///
    /// Uses rejection sampling to avoid modulo bias.
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max, "invalid range: {min}..={max}");
        let span = (i64::from(max) - i64::from(min)) as u64 + 1;
        if span == 1 {
            return min;
        }

        let value = if span.is_power_of_two() {
            self.next_u64() & (span - 1)
        } else {
            let bound = u64::MAX - u64::MAX % span;
            loop {
                let candidate = self.next_u64();
                if candidate < bound {
                    break candidate % span;
                }
            }
        };

        let offset = value as i64 + i64::from(min);
        offset as i32
    }

    /// Rolls one ten-sided die, `1..=10`.
    pub fn d10(&mut self) -> i32 {
        self.next_int(1, 10)
    }

    /// Returns a multiplier in `[1 - spread, 1 + spread]`, e.g. the ±5%
    /// targeting variance with `spread = 0.05`.
    pub fn variance(&mut self, spread: f64) -> f64 {
        1.0 - spread + self.next_f64() * spread * 2.0
    }

    /// Fisher–Yates shuffle, consuming one roll per element.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        if items.len() < 2 {
            return;
        }
        for i in (1..items.len()).rev() {
            let j = self.next_int(0, i as i32) as usize;
            items.swap(i, j);
        }
    }
}

/// Derives the PRNG seed for one phase of one turn.
///
/// Domain-separated BLAKE3 over `(turn, system, label)`; `system` is the
/// all-ones sentinel for phases that are not system-scoped. The first eight
/// bytes of the digest become the seed.
pub fn phase_seed(base_seed: u64, turn: u32, system: Option<SystemId>, label: &str) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"ec4x:seed:");
    hasher.update(&base_seed.to_le_bytes());
    hasher.update(&turn.to_le_bytes());
    hasher.update(&system.map_or(u32::MAX, SystemId::value).to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}
