//! RNG oracle for deterministic random number generation.
//!
//! Tile spawning is the only random event in the game. Drawing it from a
//! seeded oracle instead of ambient randomness keeps sessions replayable and
//! lets tests pin exact spawn positions.
//!
//! # Determinism
//!
//! All RNG implementations must be deterministic: given the same seed,
//! they must produce the same sequence of random numbers.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Pick an index in `[0, len)`. `len` must be non-zero.
    fn index(&self, seed: u64, len: usize) -> usize {
        debug_assert!(len > 0, "cannot pick from an empty range");
        self.next_u32(seed) as usize % len.max(1)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// Uses the PCG-XSH-RR variant: 32-bit output from 64-bit state, one
/// multiply, one xorshift and one rotate per draw.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// `state' = (state * multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Roll contexts for the independent draws made while spawning a tile.
pub mod context {
    /// Which empty cell receives the tile.
    pub const SPAWN_CELL: u32 = 0;
    /// Whether the tile is a 2 or a 4.
    pub const SPAWN_VALUE: u32 = 1;
}

/// Compute a deterministic seed for one random draw.
///
/// * `game_seed` - Base seed chosen when the session starts
/// * `nonce` - Spawn counter, incremented after every spawn
/// * `context` - Distinguishes independent draws within the same spawn
pub fn compute_seed(game_seed: u64, nonce: u64, context: u32) -> u64 {
    // SplitMix64-style mixing
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
