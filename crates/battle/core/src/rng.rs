//! Deterministic random number generation for combat rolls.
//!
//! Crit checks and enemy decision rolls draw from an [`RngOracle`] rather
//! than ambient process randomness so that a battle replayed from the same
//! seed and action sequence produces identical outcomes.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic: given the same seed they must
/// produce the same value.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Generate a uniform value in `[0, 1)`.
    ///
    /// Used for percentage-style checks such as the critical-hit draw.
    fn unit_f32(&self, seed: u64) -> f32 {
        (self.next_u32(seed) as f64 / 4_294_967_296.0) as f32
    }

    /// Generate a random value in range `[min, max]` inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = max - min + 1;
        min + (self.next_u32(seed) % span)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR produces 32-bit output from 64-bit state with a single
/// multiply, xorshift and rotate. Stateless here: each call derives its
/// output purely from the supplied seed.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// Advance the LCG state by one step.
    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation: xorshift high bits, then a random rotate
    /// driven by the top bits of state.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Compute a deterministic seed from battle state components.
///
/// # Arguments
///
/// * `battle_seed` - base seed fixed at battle setup (for replay)
/// * `nonce` - action sequence number (increments each resolved action)
/// * `actor_id` - combatant performing the action
/// * `context` - distinguishes multiple rolls within the same action
///   (0 for the first crit check, 1 for the second, and so on)
pub fn compute_seed(battle_seed: u64, nonce: u64, actor_id: u32, context: u32) -> u64 {
    // Mix all inputs using SplitMix64/FxHash-style combiners.
    let mut hash = battle_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor_id as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step.
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
