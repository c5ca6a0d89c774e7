//! Deterministic RNG seeding.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Resolves a configured seed into a concrete value, sampling a fresh nonzero
/// 31-bit seed from system entropy when `seed == 0`.
///
/// Returns the resolved seed so callers can persist it back into the
/// configuration snapshot for reproducibility logging.
pub(crate) fn resolve_seed(seed: u64) -> u64 {
  if seed != 0 {
    return seed;
  }
  loop {
    let candidate = rand::thread_rng().gen_range(1..=i32::MAX as u64);
    if candidate != 0 {
      return candidate;
    }
  }
}

/// Builds the deterministic RNG used throughout a single scheduler run.
pub(crate) fn from_seed(seed: u64) -> StdRng {
  StdRng::seed_from_u64(seed)
}
