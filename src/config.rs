//! Immutable configuration snapshot consumed by every component.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{error::Error, rng};

/// A read-only bag of tuning knobs resolved once before a search starts.
///
/// Built with [`Configuration::builder`], then validated and seed-resolved
/// with [`Configuration::resolve`]. Recognized options are documented on
/// each field.
#[derive(TypedBuilder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
  /// Seed for the deterministic RNG. `0` samples a fresh nonzero seed from
  /// system entropy during [`Configuration::resolve`].
  #[builder(default = 0)]
  pub seed: u64,

  /// Maximum number of iterations. `-1` means unlimited.
  #[builder(default = -1)]
  pub mh_titer: i64,

  /// Maximum number of iterations without improvement. `-1` means unlimited.
  #[builder(default = -1)]
  pub mh_tciter: i64,

  /// Maximum wall-clock seconds. `-1.0` means unlimited.
  #[builder(default = -1.0)]
  pub mh_ttime: f64,

  /// Target objective value; search stops once reached or beaten.
  #[builder(default)]
  pub mh_tobj: Option<f64>,

  /// Logging frequency in iterations. `0` disables periodic progress logs.
  #[builder(default = 0)]
  pub mh_lfreq: u64,

  /// Population cardinality.
  #[builder(default = 100)]
  pub mh_pop_size: usize,

  /// Tournament size `k` used by [`crate::population::Population::select`].
  #[builder(default = 10)]
  pub mh_tournament_size: usize,

  /// Reject duplicates during population initialization.
  #[builder(default = false)]
  pub mh_dupelim: bool,

  /// Probability of applying crossover in an SSGA iteration, in `[0, 1]`.
  #[builder(default = 1.0)]
  pub mh_ssga_cross_prob: f64,

  /// Probability of applying local improvement in an SSGA iteration, in
  /// `[0, 1]`.
  #[builder(default = 0.1)]
  pub mh_ssga_loc_prob: f64,
}

impl Configuration {
  /// Validates all recognized bounds and resolves `seed == 0` into a fresh
  /// nonzero seed, returning the ready-to-use snapshot.
  pub fn resolve(mut self) -> Result<Self, Error> {
    if self.mh_pop_size < 1 {
      return Err(invalid("mh_pop_size must be at least 1"));
    }
    if self.mh_tournament_size < 1 {
      return Err(invalid("mh_tournament_size must be at least 1"));
    }
    if !(0.0..=1.0).contains(&self.mh_ssga_cross_prob) {
      return Err(invalid("mh_ssga_cross_prob must be in [0, 1]"));
    }
    if !(0.0..=1.0).contains(&self.mh_ssga_loc_prob) {
      return Err(invalid("mh_ssga_loc_prob must be in [0, 1]"));
    }
    if self.mh_ttime < 0.0 && self.mh_ttime != -1.0 {
      return Err(invalid("mh_ttime must be -1 or non-negative"));
    }
    self.seed = rng::resolve_seed(self.seed);
    Ok(self)
  }

  /// Serializes the snapshot to an opaque binary blob. Round-trips through
  /// [`Configuration::from_bytes`] with equal recognized option values; the
  /// byte layout itself is not a stable format.
  pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(self)
      .map_err(|e| invalid(format!("failed to serialize configuration: {e}")))
  }

  /// Loads a snapshot previously produced by [`Configuration::to_bytes`].
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
    serde_json::from_slice(bytes)
      .map_err(|e| invalid(format!("failed to deserialize configuration: {e}")))
  }
}

fn invalid(reason: impl Into<String>) -> Error {
  Error::InvalidConfiguration { reason: reason.into() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolve_accepts_defaults() {
    let config = Configuration::builder().build().resolve().unwrap();
    assert_ne!(config.seed, 0);
  }

  #[test]
  fn resolve_rejects_zero_population() {
    let err = Configuration::builder()
      .mh_pop_size(0)
      .build()
      .resolve()
      .unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { .. }));
  }

  #[test]
  fn resolve_rejects_out_of_range_probability() {
    let err = Configuration::builder()
      .mh_ssga_cross_prob(1.5)
      .build()
      .resolve()
      .unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { .. }));
  }

  #[test]
  fn resolve_keeps_explicit_seed() {
    let config = Configuration::builder().seed(42).build().resolve().unwrap();
    assert_eq!(config.seed, 42);
  }

  #[test]
  fn bytes_round_trip() {
    let config = Configuration::builder().seed(7).mh_pop_size(20).build();
    let bytes = config.to_bytes().unwrap();
    let restored = Configuration::from_bytes(&bytes).unwrap();
    assert_eq!(config, restored);
  }
}
