//! An ordered, fixed-capacity multiset of solutions with selection and
//! duplicate-elimination queries.

use rand::Rng;

use crate::{
  config::Configuration,
  error::Error,
  method::{Method, MethodResult},
  solution::Solution,
};

/// A population of solutions, created once at scheduler start and mutated
/// only by GA-style strategies. Size is constant after initialization; no
/// two slots alias the same solution.
#[derive(Debug)]
pub struct Population<S> {
  solutions: Vec<S>,
}

impl<S: Solution> Population<S> {
  /// Fills a population of `config.mh_pop_size` solutions by cycling
  /// round-robin through `meths_ch`, deep-copying `prototype` for each slot
  /// before applying the chosen construction method.
  ///
  /// With `config.mh_dupelim` set, a candidate structurally equal to an
  /// existing member is rejected and retried with the next method; after
  /// `100 * mh_pop_size` consecutive rejections, initialization fails with
  /// [`Error::PopulationInitFailed`]. If a construction call signals
  /// `result.terminate`, initialization stops immediately, the (possibly
  /// short) population is returned, and the second tuple element is `true`.
  ///
  /// Construction calls bypass the scheduler: no method statistics are
  /// recorded for them.
  pub fn init<P>(
    prototype: &S,
    meths_ch: &[Method<S, P>],
    config: &Configuration,
  ) -> Result<(Self, bool), Error> {
    assert!(!meths_ch.is_empty(), "meths_ch must not be empty");

    let target = config.mh_pop_size;
    let mut solutions = Vec::with_capacity(target);
    let mut consecutive_rejections = 0u64;
    let mut methods = meths_ch.iter().cycle();
    let mut construction_terminated = false;

    while solutions.len() < target {
      let method = methods.next().expect("meths_ch must not be empty");
      let mut candidate = prototype.copy();
      let mut result = MethodResult::new();
      method.call(&mut candidate, &mut result).map_err(|source| {
        Error::MethodFailed { method: method.name().to_string(), source }
      })?;
      candidate.obj();

      if config.mh_dupelim
        && solutions.iter().any(|s: &S| s.is_equal(&candidate))
      {
        consecutive_rejections += 1;
        log::trace!(
          "rejected duplicate candidate from {:?} ({} consecutive)",
          method.name(),
          consecutive_rejections
        );
        if consecutive_rejections >= 100 * target as u64 {
          return Err(Error::PopulationInitFailed {
            attempts: consecutive_rejections,
          });
        }
        continue;
      }

      consecutive_rejections = 0;
      let should_stop = result.terminate;
      solutions.push(candidate);
      if should_stop {
        construction_terminated = true;
        break;
      }
    }

    log::info!(
      "population initialization complete: {} solutions{}",
      solutions.len(),
      if construction_terminated { " (construction signaled termination)" } else { "" }
    );
    Ok((Self { solutions }, construction_terminated))
  }

  /// Number of solutions currently held.
  pub fn len(&self) -> usize {
    self.solutions.len()
  }

  /// Whether the population holds no solutions.
  pub fn is_empty(&self) -> bool {
    self.solutions.is_empty()
  }

  /// Immutable access to a slot.
  pub fn get(&self, index: usize) -> &S {
    &self.solutions[index]
  }

  /// Mutable access to a slot.
  pub fn get_mut(&mut self, index: usize) -> &mut S {
    &mut self.solutions[index]
  }

  /// All solutions, in slot order.
  pub fn iter(&self) -> impl Iterator<Item = &S> {
    self.solutions.iter()
  }

  /// Index of a solution not worse than any other; ties resolved by lowest
  /// index.
  pub fn best(&self) -> usize {
    self.extreme(|candidate, incumbent| candidate.is_better(incumbent))
  }

  /// Index of a solution not better than any other; ties resolved by lowest
  /// index.
  pub fn worst(&self) -> usize {
    self.extreme(|candidate, incumbent| candidate.is_worse(incumbent))
  }

  fn extreme(&self, prefer: impl Fn(&S, &S) -> bool) -> usize {
    let mut best = 0;
    for i in 1..self.solutions.len() {
      if prefer(&self.solutions[i], &self.solutions[best]) {
        best = i;
      }
    }
    best
  }

  /// Tournament selection: samples `config.mh_tournament_size` indices
  /// uniformly at random from `[1, len - 1]` (with replacement if `k`
  /// exceeds that range), and returns the best among them. Index `0` is
  /// never returned; it is reserved for the incumbent mirror in strategies
  /// that choose to place it there.
  ///
  /// Draws from `rng`, not a process-global generator, so that a run is
  /// reproducible from the scheduler's seed.
  pub fn select(&self, tournament_size: usize, rng: &mut impl Rng) -> usize {
    assert!(
      self.solutions.len() > 1,
      "tournament selection requires at least 2 solutions"
    );
    let low = 1;
    let high = self.solutions.len();
    let mut best = rng.gen_range(low..high);
    for _ in 1..tournament_size {
      let candidate = rng.gen_range(low..high);
      if self.solutions[candidate].is_better(&self.solutions[best]) {
        best = candidate;
      }
    }
    best
  }

  /// Indices of all solutions structurally equal to `sol`.
  pub fn duplicates_of(&self, sol: &S) -> Vec<usize> {
    self
      .solutions
      .iter()
      .enumerate()
      .filter(|(_, s)| s.is_equal(sol))
      .map(|(i, _)| i)
      .collect()
  }

  /// Average of the population's (already-cached) objective values.
  ///
  /// # Panics
  ///
  /// Panics if the population is empty.
  pub fn obj_avg(&self) -> f64 {
    assert!(!self.solutions.is_empty(), "average requires at least one element");
    let sum: f64 = self.solutions.iter().map(|s| s.cached_objective()).sum();
    sum / self.solutions.len() as f64
  }

  /// Sample standard deviation of the population's (already-cached)
  /// objective values. Returns `0.0` for a population of size 1.
  pub fn obj_std(&self) -> f64 {
    let n = self.solutions.len();
    if n <= 1 {
      return 0.0;
    }
    let avg = self.obj_avg();
    let variance: f64 = self
      .solutions
      .iter()
      .map(|s| {
        let d = s.cached_objective() - avg;
        d * d
      })
      .sum::<f64>()
      / (n - 1) as f64;
    variance.sqrt()
  }
}
