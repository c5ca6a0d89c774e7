//! The base engine: owns the incumbent, termination bookkeeping, method
//! dispatch, and statistics. Strategies such as
//! [`crate::ssga::SteadyStateGeneticAlgorithm`] compose a `Scheduler`
//! rather than subclass it.

use std::{collections::BTreeMap, time::Duration};

use rand::rngs::StdRng;

use crate::{
  config::Configuration,
  error::Error,
  method::{Method, MethodResult},
  rng,
  solution::Solution,
  statistics::{MethodStatistics, TerminationReason},
  timing::{Clock, TimingScope},
};

/// Owns the incumbent, the iteration/time budget, per-method statistics, and
/// the seeded RNG for a single run.
pub struct Scheduler<S> {
  config: Configuration,
  incumbent: S,
  iteration: u64,
  iterations_since_improvement: u64,
  clock: Clock,
  method_stats: BTreeMap<String, MethodStatistics>,
  termination_reason: Option<TerminationReason>,
  rng: StdRng,
}

impl<S: Solution> Scheduler<S> {
  /// Creates a scheduler whose incumbent starts as `initial_incumbent`, with
  /// its RNG seeded deterministically from `config.seed`. Callers (e.g. a
  /// strategy's constructor) are responsible for seeding `initial_incumbent`
  /// via construction methods or population initialization before handing it
  /// over.
  pub fn new(config: Configuration, mut initial_incumbent: S) -> Self {
    initial_incumbent.obj();
    let rng = rng::from_seed(config.seed);
    Self {
      config,
      incumbent: initial_incumbent,
      iteration: 0,
      iterations_since_improvement: 0,
      clock: Clock::start(),
      method_stats: BTreeMap::new(),
      termination_reason: None,
      rng,
    }
  }

  /// The scheduler's seeded RNG, shared by every strategy-level probability
  /// draw (e.g. tournament selection, crossover/local-improvement gating) so
  /// that a run is fully reproducible from `config.seed`.
  pub fn rng(&mut self) -> &mut StdRng {
    &mut self.rng
  }

  /// The resolved configuration this scheduler was built with.
  pub fn config(&self) -> &Configuration {
    &self.config
  }

  /// The best solution found so far.
  pub fn incumbent(&self) -> &S {
    &self.incumbent
  }

  /// Number of scheduler iterations (dispatch calls) performed so far.
  pub fn iteration(&self) -> u64 {
    self.iteration
  }

  /// Number of iterations since the incumbent last improved.
  pub fn iterations_since_improvement(&self) -> u64 {
    self.iterations_since_improvement
  }

  /// Per-method-name call/success/time/improvement aggregates.
  pub fn method_stats(&self) -> &BTreeMap<String, MethodStatistics> {
    &self.method_stats
  }

  /// Why the run stopped, or `None` if it hasn't stopped yet.
  pub fn termination_reason(&self) -> Option<TerminationReason> {
    self.termination_reason
  }

  /// Dispatches a single method on `working`, updates its statistics and
  /// the incumbent, and reports whether the run should now terminate.
  pub fn perform_method<P>(
    &mut self,
    method: &Method<S, P>,
    working: &mut S,
  ) -> Result<MethodResult, Error> {
    let mut result = self.dispatch_method(method, working)?;
    self.iteration += 1;
    self.finish_iteration(&mut result);
    Ok(result)
  }

  /// Sequentially dispatches `methods` on `working`, aborting as soon as
  /// one signals `terminate`. The incumbent-update check runs after every
  /// method, not just the last, so a mid-sequence improvement is captured
  /// even if a later method regresses the solution.
  pub fn perform_methods<P>(
    &mut self,
    methods: &[&Method<S, P>],
    working: &mut S,
  ) -> Result<MethodResult, Error> {
    let mut aggregate = MethodResult::new();
    for method in methods {
      let step = self.dispatch_method(method, working)?;
      aggregate.changed |= step.changed;
      if step.terminate {
        aggregate.terminate = true;
        break;
      }
    }
    self.iteration += 1;
    self.finish_iteration(&mut aggregate);
    Ok(aggregate)
  }

  /// Dispatches one generation's worth of methods on `working` without
  /// bumping the iteration counter itself, letting a caller (e.g.
  /// [`crate::ssga::SteadyStateGeneticAlgorithm`]) compose several dispatches
  /// — possibly including a [`crate::crossover::Crossover`] application via
  /// [`Scheduler::dispatch_binary`] — into a single logical iteration via
  /// [`Scheduler::bump_iteration`].
  pub(crate) fn dispatch_method<P>(
    &mut self,
    method: &Method<S, P>,
    working: &mut S,
  ) -> Result<MethodResult, Error> {
    let o0 = working.obj();
    let mut result = MethodResult::new();
    let mut elapsed = Duration::ZERO;
    let call_outcome = {
      let _scope = TimingScope::new(&mut elapsed);
      method.call(working, &mut result)
    };

    let stats = self.method_stats.entry(method.name().to_string()).or_default();
    match call_outcome {
      Ok(()) => {
        let o1 = working.obj();
        let delta = if S::TO_MAXIMIZE { o1 - o0 } else { o0 - o1 };
        stats.record(if result.changed { delta } else { 0.0 }, elapsed);
      }
      Err(source) => {
        stats.record(0.0, elapsed);
        log::error!("method {:?} failed: {source}", method.name());
        return Err(Error::MethodFailed {
          method: method.name().to_string(),
          source,
        });
      }
    }

    self.adopt_if_better(working);
    Ok(result)
  }

  /// Like [`Scheduler::dispatch_method`], but for a binary
  /// [`crate::crossover::Crossover`] operator applied to `working` using
  /// `other` as the second parent. Always reports `changed = true` and never
  /// fails; crossover operators do not signal termination.
  pub(crate) fn dispatch_binary<C: crate::crossover::Crossover<S>>(
    &mut self,
    name: &str,
    crossover: &C,
    working: &mut S,
    other: &S,
  ) -> MethodResult {
    let o0 = working.obj();
    let mut elapsed = Duration::ZERO;
    {
      let _scope = TimingScope::new(&mut elapsed);
      crossover.apply(working, other);
    }
    let o1 = working.obj();
    let delta = if S::TO_MAXIMIZE { o1 - o0 } else { o0 - o1 };
    self.method_stats.entry(name.to_string()).or_default().record(delta, elapsed);

    self.adopt_if_better(working);
    MethodResult { changed: true, terminate: false }
  }

  fn adopt_if_better(&mut self, working: &S) {
    if working.is_better(&self.incumbent) {
      self.incumbent.copy_from(working);
      self.iterations_since_improvement = 0;
    } else {
      self.iterations_since_improvement += 1;
    }
  }

  /// Finalizes a composite iteration assembled by the caller via
  /// [`Scheduler::dispatch_method`]/[`Scheduler::dispatch_binary`]: bumps the
  /// iteration counter once and applies termination bookkeeping.
  pub(crate) fn bump_iteration(&mut self, result: &mut MethodResult) {
    self.iteration += 1;
    self.finish_iteration(result);
  }

  /// Applies the budget-based termination predicates and, absent those,
  /// whatever an inner method already signaled.
  fn finish_iteration(&mut self, result: &mut MethodResult) {
    let budget_terminated = self.check_termination();
    if !budget_terminated && result.terminate && self.termination_reason.is_none()
    {
      self.termination_reason = Some(TerminationReason::MethodSignaled);
      log::info!("terminating: method signaled at iteration {}", self.iteration);
    }
    result.terminate = result.terminate || budget_terminated;

    if self.config.mh_lfreq != 0 && self.iteration % self.config.mh_lfreq == 0 {
      log::debug!(
        "iteration {}: incumbent objective {}",
        self.iteration,
        self.incumbent.cached_objective()
      );
    }
  }

  pub(crate) fn check_termination(&mut self) -> bool {
    if self.termination_reason.is_some() {
      return true;
    }
    let reason = if self.config.mh_titer >= 0
      && self.iteration >= self.config.mh_titer as u64
    {
      Some(TerminationReason::Iterations)
    } else if self.config.mh_tciter >= 0
      && self.iterations_since_improvement >= self.config.mh_tciter as u64
    {
      Some(TerminationReason::Stagnation)
    } else if self.config.mh_ttime >= 0.0
      && self.clock.elapsed_secs() >= self.config.mh_ttime
    {
      Some(TerminationReason::Time)
    } else if let Some(target) = self.config.mh_tobj {
      let reached = if S::TO_MAXIMIZE {
        self.incumbent.cached_objective() >= target
      } else {
        self.incumbent.cached_objective() <= target
      };
      reached.then_some(TerminationReason::ObjectiveReached)
    } else {
      None
    };

    match reason {
      Some(reason) => {
        self.termination_reason = Some(reason);
        log::info!("terminating: {reason:?} at iteration {}", self.iteration);
        true
      }
      None => false,
    }
  }

  /// If the run loop exited without any termination predicate firing (e.g.
  /// population initialization produced a short population before a main
  /// loop ever ran), records [`TerminationReason::Completed`].
  pub(crate) fn mark_completed_if_unset(&mut self) {
    if self.termination_reason.is_none() {
      self.termination_reason = Some(TerminationReason::Completed);
    }
  }

  /// Forces a termination reason, used when a strategy detects termination
  /// before any method dispatch (e.g. the target objective was already met
  /// by population initialization).
  pub(crate) fn force_termination_reason(&mut self, reason: TerminationReason) {
    if self.termination_reason.is_none() {
      self.termination_reason = Some(reason);
    }
  }
}
