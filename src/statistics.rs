//! Running per-method aggregates and termination bookkeeping.

use std::time::Duration;

/// Running aggregate of calls, successes, elapsed time, and net objective
/// improvement for a single method name.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MethodStatistics {
  /// Total number of times the method was dispatched.
  pub calls: u64,
  /// Number of dispatches that both changed the solution and strictly
  /// improved its objective.
  pub successes: u64,
  /// Cumulative wall-clock time spent inside the method's callable.
  pub total_time: Duration,
  /// Cumulative net objective improvement, signed toward improvement.
  pub net_improvement: f64,
}

impl MethodStatistics {
  /// Records one dispatch. `delta` is the objective change signed toward
  /// improvement (positive means improved); `elapsed` is the callable's
  /// wall-clock time for this call.
  pub(crate) fn record(&mut self, delta: f64, elapsed: Duration) {
    self.calls += 1;
    self.total_time += elapsed;
    if delta > 0.0 {
      self.successes += 1;
      self.net_improvement += delta;
    }
  }
}

/// Why a scheduler run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
  /// `mh_titer` iterations were reached.
  Iterations,
  /// `mh_tciter` iterations passed without improvement.
  Stagnation,
  /// `mh_ttime` wall-clock seconds elapsed.
  Time,
  /// The incumbent reached or beat `mh_tobj`.
  ObjectiveReached,
  /// An inner method set `result.terminate`.
  MethodSignaled,
  /// The run loop completed without any termination predicate firing, e.g.
  /// population initialization produced a short population.
  Completed,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn record_tracks_successes_only_on_improvement() {
    let mut stats = MethodStatistics::default();
    stats.record(2.5, Duration::from_millis(10));
    stats.record(-1.0, Duration::from_millis(5));

    assert_eq!(stats.calls, 2);
    assert_eq!(stats.successes, 1);
    assert_eq!(stats.net_improvement, 2.5);
    assert_eq!(stats.total_time, Duration::from_millis(15));
  }
}
