//! Wall-clock measurement for the scheduler's time budget and per-method
//! elapsed-time bookkeeping.

use std::time::{Duration, Instant};

/// A scoped timing guard. Records elapsed time into `total` when dropped,
/// regardless of how the scope was exited (including on a propagated error).
pub(crate) struct TimingScope<'a> {
  start: Instant,
  total: &'a mut Duration,
}

impl<'a> TimingScope<'a> {
  pub(crate) fn new(total: &'a mut Duration) -> Self {
    Self { start: Instant::now(), total }
  }
}

impl Drop for TimingScope<'_> {
  fn drop(&mut self) {
    *self.total += self.start.elapsed();
  }
}

/// Wall-clock budget tracked from scheduler start.
#[derive(Debug)]
pub(crate) struct Clock {
  start: Instant,
}

impl Clock {
  pub(crate) fn start() -> Self {
    Self { start: Instant::now() }
  }

  pub(crate) fn elapsed_secs(&self) -> f64 {
    self.start.elapsed().as_secs_f64()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timing_scope_records_elapsed_on_drop() {
    let mut total = Duration::ZERO;
    {
      let _scope = TimingScope::new(&mut total);
      std::thread::sleep(Duration::from_millis(5));
    }
    assert!(total >= Duration::from_millis(5));
  }

  #[test]
  fn clock_elapsed_is_monotone() {
    let clock = Clock::start();
    let first = clock.elapsed_secs();
    std::thread::sleep(Duration::from_millis(1));
    let second = clock.elapsed_secs();
    assert!(second >= first);
  }
}
