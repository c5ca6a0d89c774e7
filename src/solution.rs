//! The capability set a problem representation must satisfy to be driven by
//! the scheduler.

use crate::error::Error;

/// A candidate solution to some problem, with a cached objective value.
///
/// Implementers own an opaque representation plus a reference to an
/// immutable problem instance; the scheduler only ever touches solutions
/// through this trait. `TO_MAXIMIZE` is a constant property of the
/// representation, fixed by its `impl`.
///
/// # Caching contract
///
/// [`Solution::obj`] is the only way to get a guaranteed-fresh objective
/// value: it recomputes via [`Solution::calc_objective`] when the cache is
/// invalid, then stores and returns it. [`Solution::is_better`],
/// [`Solution::is_worse`] and comparisons in general trust the cache —
/// callers must have called `obj()` on both sides first. This mirrors the
/// invariant that after any mutation of the representation the cache is
/// invalid until `obj()` (or an explicit recompute) runs again.
pub trait Solution {
  /// Whether larger objective values are preferred.
  const TO_MAXIMIZE: bool;

  /// Recomputes the objective from the current representation, ignoring
  /// any cached value.
  fn calc_objective(&self) -> f64;

  /// Returns the cached objective without recomputing it.
  fn cached_objective(&self) -> f64;

  /// Overwrites the cached objective value.
  fn set_cached_objective(&mut self, value: f64);

  /// Whether the cached objective is valid for the current representation.
  fn is_valid(&self) -> bool;

  /// Marks the cached objective as valid or invalid.
  fn set_valid(&mut self, valid: bool);

  /// Produces a deep, independent clone: mutating either copy afterward
  /// must not affect the other.
  fn copy(&self) -> Self;

  /// Overwrites self's representation and cache from `other`. Both must
  /// share the same problem instance.
  fn copy_from(&mut self, other: &Self);

  /// Installs a representation obtained from construction heuristic variant
  /// `par`, invalidating the cache.
  fn initialize(&mut self, par: i32);

  /// Structural equality of representations, independent of objective.
  fn is_equal(&self, other: &Self) -> bool;

  /// Asserts structural invariants (e.g. permutation bijectivity). Called
  /// only in audit mode; the default implementation has none to check.
  fn check(&self) -> Result<(), Error> {
    Ok(())
  }

  /// Clears the cache, forcing the next [`Solution::obj`] call to
  /// recompute.
  fn invalidate(&mut self) {
    self.set_valid(false);
  }

  /// Returns the cached objective, recomputing and storing it first if the
  /// cache is invalid. Idempotent while the representation is unchanged.
  fn obj(&mut self) -> f64 {
    if !self.is_valid() {
      let value = self.calc_objective();
      self.set_cached_objective(value);
      self.set_valid(true);
    }
    self.cached_objective()
  }

  /// Whether `self` is strictly better than `other`, honoring
  /// `TO_MAXIMIZE`. Requires both sides to have a valid cache (call
  /// [`Solution::obj`] first).
  fn is_better(&self, other: &Self) -> bool {
    debug_assert!(
      self.is_valid() && other.is_valid(),
      "obj() must be called on both solutions before comparing"
    );
    if Self::TO_MAXIMIZE {
      self.cached_objective() > other.cached_objective()
    } else {
      self.cached_objective() < other.cached_objective()
    }
  }

  /// Whether `self` is strictly worse than `other`. See [`Solution::is_better`]
  /// for the caching precondition.
  fn is_worse(&self, other: &Self) -> bool {
    other.is_better(self)
  }
}

#[cfg(test)]
mod tests {
  use crate::testutil::ToySolution;
  use crate::Solution;

  #[test]
  fn obj_is_idempotent_after_invalidate() {
    let mut s = ToySolution::from_genes(vec![1.0, 2.0, 3.0]);
    s.invalidate();
    let first = s.obj();
    let second = s.obj();
    assert_eq!(first, second);
    assert!(s.is_valid());
  }

  #[test]
  fn copy_is_independent() {
    let s = ToySolution::from_genes(vec![1.0, 2.0]);
    let mut copy = s.copy();
    assert!(copy.is_equal(&s));
    copy.genes_mut()[0] = 99.0;
    copy.invalidate();
    assert!(!copy.is_equal(&s));
  }

  #[test]
  fn exactly_one_ordering_holds_for_distinct_objectives() {
    let mut a = ToySolution::from_genes(vec![1.0]);
    let mut b = ToySolution::from_genes(vec![2.0]);
    a.obj();
    b.obj();
    assert!(a.is_better(&b) ^ b.is_better(&a));
    assert_ne!(a.cached_objective(), b.cached_objective());
  }
}
