//! The binary recombination operator used by
//! [`crate::ssga::SteadyStateGeneticAlgorithm`].

/// Combines two parents into a child, writing the result into `self` (the
/// first parent) in place.
///
/// Unlike [`crate::method::Method`], a crossover always takes exactly two
/// solutions and never reports a [`crate::method::MethodResult`]: it cannot
/// fail and cannot itself request termination. Implementers must invalidate
/// `p1`'s cache if they change its representation.
pub trait Crossover<S> {
  /// Applies the operator, mutating `p1` into the child.
  fn apply(&self, p1: &mut S, p2: &S);
}

impl<S, F> Crossover<S> for F
where
  F: Fn(&mut S, &S),
{
  fn apply(&self, p1: &mut S, p2: &S) {
    self(p1, p2)
  }
}
