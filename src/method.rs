//! Named methods and their per-call outcome record.

use std::fmt;

/// Per-call outcome of a [`Method`] invocation.
///
/// `changed` must be set to `true` by the callable iff it altered the
/// solution's representation. `terminate` must be set to `true` only if the
/// callable itself diagnosed a termination condition; the scheduler ORs this
/// with its own termination predicates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MethodResult {
  /// Whether the callable altered the solution's representation.
  pub changed: bool,
  /// Whether the callable wants the run to stop.
  pub terminate: bool,
}

impl MethodResult {
  /// A fresh result with both fields cleared.
  pub fn new() -> Self {
    Self::default()
  }
}

/// The error type a [`Method`] callable may fail with, surfaced by the
/// scheduler as [`crate::Error::MethodFailed`].
pub type MethodError = Box<dyn std::error::Error + Send + Sync>;

type MethodFn<S, P> =
  dyn Fn(&mut S, &P, &mut MethodResult) -> Result<(), MethodError>;

/// A named, callable operator: construction, shaking, local improvement, or
/// mutation. The callable consumes `(solution, par, result)`; it may mutate
/// `solution` and must report what it did via `result`.
pub struct Method<S, P> {
  name: String,
  func: Box<MethodFn<S, P>>,
  par: P,
}

impl<S, P> Method<S, P> {
  /// Creates a named method wrapping `func`, called with parameter `par`.
  pub fn new<F>(name: impl Into<String>, func: F, par: P) -> Self
  where
    F: Fn(&mut S, &P, &mut MethodResult) -> Result<(), MethodError> + 'static,
  {
    Self { name: name.into(), func: Box::new(func), par }
  }

  /// The method's name, used to key [`crate::statistics::MethodStatistics`].
  pub fn name(&self) -> &str {
    &self.name
  }

  /// The method's parameter, e.g. a shake intensity or construction variant.
  pub fn par(&self) -> &P {
    &self.par
  }

  pub(crate) fn call(
    &self,
    solution: &mut S,
    result: &mut MethodResult,
  ) -> Result<(), MethodError> {
    (self.func)(solution, &self.par, result)
  }
}

impl<S, P> fmt::Debug for Method<S, P> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Method").field("name", &self.name).finish_non_exhaustive()
  }
}
