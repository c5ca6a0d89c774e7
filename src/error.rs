//! Error types returned by the scheduler and its collaborators.

use thiserror::Error;

/// Errors that can occur while configuring or running a scheduler.
#[derive(Error, Debug)]
pub enum Error {
  /// A recognized configuration option is out of its valid range.
  #[error("invalid configuration: {reason}")]
  InvalidConfiguration {
    /// Human-readable description of the violated bound.
    reason: String,
  },

  /// A solution failed its own structural invariant check (audit mode only).
  #[error("solution invariant violated: {reason}")]
  SolutionInvariantViolated {
    /// Description of the violated invariant, as reported by `Solution::check`.
    reason: String,
  },

  /// Population initialization could not fill the population under
  /// duplicate elimination within the retry budget.
  #[error("population initialization failed after {attempts} rejected candidates")]
  PopulationInitFailed {
    /// Number of consecutive duplicate rejections observed before giving up.
    attempts: u64,
  },

  /// A user-supplied method callable failed.
  #[error("method {method:?} failed: {source}")]
  MethodFailed {
    /// Name of the method that failed.
    method: String,
    /// The underlying error reported by the callable.
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

/// A `Result` alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
