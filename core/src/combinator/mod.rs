// conveyor/src/combinator/mod.rs

//! Combinators: pipeline stages that do no work themselves but pick one of several
//! candidates (steps or sub-pipelines) at run time and delegate to it.

pub mod candidate;
pub mod random;

pub use candidate::Candidate;
pub use random::RandomChoice;

use crate::core::context::Context;
use crate::core::data::PipelineData;
use crate::error::ConveyorResult;

/// A stage that selects among candidates when it is invoked.
///
/// Implementations must not keep selection state between calls: every `apply` is an
/// independent choice. Selection strategies other than uniform random choice (best of N
/// by score, voting) plug in by implementing this trait; pipelines accept any
/// `Combinator` through `PipelineBuilder::then`.
pub trait Combinator<T, R>: Send + Sync {
  fn name(&self) -> &str;

  /// Number of candidates to choose from. The builder rejects combinators with none.
  fn candidate_count(&self) -> usize;

  /// Selects a candidate, runs it on `data` and returns its result unchanged.
  fn apply(&self, data: PipelineData<T, R>, ctx: &Context) -> ConveyorResult<PipelineData<T, R>>;
}
