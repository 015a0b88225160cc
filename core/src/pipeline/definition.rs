// conveyor/src/pipeline/definition.rs

//! Contains the frozen `Pipeline<T, R>` and the `Stage` representation every entry is
//! normalized into.

use crate::combinator::Combinator;
use crate::core::step::Step;
use crate::pipeline::builder::PipelineBuilder;
use std::sync::Arc;

/// One executable entry of a pipeline.
pub(crate) enum Stage<T, R> {
  Step(Step<T, R>),
  Combinator(Arc<dyn Combinator<T, R>>),
}

impl<T: 'static, R: 'static> Stage<T, R> {
  pub(crate) fn name(&self) -> &str {
    match self {
      Stage::Step(step) => step.name(),
      Stage::Combinator(combinator) => combinator.name(),
    }
  }

  // Combinators always run in their declared position.
  pub(crate) fn is_initializer(&self) -> bool {
    match self {
      Stage::Step(step) => step.is_initializer(),
      Stage::Combinator(_) => false,
    }
  }
}

/// An ordered, immutable sequence of steps and combinators.
///
/// `T` is the payload type and `R` the auxiliary result type of the `PipelineData`
/// threaded through the stages. Pipelines are built with [`PipelineBuilder`] and have no
/// mutating methods, so one pipeline can be shared (e.g. in an `Arc`) by any number of
/// concurrent executor runs.
pub struct Pipeline<T, R = ()> {
  pub(crate) name: String,
  pub(crate) stages: Vec<Stage<T, R>>,
}

impl<T: 'static, R: 'static> Pipeline<T, R> {
  /// Starts a new, empty builder.
  pub fn builder() -> PipelineBuilder<T, R> {
    PipelineBuilder::new()
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn len(&self) -> usize {
    self.stages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  /// Stage names in declared order.
  pub fn stage_names(&self) -> Vec<&str> {
    self.stages.iter().map(Stage::name).collect()
  }

  pub fn initializer_count(&self) -> usize {
    self.stages.iter().filter(|s| s.is_initializer()).count()
  }
}

impl<T: 'static, R: 'static> std::fmt::Debug for Pipeline<T, R> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("name", &self.name)
      .field("stages", &self.stage_names())
      .field("initializers", &self.initializer_count())
      .finish()
  }
}
