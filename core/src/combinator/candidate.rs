// conveyor/src/combinator/candidate.rs

use crate::core::context::Context;
use crate::core::data::PipelineData;
use crate::core::step::Step;
use crate::error::ConveyorResult;
use crate::pipeline::Pipeline;
use std::sync::Arc;

/// One option a combinator can delegate to.
pub enum Candidate<T, R = ()> {
  /// A single step. Its initializer flag has no effect once selected.
  Step(Step<T, R>),
  /// A whole sub-pipeline, applied once (initializers, then body) per selection.
  Pipeline(Arc<Pipeline<T, R>>),
}

impl<T: 'static, R: 'static> Candidate<T, R> {
  pub fn name(&self) -> &str {
    match self {
      Candidate::Step(step) => step.name(),
      Candidate::Pipeline(pipeline) => pipeline.name(),
    }
  }

  pub fn apply(&self, data: PipelineData<T, R>, ctx: &Context) -> ConveyorResult<PipelineData<T, R>> {
    match self {
      Candidate::Step(step) => step.call(data, ctx),
      Candidate::Pipeline(pipeline) => pipeline.apply(data, ctx),
    }
  }
}

impl<T, R> From<Step<T, R>> for Candidate<T, R> {
  fn from(step: Step<T, R>) -> Self {
    Candidate::Step(step)
  }
}

impl<T, R> From<Pipeline<T, R>> for Candidate<T, R> {
  fn from(pipeline: Pipeline<T, R>) -> Self {
    Candidate::Pipeline(Arc::new(pipeline))
  }
}

impl<T, R> From<Arc<Pipeline<T, R>>> for Candidate<T, R> {
  fn from(pipeline: Arc<Pipeline<T, R>>) -> Self {
    Candidate::Pipeline(pipeline)
  }
}

impl<T, R> Clone for Candidate<T, R> {
  fn clone(&self) -> Self {
    match self {
      Candidate::Step(step) => Candidate::Step(step.clone()),
      Candidate::Pipeline(pipeline) => Candidate::Pipeline(Arc::clone(pipeline)),
    }
  }
}

impl<T: 'static, R: 'static> std::fmt::Debug for Candidate<T, R> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Candidate::Step(step) => f.debug_tuple("Step").field(step).finish(),
      Candidate::Pipeline(pipeline) => f.debug_tuple("Pipeline").field(pipeline).finish(),
    }
  }
}
