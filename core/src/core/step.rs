// conveyor/src/core/step.rs

//! Defines `Step<T, R>`, a single named unit of work within a pipeline.

use super::context::Context;
use super::data::{IntoPipelineData, PipelineData};
use crate::error::{ConveyorError, ConveyorResult};
use std::sync::Arc;

/// Type alias for the normalized step function every stage is reduced to.
///
/// User callables return `Result<O, E>` with `O` convertible into a carrier and `E`
/// convertible into `anyhow::Error`; `wrap_fn` erases both into this shape.
pub type StepFn<T, R> =
  Arc<dyn Fn(PipelineData<T, R>, &Context) -> anyhow::Result<PipelineData<T, R>> + Send + Sync + 'static>;

/// Normalizes a user callable into a `StepFn`, coercing its output into a carrier.
pub(crate) fn wrap_fn<T, R, F, O, M, E>(f: F) -> StepFn<T, R>
where
  T: 'static,
  R: 'static,
  F: Fn(PipelineData<T, R>, &Context) -> Result<O, E> + Send + Sync + 'static,
  O: IntoPipelineData<T, R, M>,
  E: Into<anyhow::Error>,
{
  Arc::new(move |data: PipelineData<T, R>, ctx: &Context| {
    f(data, ctx)
      .map(<O as IntoPipelineData<T, R, M>>::into_pipeline_data)
      .map_err(Into::into)
  })
}

/// A named unit of work: `(carrier, &context) -> carrier`.
///
/// Steps flagged as initializers are pulled out of their declared position by the
/// executor and run at the start of every epoch, before the body steps.
pub struct Step<T, R = ()> {
  name: String,
  initializer: bool,
  function: StepFn<T, R>,
}

impl<T: 'static, R: 'static> Step<T, R> {
  /// Creates a body step from `function`.
  ///
  /// The function may return either a full `PipelineData<T, R>` or a bare `T`; a bare
  /// value becomes the payload of a new carrier with no auxiliary result.
  pub fn new<F, O, M, E>(name: impl Into<String>, function: F) -> Self
  where
    F: Fn(PipelineData<T, R>, &Context) -> Result<O, E> + Send + Sync + 'static,
    O: IntoPipelineData<T, R, M>,
    E: Into<anyhow::Error>,
  {
    Self::from_step_fn(name, wrap_fn(function), false)
  }

  /// Creates a step that runs once per epoch, ahead of every body step.
  pub fn initializer<F, O, M, E>(name: impl Into<String>, function: F) -> Self
  where
    F: Fn(PipelineData<T, R>, &Context) -> Result<O, E> + Send + Sync + 'static,
    O: IntoPipelineData<T, R, M>,
    E: Into<anyhow::Error>,
  {
    Self::from_step_fn(name, wrap_fn(function), true)
  }

  pub(crate) fn from_step_fn(name: impl Into<String>, function: StepFn<T, R>, initializer: bool) -> Self {
    Self {
      name: name.into(),
      initializer,
      function,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_initializer(&self) -> bool {
    self.initializer
  }

  /// Applies the step to `data`.
  ///
  /// Failures of the wrapped function come back as `ConveyorError::StepFailed`, tagged
  /// with this step's name and the context's current epoch.
  pub fn call(&self, data: PipelineData<T, R>, ctx: &Context) -> ConveyorResult<PipelineData<T, R>> {
    (self.function)(data, ctx).map_err(|source| ConveyorError::StepFailed {
      step_name: self.name.clone(),
      epoch: ctx.epoch(),
      source,
    })
  }
}

// Clone only bumps the Arc; no bounds on T or R.
impl<T, R> Clone for Step<T, R> {
  fn clone(&self) -> Self {
    Self {
      name: self.name.clone(),
      initializer: self.initializer,
      function: Arc::clone(&self.function),
    }
  }
}

impl<T, R> std::fmt::Debug for Step<T, R> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Step")
      .field("name", &self.name)
      .field("initializer", &self.initializer)
      .finish_non_exhaustive()
  }
}
