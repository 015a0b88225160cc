// conveyor/src/executor.rs

//! Defines the `Executor`, which drives a `Pipeline` through one or more epochs.

use crate::core::context::Context;
use crate::core::data::PipelineData;
use crate::core::values::ValueMap;
use crate::error::{ConveyorError, ConveyorResult};
use crate::pipeline::Pipeline;
use std::any::Any;
use tracing::{event, instrument, span, Level};

/// Executor configuration.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
  /// Number of epochs to run. Must be at least 1.
  pub epochs: usize,
  /// Values forwarded into every run's `Context` as read-only settings.
  pub settings: ValueMap,
}

impl Default for ExecutorConfig {
  fn default() -> Self {
    Self {
      epochs: 1,
      settings: ValueMap::new(),
    }
  }
}

/// Runs pipelines epoch by epoch.
///
/// Each call to `run` creates a fresh `Context` and carrier, so one executor (and one
/// pipeline) can serve any number of runs, including concurrent ones.
#[derive(Debug, Clone, Default)]
pub struct Executor {
  config: ExecutorConfig,
}

impl Executor {
  /// An executor running a single epoch with no settings.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_config(config: ExecutorConfig) -> Self {
    Self { config }
  }

  pub fn with_epochs(mut self, epochs: usize) -> Self {
    self.config.epochs = epochs;
    self
  }

  pub fn with_setting<V>(mut self, key: impl Into<String>, value: V) -> Self
  where
    V: Any + Send + Sync,
  {
    self.config.settings.insert(key, value);
    self
  }

  pub fn config(&self) -> &ExecutorConfig {
    &self.config
  }

  /// Runs `pipeline` with `initial` as the first carrier's payload.
  pub fn run<T, R>(&self, pipeline: &Pipeline<T, R>, initial: T) -> ConveyorResult<(Context, PipelineData<T, R>)>
  where
    T: 'static,
    R: 'static,
  {
    self.run_with_data(pipeline, PipelineData::new(initial))
  }

  /// Runs `pipeline` starting from the payload type's default value.
  pub fn run_default<T, R>(&self, pipeline: &Pipeline<T, R>) -> ConveyorResult<(Context, PipelineData<T, R>)>
  where
    T: Default + 'static,
    R: 'static,
  {
    self.run(pipeline, T::default())
  }

  /// Runs `pipeline` starting from a full carrier, auxiliary result included.
  ///
  /// For every epoch the context's epoch index is set, then the pipeline's initializer
  /// steps run, then its remaining stages, all in declared order. The carrier returned
  /// by the last stage of an epoch is the input of the next epoch. Step failures are
  /// neither caught nor retried: the run stops and the error is returned.
  #[instrument(
    name = "Executor::run",
    skip_all,
    fields(
      pipeline = %pipeline.name(),
      payload_type = %std::any::type_name::<T>(),
      epochs = self.config.epochs,
      num_stages = pipeline.len(),
    ),
    err(Display)
  )]
  pub fn run_with_data<T, R>(
    &self,
    pipeline: &Pipeline<T, R>,
    data: PipelineData<T, R>,
  ) -> ConveyorResult<(Context, PipelineData<T, R>)>
  where
    T: 'static,
    R: 'static,
  {
    if self.config.epochs == 0 {
      event!(Level::ERROR, "Executor configured with zero epochs.");
      return Err(ConveyorError::Configuration {
        message: "epoch count must be at least 1".to_string(),
      });
    }

    event!(Level::DEBUG, "Run starting.");
    let mut ctx = Context::for_run(self.config.epochs, self.config.settings.clone());
    let mut data = data;

    for epoch in 0..self.config.epochs {
      let epoch_span = span!(Level::INFO, "epoch_execution", epoch);
      let _epoch_span_guard = epoch_span.enter();

      ctx.set_epoch(epoch);
      data = pipeline.apply(data, &ctx)?;
      event!(Level::DEBUG, "Epoch completed.");
    }

    event!(Level::DEBUG, "Run completed successfully.");
    Ok((ctx, data))
  }
}
