// conveyor/src/pipeline/execution.rs

//! Contains `Pipeline::apply()`, one pass over a pipeline's stages: initializer steps
//! first, then every other stage in declared order.

use crate::core::context::Context;
use crate::core::data::PipelineData;
use crate::error::ConveyorResult;
use crate::pipeline::definition::{Pipeline, Stage};
use tracing::{event, instrument, span, Level};

impl<T: 'static, R: 'static> Pipeline<T, R> {
  /// Runs one pass of the pipeline over `data`.
  ///
  /// Initializer steps run first, in declared order, followed by all remaining stages in
  /// declared order. Each stage receives the carrier its predecessor returned. The first
  /// failure aborts the pass and is returned as-is.
  ///
  /// The executor calls this once per epoch; `RandomChoice` calls it when it selects a
  /// sub-pipeline candidate.
  #[instrument(
    name = "Pipeline::apply",
    skip_all,
    fields(
      pipeline = %self.name,
      epoch = ctx.epoch(),
      num_stages = self.stages.len(),
    ),
    err(Display)
  )]
  pub fn apply(&self, data: PipelineData<T, R>, ctx: &Context) -> ConveyorResult<PipelineData<T, R>> {
    event!(Level::TRACE, "Pipeline pass starting.");
    let mut data = data;

    let initializers = self.stages.iter().enumerate().filter(|(_, s)| s.is_initializer());
    for (stage_idx, stage) in initializers {
      data = self.run_stage(stage_idx, stage, data, ctx)?;
    }

    let body = self.stages.iter().enumerate().filter(|(_, s)| !s.is_initializer());
    for (stage_idx, stage) in body {
      data = self.run_stage(stage_idx, stage, data, ctx)?;
    }

    event!(Level::TRACE, "Pipeline pass completed.");
    Ok(data)
  }

  fn run_stage(
    &self,
    stage_idx: usize,
    stage: &Stage<T, R>,
    data: PipelineData<T, R>,
    ctx: &Context,
  ) -> ConveyorResult<PipelineData<T, R>> {
    let stage_span = span!(
      Level::DEBUG,
      "pipeline_stage_execution",
      stage_name = stage.name(),
      stage_index = stage_idx,
      initializer = stage.is_initializer()
    );
    let _stage_span_guard = stage_span.enter();

    let result = match stage {
      Stage::Step(step) => step.call(data, ctx),
      Stage::Combinator(combinator) => {
        event!(Level::TRACE, "Delegating to combinator.");
        combinator.apply(data, ctx)
      }
    };

    match &result {
      Ok(_) => event!(Level::TRACE, "Stage finished."),
      Err(e) => event!(Level::ERROR, error = %e, "Stage failed."),
    }
    result
  }
}
