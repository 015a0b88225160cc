// conveyor/examples/basic_pipeline.rs

use conveyor::{Context, ConveyorResult, Executor, Pipeline, PipelineData, Step};
use tracing::info;

// 1. Pick the carrier types: the payload is a running total, the auxiliary result
//    collects a log line per step.
type Data = PipelineData<i64, Vec<String>>;

fn log_line(mut data: Data, line: String) -> Data {
  info!("{}", line);
  data.auxiliary.get_or_insert_with(Vec::new).push(line);
  data
}

fn main() -> ConveyorResult<()> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // 2. Declare the steps. Order of declaration is order of execution, except for
  //    initializers, which run first in every epoch.
  let pipeline = Pipeline::<i64, Vec<String>>::builder()
    .named("basic")
    .then(Step::new("step_alpha", |data: Data, _ctx: &Context| {
      let total = data.payload + 1;
      let line = format!("Alpha executed: total = {}", total);
      anyhow::Ok(log_line(data.replace_payload(total), line))
    }))
    .then(Step::new("step_beta", |data: Data, _ctx: &Context| {
      let total = data.payload * 2;
      let line = format!("Beta executed: total = {}", total);
      anyhow::Ok(log_line(data.replace_payload(total), line))
    }))
    // A bare function becomes an anonymous step ("anonymous#2").
    .then(|data: Data, ctx: &Context| {
      let total = data.payload - 1;
      let line = format!("Gamma executed in epoch {}: total = {}", ctx.epoch(), total);
      anyhow::Ok(log_line(data.replace_payload(total), line))
    })
    .then(Step::initializer("reset_log", |mut data: Data, ctx: &Context| {
      info!("Epoch {} of {} starting", ctx.epoch() + 1, ctx.epochs());
      data.auxiliary = None;
      anyhow::Ok(data)
    }))
    .build()?;

  info!("Stages: {:?}", pipeline.stage_names());

  // 3. Run it. Each epoch receives the carrier the previous epoch returned.
  let (_ctx, result) = Executor::new().with_epochs(2).run(&pipeline, 5)?;

  // 4. Inspect the results
  info!("Final total: {}", result.payload);
  info!("Log of the last epoch:");
  for line in result.auxiliary.as_deref().unwrap_or_default() {
    info!("- {}", line);
  }

  // Epoch 0: (5 + 1) * 2 - 1 = 11, epoch 1: (11 + 1) * 2 - 1 = 23
  assert_eq!(result.payload, 23);
  assert_eq!(result.auxiliary.map(|log| log.len()), Some(3));

  Ok(())
}
