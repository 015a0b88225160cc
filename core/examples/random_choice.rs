// conveyor/examples/random_choice.rs

use conveyor::{Candidate, Context, ConveyorResult, Executor, Pipeline, PipelineData, RandomChoice, Step};
use std::collections::BTreeMap;
use tracing::info;

fn main() -> ConveyorResult<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Random Choice Example ---");

  // Two single-step candidates and one sub-pipeline candidate.
  let shout = Step::new("shout", |data: PipelineData<String>, _ctx: &Context| {
    anyhow::Ok(data.payload.to_uppercase())
  });
  let whisper = Step::new("whisper", |data: PipelineData<String>, _ctx: &Context| {
    anyhow::Ok(data.payload.to_lowercase())
  });
  let echo = Pipeline::<String>::builder()
    .named("echo")
    .then(|data: PipelineData<String>, _ctx: &Context| anyhow::Ok(format!("{0} {0}", data.payload)))
    .build()?;

  // Seeded, so every run of this example prints the same picks.
  let choice = RandomChoice::with_seed(
    vec![Candidate::from(shout), Candidate::from(whisper), Candidate::from(echo)],
    2024,
  )
  .named("style");

  let pipeline = Pipeline::<String>::builder()
    .then(choice)
    .then(Step::new("punctuate", |data: PipelineData<String>, _ctx: &Context| {
      anyhow::Ok(format!("{}!", data.payload))
    }))
    .build()?;

  let executor = Executor::new();
  let mut outcomes: BTreeMap<String, usize> = BTreeMap::new();
  for _ in 0..30 {
    let (_ctx, data) = executor.run(&pipeline, "Hello".to_string())?;
    *outcomes.entry(data.payload).or_default() += 1;
  }

  for (outcome, count) in &outcomes {
    info!("{:<14} x{}", outcome, count);
  }
  assert!(outcomes.len() <= 3);

  Ok(())
}
