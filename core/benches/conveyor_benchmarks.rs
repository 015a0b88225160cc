use conveyor::features::{Dataset, FeatureSelector, FormulaGenerator, ModelScore};
use conveyor::{Context, ContextData, Executor, Pipeline, PipelineData, RandomChoice, Step, ValueMap};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// --- Helper: CPU-bound step ---
fn create_increment_step(name: String, iterations: u64) -> Step<u64> {
  Step::new(name, move |data: PipelineData<u64>, _ctx: &Context| {
    let mut value = data.payload;
    for _i in 0..iterations {
      // Simulate some CPU-bound work
      value = value.wrapping_add(1);
    }
    anyhow::Ok(value)
  })
}

fn build_linear_pipeline(num_steps: usize, iterations: u64) -> Pipeline<u64> {
  (0..num_steps)
    .fold(Pipeline::<u64>::builder(), |builder, i| {
      builder.then(create_increment_step(format!("step_{}", i), iterations))
    })
    .build()
    .unwrap()
}

// --- Benchmark Functions ---

fn bench_linear_pipeline(c: &mut Criterion) {
  let mut group = c.benchmark_group("LinearPipeline");

  for num_steps in [1, 5, 10].iter() {
    for iterations in [1_u64, 10, 100].iter() {
      let pipeline = build_linear_pipeline(*num_steps, *iterations);
      let executor = Executor::new();

      group.throughput(Throughput::Elements(*num_steps as u64 * *iterations));
      group.bench_with_input(
        BenchmarkId::new(format!("{}steps_{}iter", num_steps, iterations), num_steps * *iterations as usize),
        &(*num_steps, *iterations),
        |b, _| b.iter(|| executor.run(&pipeline, 0).unwrap()),
      );
    }
  }
  group.finish();
}

fn bench_epoch_loop(c: &mut Criterion) {
  let mut group = c.benchmark_group("EpochLoop");
  let pipeline = Pipeline::<u64>::builder()
    .then(Step::initializer("seed", |_data: PipelineData<u64>, ctx: &Context| {
      anyhow::Ok(ctx.epoch() as u64)
    }))
    .then(create_increment_step("body".to_string(), 1))
    .build()
    .unwrap();

  for epochs in [1, 10, 100].iter() {
    let executor = Executor::new().with_epochs(*epochs);
    group.throughput(Throughput::Elements(*epochs as u64));
    group.bench_with_input(BenchmarkId::from_parameter(*epochs), epochs, |b, _| {
      b.iter(|| executor.run(&pipeline, 0).unwrap())
    });
  }
  group.finish();
}

fn bench_random_choice_dispatch(c: &mut Criterion) {
  let mut group = c.benchmark_group("RandomChoiceDispatch");

  for num_candidates in [2, 8, 32].iter() {
    let candidates: Vec<Step<u64>> = (0..*num_candidates)
      .map(|i| create_increment_step(format!("candidate_{}", i), 1))
      .collect();
    let pipeline = Pipeline::<u64>::builder()
      .then(RandomChoice::with_seed(candidates, 42))
      .build()
      .unwrap();
    let executor = Executor::new();

    group.throughput(Throughput::Elements(1)); // 1 selection + delegation
    group.bench_with_input(BenchmarkId::from_parameter(*num_candidates), num_candidates, |b, _| {
      b.iter(|| executor.run(&pipeline, 0).unwrap())
    });
  }
  group.finish();
}

fn bench_context_access(c: &mut Criterion) {
  let mut group = c.benchmark_group("ContextAccess");
  let mut settings = ValueMap::new();
  settings.insert("factor", 3_u64);
  let ctx = Context::new(settings);
  let state = ContextData::new(0_u64);

  group.bench_function("typed_setting_lookup", |b| {
    b.iter(|| criterion::black_box(*ctx.require::<u64>("factor").unwrap()))
  });

  group.bench_function("state_write_lock_and_modify", |b| {
    b.iter(|| {
      let mut guard = state.write();
      *guard += 1;
      criterion::black_box(*guard);
    })
  });
  group.finish();
}

fn bench_feature_steps(c: &mut Criterion) {
  let mut group = c.benchmark_group("FeatureSteps");
  let rows: Vec<Vec<f64>> = (0..256)
    .map(|r| (0..8).map(|f| (r * 8 + f) as f64 / 10.0 + 1.0).collect())
    .collect();
  let dataset = Dataset::new(rows, None).unwrap();

  let generator = FormulaGenerator::new().with_seed(7);
  group.bench_function("formula_generate_10", |b| {
    b.iter_batched(
      || dataset.clone(),
      |mut ds| generator.generate(&mut ds).unwrap(),
      criterion::BatchSize::SmallInput,
    )
  });

  let selector = FeatureSelector::new(4);
  let records = vec![ModelScore::new("bench", 1.0).with_importances((0..8).map(|i| i as f64).collect())];
  group.bench_function("select_top_4_of_8", |b| {
    b.iter_batched(
      || dataset.clone(),
      |mut ds| selector.select(&mut ds, &records).unwrap(),
      criterion::BatchSize::SmallInput,
    )
  });
  group.finish();
}

criterion_group!(
  benches,
  bench_linear_pipeline,
  bench_epoch_loop,
  bench_random_choice_dispatch,
  bench_context_access,
  bench_feature_steps
);
criterion_main!(benches);
