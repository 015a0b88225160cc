// tests/context_management_tests.rs
mod common;

use common::*;
use conveyor::{ContextData, ConveyorError, Context, Executor, ExecutorConfig, Pipeline, PipelineData, Step, ValueMap};
use std::sync::Arc;

#[test]
fn test_settings_are_visible_to_every_step() {
  setup_tracing();
  let pipeline = Pipeline::<i64>::builder()
    .then(Step::new("scale", |data: PipelineData<i64>, ctx: &Context| {
      let factor = ctx.setting::<i64>("factor").copied().unwrap_or(1);
      anyhow::Ok(data.payload * factor)
    }))
    .then(Step::new("offset", |data: PipelineData<i64>, ctx: &Context| {
      let offset = *ctx.require::<i64>("offset")?;
      anyhow::Ok(data.payload + offset)
    }))
    .build()
    .unwrap();

  let (ctx, data) = Executor::new()
    .with_setting("factor", 3_i64)
    .with_setting("offset", 4_i64)
    .run(&pipeline, 2)
    .unwrap();

  assert_eq!(data.payload, 10);
  assert_eq!(ctx.settings().len(), 2);
  assert_eq!(ctx.setting::<i64>("factor"), Some(&3));
}

#[test]
fn test_executor_config_carries_settings() {
  setup_tracing();
  let mut settings = ValueMap::new();
  settings.insert("greeting", "hello".to_string());
  let executor = Executor::with_config(ExecutorConfig { epochs: 2, settings });

  assert_eq!(executor.config().epochs, 2);
  let pipeline = Pipeline::<Vec<String>>::builder()
    .then(Step::new("greet", |mut data: PipelineData<Vec<String>>, ctx: &Context| {
      let greeting = ctx.require::<String>("greeting")?;
      data.payload.push(format!("{}@{}", greeting, ctx.epoch()));
      anyhow::Ok(data)
    }))
    .build()
    .unwrap();

  let (ctx, data) = executor.run_default(&pipeline).unwrap();
  assert_eq!(data.payload, vec!["hello@0", "hello@1"]);
  assert_eq!(ctx.epochs(), 2);
}

#[test]
fn test_require_distinguishes_missing_from_mismatched() {
  let mut settings = ValueMap::new();
  settings.insert("threshold", 0.5_f64);
  let ctx = Context::new(settings);

  assert_eq!(ctx.require::<f64>("threshold").unwrap(), &0.5);
  assert!(ctx.setting::<i32>("threshold").is_none());

  match ctx.require::<i32>("threshold") {
    Err(ConveyorError::TypeMismatch { key, expected_type }) => {
      assert_eq!(key, "threshold");
      assert_eq!(expected_type, "i32");
    }
    other => panic!("Expected TypeMismatch, got {:?}", other),
  }
  assert!(matches!(
    ctx.require::<f64>("missing"),
    Err(ConveyorError::SettingMissing { .. })
  ));
}

#[test]
fn test_value_map_operations() {
  let mut values = ValueMap::new();
  assert!(values.is_empty());

  values.insert("b", 2_u32);
  values.insert("a", "one".to_string());
  values.insert("b", vec![1_u8, 2]); // replaces regardless of type

  assert_eq!(values.len(), 2);
  assert!(values.contains_key("a"));
  assert_eq!(values.get::<String>("a").map(String::as_str), Some("one"));
  assert!(values.get::<u32>("b").is_none());
  assert_eq!(values.get::<Vec<u8>>("b"), Some(&vec![1, 2]));

  let mut keys: Vec<&str> = values.keys().collect();
  keys.sort_unstable();
  assert_eq!(keys, vec!["a", "b"]);
  assert_eq!(format!("{:?}", values), r#"ValueMap { keys: ["a", "b"] }"#);

  let shared = values.clone();
  assert!(values.remove("a"));
  assert!(!values.remove("a"));
  assert!(shared.contains_key("a"));

  values.clear();
  assert!(values.is_empty());
  assert_eq!(shared.len(), 2);
}

#[test]
fn test_state_is_fresh_for_every_run() {
  setup_tracing();
  let pipeline = Pipeline::<usize>::builder()
    .then(Step::new("count_visits", |_data: PipelineData<usize>, ctx: &Context| {
      let mut state = ctx.state().write();
      let visits = state.get::<usize>("visits").copied().unwrap_or(0) + 1;
      state.insert("visits", visits);
      anyhow::Ok(visits)
    }))
    .build()
    .unwrap();
  let executor = Executor::new().with_epochs(3);

  let (first_ctx, first) = executor.run(&pipeline, 0).unwrap();
  let (_, second) = executor.run(&pipeline, 0).unwrap();

  assert_eq!(first.payload, 3);
  assert_eq!(second.payload, 3);
  assert_eq!(first_ctx.state().read().get::<usize>("visits"), Some(&3));
}

#[test]
fn test_concurrent_runs_share_one_pipeline() {
  setup_tracing();
  let pipeline = Arc::new(
    Pipeline::<i64>::builder()
      .then(add_step("add_one", 1))
      .then(Step::new("times_epoch_count", |data: PipelineData<i64>, ctx: &Context| {
        anyhow::Ok(data.payload * ctx.epochs() as i64)
      }))
      .build()
      .unwrap(),
  );

  let results: Vec<i64> = std::thread::scope(|scope| {
    let handles: Vec<_> = (0..8_i64)
      .map(|input| {
        let pipeline = Arc::clone(&pipeline);
        scope.spawn(move || Executor::new().run(&*pipeline, input).unwrap().1.payload)
      })
      .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
  });

  assert_eq!(results, (1..=8).collect::<Vec<i64>>());
}

#[test]
fn test_context_data_clones_share_the_same_value() {
  let data = ContextData::new(vec![1, 2, 3]);
  let alias = data.clone();

  alias.write().push(4);
  assert_eq!(*data.read(), vec![1, 2, 3, 4]);

  {
    let _reader = data.read();
    assert!(alias.try_read().is_some());
    assert!(alias.try_write().is_none());
  }
  assert!(alias.try_write().is_some());

  let slice = data.map_read(|v| v.as_slice());
  assert_eq!(slice.len(), 4);
}

#[test]
fn test_standalone_context_defaults() {
  let ctx = Context::default();
  assert_eq!(ctx.epoch(), 0);
  assert_eq!(ctx.epochs(), 1);
  assert!(ctx.settings().is_empty());
  assert!(ctx.state().read().is_empty());
}
