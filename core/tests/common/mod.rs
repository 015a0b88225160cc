// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use conveyor::{Context, PipelineData, Step};
use parking_lot::Mutex;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Test step failed: {0}")]
  Step(String),

  #[error("Test setup failed: {0}")]
  Setup(String),
}

// --- Common Step Creators ---

/// Adds `amount` to an integer payload.
pub fn add_step(name: &'static str, amount: i64) -> Step<i64> {
  Step::new(name, move |data: PipelineData<i64>, _ctx: &Context| {
    tracing::debug!(target: "test_steps", step = name, "adding {} to {}", amount, data.payload);
    Ok::<_, TestError>(data.payload + amount)
  })
}

/// Appends the step name to a payload that records the execution trail.
pub fn record_step(name: &'static str) -> Step<Vec<String>> {
  Step::new(name, move |mut data: PipelineData<Vec<String>>, _ctx: &Context| {
    data.payload.push(name.to_string());
    Ok::<_, TestError>(data)
  })
}

/// Like `record_step`, tagging the entry with the current epoch: "name@epoch".
pub fn record_epoch_step(name: &'static str) -> Step<Vec<String>> {
  Step::new(name, move |mut data: PipelineData<Vec<String>>, ctx: &Context| {
    data.payload.push(format!("{}@{}", name, ctx.epoch()));
    Ok::<_, TestError>(data)
  })
}

pub fn record_epoch_initializer(name: &'static str) -> Step<Vec<String>> {
  Step::initializer(name, move |mut data: PipelineData<Vec<String>>, ctx: &Context| {
    data.payload.push(format!("{}@{}", name, ctx.epoch()));
    Ok::<_, TestError>(data)
  })
}

pub fn failing_step(name: &'static str, error_message: &'static str) -> Step<Vec<String>> {
  Step::new(name, move |_data: PipelineData<Vec<String>>, _ctx: &Context| {
    tracing::warn!(target: "test_steps", step = name, "failing with: '{}'", error_message);
    Err::<PipelineData<Vec<String>>, _>(TestError::Step(error_message.to_string()))
  })
}

/// Side-channel trail for runs that fail and therefore return no carrier.
pub type Trail = Arc<Mutex<Vec<String>>>;

pub fn trail_step(name: &'static str, trail: &Trail) -> Step<i64> {
  let trail = Arc::clone(trail);
  Step::new(name, move |data: PipelineData<i64>, _ctx: &Context| {
    trail.lock().push(name.to_string());
    Ok::<_, TestError>(data)
  })
}

/// Passes the carrier through, bumping `STEP_EXEC_COUNTER`.
pub fn counting_initializer(name: &'static str) -> Step<i64> {
  Step::initializer(name, |data: PipelineData<i64>, _ctx: &Context| {
    STEP_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
    Ok::<_, TestError>(data)
  })
}

pub fn counting_step(name: &'static str) -> Step<i64> {
  Step::new(name, |data: PipelineData<i64>, _ctx: &Context| {
    STEP_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
    Ok::<_, TestError>(data)
  })
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counters for checking execution counts ---
pub static STEP_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  STEP_EXEC_COUNTER.store(0, Ordering::SeqCst);
}

pub fn step_exec_count() -> usize {
  STEP_EXEC_COUNTER.load(Ordering::SeqCst)
}
