// src/lib.rs

//! Conveyor: a synchronous, composable step pipeline engine for Rust.
//!
//! Conveyor lets you declare an ordered sequence of processing steps and run it over
//! one or more epochs, with features like:
//!  - Named steps, or bare functions auto-wrapped into anonymous steps.
//!  - Step outputs coerced into carriers: return the full `PipelineData` or just a payload.
//!  - Initializer steps that run at the start of every epoch, ahead of the body.
//!  - Combinators that pick among candidate steps or sub-pipelines at run time,
//!    such as the seedable `RandomChoice`.
//!  - A shared execution `Context` with the epoch index, read-only settings and
//!    scratch state.
//!  - Composition errors reported before anything runs, distinct from step failures.
//!  - Reference feature-engineering steps (`features`) built on the same contract.

pub mod combinator;
pub mod core;
pub mod error;
pub mod executor;
pub mod features;
pub mod pipeline;

// --- Re-exports for the Public API ---

// Core types that users will interact with frequently
pub use crate::core::context::Context;
pub use crate::core::context_data::ContextData;
pub use crate::core::data::{IntoPipelineData, PipelineData};
pub use crate::core::step::Step;
pub use crate::core::values::ValueMap;

// The main Pipeline struct and its builder
pub use crate::pipeline::{Pipeline, PipelineBuilder, PipelineEntry};

pub use crate::combinator::{Candidate, Combinator, RandomChoice};

pub use crate::executor::{Executor, ExecutorConfig};

pub use crate::error::{ConveyorError, ConveyorResult};

/*
    Core Workflow:
    1. Pick a payload type `T` (and optionally an auxiliary result type `R`).
    2. Build a `Pipeline<T, R>`:
       - `Pipeline::builder()`
       - `.then(Step::new("name", |data, ctx| ...))` for named steps,
       - `.then(Step::initializer("seed", |data, ctx| ...))` for per-epoch initializers,
       - `.then(|data: PipelineData<T, R>, ctx: &Context| ...)` for anonymous steps,
       - `.then(RandomChoice::new([step_a, step_b]))` for run-time branching,
       - `.build()?` reports the first composition error, if any.
    3. Create an `Executor`, optionally `.with_epochs(n)` and `.with_setting(key, value)`.
    4. Call `executor.run(&pipeline, initial_payload)` to get `(Context, PipelineData<T, R>)`.
*/
