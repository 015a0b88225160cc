// conveyor/src/pipeline/builder.rs

//! Implements the fluent builder API (`PipelineBuilder`) and the `PipelineEntry` tagged
//! union that every value handed to `then` is resolved into.
//!
//! Accepted entries:
//!  - a [`Step`], appended as-is;
//!  - a bare callable `Fn(PipelineData<T, R>, &Context) -> Result<O, E>`, wrapped into an
//!    anonymous step whose output is coerced into a carrier;
//!  - any [`Combinator`], such as [`crate::RandomChoice`].
//!
//! Plain literals (strings, numbers, booleans, chars) resolve to `PipelineEntry::Invalid`
//! and make `build()` fail with `ConveyorError::InvalidStep`.

use crate::combinator::Combinator;
use crate::core::context::Context;
use crate::core::data::{IntoPipelineData, PipelineData};
use crate::core::step::{wrap_fn, Step, StepFn};
use crate::error::{ConveyorError, ConveyorResult};
use crate::pipeline::definition::{Pipeline, Stage};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

const DEFAULT_PIPELINE_NAME: &str = "pipeline";

/// A value handed to `PipelineBuilder::then`, resolved but not yet validated.
pub enum PipelineEntry<T, R> {
  Step(Step<T, R>),
  /// A bare function; it receives the name `anonymous#<position>` when appended.
  Callable(StepFn<T, R>),
  Combinator(Arc<dyn Combinator<T, R>>),
  /// Anything that is none of the above. Kept with a printable rendering of the value
  /// so the composition error can point at it.
  Invalid { type_name: &'static str, value: String },
}

impl<T: 'static, R: 'static> PipelineEntry<T, R> {
  pub fn callable<F, O, M, E>(function: F) -> Self
  where
    F: Fn(PipelineData<T, R>, &Context) -> Result<O, E> + Send + Sync + 'static,
    O: IntoPipelineData<T, R, M>,
    E: Into<anyhow::Error>,
  {
    PipelineEntry::Callable(wrap_fn(function))
  }

  pub fn invalid<V: std::fmt::Debug>(value: &V) -> Self {
    PipelineEntry::Invalid {
      type_name: std::any::type_name::<V>(),
      value: format!("{:?}", value),
    }
  }
}

impl<T, R> std::fmt::Debug for PipelineEntry<T, R> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PipelineEntry::Step(step) => f.debug_tuple("Step").field(step).finish(),
      PipelineEntry::Callable(_) => f.write_str("Callable"),
      PipelineEntry::Combinator(_) => f.write_str("Combinator"),
      PipelineEntry::Invalid { type_name, value } => f
        .debug_struct("Invalid")
        .field("type_name", type_name)
        .field("value", value)
        .finish(),
    }
  }
}

// --- Resolution of builder inputs ---

/// Marker for [`Step`] entries.
pub struct StepEntry;
/// Marker for [`Combinator`] entries.
pub struct CombinatorEntry;
/// Marker for bare callables, carrying the callable's output, coercion and error types.
pub struct CallableEntry<O, M, E>(PhantomData<fn() -> (O, M, E)>);
/// Marker for literal values, which are never valid entries.
pub struct LiteralEntry;
/// Marker for entries that were already resolved by the caller.
pub struct ResolvedEntry;

/// Conversion of a builder input into a `PipelineEntry`.
///
/// The `Marker` parameter lets steps, combinators, bare callables and literals each have
/// their own blanket implementation without overlapping.
pub trait IntoPipelineEntry<T, R, Marker> {
  fn into_pipeline_entry(self) -> PipelineEntry<T, R>;
}

impl<T, R> IntoPipelineEntry<T, R, ResolvedEntry> for PipelineEntry<T, R> {
  fn into_pipeline_entry(self) -> PipelineEntry<T, R> {
    self
  }
}

impl<T, R> IntoPipelineEntry<T, R, StepEntry> for Step<T, R> {
  fn into_pipeline_entry(self) -> PipelineEntry<T, R> {
    PipelineEntry::Step(self)
  }
}

impl<T, R, C> IntoPipelineEntry<T, R, CombinatorEntry> for C
where
  C: Combinator<T, R> + 'static,
{
  fn into_pipeline_entry(self) -> PipelineEntry<T, R> {
    PipelineEntry::Combinator(Arc::new(self))
  }
}

impl<T, R, F, O, M, E> IntoPipelineEntry<T, R, CallableEntry<O, M, E>> for F
where
  T: 'static,
  R: 'static,
  F: Fn(PipelineData<T, R>, &Context) -> Result<O, E> + Send + Sync + 'static,
  O: IntoPipelineData<T, R, M>,
  E: Into<anyhow::Error>,
{
  fn into_pipeline_entry(self) -> PipelineEntry<T, R> {
    PipelineEntry::Callable(wrap_fn(self))
  }
}

macro_rules! literal_entries {
  ($($literal:ty),* $(,)?) => {
    $(
      impl<T, R> IntoPipelineEntry<T, R, LiteralEntry> for $literal {
        fn into_pipeline_entry(self) -> PipelineEntry<T, R> {
          PipelineEntry::Invalid {
            type_name: std::any::type_name::<$literal>(),
            value: format!("{:?}", self),
          }
        }
      }
    )*
  };
}

literal_entries!(
  &str, String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

// --- Builder ---

/// Accumulates pipeline entries left to right.
///
/// `then` never fails on its own: the first invalid entry is recorded together with its
/// position and `build()` reports it. Entries chained after an invalid one are ignored.
pub struct PipelineBuilder<T, R = ()> {
  name: String,
  stages: Vec<Stage<T, R>>,
  error: Option<ConveyorError>,
}

impl<T: 'static, R: 'static> PipelineBuilder<T, R> {
  pub fn new() -> Self {
    Self {
      name: DEFAULT_PIPELINE_NAME.to_string(),
      stages: Vec::new(),
      error: None,
    }
  }

  /// Labels the pipeline in logs and in `Candidate` names.
  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  /// Appends a step, a bare callable or a combinator.
  pub fn then<E, M>(self, entry: E) -> Self
  where
    E: IntoPipelineEntry<T, R, M>,
  {
    self.push(entry.into_pipeline_entry())
  }

  /// Appends an already-resolved entry.
  pub fn push(mut self, entry: PipelineEntry<T, R>) -> Self {
    if self.error.is_some() {
      event!(Level::TRACE, pipeline = %self.name, "Ignoring entry chained after a composition error.");
      return self;
    }

    // Position in the chain, counting from zero.
    let position = self.stages.len();
    match entry {
      PipelineEntry::Step(step) => self.stages.push(Stage::Step(step)),
      PipelineEntry::Callable(function) => {
        let step = Step::from_step_fn(format!("anonymous#{}", position), function, false);
        self.stages.push(Stage::Step(step));
      }
      PipelineEntry::Combinator(combinator) => {
        if combinator.candidate_count() == 0 {
          event!(Level::ERROR, pipeline = %self.name, position, combinator = combinator.name(), "Combinator has no candidates.");
          self.error = Some(ConveyorError::EmptyCombinator {
            position,
            name: combinator.name().to_string(),
          });
        } else {
          self.stages.push(Stage::Combinator(combinator));
        }
      }
      PipelineEntry::Invalid { type_name, value } => {
        event!(Level::ERROR, pipeline = %self.name, position, %type_name, %value, "Invalid pipeline entry.");
        self.error = Some(ConveyorError::InvalidStep {
          position,
          type_name,
          value,
        });
      }
    }
    self
  }

  /// Number of entries accepted so far.
  pub fn len(&self) -> usize {
    self.stages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  /// Freezes the accumulated entries into a `Pipeline`, or reports the first
  /// composition error.
  #[instrument(
    name = "PipelineBuilder::build",
    skip_all,
    fields(pipeline = %self.name, num_stages = self.stages.len()),
    err(Display)
  )]
  pub fn build(self) -> ConveyorResult<Pipeline<T, R>> {
    if let Some(err) = self.error {
      return Err(err);
    }
    event!(Level::DEBUG, "Pipeline built.");
    Ok(Pipeline {
      name: self.name,
      stages: self.stages,
    })
  }
}

impl<T: 'static, R: 'static> Default for PipelineBuilder<T, R> {
  fn default() -> Self {
    Self::new()
  }
}
