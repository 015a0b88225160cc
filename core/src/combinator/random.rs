// conveyor/src/combinator/random.rs

//! Implements `RandomChoice`, the uniform random-choice combinator.

use crate::combinator::{Candidate, Combinator};
use crate::core::context::Context;
use crate::core::data::PipelineData;
use crate::error::{ConveyorError, ConveyorResult};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{event, Level};

const DEFAULT_NAME: &str = "random_choice";

/// Picks one candidate uniformly at random on every invocation and delegates to it.
///
/// Draws are independent of earlier draws and of the epoch. The generator is owned by
/// the combinator and can be injected (`with_rng`) or seeded (`with_seed`) for
/// reproducible runs; `new` seeds from the operating system.
pub struct RandomChoice<T, R = ()> {
  name: String,
  candidates: Vec<Candidate<T, R>>,
  rng: Mutex<StdRng>,
}

impl<T: 'static, R: 'static> RandomChoice<T, R> {
  pub fn new<I, C>(candidates: I) -> Self
  where
    I: IntoIterator<Item = C>,
    C: Into<Candidate<T, R>>,
  {
    Self::with_rng(candidates, StdRng::from_os_rng())
  }

  pub fn with_seed<I, C>(candidates: I, seed: u64) -> Self
  where
    I: IntoIterator<Item = C>,
    C: Into<Candidate<T, R>>,
  {
    Self::with_rng(candidates, StdRng::seed_from_u64(seed))
  }

  pub fn with_rng<I, C>(candidates: I, rng: StdRng) -> Self
  where
    I: IntoIterator<Item = C>,
    C: Into<Candidate<T, R>>,
  {
    Self {
      name: DEFAULT_NAME.to_string(),
      candidates: candidates.into_iter().map(Into::into).collect(),
      rng: Mutex::new(rng),
    }
  }

  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  pub fn candidates(&self) -> &[Candidate<T, R>] {
    &self.candidates
  }

  /// Draws the index of the next candidate. The lock is released before delegation.
  fn pick(&self) -> usize {
    self.rng.lock().random_range(0..self.candidates.len())
  }
}

impl<T: 'static, R: 'static> Combinator<T, R> for RandomChoice<T, R> {
  fn name(&self) -> &str {
    &self.name
  }

  fn candidate_count(&self) -> usize {
    self.candidates.len()
  }

  fn apply(&self, data: PipelineData<T, R>, ctx: &Context) -> ConveyorResult<PipelineData<T, R>> {
    if self.candidates.is_empty() {
      return Err(ConveyorError::Internal(format!(
        "RandomChoice '{}' was invoked without candidates",
        self.name
      )));
    }

    let chosen_idx = self.pick();
    let chosen = &self.candidates[chosen_idx];
    event!(
      Level::DEBUG,
      combinator = %self.name,
      chosen = chosen.name(),
      chosen_index = chosen_idx,
      num_candidates = self.candidates.len(),
      "Candidate selected."
    );
    chosen.apply(data, ctx)
  }
}

impl<T: 'static, R: 'static> std::fmt::Debug for RandomChoice<T, R> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let names: Vec<&str> = self.candidates.iter().map(Candidate::name).collect();
    f.debug_struct("RandomChoice")
      .field("name", &self.name)
      .field("candidates", &names)
      .finish_non_exhaustive()
  }
}
