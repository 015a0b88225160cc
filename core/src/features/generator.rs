// conveyor/src/features/generator.rs

//! Formula-based feature synthesis: new columns built by combining two existing ones
//! with an arithmetic operation.

use crate::core::context::Context;
use crate::core::data::PipelineData;
use crate::core::step::Step;
use crate::error::ConveyorError;
use crate::features::dataset::Dataset;
use anyhow::ensure;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::str::FromStr;
use tracing::{event, Level};

const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
  Add,
  Subtract,
  Multiply,
  Divide,
}

impl Operation {
  pub const ALL: [Operation; 4] = [Operation::Add, Operation::Subtract, Operation::Multiply, Operation::Divide];

  pub fn apply(self, x: f64, y: f64) -> f64 {
    match self {
      Operation::Add => x + y,
      Operation::Subtract => x - y,
      Operation::Multiply => x * y,
      Operation::Divide => x / y,
    }
  }

  pub fn symbol(self) -> &'static str {
    match self {
      Operation::Add => "+",
      Operation::Subtract => "-",
      Operation::Multiply => "*",
      Operation::Divide => "/",
    }
  }
}

impl FromStr for Operation {
  type Err = ConveyorError;

  fn from_str(symbol: &str) -> Result<Self, Self::Err> {
    match symbol.trim() {
      "+" => Ok(Operation::Add),
      "-" => Ok(Operation::Subtract),
      "*" => Ok(Operation::Multiply),
      "/" => Ok(Operation::Divide),
      other => Err(ConveyorError::Configuration {
        message: format!("unsupported feature operation '{}', expected one of + - * /", other),
      }),
    }
  }
}

/// Appends up to `limit` synthesized features per call.
///
/// Each attempt picks an operation and two existing columns (with replacement, among
/// all columns present at that moment, including ones synthesized earlier in the same
/// call). The result is appended only if every value is finite, so a division by zero
/// simply skips that attempt.
pub struct FormulaGenerator {
  operations: Vec<Operation>,
  limit: usize,
  rng: Mutex<StdRng>,
}

impl FormulaGenerator {
  /// All four operations, the default limit, OS-seeded randomness.
  pub fn new() -> Self {
    Self {
      operations: Operation::ALL.to_vec(),
      limit: DEFAULT_LIMIT,
      rng: Mutex::new(StdRng::from_os_rng()),
    }
  }

  /// Restricts the generator to the operations named by `symbols` (`+`, `-`, `*`, `/`).
  pub fn from_symbols<I, S>(symbols: I) -> Result<Self, ConveyorError>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut operations = Vec::new();
    for symbol in symbols {
      let op = symbol.as_ref().parse::<Operation>()?;
      if !operations.contains(&op) {
        operations.push(op);
      }
    }
    if operations.is_empty() {
      return Err(ConveyorError::Configuration {
        message: "formula generator needs at least one operation".to_string(),
      });
    }
    Ok(Self {
      operations,
      ..Self::new()
    })
  }

  pub fn with_limit(mut self, limit: usize) -> Self {
    self.limit = limit;
    self
  }

  pub fn with_seed(self, seed: u64) -> Self {
    self.with_rng(StdRng::seed_from_u64(seed))
  }

  pub fn with_rng(mut self, rng: StdRng) -> Self {
    self.rng = Mutex::new(rng);
    self
  }

  pub fn operations(&self) -> &[Operation] {
    &self.operations
  }

  pub fn limit(&self) -> usize {
    self.limit
  }

  /// Synthesizes features into `dataset`. Returns how many columns were appended.
  pub fn generate(&self, dataset: &mut Dataset) -> anyhow::Result<usize> {
    dataset.check_shape()?;
    ensure!(
      dataset.n_features() > 0,
      "cannot synthesize features from a dataset without feature columns"
    );

    let mut rng = self.rng.lock();
    let mut appended = 0;
    for _ in 0..self.limit {
      let op = self.operations[rng.random_range(0..self.operations.len())];
      let left = rng.random_range(0..dataset.n_features());
      let right = rng.random_range(0..dataset.n_features());

      let feature: Vec<f64> = dataset
        .data
        .iter()
        .map(|row| op.apply(row[left], row[right]))
        .collect();

      if feature.iter().all(|v| v.is_finite()) {
        dataset.push_column(feature)?;
        appended += 1;
      } else {
        event!(Level::TRACE, op = op.symbol(), left, right, "Discarding non-finite feature.");
      }
    }

    event!(
      Level::DEBUG,
      appended,
      attempts = self.limit,
      n_features = dataset.n_features(),
      "Formula features generated."
    );
    Ok(appended)
  }

  /// Wraps the generator into a pipeline step operating on the carrier's dataset.
  pub fn into_step<R: 'static>(self, name: impl Into<String>) -> Step<Dataset, R> {
    Step::new(name, move |mut data: PipelineData<Dataset, R>, _ctx: &Context| {
      self.generate(&mut data.payload)?;
      anyhow::Ok(data)
    })
  }
}

impl Default for FormulaGenerator {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for FormulaGenerator {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FormulaGenerator")
      .field("operations", &self.operations)
      .field("limit", &self.limit)
      .finish_non_exhaustive()
  }
}
