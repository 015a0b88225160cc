// conveyor/src/features/polynomial.rs

//! Polynomial feature expansion: replaces the feature columns with every product of
//! input columns up to a given degree.

use crate::core::context::Context;
use crate::core::data::PipelineData;
use crate::core::step::Step;
use crate::features::dataset::Dataset;
use anyhow::ensure;
use tracing::{event, Level};

const DEFAULT_DEGREE: usize = 2;

/// Expands a dataset into its polynomial features.
///
/// Output columns are ordered by degree, then lexicographically by the input columns
/// involved: for two inputs and degree 2 that is `1, x0, x1, x0², x0·x1, x1²`. With
/// `interaction_only` no input appears twice in a product (`1, x0, x1, x0·x1`), and
/// without `include_bias` the constant column is left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolynomialGenerator {
  degree: usize,
  interaction_only: bool,
  include_bias: bool,
}

impl PolynomialGenerator {
  /// Degree 2, all powers, bias column included.
  pub fn new() -> Self {
    Self {
      degree: DEFAULT_DEGREE,
      interaction_only: false,
      include_bias: true,
    }
  }

  pub fn with_degree(mut self, degree: usize) -> Self {
    self.degree = degree;
    self
  }

  pub fn interaction_only(mut self, interaction_only: bool) -> Self {
    self.interaction_only = interaction_only;
    self
  }

  pub fn include_bias(mut self, include_bias: bool) -> Self {
    self.include_bias = include_bias;
    self
  }

  pub fn degree(&self) -> usize {
    self.degree
  }

  /// Column index tuples of every output term, in output order.
  pub fn terms(&self, n_features: usize) -> Vec<Vec<usize>> {
    let start = if self.include_bias { 0 } else { 1 };
    let mut terms = Vec::new();
    for degree in start..=self.degree {
      let mut current = Vec::with_capacity(degree);
      self.collect_terms(n_features, degree, 0, &mut current, &mut terms);
    }
    terms
  }

  fn collect_terms(
    &self,
    n_features: usize,
    remaining: usize,
    first: usize,
    current: &mut Vec<usize>,
    terms: &mut Vec<Vec<usize>>,
  ) {
    if remaining == 0 {
      terms.push(current.clone());
      return;
    }
    for column in first..n_features {
      current.push(column);
      let next = if self.interaction_only { column + 1 } else { column };
      self.collect_terms(n_features, remaining - 1, next, current, terms);
      current.pop();
    }
  }

  /// Replaces the dataset's features with their polynomial expansion. Returns the new
  /// number of features.
  pub fn generate(&self, dataset: &mut Dataset) -> anyhow::Result<usize> {
    dataset.check_shape()?;
    ensure!(
      dataset.n_features() > 0,
      "cannot expand a dataset without feature columns"
    );

    let terms = self.terms(dataset.n_features());
    ensure!(
      !terms.is_empty(),
      "polynomial expansion of degree {} without bias yields no features",
      self.degree
    );

    for row in dataset.data.iter_mut() {
      let expanded: Vec<f64> = terms
        .iter()
        .map(|term| term.iter().map(|&column| row[column]).product())
        .collect();
      *row = expanded;
    }

    event!(
      Level::DEBUG,
      degree = self.degree,
      interaction_only = self.interaction_only,
      n_features = terms.len(),
      "Polynomial features generated."
    );
    Ok(terms.len())
  }

  /// Wraps the generator into a pipeline step operating on the carrier's dataset.
  pub fn into_step<R: 'static>(self, name: impl Into<String>) -> Step<Dataset, R> {
    Step::new(name, move |mut data: PipelineData<Dataset, R>, _ctx: &Context| {
      self.generate(&mut data.payload)?;
      anyhow::Ok(data)
    })
  }
}

impl Default for PolynomialGenerator {
  fn default() -> Self {
    Self::new()
  }
}

