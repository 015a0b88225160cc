// conveyor/src/features/selector.rs

//! Importance-driven feature selection, reading model records from the carrier's
//! auxiliary result.

use crate::core::context::Context;
use crate::core::data::PipelineData;
use crate::core::step::Step;
use crate::features::dataset::Dataset;
use anyhow::ensure;
use tracing::{event, Level};

/// Evaluation record of one candidate model, as produced by a model-selection step.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelScore {
  pub model: String,
  pub score: f64,
  /// Per-feature weights (coefficients or importances); signs are ignored.
  /// `None` for models that expose neither.
  pub feature_importances: Option<Vec<f64>>,
}

impl ModelScore {
  pub fn new(model: impl Into<String>, score: f64) -> Self {
    Self {
      model: model.into(),
      score,
      feature_importances: None,
    }
  }

  pub fn with_importances(mut self, importances: Vec<f64>) -> Self {
    self.feature_importances = Some(importances);
    self
  }
}

/// Trims a dataset down to roughly `max_features` columns.
///
/// For every model record with importances, columns whose absolute importance is at or
/// above the `max_features`-th largest are marked; the union of all marks is kept.
/// Ties can keep a few more than `max_features` columns, since the comparison is `>=`
/// rather than a strict `>`. When no record marks anything the dataset is left untouched.
/// Non-finite importances are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSelector {
  max_features: usize,
}

impl FeatureSelector {
  /// A `max_features` of 0 is treated as 1.
  pub fn new(max_features: usize) -> Self {
    Self {
      max_features: max_features.max(1),
    }
  }

  pub fn max_features(&self) -> usize {
    self.max_features
  }

  /// Applies the selection to `dataset`. Returns the number of removed columns.
  pub fn select(&self, dataset: &mut Dataset, records: &[ModelScore]) -> anyhow::Result<usize> {
    dataset.check_shape()?;
    let n_features = dataset.n_features();
    let mut mask = vec![false; n_features];

    if records.is_empty() {
      event!(Level::WARN, "No model records available, feature selection skipped.");
    }

    for record in records {
      let Some(importances) = &record.feature_importances else {
        event!(Level::WARN, model = %record.model, "Model exposes no feature importances, not supported by FeatureSelector.");
        continue;
      };
      ensure!(
        importances.len() == n_features,
        "model '{}' reports {} importances for {} features",
        record.model,
        importances.len(),
        n_features
      );
      ensure!(
        importances.iter().all(|v| v.is_finite()),
        "model '{}' reports non-finite feature importances",
        record.model
      );
      if n_features <= self.max_features {
        event!(Level::DEBUG, model = %record.model, n_features, "Dataset already within max_features.");
        continue;
      }

      let mut sorted: Vec<f64> = importances.iter().map(|v| v.abs()).collect();
      sorted.sort_by(f64::total_cmp);
      let threshold = sorted[n_features - self.max_features];

      let mut marked = 0;
      for (keep, importance) in mask.iter_mut().zip(importances) {
        if importance.abs() >= threshold {
          *keep = true;
          marked += 1;
        }
      }
      event!(Level::INFO, model = %record.model, marked, threshold, "Features marked for model.");
    }

    let kept = mask.iter().filter(|keep| **keep).count();
    if kept == 0 {
      return Ok(0);
    }
    dataset.retain_columns(&mask)?;
    let removed = n_features - kept;
    event!(Level::INFO, kept, removed, "Feature selection applied.");
    Ok(removed)
  }

  /// Wraps the selector into a step. The auxiliary model records are forwarded unchanged.
  pub fn into_step(self, name: impl Into<String>) -> Step<Dataset, Vec<ModelScore>> {
    Step::new(
      name,
      move |mut data: PipelineData<Dataset, Vec<ModelScore>>, _ctx: &Context| {
        let records = data.auxiliary.as_deref().unwrap_or(&[]);
        self.select(&mut data.payload, records)?;
        anyhow::Ok(data)
      },
    )
  }
}
