// conveyor/src/features/dataset.rs

use anyhow::{ensure, Result};

/// A dense, row-major feature matrix with an optional target column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
  pub data: Vec<Vec<f64>>,
  pub target: Option<Vec<f64>>,
}

impl Dataset {
  /// Builds a dataset, checking its shape.
  pub fn new(data: Vec<Vec<f64>>, target: Option<Vec<f64>>) -> Result<Self> {
    let dataset = Self { data, target };
    dataset.check_shape()?;
    Ok(dataset)
  }

  /// Fails unless rows are equally long and the target (if any) has one value per row.
  ///
  /// The fields are public, so steps re-check the shape before indexing into rows.
  pub fn check_shape(&self) -> Result<()> {
    let width = self.n_features();
    if let Some(pos) = self.data.iter().position(|row| row.len() != width) {
      anyhow::bail!(
        "dataset rows must all have {} columns, row {} has {}",
        width,
        pos,
        self.data[pos].len()
      );
    }
    if let Some(target) = &self.target {
      ensure!(
        target.len() == self.data.len(),
        "target has {} values but the dataset has {} rows",
        target.len(),
        self.data.len()
      );
    }
    Ok(())
  }

  pub fn n_samples(&self) -> usize {
    self.data.len()
  }

  pub fn n_features(&self) -> usize {
    self.data.first().map_or(0, Vec::len)
  }

  /// Copies out column `index`. Panics if the index is out of range.
  pub fn column(&self, index: usize) -> Vec<f64> {
    self.data.iter().map(|row| row[index]).collect()
  }

  pub fn push_column(&mut self, column: Vec<f64>) -> Result<()> {
    ensure!(
      column.len() == self.n_samples(),
      "new column has {} values but the dataset has {} rows",
      column.len(),
      self.n_samples()
    );
    for (row, value) in self.data.iter_mut().zip(column) {
      row.push(value);
    }
    Ok(())
  }

  /// Keeps only the columns whose `mask` entry is true.
  pub fn retain_columns(&mut self, mask: &[bool]) -> Result<()> {
    self.check_shape()?;
    ensure!(
      mask.len() == self.n_features(),
      "column mask has {} entries but the dataset has {} features",
      mask.len(),
      self.n_features()
    );
    for row in self.data.iter_mut() {
      let mut keep = mask.iter();
      row.retain(|_| *keep.next().unwrap_or(&false));
    }
    Ok(())
  }
}
