// conveyor/src/core/context.rs

//! Defines the execution `Context` shared by every step of one executor run.

use crate::core::context_data::ContextData;
use crate::core::values::ValueMap;
use crate::error::ConveyorResult;
use std::any::Any;

/// Execution-wide state visible to all steps of a single run.
///
/// Steps receive the context as `&Context`:
/// - `epoch()` is written only by the executor, between epochs.
/// - `settings()` is the configuration the caller gave the executor; steps cannot modify it.
/// - `state()` is a lock-protected scratch map. Initializer steps use it to seed values
///   derived from the current epoch before the body steps run.
#[derive(Debug)]
pub struct Context {
  epoch: usize,
  epochs: usize,
  settings: ValueMap,
  state: ContextData<ValueMap>,
}

impl Context {
  /// Creates a standalone context at epoch 0 of a single-epoch run.
  ///
  /// The executor builds its own context for every run; this constructor exists for
  /// applying steps by hand.
  pub fn new(settings: ValueMap) -> Self {
    Self::for_run(1, settings)
  }

  pub(crate) fn for_run(epochs: usize, settings: ValueMap) -> Self {
    Self {
      epoch: 0,
      epochs,
      settings,
      state: ContextData::new(ValueMap::new()),
    }
  }

  pub(crate) fn set_epoch(&mut self, epoch: usize) {
    self.epoch = epoch;
  }

  /// Zero-based index of the epoch currently executing.
  pub fn epoch(&self) -> usize {
    self.epoch
  }

  /// Total number of epochs of the run this context belongs to.
  pub fn epochs(&self) -> usize {
    self.epochs
  }

  pub fn settings(&self) -> &ValueMap {
    &self.settings
  }

  pub fn setting<V: Any>(&self, key: &str) -> Option<&V> {
    self.settings.get::<V>(key)
  }

  /// Typed setting lookup that reports a missing key or a type mismatch.
  pub fn require<V: Any>(&self, key: &str) -> ConveyorResult<&V> {
    self.settings.get_as::<V>(key)
  }

  pub fn state(&self) -> &ContextData<ValueMap> {
    &self.state
  }
}

impl Default for Context {
  fn default() -> Self {
    Self::new(ValueMap::new())
  }
}
