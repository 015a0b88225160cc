// conveyor/src/core/values.rs

//! A string-keyed, type-erased value map used for executor settings and context state.

use crate::error::{ConveyorError, ConveyorResult};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Map from names to values of arbitrary (`'static + Send + Sync`) type.
///
/// Values are stored behind `Arc`, so cloning a map shares the values instead of
/// copying them. Lookups are typed: asking for the wrong type behaves like a miss in
/// `get` and is reported as `TypeMismatch` by `get_as`.
#[derive(Clone, Default)]
pub struct ValueMap {
  entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl ValueMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts `value` under `key`, replacing any previous value regardless of its type.
  pub fn insert<V>(&mut self, key: impl Into<String>, value: V)
  where
    V: Any + Send + Sync,
  {
    self.entries.insert(key.into(), Arc::new(value));
  }

  pub fn get<V: Any>(&self, key: &str) -> Option<&V> {
    self.entries.get(key).and_then(|v| v.downcast_ref::<V>())
  }

  /// Like `get`, but distinguishes a missing key from a value of another type.
  pub fn get_as<V: Any>(&self, key: &str) -> ConveyorResult<&V> {
    let value = self.entries.get(key).ok_or_else(|| ConveyorError::SettingMissing {
      key: key.to_string(),
    })?;
    value.downcast_ref::<V>().ok_or_else(|| ConveyorError::TypeMismatch {
      key: key.to_string(),
      expected_type: std::any::type_name::<V>().to_string(),
    })
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.entries.contains_key(key)
  }

  /// Removes the entry under `key`. Returns whether an entry was present.
  pub fn remove(&mut self, key: &str) -> bool {
    self.entries.remove(key).is_some()
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }
}

// Values are type-erased, only keys can be shown.
impl std::fmt::Debug for ValueMap {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut keys: Vec<&str> = self.keys().collect();
    keys.sort_unstable();
    f.debug_struct("ValueMap").field("keys", &keys).finish()
  }
}
