// conveyor/src/core/data.rs

//! Defines `PipelineData<T, R>`, the carrier value threaded from step to step.

/// The value handed from one step to the next.
///
/// `payload` is the working value (a scalar, a table, a dataset...). `auxiliary` holds an
/// optional result produced by an earlier step, such as model evaluation records that a
/// later feature-selection step consumes.
///
/// Carriers are moved into each step and a new (or updated) carrier is moved out, so at
/// any moment exactly one step owns the carrier.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineData<T, R = ()> {
  pub payload: T,
  pub auxiliary: Option<R>,
}

impl<T, R> PipelineData<T, R> {
  pub fn new(payload: T) -> Self {
    Self {
      payload,
      auxiliary: None,
    }
  }

  pub fn with_auxiliary(payload: T, auxiliary: R) -> Self {
    Self {
      payload,
      auxiliary: Some(auxiliary),
    }
  }

  /// Swaps in a new payload, forwarding the auxiliary result unchanged.
  pub fn replace_payload(self, payload: T) -> Self {
    Self {
      payload,
      auxiliary: self.auxiliary,
    }
  }

  /// Transforms the payload, possibly into another type, keeping the auxiliary result.
  pub fn map_payload<U>(self, f: impl FnOnce(T) -> U) -> PipelineData<U, R> {
    PipelineData {
      payload: f(self.payload),
      auxiliary: self.auxiliary,
    }
  }

  pub fn set_auxiliary(mut self, auxiliary: R) -> Self {
    self.auxiliary = Some(auxiliary);
    self
  }

  pub fn take_auxiliary(&mut self) -> Option<R> {
    self.auxiliary.take()
  }

  pub fn into_parts(self) -> (T, Option<R>) {
    (self.payload, self.auxiliary)
  }
}

impl<T: Default, R> Default for PipelineData<T, R> {
  fn default() -> Self {
    Self::new(T::default())
  }
}

// --- Coercion of step return values ---

/// Marker for step outputs that already are a `PipelineData`.
pub struct Carried;

/// Marker for step outputs that are a bare payload and must be boxed into a new carrier.
pub struct Boxed;

/// Conversion of a step's return value into a carrier.
///
/// The `Marker` parameter keeps the two blanket implementations apart: a value that is
/// already a `PipelineData<T, R>` passes through untouched, while a bare `T` becomes
/// the payload of a fresh carrier with no auxiliary result.
pub trait IntoPipelineData<T, R, Marker> {
  fn into_pipeline_data(self) -> PipelineData<T, R>;
}

impl<T, R> IntoPipelineData<T, R, Carried> for PipelineData<T, R> {
  fn into_pipeline_data(self) -> PipelineData<T, R> {
    self
  }
}

impl<T, R> IntoPipelineData<T, R, Boxed> for T {
  fn into_pipeline_data(self) -> PipelineData<T, R> {
    PipelineData::new(self)
  }
}
