// conveyor/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConveyorError {
  /// A value handed to `PipelineBuilder::then` is not a step, a callable or a combinator.
  #[error("Invalid pipeline entry at position {position}: {value} (of type `{type_name}`) is not a step, callable or combinator")]
  InvalidStep {
    position: usize,
    type_name: &'static str,
    value: String,
  },

  #[error("Combinator '{name}' at position {position} has no candidates")]
  EmptyCombinator { position: usize, name: String },

  /// A step's own logic failed while the pipeline was running.
  #[error("Step '{step_name}' failed in epoch {epoch}. Source: {source}")]
  StepFailed {
    step_name: String,
    epoch: usize,
    #[source]
    source: AnyhowError,
  },

  #[error("Setting '{key}' not found in context")]
  SettingMissing { key: String },

  #[error("Type mismatch for value '{key}' (expected {expected_type})")]
  TypeMismatch { key: String, expected_type: String },

  #[error("Configuration error: {message}")]
  Configuration { message: String },

  #[error("Internal conveyor error: {0}")]
  Internal(String),
}

impl ConveyorError {
  /// True for errors raised while composing a pipeline, before anything ran.
  pub fn is_composition(&self) -> bool {
    matches!(
      self,
      ConveyorError::InvalidStep { .. } | ConveyorError::EmptyCombinator { .. }
    )
  }

  /// True for failures raised by a step while the pipeline was running.
  pub fn is_execution(&self) -> bool {
    matches!(self, ConveyorError::StepFailed { .. })
  }

  /// Name of the failing step, for execution errors.
  pub fn step_name(&self) -> Option<&str> {
    match self {
      ConveyorError::StepFailed { step_name, .. } => Some(step_name),
      _ => None,
    }
  }
}

pub type ConveyorResult<T, E = ConveyorError> = std::result::Result<T, E>;
