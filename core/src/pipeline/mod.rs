// conveyor/src/pipeline/mod.rs

//! Defines the `Pipeline<T, R>` struct, its builder and its per-epoch execution logic.

pub mod builder;
pub mod definition;
pub mod execution;

// Re-export the main Pipeline struct and its builder
pub use builder::{IntoPipelineEntry, PipelineBuilder, PipelineEntry};
pub use definition::Pipeline;
