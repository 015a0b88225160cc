pub mod context;
pub mod context_data;
pub mod data;
pub mod step;
pub mod values;

// Re-export key types for easier access from other conveyor modules (and lib.rs)
pub use context::Context;
pub use context_data::ContextData;
pub use data::{Boxed, Carried, IntoPipelineData, PipelineData};
pub use step::{Step, StepFn};
pub use values::ValueMap;
