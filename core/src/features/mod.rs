// conveyor/src/features/mod.rs

//! Reference feature-engineering steps built on the step contract: a dense `Dataset`
//! payload, a formula-based and a polynomial feature generator, and an
//! importance-driven feature selector that consumes model records from the carrier's
//! auxiliary result.

pub mod dataset;
pub mod generator;
pub mod polynomial;
pub mod selector;

pub use dataset::Dataset;
pub use generator::{FormulaGenerator, Operation};
pub use polynomial::PolynomialGenerator;
pub use selector::{FeatureSelector, ModelScore};
