//! Synthetic school datasets for the BI dashboard demo.
//!
//! A run generates students, academic performance, tuition and expenses,
//! service tickets, monthly resource metrics and satisfaction surveys from a
//! fixed seed, then writes them as CSV in one of two schema variants.

pub mod calendar;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod model;
pub mod output;
pub mod records;
pub mod variant;

pub use config::SimulationConfig;
pub use dataset::{Dataset, generate_dataset};
pub use engine::{GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationReport, TableReport};
pub use variant::SchemaVariant;
