//! Data ingestion
//!
//! This module handles reading the survey results and schema files
//! and filtering records into per-question subsets.

pub mod cleaner;
pub mod loader;

// Re-export commonly used items
pub use cleaner::{CleanedSubset, CompensationRange};
pub use loader::{ExpectedShape, LoadedSurvey, check_shape, load_schema, load_survey};
