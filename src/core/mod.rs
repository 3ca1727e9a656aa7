//! Core types and foundational components
//!
//! This module contains the survey record type, error handling,
//! and constants used throughout the application.

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items for convenience
pub use error::{Result, SurveyError};
pub use types::{DatasetShape, SurveyRecord};
