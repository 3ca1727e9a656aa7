//! Analysis of developer survey results: five research questions, a
//! correlation matrix, summary statistics and SVG charts.

pub mod analysis;
pub mod config;
pub mod core;
pub mod ingest;
pub mod reporting;
pub mod ui;

// Re-export commonly used types for convenience
pub use crate::analysis::{AnalysisSettings, Analyzer, Outcome, SurveyAnalysis, SurveyReport};
pub use crate::config::{CliConfig, Config};
pub use crate::core::{DatasetShape, Result, SurveyError, SurveyRecord};
pub use crate::ingest::{LoadedSurvey, load_survey};
pub use crate::reporting::{ChartKind, ChartStyle, RenderedChart};
