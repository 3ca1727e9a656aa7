//! Output sinks
//!
//! This module renders the analysis results as charts and provides the
//! structured logging used throughout the application.

pub mod charts;
pub mod logging;

// Re-export commonly used items
pub use charts::{ChartKind, ChartStyle, RenderedChart, render_all};
