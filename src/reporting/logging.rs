use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::types::DatasetShape;

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log the size of the loaded table
pub fn log_dataset_shape(shape: &DatasetShape) {
    info!(
        "Loaded dataset: {} rows x {} columns",
        shape.rows, shape.columns
    );
}

/// Log the size of an analyzer's cleaned subset
pub fn log_subset(analyzer: &str, kept: usize, excluded: usize) {
    debug!("{analyzer}: {kept} row(s) kept, {excluded} excluded");
    if kept == 0 {
        warn!("{analyzer}: no rows left after cleaning");
    }
}

/// Log schema descriptions of the columns in use
pub fn log_schema(schema: &BTreeMap<String, String>, columns: &[&str]) {
    for column in columns {
        match schema.get(*column) {
            Some(description) => debug!("  {column}: {description}"),
            None => debug!("  {column}: (not described in schema)"),
        }
    }
}

pub fn log_analyzer_failure(analyzer: &str, err: &dyn std::error::Error) {
    error!("❌ {analyzer} unavailable: {err}");
}

pub fn log_chart_written(path: &Path) {
    info!("📊 Saved {}", path.display());
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}

/// Log warning information
pub fn log_warning(message: &str) {
    warn!("{message}");
}
