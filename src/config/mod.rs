//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::{AnalysisSettings, BracketScheme};
use crate::core::constants::{charts, defaults, output_formats, paths, validation};
use crate::core::error::{Result, SurveyError};
use crate::ingest::{CompensationRange, ExpectedShape};
use crate::reporting::ChartStyle;
use crate::reporting::logging;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Survey results CSV
    pub data_path: Option<String>,

    /// Schema CSV describing the survey columns
    pub schema_path: Option<String>,

    /// Directory the charts are written to
    pub output_dir: Option<String>,

    /// Expected number of data rows; a mismatch only warns, 0 skips the check
    pub expected_rows: Option<usize>,

    /// Expected number of columns; a mismatch only warns
    pub expected_columns: Option<usize>,

    /// Lowest accepted yearly compensation (inclusive)
    pub min_compensation: Option<f64>,

    /// Compensation outlier cutoff (exclusive)
    pub max_compensation: Option<f64>,

    /// Work experience bracket edges in years
    pub experience_edges: Option<Vec<f64>>,

    /// Number of languages in the popularity ranking
    pub top_languages: Option<usize>,

    /// Output format (text, json)
    pub output_format: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,

    /// Render the chart files
    pub charts: Option<bool>,

    pub chart_width: Option<u32>,

    pub chart_height: Option<u32>,

    /// Font family used in charts
    pub chart_font: Option<String>,

    /// Upper bound of the compensation axis in charts
    pub compensation_ceiling: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: Some(paths::DATA_FILE.to_string()),
            schema_path: Some(paths::SCHEMA_FILE.to_string()),
            output_dir: Some(paths::OUTPUT_DIR.to_string()),
            expected_rows: Some(defaults::EXPECTED_ROWS),
            expected_columns: Some(defaults::EXPECTED_COLUMNS),
            min_compensation: Some(defaults::MIN_COMPENSATION),
            max_compensation: Some(defaults::MAX_COMPENSATION),
            experience_edges: Some(defaults::EXPERIENCE_EDGES.to_vec()),
            top_languages: Some(defaults::TOP_LANGUAGES),
            output_format: Some(output_formats::DEFAULT.to_string()),
            verbose: Some(false),
            charts: Some(true),
            chart_width: Some(charts::DEFAULT_WIDTH),
            chart_height: Some(charts::DEFAULT_HEIGHT),
            chart_font: Some(charts::DEFAULT_FONT.to_string()),
            compensation_ceiling: Some(charts::COMPENSATION_CEILING),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults for unset keys
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SurveyError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let file_config: Config = toml::from_str(&content)?;

        let mut config = Config::default();
        config.overlay(file_config);
        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        for path in Self::standard_locations() {
            if !path.is_file() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => {
                    log::debug!("Using config file {}", path.display());
                    return config;
                }
                Err(e) => logging::log_warning(&format!(
                    "Ignoring config file {}: {e}",
                    path.display()
                )),
            }
        }

        // Fall back to defaults
        Self::default()
    }

    /// Current directory first, then up to three parent directories
    fn standard_locations() -> Vec<PathBuf> {
        (0..=paths::CONFIG_SEARCH_DEPTH)
            .map(|depth| PathBuf::from(format!("{}{}", "../".repeat(depth), paths::CONFIG_FILE)))
            .collect()
    }

    /// Replace values with those set in `other`
    fn overlay(&mut self, other: Config) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }
        take!(
            data_path,
            schema_path,
            output_dir,
            expected_rows,
            expected_columns,
            min_compensation,
            max_compensation,
            experience_edges,
            top_languages,
            output_format,
            verbose,
            charts,
            chart_width,
            chart_height,
            chart_font,
            compensation_ceiling,
        );
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        // Inputs & outputs
        if let Some(ref data_path) = cli_config.data_path {
            self.data_path = Some(data_path.clone());
        }
        if let Some(ref schema_path) = cli_config.schema_path {
            self.schema_path = Some(schema_path.clone());
        }
        if let Some(ref output_dir) = cli_config.output_dir {
            self.output_dir = Some(output_dir.clone());
        }
        if cli_config.no_charts {
            self.charts = Some(false);
        }

        // Output & format
        if cli_config.verbose {
            self.verbose = Some(true);
        }
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.compensation_range()?;
        self.bracket_scheme()?;

        if self.top_languages == Some(0) {
            return Err(SurveyError::Config(
                "Top languages cannot be 0. Expected a positive integer.".to_string(),
            ));
        }

        // Validate output format
        if let Some(ref format) = self.output_format
            && !output_formats::ALL.contains(&format.as_str())
        {
            return Err(SurveyError::Config(format!(
                "Invalid output format '{format}'. Expected one of: {}.",
                output_formats::ALL.join(", ")
            )));
        }

        for (name, side) in [("width", self.chart_width), ("height", self.chart_height)] {
            if let Some(side) = side
                && !(1..=validation::MAX_CHART_SIDE).contains(&side)
            {
                return Err(SurveyError::Config(format!(
                    "Chart {name} of {side} pixels is invalid. Expected a value between 1-{}.",
                    validation::MAX_CHART_SIDE
                )));
            }
        }

        if let Some(ceiling) = self.compensation_ceiling
            && (!ceiling.is_finite() || ceiling <= 0.0)
        {
            return Err(SurveyError::Config(format!(
                "Compensation ceiling {ceiling} is invalid. Expected a positive number."
            )));
        }

        if let Some(ref font) = self.chart_font
            && font.trim().is_empty()
        {
            return Err(SurveyError::Config(
                "Chart font cannot be empty.".to_string(),
            ));
        }

        Ok(())
    }

    pub fn compensation_range(&self) -> Result<CompensationRange> {
        CompensationRange::new(
            self.min_compensation.unwrap_or(defaults::MIN_COMPENSATION),
            self.max_compensation.unwrap_or(defaults::MAX_COMPENSATION),
        )
    }

    pub fn bracket_scheme(&self) -> Result<BracketScheme> {
        match self.experience_edges {
            Some(ref edges) => BracketScheme::new(edges.clone()),
            None => Ok(BracketScheme::default()),
        }
    }

    /// Parameters handed to the analysis pipeline
    pub fn analysis_settings(&self) -> Result<AnalysisSettings> {
        Ok(AnalysisSettings {
            compensation: self.compensation_range()?,
            brackets: self.bracket_scheme()?,
            top_languages: self.top_languages.unwrap_or(defaults::TOP_LANGUAGES),
        })
    }

    pub fn chart_style(&self) -> ChartStyle {
        let defaults = ChartStyle::default();
        ChartStyle {
            width: self.chart_width.unwrap_or(defaults.width),
            height: self.chart_height.unwrap_or(defaults.height),
            font: self.chart_font.clone().unwrap_or(defaults.font),
            compensation_ceiling: self
                .compensation_ceiling
                .unwrap_or(defaults.compensation_ceiling),
            ..defaults
        }
    }

    /// Shape check settings; 0 disables a dimension
    pub fn expected_shape(&self) -> ExpectedShape {
        ExpectedShape {
            rows: self.expected_rows.filter(|rows| *rows > 0),
            columns: self.expected_columns.filter(|columns| *columns > 0),
        }
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(self.data_path.as_deref().unwrap_or(paths::DATA_FILE))
    }

    pub fn schema_path(&self) -> PathBuf {
        PathBuf::from(self.schema_path.as_deref().unwrap_or(paths::SCHEMA_FILE))
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(self.output_dir.as_deref().unwrap_or(paths::OUTPUT_DIR))
    }

    pub fn output_format(&self) -> &str {
        self.output_format.as_deref().unwrap_or(output_formats::DEFAULT)
    }

    pub fn charts_enabled(&self) -> bool {
        self.charts.unwrap_or(true)
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Inputs & outputs
    pub data_path: Option<String>,   // --data
    pub schema_path: Option<String>, // --schema
    pub output_dir: Option<String>,  // --output-dir
    pub no_charts: bool,             // --no-charts

    // Output & format
    pub quiet: bool,                   // --quiet
    pub verbose: bool,                 // --verbose
    pub output_format: Option<String>, // --format
    pub no_progress: bool,             // --no-progress

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config
}
