// Command-line interface definitions and parsing for devsurvey

use crate::config::CliConfig;
use crate::core::constants::output_formats;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    // Input & Output
    /// Survey results CSV (default: ./data/survey_results_public.csv)
    #[arg(long, value_name = "FILE", help_heading = "Input & Output")]
    pub data: Option<String>,

    /// Survey schema CSV (default: ./data/survey_results_schema.csv)
    #[arg(long, value_name = "FILE", help_heading = "Input & Output")]
    pub schema: Option<String>,

    /// Directory for the chart files (default: ./plots)
    #[arg(short = 'o', long, value_name = "DIR", help_heading = "Input & Output")]
    pub output_dir: Option<String>,

    /// Skip chart rendering
    #[arg(long, help_heading = "Input & Output")]
    pub no_charts: bool,

    // Output & Verbosity
    /// Suppress the text report and progress output
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    /// Output format (default: text)
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Disable the progress spinner
    #[arg(long, help_heading = "Output & Verbosity")]
    pub no_progress: bool,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,
}

/// Convert parsed arguments into the CLI layer of the configuration
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    let non_empty = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    CliConfig {
        // Inputs & outputs
        data_path: non_empty(&cli.data),
        schema_path: non_empty(&cli.schema),
        output_dir: non_empty(&cli.output_dir),
        no_charts: cli.no_charts,

        // Output & format
        quiet: cli.quiet,
        verbose: cli.verbose,
        output_format: cli.format.clone(),
        no_progress: cli.no_progress,

        // Configuration
        config_file: non_empty(&cli.config),
        no_config: cli.no_config,
    }
}
