use clap::Parser;
use devsurvey::analysis::{SurveyAnalysis, SurveyReport};
use devsurvey::config::{CliConfig, Config};
use devsurvey::core::constants::{columns, output_formats};
use devsurvey::ingest::{self, LoadedSurvey};
use devsurvey::reporting::logging;
use devsurvey::reporting::{ChartKind, RenderedChart, render_all};
use devsurvey::ui::output;
use devsurvey::ui::{Cli, ProgressReporter, cli_to_config};

/// Stages reported by the analysis progress bar: six analyzers and the summary
const ANALYSIS_STAGES: usize = 7;

fn main() {
    let cli = Cli::parse();

    match run_devsurvey_logic(&cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Main pipeline extracted from main() for testing
pub fn run_devsurvey_logic(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let cli_config = cli_to_config(cli);

    // Load, merge and validate configuration
    let config = load_and_merge_config(&cli_config)?;

    let output_settings = setup_output_settings(&cli_config, &config);
    logging::init_logger(output_settings.verbose, output_settings.quiet);

    let mut progress = create_progress_reporter(&output_settings);

    let survey = load_dataset(&config, progress.as_mut())?;
    if output_settings.verbose {
        log_schema_descriptions(&config);
    }

    let report = analyze(&config, &survey, progress.as_mut())?;

    let charts = if config.charts_enabled() {
        render_charts(&report, &config, progress.as_mut())?
    } else {
        Vec::new()
    };

    finalize_progress_reporter(progress);

    output::display_report(
        &report,
        &charts,
        &output_settings.output_format,
        output_settings.quiet,
    )?;

    Ok(0)
}

/// Load configuration from file or standard locations and merge with CLI config
pub fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file).inspect_err(|e| {
            logging::log_error(
                &format!("Could not load config file '{config_file}'"),
                Some(e),
            );
        })?
    } else {
        Config::load_from_standard_locations()
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    config.validate()?;
    Ok(config)
}

/// Settings for output formatting and display
pub struct OutputSettings {
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: String,
    pub show_progress: bool,
}

/// Setup output settings based on CLI and config
pub fn setup_output_settings(cli_config: &CliConfig, config: &Config) -> OutputSettings {
    let quiet = cli_config.quiet;
    let verbose = config.verbose.unwrap_or(false);
    let output_format = config.output_format().to_string();
    let show_progress =
        !quiet && !cli_config.no_progress && output_format == output_formats::TEXT;

    OutputSettings {
        quiet,
        verbose,
        output_format,
        show_progress,
    }
}

/// Create progress reporter if needed
pub fn create_progress_reporter(output_settings: &OutputSettings) -> Option<ProgressReporter> {
    output_settings
        .show_progress
        .then(|| ProgressReporter::new(true))
}

/// Read the survey file and run the shape sanity check
pub fn load_dataset(
    config: &Config,
    mut progress: Option<&mut ProgressReporter>,
) -> Result<LoadedSurvey, Box<dyn std::error::Error>> {
    let data_path = config.data_path();
    if let Some(progress) = progress.as_deref_mut() {
        progress.start_loading(&data_path);
    }

    let survey = ingest::load_survey(&data_path).inspect_err(|e| {
        logging::log_error("Could not load survey data", Some(e));
    })?;
    ingest::check_shape(&survey.shape, &config.expected_shape());

    if let Some(progress) = progress {
        progress.finish_stage(&format!(
            "Loaded {} rows x {} columns",
            survey.shape.rows, survey.shape.columns
        ));
    }
    Ok(survey)
}

/// Log the schema descriptions of the columns in use; the schema is optional
pub fn log_schema_descriptions(config: &Config) {
    let schema_path = config.schema_path();
    match ingest::load_schema(&schema_path) {
        Ok(schema) => logging::log_schema(&schema, &columns::USED),
        Err(e) => logging::log_warning(&format!("Schema not loaded: {e}")),
    }
}

/// Run every analyzer, advancing the progress bar per stage
pub fn analyze(
    config: &Config,
    survey: &LoadedSurvey,
    progress: Option<&mut ProgressReporter>,
) -> Result<SurveyReport, Box<dyn std::error::Error>> {
    let records = &survey.records;
    let pipeline = SurveyAnalysis::new(config.analysis_settings()?);

    let report = match progress {
        Some(progress) => {
            progress.start_analysis(ANALYSIS_STAGES);
            let report = pipeline.run_observed(records, survey.shape, |stage| {
                progress.advance_analysis(stage)
            });
            progress.finish_stage("Analysis complete");
            report
        }
        None => pipeline.run(records, survey.shape),
    };

    for name in report.unavailable() {
        logging::log_warning(&format!("{name} is unavailable in this report"));
    }
    Ok(report)
}

/// Render every chart into the configured output directory
pub fn render_charts(
    report: &SurveyReport,
    config: &Config,
    progress: Option<&mut ProgressReporter>,
) -> Result<Vec<RenderedChart>, Box<dyn std::error::Error>> {
    let output_dir = config.output_dir();
    let style = config.chart_style();

    let charts = match progress {
        Some(progress) => {
            progress.start_rendering(ChartKind::ALL.len());
            let charts = render_all(report, &output_dir, &style);
            progress.finish_stage(&format!("Charts saved to {}", output_dir.display()));
            charts
        }
        None => render_all(report, &output_dir, &style),
    }
    .inspect_err(|e| {
        logging::log_error(
            &format!("Could not create output directory '{}'", output_dir.display()),
            Some(e),
        );
    })?;

    Ok(charts)
}

/// Finalize progress reporting
pub fn finalize_progress_reporter(progress: Option<ProgressReporter>) {
    if let Some(mut progress) = progress {
        progress.finish_and_clear();
    }
}

#[cfg(test)]
#[allow(clippy::field_reassign_with_default)] // Test code for clarity
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "ConvertedCompYearly,WorkExp,YearsCode,LanguageHaveWorkedWith,EdLevel,RemoteWork,JobSat,AIThreat,ToolCountWork,Country,DevType";

    fn write_fixture(dir: &TempDir) -> String {
        let path = dir.path().join("survey.csv");
        let rows = [
            "85000,3,5,Python;SQL,\"Bachelor's degree (B.A., B.S., B.Eng., etc.)\",Remote,7,No,4,Germany,\"Developer, back-end\"",
            "120000,12,15,Rust;Python,\"Master's degree (M.A., M.S., M.Eng., MBA, etc.)\",In-person,6,I'm not sure,8,Sweden,\"Developer, full-stack\"",
            "600000,25,30,Java,Something else,\"Hybrid (some remote, some in-person)\",9,Yes,10,USA,\"Developer, back-end\"",
        ];
        fs::write(&path, format!("{HEADER}\n{}\n", rows.join("\n"))).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_load_and_merge_config_no_config_flag() {
        let mut cli_config = CliConfig::default();
        cli_config.no_config = true;

        let config = load_and_merge_config(&cli_config).unwrap();
        assert_eq!(config.output_format(), output_formats::TEXT);
        assert!(config.charts_enabled());
    }

    #[test]
    fn test_load_and_merge_config_missing_file() {
        let mut cli_config = CliConfig::default();
        cli_config.config_file = Some("/nonexistent/devsurvey.toml".to_string());

        assert!(load_and_merge_config(&cli_config).is_err());
    }

    #[test]
    fn test_load_and_merge_config_cli_overrides_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("devsurvey.toml");
        fs::write(&config_path, "output_format = \"text\"\ntop_languages = 5\n").unwrap();

        let mut cli_config = CliConfig::default();
        cli_config.config_file = Some(config_path.display().to_string());
        cli_config.output_format = Some(output_formats::JSON.to_string());
        cli_config.no_charts = true;

        let config = load_and_merge_config(&cli_config).unwrap();
        assert_eq!(config.output_format(), output_formats::JSON);
        assert_eq!(config.top_languages, Some(5));
        assert!(!config.charts_enabled());
    }

    #[test]
    fn test_setup_output_settings() {
        let mut cli_config = CliConfig::default();
        let config = Config::default();
        let settings = setup_output_settings(&cli_config, &config);
        assert!(!settings.quiet);
        assert!(settings.show_progress);
        assert_eq!(settings.output_format, output_formats::TEXT);

        cli_config.quiet = true;
        let settings = setup_output_settings(&cli_config, &config);
        assert!(!settings.show_progress);
        assert!(create_progress_reporter(&settings).is_none());
    }

    #[test]
    fn test_setup_output_settings_json_hides_progress() {
        let cli_config = CliConfig::default();
        let mut config = Config::default();
        config.output_format = Some(output_formats::JSON.to_string());

        let settings = setup_output_settings(&cli_config, &config);
        assert!(!settings.show_progress);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let mut config = Config::default();
        config.data_path = Some("/nonexistent/survey.csv".to_string());

        let err = load_dataset(&config, None).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/survey.csv"));
    }

    #[test]
    fn test_pipeline_without_progress() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_path = Some(write_fixture(&dir));
        config.output_dir = Some(dir.path().join("plots").display().to_string());

        let survey = load_dataset(&config, None).unwrap();
        assert_eq!(survey.shape.rows, 3);
        assert_eq!(survey.shape.columns, 11);

        let report = analyze(&config, &survey, None).unwrap();
        assert!(report.unavailable().is_empty());
        assert_eq!(report.summary.cleaned_compensation_rows, 2);

        let charts = render_charts(&report, &config, None).unwrap();
        assert_eq!(charts.len(), ChartKind::ALL.len());
        for chart in &charts {
            let path = chart.outcome.available().unwrap();
            assert!(path.exists());
        }
    }

    #[test]
    fn test_log_schema_descriptions_missing_schema_is_not_fatal() {
        let mut config = Config::default();
        config.schema_path = Some("/nonexistent/schema.csv".to_string());
        log_schema_descriptions(&config);
    }
}
