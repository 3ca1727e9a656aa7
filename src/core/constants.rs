/// Application-wide constants to avoid magic values throughout the codebase.
///
/// This module centralizes column names, default paths, cleaning thresholds
/// and chart file names, making them easier to maintain and modify.
/// Output format constants
pub mod output_formats {
    /// Text output format - colorful tables and summary
    pub const TEXT: &str = "text";
    /// JSON output format - structured output for automation
    pub const JSON: &str = "json";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 2] = [TEXT, JSON];
}

/// Column names in the survey results file
pub mod columns {
    pub const COMPENSATION: &str = "ConvertedCompYearly";
    pub const WORK_EXPERIENCE: &str = "WorkExp";
    pub const YEARS_CODE: &str = "YearsCode";
    pub const LANGUAGES: &str = "LanguageHaveWorkedWith";
    pub const EDUCATION: &str = "EdLevel";
    pub const REMOTE_WORK: &str = "RemoteWork";
    pub const JOB_SATISFACTION: &str = "JobSat";
    pub const AI_THREAT: &str = "AIThreat";
    pub const TOOL_COUNT_WORK: &str = "ToolCountWork";
    pub const COUNTRY: &str = "Country";
    pub const DEV_TYPE: &str = "DevType";

    /// Columns consumed by the pipeline, in schema-report order
    pub const USED: [&str; 11] = [
        COMPENSATION,
        WORK_EXPERIENCE,
        YEARS_CODE,
        LANGUAGES,
        EDUCATION,
        REMOTE_WORK,
        JOB_SATISFACTION,
        AI_THREAT,
        TOOL_COUNT_WORK,
        COUNTRY,
        DEV_TYPE,
    ];

    /// Numeric fields of the correlation matrix
    pub const CORRELATION_FIELDS: [&str; 5] = [
        WORK_EXPERIENCE,
        YEARS_CODE,
        COMPENSATION,
        JOB_SATISFACTION,
        TOOL_COUNT_WORK,
    ];
}

/// Default paths
pub mod paths {
    pub const DATA_FILE: &str = "./data/survey_results_public.csv";
    pub const SCHEMA_FILE: &str = "./data/survey_results_schema.csv";
    pub const OUTPUT_DIR: &str = "./plots";
    /// Configuration file searched in the working directory and its parents
    pub const CONFIG_FILE: &str = ".devsurvey.toml";
    /// How many parent directories are searched for the config file
    pub const CONFIG_SEARCH_DEPTH: usize = 3;
}

/// Default analysis parameters
pub mod defaults {
    /// Smallest compensation kept (inclusive)
    pub const MIN_COMPENSATION: f64 = 0.0;
    /// Outlier cutoff for compensation (exclusive)
    pub const MAX_COMPENSATION: f64 = 500_000.0;
    /// Experience bracket edges in years
    pub const EXPERIENCE_EDGES: [f64; 6] = [0.0, 2.0, 5.0, 10.0, 20.0, 100.0];
    /// Number of languages kept in the popularity ranking
    pub const TOP_LANGUAGES: usize = 15;
    /// Delimiter of the multi-select language column
    pub const LANGUAGE_DELIMITER: char = ';';
    /// Expected dataset shape, checked as a sanity warning only
    pub const EXPECTED_ROWS: usize = 49_123;
    pub const EXPECTED_COLUMNS: usize = 170;
}

/// Validation constants
pub mod validation {
    /// Lowest job satisfaction score
    pub const MIN_SATISFACTION: f64 = 0.0;
    /// Highest job satisfaction score
    pub const MAX_SATISFACTION: f64 = 10.0;
    /// Tolerance used when checking that percentages add up to 100
    pub const PERCENT_TOLERANCE: f64 = 0.01;
    /// Largest accepted chart side in pixels
    pub const MAX_CHART_SIDE: u32 = 10_000;
}

/// Cell values the survey export uses for missing answers
pub mod missing_values {
    pub const MARKERS: [&str; 19] = [
        "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
        "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
    ];
}

/// Chart rendering constants
pub mod charts {
    pub const DEFAULT_WIDTH: u32 = 1200;
    pub const DEFAULT_HEIGHT: u32 = 800;
    pub const DEFAULT_FONT: &str = "sans-serif";
    /// Upper bound of compensation axes, for readability
    pub const COMPENSATION_CEILING: f64 = 250_000.0;

    pub const EXPERIENCE_FILE: &str = "plot1_compensation_experience.svg";
    pub const LANGUAGES_FILE: &str = "plot2_top_languages.svg";
    pub const EDUCATION_FILE: &str = "plot3_education_compensation.svg";
    pub const REMOTE_WORK_FILE: &str = "plot4_remote_satisfaction_heatmap.svg";
    pub const AI_THREAT_FILE: &str = "plot5_ai_threat_experience.svg";
    pub const CORRELATION_FILE: &str = "plot6_correlation_matrix.svg";
}

/// Display and formatting constants
pub mod display {
    /// Emoji for success status
    pub const SUCCESS_EMOJI: &str = "✅";
    /// Emoji for warning status
    pub const WARNING_EMOJI: &str = "⚠️";
    /// Emoji for error status
    pub const ERROR_EMOJI: &str = "❌";
    /// Emoji for chart files
    pub const CHART_EMOJI: &str = "📊";
    /// Width of the section separator line
    pub const RULE_WIDTH: usize = 80;
}
