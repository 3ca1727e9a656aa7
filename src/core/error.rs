use std::fmt;

/// Error types for survey analysis operations
#[derive(Debug)]
pub enum SurveyError {
    /// IO error (file operations, etc.)
    Io(std::io::Error),

    /// Input data file missing or unreadable
    DataUnavailable { path: String, reason: String },

    /// CSV decoding error
    Csv(csv::Error),

    /// Configuration error
    Config(String),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// JSON serialization error
    Json(serde_json::Error),

    /// An analyzer could not produce its table
    Analysis(String),

    /// Chart drawing error
    Chart(String),
}

impl fmt::Display for SurveyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyError::Io(err) => write!(f, "IO error: {err}"),
            SurveyError::DataUnavailable { path, reason } => {
                write!(f, "Data unavailable: could not read '{path}': {reason}")
            }
            SurveyError::Csv(err) => write!(f, "CSV error: {err}"),
            SurveyError::Config(msg) => write!(f, "Configuration error: {msg}"),
            SurveyError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            SurveyError::Json(err) => write!(f, "JSON error: {err}"),
            SurveyError::Analysis(msg) => write!(f, "Analysis error: {msg}"),
            SurveyError::Chart(msg) => write!(f, "Chart error: {msg}"),
        }
    }
}

impl std::error::Error for SurveyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SurveyError::Io(err) => Some(err),
            SurveyError::Csv(err) => Some(err),
            SurveyError::TomlParsing(err) => Some(err),
            SurveyError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SurveyError {
    fn from(err: std::io::Error) -> Self {
        SurveyError::Io(err)
    }
}

impl From<csv::Error> for SurveyError {
    fn from(err: csv::Error) -> Self {
        SurveyError::Csv(err)
    }
}

impl From<toml::de::Error> for SurveyError {
    fn from(err: toml::de::Error) -> Self {
        SurveyError::TomlParsing(err)
    }
}

impl From<serde_json::Error> for SurveyError {
    fn from(err: serde_json::Error) -> Self {
        SurveyError::Json(err)
    }
}

impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for SurveyError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        SurveyError::Chart(err.to_string())
    }
}

/// Type alias for Results using SurveyError
pub type Result<T> = std::result::Result<T, SurveyError>;
