//! Survey analysis
//!
//! One analyzer per research question, the shared statistics helpers they
//! build on, and the pipeline that runs them all over one loaded table.

pub mod ai_threat;
pub mod brackets;
pub mod correlation;
pub mod education;
pub mod experience;
pub mod languages;
pub mod remote_work;
pub mod stats;
pub mod summary;

use serde::Serialize;

use crate::core::constants::defaults;
use crate::core::error::Result;
use crate::core::types::{DatasetShape, SurveyRecord};
use crate::ingest::CompensationRange;
use crate::reporting::logging;

// Re-export commonly used items
pub use ai_threat::{AiThreatPerception, AiThreatReport, CategoryShare};
pub use brackets::{BracketKey, BracketScheme};
pub use correlation::{CorrelationAnalysis, CorrelationMatrix};
pub use education::{EducationBucket, EducationCompensation, EducationReport};
pub use experience::{ExperienceCompensation, ExperienceReport};
pub use languages::{LanguageCount, LanguagePopularity, LanguageReport};
pub use remote_work::{RemoteWorkReport, RemoteWorkSatisfaction};
pub use stats::{BoxSummary, CrossTab, DescriptiveStats};
pub use summary::SummaryStatistics;

/// A stateless derivation over the full record table.
///
/// Each analyzer selects its own cleaned subset, so analyzers never depend
/// on one another and may run in any order.
pub trait Analyzer {
    type Output;

    /// Stable identifier used in logs and progress messages
    fn name(&self) -> &'static str;

    fn analyze(&self, records: &[SurveyRecord]) -> Result<Self::Output>;
}

/// Result of one analyzer as carried in the report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Outcome<T> {
    Available(T),
    /// The analyzer failed; holds the reason
    Unavailable(String),
}

impl<T> Outcome<T> {
    pub fn available(&self) -> Option<&T> {
        match self {
            Outcome::Available(value) => Some(value),
            Outcome::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Outcome::Available(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Available(_) => None,
            Outcome::Unavailable(reason) => Some(reason),
        }
    }
}

/// Parameters shared by the analyzers
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub compensation: CompensationRange,
    pub brackets: BracketScheme,
    pub top_languages: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            compensation: CompensationRange::default(),
            brackets: BracketScheme::default(),
            top_languages: defaults::TOP_LANGUAGES,
        }
    }
}

/// Everything computed in one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyReport {
    pub shape: DatasetShape,
    pub experience: Outcome<ExperienceReport>,
    pub languages: Outcome<LanguageReport>,
    pub education: Outcome<EducationReport>,
    pub remote_work: Outcome<RemoteWorkReport>,
    pub ai_threat: Outcome<AiThreatReport>,
    pub correlation: Outcome<CorrelationMatrix>,
    pub summary: SummaryStatistics,
}

impl SurveyReport {
    /// Names of the analyzers that failed, in run order
    pub fn unavailable(&self) -> Vec<&'static str> {
        [
            ("experience_compensation", self.experience.is_available()),
            ("language_popularity", self.languages.is_available()),
            ("education_compensation", self.education.is_available()),
            ("remote_work_satisfaction", self.remote_work.is_available()),
            ("ai_threat_perception", self.ai_threat.is_available()),
            ("correlation_matrix", self.correlation.is_available()),
        ]
        .into_iter()
        .filter(|(_, available)| !available)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Runs every analyzer over one record table
#[derive(Debug, Clone, Default)]
pub struct SurveyAnalysis {
    settings: AnalysisSettings,
}

impl SurveyAnalysis {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    pub fn run(&self, records: &[SurveyRecord], shape: DatasetShape) -> SurveyReport {
        self.run_observed(records, shape, |_| {})
    }

    /// Run the pipeline, calling `on_stage` with each analyzer's name before it starts
    pub fn run_observed<F>(
        &self,
        records: &[SurveyRecord],
        shape: DatasetShape,
        mut on_stage: F,
    ) -> SurveyReport
    where
        F: FnMut(&'static str),
    {
        let settings = &self.settings;

        let experience = evaluate(
            &ExperienceCompensation::new(settings.compensation, settings.brackets.clone()),
            records,
            &mut on_stage,
        );
        let languages = evaluate(
            &LanguagePopularity::new(settings.top_languages),
            records,
            &mut on_stage,
        );
        let education = evaluate(
            &EducationCompensation::new(settings.compensation),
            records,
            &mut on_stage,
        );
        let remote_work = evaluate(&RemoteWorkSatisfaction, records, &mut on_stage);
        let ai_threat = evaluate(
            &AiThreatPerception::new(settings.brackets.clone()),
            records,
            &mut on_stage,
        );
        let correlation = evaluate(
            &CorrelationAnalysis::new(settings.compensation),
            records,
            &mut on_stage,
        );

        on_stage("summary");
        let summary = SummaryStatistics::compute(records, shape, &settings.compensation);

        SurveyReport {
            shape,
            experience,
            languages,
            education,
            remote_work,
            ai_threat,
            correlation,
            summary,
        }
    }
}

fn evaluate<A, F>(analyzer: &A, records: &[SurveyRecord], on_stage: &mut F) -> Outcome<A::Output>
where
    A: Analyzer,
    F: FnMut(&'static str),
{
    on_stage(analyzer.name());
    match analyzer.analyze(records) {
        Ok(output) => Outcome::Available(output),
        Err(e) => {
            logging::log_analyzer_failure(analyzer.name(), &e);
            Outcome::Unavailable(e.to_string())
        }
    }
}
