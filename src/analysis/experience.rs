use serde::Serialize;

use crate::analysis::Analyzer;
use crate::analysis::brackets::BracketScheme;
use crate::analysis::stats::{DescriptiveStats, describe, pearson};
use crate::core::error::Result;
use crate::core::types::SurveyRecord;
use crate::ingest::{CleanedSubset, CompensationRange};
use crate::reporting::logging;

/// Compensation statistics of one experience bracket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketStatistics {
    pub bracket: String,
    pub compensation: DescriptiveStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceReport {
    /// One entry per bracket, ascending experience
    pub brackets: Vec<BracketStatistics>,
    /// Pearson correlation of raw experience and compensation
    pub correlation: Option<f64>,
    pub rows: usize,
    pub excluded: usize,
}

/// How does experience level impact compensation?
#[derive(Debug, Clone)]
pub struct ExperienceCompensation {
    range: CompensationRange,
    brackets: BracketScheme,
}

impl ExperienceCompensation {
    pub fn new(range: CompensationRange, brackets: BracketScheme) -> Self {
        Self { range, brackets }
    }
}

impl Analyzer for ExperienceCompensation {
    type Output = ExperienceReport;

    fn name(&self) -> &'static str {
        "experience_compensation"
    }

    fn analyze(&self, records: &[SurveyRecord]) -> Result<ExperienceReport> {
        let subset = CleanedSubset::collect(records, |record| {
            let years = record.work_experience()?;
            let bracket = self.brackets.classify(years)?;
            let compensation = self.range.accepts(record)?;
            Some((bracket, years, compensation))
        });
        logging::log_subset(self.name(), subset.len(), subset.excluded());

        let mut grouped = vec![Vec::new(); self.brackets.len()];
        let mut years = Vec::with_capacity(subset.len());
        let mut compensation = Vec::with_capacity(subset.len());
        for &(bracket, experience, amount) in &subset {
            grouped[bracket].push(amount);
            years.push(experience);
            compensation.push(amount);
        }

        let brackets = self
            .brackets
            .labels()
            .iter()
            .zip(&grouped)
            .map(|(label, values)| BracketStatistics {
                bracket: label.clone(),
                compensation: describe(values),
            })
            .collect();

        Ok(ExperienceReport {
            brackets,
            correlation: pearson(&years, &compensation),
            rows: subset.len(),
            excluded: subset.excluded(),
        })
    }
}
