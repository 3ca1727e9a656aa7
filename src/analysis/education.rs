use serde::Serialize;

use crate::analysis::Analyzer;
use crate::analysis::stats::{DescriptiveStats, describe};
use crate::core::error::Result;
use crate::core::types::SurveyRecord;
use crate::ingest::{CleanedSubset, CompensationRange};
use crate::reporting::logging;

/// Simplified education level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EducationBucket {
    Bachelor,
    Master,
    PhdProfessional,
    SomeCollege,
    Associate,
    HighSchool,
    Elementary,
    Other,
}

impl EducationBucket {
    /// Every bucket, in report order
    pub const ALL: [EducationBucket; 8] = [
        EducationBucket::Bachelor,
        EducationBucket::Master,
        EducationBucket::PhdProfessional,
        EducationBucket::SomeCollege,
        EducationBucket::Associate,
        EducationBucket::HighSchool,
        EducationBucket::Elementary,
        EducationBucket::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EducationBucket::Bachelor => "Bachelor",
            EducationBucket::Master => "Master",
            EducationBucket::PhdProfessional => "PhD/Professional",
            EducationBucket::SomeCollege => "Some College",
            EducationBucket::Associate => "Associate",
            EducationBucket::HighSchool => "High School",
            EducationBucket::Elementary => "Elementary",
            EducationBucket::Other => "Other",
        }
    }

    /// Bucket of a raw survey answer, `None` when the answer is not listed
    pub fn lookup(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Bachelor's degree (B.A., B.S., B.Eng., etc.)" => Some(EducationBucket::Bachelor),
            "Master's degree (M.A., M.S., M.Eng., MBA, etc.)" => Some(EducationBucket::Master),
            "Professional degree (JD, MD, Ph.D, Ed.D, etc.)" => {
                Some(EducationBucket::PhdProfessional)
            }
            "Some college/university study without earning a degree" => {
                Some(EducationBucket::SomeCollege)
            }
            "Associate degree (A.A., A.S., etc.)" => Some(EducationBucket::Associate),
            "Secondary school (e.g. American high school, German Realschule or Gymnasium, etc.)" => {
                Some(EducationBucket::HighSchool)
            }
            "Primary/elementary school" => Some(EducationBucket::Elementary),
            "Something else" => Some(EducationBucket::Other),
            _ => None,
        }
    }

    /// Bucket of any raw answer; unlisted answers fall back to `Other`
    pub fn from_raw(raw: &str) -> Self {
        Self::lookup(raw).unwrap_or(EducationBucket::Other)
    }

    fn position(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationStatistics {
    pub bucket: String,
    pub compensation: DescriptiveStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationReport {
    /// One entry per bucket, always all of them
    pub buckets: Vec<EducationStatistics>,
    /// Answers missing from the lookup table, counted under `Other`
    pub unrecognized: usize,
    pub rows: usize,
    pub excluded: usize,
}

impl EducationReport {
    /// Buckets with data, highest median compensation first
    pub fn by_median(&self) -> Vec<&EducationStatistics> {
        let mut buckets: Vec<&EducationStatistics> = self
            .buckets
            .iter()
            .filter(|bucket| bucket.compensation.median.is_some())
            .collect();
        buckets.sort_by(|a, b| {
            let a = a.compensation.median.unwrap_or_default();
            let b = b.compensation.median.unwrap_or_default();
            b.total_cmp(&a)
        });
        buckets
    }
}

/// How does education level affect compensation?
#[derive(Debug, Clone)]
pub struct EducationCompensation {
    range: CompensationRange,
}

impl EducationCompensation {
    pub fn new(range: CompensationRange) -> Self {
        Self { range }
    }
}

impl Analyzer for EducationCompensation {
    type Output = EducationReport;

    fn name(&self) -> &'static str {
        "education_compensation"
    }

    fn analyze(&self, records: &[SurveyRecord]) -> Result<EducationReport> {
        let subset = CleanedSubset::collect(records, |record| {
            let education = record.education()?;
            let compensation = self.range.accepts(record)?;
            Some((EducationBucket::lookup(education), compensation))
        });
        logging::log_subset(self.name(), subset.len(), subset.excluded());

        let mut grouped = vec![Vec::new(); EducationBucket::ALL.len()];
        let mut unrecognized = 0;
        for &(bucket, compensation) in &subset {
            let bucket = bucket.unwrap_or_else(|| {
                unrecognized += 1;
                EducationBucket::Other
            });
            grouped[bucket.position()].push(compensation);
        }
        if unrecognized > 0 {
            log::debug!("{unrecognized} education answer(s) not in the lookup table, counted as Other");
        }

        let buckets = EducationBucket::ALL
            .iter()
            .map(|bucket| EducationStatistics {
                bucket: bucket.label().to_string(),
                compensation: describe(&grouped[bucket.position()]),
            })
            .collect();

        Ok(EducationReport {
            buckets,
            unrecognized,
            rows: subset.len(),
            excluded: subset.excluded(),
        })
    }
}
