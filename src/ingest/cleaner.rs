use serde::Serialize;

use crate::core::constants::defaults;
use crate::core::error::{Result, SurveyError};
use crate::core::types::SurveyRecord;

/// Accepted compensation values: `min <= value < max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompensationRange {
    pub min: f64,
    pub max: f64,
}

impl Default for CompensationRange {
    fn default() -> Self {
        Self {
            min: defaults::MIN_COMPENSATION,
            max: defaults::MAX_COMPENSATION,
        }
    }
}

impl CompensationRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(SurveyError::Config(format!(
                "Compensation bounds must be finite numbers, got [{min}, {max})."
            )));
        }
        if min < 0.0 {
            return Err(SurveyError::Config(format!(
                "Minimum compensation {min} is negative. Expected a value of 0 or more."
            )));
        }
        if min >= max {
            return Err(SurveyError::Config(format!(
                "Compensation range [{min}, {max}) is empty. The maximum must be larger than the minimum."
            )));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }

    /// The record's compensation, if present and inside the range
    pub fn accepts(&self, record: &SurveyRecord) -> Option<f64> {
        record.compensation().filter(|value| self.contains(*value))
    }
}

/// Rows of the source table kept for one question.
///
/// Built by projecting every record through an extraction function that
/// returns `None` when a required field is missing or out of range. Such
/// records are only excluded from this subset.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSubset<T> {
    rows: Vec<T>,
    excluded: usize,
}

impl<T> CleanedSubset<T> {
    pub fn collect<'a, F>(records: &'a [SurveyRecord], extract: F) -> Self
    where
        F: Fn(&'a SurveyRecord) -> Option<T>,
    {
        let mut rows = Vec::with_capacity(records.len());
        let mut excluded = 0;
        for record in records {
            match extract(record) {
                Some(row) => rows.push(row),
                None => excluded += 1,
            }
        }
        Self { rows, excluded }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of records left out of this subset
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }
}

impl<'a, T> IntoIterator for &'a CleanedSubset<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_compensation(value: Option<f64>) -> SurveyRecord {
        SurveyRecord {
            compensation_yearly: value,
            ..Default::default()
        }
    }

    #[test]
    fn test_compensation_range_bounds() {
        let range = CompensationRange::default();

        assert!(range.contains(0.0));
        assert!(range.contains(499_999.0));
        assert!(!range.contains(500_000.0));
        assert!(!range.contains(600_000.0));
        assert!(!range.contains(-1.0));
    }

    #[test]
    fn test_compensation_range_new_rejects_invalid() {
        assert!(CompensationRange::new(10.0, 10.0).is_err());
        assert!(CompensationRange::new(20.0, 10.0).is_err());
        assert!(CompensationRange::new(-5.0, 10.0).is_err());
        assert!(CompensationRange::new(0.0, f64::INFINITY).is_err());
        assert!(CompensationRange::new(1.0, 10.0).is_ok());
    }

    #[test]
    fn test_accepts_filters_missing_and_outliers() {
        let range = CompensationRange::default();

        assert_eq!(range.accepts(&with_compensation(Some(499_999.0))), Some(499_999.0));
        assert_eq!(range.accepts(&with_compensation(Some(600_000.0))), None);
        assert_eq!(range.accepts(&with_compensation(None)), None);
    }

    #[test]
    fn test_cleaned_subset_counts_exclusions() {
        let range = CompensationRange::default();
        let records = vec![
            with_compensation(Some(50_000.0)),
            with_compensation(None),
            with_compensation(Some(600_000.0)),
            with_compensation(Some(499_999.0)),
        ];

        let subset = CleanedSubset::collect(&records, |record| range.accepts(record));
        assert_eq!(subset.rows(), &[50_000.0, 499_999.0]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.excluded(), 2);
        assert!(!subset.is_empty());
    }

    #[test]
    fn test_cleaned_subset_requires_every_field() {
        let records = vec![
            SurveyRecord {
                compensation_yearly: Some(1000.0),
                work_experience_years: Some(3.0),
                ..Default::default()
            },
            SurveyRecord {
                compensation_yearly: Some(1000.0),
                ..Default::default()
            },
        ];

        let subset = CleanedSubset::collect(&records, |record| {
            Some((record.work_experience()?, record.compensation()?))
        });
        assert_eq!(subset.rows(), &[(3.0, 1000.0)]);
        assert_eq!(subset.excluded(), 1);
    }
}
