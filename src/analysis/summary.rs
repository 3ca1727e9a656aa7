use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::analysis::stats::{mean, median};
use crate::core::types::{DatasetShape, SurveyRecord};
use crate::ingest::{CleanedSubset, CompensationRange};

/// Dataset-wide facts reported next to the per-question results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub total_responses: usize,
    pub total_columns: usize,
    pub responses_with_compensation: usize,
    /// Share of responses with any compensation value, in percent
    pub compensation_response_rate: f64,
    pub countries: usize,
    pub cleaned_compensation_rows: usize,
    pub mean_compensation: Option<f64>,
    pub median_compensation: Option<f64>,
    pub median_work_experience: Option<f64>,
    pub most_common_dev_type: Option<String>,
}

impl SummaryStatistics {
    pub fn compute(
        records: &[SurveyRecord],
        shape: DatasetShape,
        range: &CompensationRange,
    ) -> Self {
        let responses_with_compensation = records
            .iter()
            .filter(|record| record.compensation().is_some())
            .count();
        let compensation_response_rate = if shape.rows == 0 {
            0.0
        } else {
            responses_with_compensation as f64 * 100.0 / shape.rows as f64
        };

        let countries = records
            .iter()
            .filter_map(|record| record.country.as_deref())
            .collect::<FxHashSet<_>>()
            .len();

        let cleaned = CleanedSubset::collect(records, |record| range.accepts(record));
        let experience: Vec<f64> = records
            .iter()
            .filter_map(SurveyRecord::work_experience)
            .collect();

        Self {
            total_responses: shape.rows,
            total_columns: shape.columns,
            responses_with_compensation,
            compensation_response_rate,
            countries,
            cleaned_compensation_rows: cleaned.len(),
            mean_compensation: mean(cleaned.rows()),
            median_compensation: median(cleaned.rows()),
            median_work_experience: median(&experience),
            most_common_dev_type: most_common(
                records.iter().filter_map(|record| record.dev_type.as_deref()),
            ),
        }
    }

    /// Label and formatted value of every fact, in display order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total responses", format_count(self.total_responses)),
            ("Total columns", format_count(self.total_columns)),
            (
                "Responses with compensation",
                format!(
                    "{} ({:.1}%)",
                    format_count(self.responses_with_compensation),
                    self.compensation_response_rate
                ),
            ),
            ("Countries represented", format_count(self.countries)),
            (
                "Cleaned compensation dataset",
                format_count(self.cleaned_compensation_rows),
            ),
            ("Mean compensation", format_money(self.mean_compensation)),
            ("Median compensation", format_money(self.median_compensation)),
            (
                "Median work experience",
                self.median_work_experience
                    .map_or_else(|| "n/a".to_string(), |years| format!("{years:.1} years")),
            ),
            (
                "Most common developer type",
                self.most_common_dev_type
                    .clone()
                    .unwrap_or_else(|| "n/a".to_string()),
            ),
        ]
    }
}

/// Most frequent value, ties broken by the lexicographically smallest
fn most_common<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(value, _)| value.to_string())
}

/// Format an integer with thousands separators: `49123` -> `49,123`
pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}

/// Whole-dollar amount with separators, `n/a` when absent
pub fn format_money(value: Option<f64>) -> String {
    match value {
        Some(amount) if amount.is_finite() && amount >= 0.0 => {
            format!("${}", format_count(amount.round() as usize))
        }
        Some(amount) => format!("${amount:.0}"),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        compensation: Option<f64>,
        country: Option<&str>,
        dev_type: Option<&str>,
    ) -> SurveyRecord {
        SurveyRecord {
            compensation_yearly: compensation,
            country: country.map(str::to_string),
            dev_type: dev_type.map(str::to_string),
            ..Default::default()
        }
    }

    fn shape(rows: usize) -> DatasetShape {
        DatasetShape { rows, columns: 170 }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(49_123), "49,123");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Some(86_155.4)), "$86,155");
        assert_eq!(format_money(None), "n/a");
    }

    #[test]
    fn test_compute_summary() {
        let records = vec![
            record(Some(50_000.0), Some("Germany"), Some("Developer, back-end")),
            record(Some(70_000.0), Some("Germany"), Some("Developer, front-end")),
            record(Some(600_000.0), Some("India"), Some("Developer, back-end")),
            record(None, Some("Brazil"), None),
        ];

        let summary = SummaryStatistics::compute(&records, shape(4), &CompensationRange::default());
        assert_eq!(summary.total_responses, 4);
        assert_eq!(summary.total_columns, 170);
        assert_eq!(summary.responses_with_compensation, 3);
        assert_eq!(summary.compensation_response_rate, 75.0);
        assert_eq!(summary.countries, 3);
        assert_eq!(summary.cleaned_compensation_rows, 2);
        assert_eq!(summary.mean_compensation, Some(60_000.0));
        assert_eq!(summary.median_compensation, Some(60_000.0));
        assert_eq!(
            summary.most_common_dev_type.as_deref(),
            Some("Developer, back-end")
        );
    }

    #[test]
    fn test_most_common_ties_are_lexicographic() {
        assert_eq!(most_common(["b", "a", "b", "a"]).as_deref(), Some("a"));
        assert_eq!(most_common(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_empty_dataset() {
        let summary = SummaryStatistics::compute(&[], shape(0), &CompensationRange::default());
        assert_eq!(summary.compensation_response_rate, 0.0);
        assert_eq!(summary.mean_compensation, None);
        assert_eq!(summary.entries().len(), 9);
    }
}
