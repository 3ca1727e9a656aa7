use serde::Serialize;

use crate::analysis::Analyzer;
use crate::analysis::stats::pearson;
use crate::core::constants::columns;
use crate::core::error::Result;
use crate::core::types::SurveyRecord;
use crate::ingest::{CleanedSubset, CompensationRange};
use crate::reporting::logging;

/// Pairwise Pearson coefficients over a fixed list of numeric columns.
///
/// `values[i][j]` is `None` when the pair is undefined (a constant column
/// or fewer than two rows). The diagonal is always `Some(1.0)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub fields: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
    /// Cells hidden when drawn: the upper triangle including the diagonal
    pub mask: Vec<Vec<bool>>,
    pub rows: usize,
    pub excluded: usize,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.values.get(row)?.get(column).copied().flatten()
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.fields.len();
        (0..n).all(|i| (0..n).all(|j| self.values[i][j] == self.values[j][i]))
    }

    /// Cells left visible by the mask, as `(row, column, value)`
    pub fn visible_cells(&self) -> impl Iterator<Item = (usize, usize, Option<f64>)> + '_ {
        self.mask.iter().enumerate().flat_map(move |(i, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, hidden)| !**hidden)
                .map(move |(j, _)| (i, j, self.values[i][j]))
        })
    }
}

/// Correlation of the key numeric fields
#[derive(Debug, Clone)]
pub struct CorrelationAnalysis {
    range: CompensationRange,
    fields: Vec<&'static str>,
}

impl CorrelationAnalysis {
    pub fn new(range: CompensationRange) -> Self {
        Self {
            range,
            fields: columns::CORRELATION_FIELDS.to_vec(),
        }
    }
}

impl Analyzer for CorrelationAnalysis {
    type Output = CorrelationMatrix;

    fn name(&self) -> &'static str {
        "correlation_matrix"
    }

    fn analyze(&self, records: &[SurveyRecord]) -> Result<CorrelationMatrix> {
        let subset = CleanedSubset::collect(records, |record| {
            self.range.accepts(record)?;
            self.fields
                .iter()
                .map(|field| record.numeric_field(field))
                .collect::<Option<Vec<f64>>>()
        });
        logging::log_subset(self.name(), subset.len(), subset.excluded());

        let n = self.fields.len();
        let series: Vec<Vec<f64>> = (0..n)
            .map(|column| subset.iter().map(|row| row[column]).collect())
            .collect();

        let mut values = vec![vec![None; n]; n];
        for i in 0..n {
            values[i][i] = Some(1.0);
            for j in (i + 1)..n {
                let coefficient = pearson(&series[i], &series[j]);
                values[i][j] = coefficient;
                values[j][i] = coefficient;
            }
        }

        let mask = (0..n).map(|i| (0..n).map(|j| j >= i).collect()).collect();

        Ok(CorrelationMatrix {
            fields: self.fields.iter().map(|field| field.to_string()).collect(),
            values,
            mask,
            rows: subset.len(),
            excluded: subset.excluded(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        compensation: f64,
        experience: f64,
        years_code: f64,
        satisfaction: f64,
        tools: f64,
    ) -> SurveyRecord {
        SurveyRecord {
            compensation_yearly: Some(compensation),
            work_experience_years: Some(experience),
            years_code: Some(years_code),
            job_satisfaction: Some(satisfaction),
            tool_count_work: Some(tools),
            ..Default::default()
        }
    }

    fn sample() -> Vec<SurveyRecord> {
        vec![
            record(40_000.0, 1.0, 3.0, 6.0, 4.0),
            record(60_000.0, 4.0, 6.0, 7.0, 2.0),
            record(90_000.0, 9.0, 12.0, 5.0, 8.0),
            record(120_000.0, 15.0, 20.0, 9.0, 5.0),
            record(600_000.0, 30.0, 35.0, 8.0, 1.0),
        ]
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() -> Result<()> {
        let matrix = CorrelationAnalysis::new(CompensationRange::default()).analyze(&sample())?;

        assert_eq!(matrix.fields.len(), 5);
        assert!(matrix.is_symmetric());
        for i in 0..5 {
            assert_eq!(matrix.get(i, i), Some(1.0));
            for j in 0..5 {
                if let Some(value) = matrix.get(i, j) {
                    assert!((-1.0..=1.0).contains(&value));
                }
            }
        }
        assert_eq!(matrix.rows, 4);
        assert_eq!(matrix.excluded, 1);
        Ok(())
    }

    #[test]
    fn test_mask_hides_upper_triangle_and_diagonal() -> Result<()> {
        let matrix = CorrelationAnalysis::new(CompensationRange::default()).analyze(&sample())?;

        assert!(matrix.mask[0][0]);
        assert!(matrix.mask[1][3]);
        assert!(!matrix.mask[3][1]);

        let visible: Vec<(usize, usize)> = matrix.visible_cells().map(|(i, j, _)| (i, j)).collect();
        assert_eq!(visible.len(), 10);
        assert!(visible.iter().all(|(i, j)| j < i));
        Ok(())
    }

    #[test]
    fn test_constant_column_is_undefined() -> Result<()> {
        let records = vec![
            record(40_000.0, 1.0, 3.0, 7.0, 4.0),
            record(60_000.0, 4.0, 6.0, 7.0, 2.0),
            record(90_000.0, 9.0, 12.0, 7.0, 8.0),
        ];

        let matrix = CorrelationAnalysis::new(CompensationRange::default()).analyze(&records)?;
        let satisfaction = matrix
            .fields
            .iter()
            .position(|field| field == columns::JOB_SATISFACTION)
            .unwrap();
        assert_eq!(matrix.get(satisfaction, satisfaction), Some(1.0));
        assert_eq!(matrix.get(satisfaction, 0), None);
        assert_eq!(matrix.get(0, satisfaction), None);
        Ok(())
    }

    #[test]
    fn test_rows_missing_any_field_are_excluded() -> Result<()> {
        let mut records = sample();
        records[0].tool_count_work = None;

        let matrix = CorrelationAnalysis::new(CompensationRange::default()).analyze(&records)?;
        assert_eq!(matrix.rows, 3);
        assert_eq!(matrix.excluded, 2);
        Ok(())
    }

    #[test]
    fn test_single_row_leaves_off_diagonal_undefined() -> Result<()> {
        let records = vec![record(40_000.0, 1.0, 3.0, 6.0, 4.0)];

        let matrix = CorrelationAnalysis::new(CompensationRange::default()).analyze(&records)?;
        assert_eq!(matrix.get(0, 1), None);
        assert_eq!(matrix.get(2, 2), Some(1.0));
        Ok(())
    }

    #[test]
    fn test_compensation_just_below_cutoff_is_kept() -> Result<()> {
        let records = vec![
            record(40_000.0, 1.0, 3.0, 6.0, 4.0),
            record(60_000.0, 4.0, 6.0, 7.0, 2.0),
            record(499_999.0, 20.0, 25.0, 8.0, 6.0),
            record(500_000.0, 25.0, 30.0, 9.0, 3.0),
        ];

        let matrix = CorrelationAnalysis::new(CompensationRange::default()).analyze(&records)?;
        assert_eq!(matrix.rows, 3);
        assert_eq!(matrix.excluded, 1);
        Ok(())
    }
}
