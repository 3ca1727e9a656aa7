use serde::Serialize;
use std::collections::BTreeMap;

use crate::analysis::Analyzer;
use crate::analysis::stats::{CrossTab, DescriptiveStats, describe};
use crate::core::error::Result;
use crate::core::types::SurveyRecord;
use crate::ingest::CleanedSubset;
use crate::reporting::logging;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionStatistics {
    pub mode: String,
    pub satisfaction: DescriptiveStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteWorkReport {
    /// Work arrangement by satisfaction score, each row in percent
    pub crosstab: CrossTab,
    /// Satisfaction per work arrangement, same order as the crosstab rows
    pub satisfaction: Vec<SatisfactionStatistics>,
    pub rows: usize,
    pub excluded: usize,
}

/// What is the relationship between remote work and job satisfaction?
#[derive(Debug, Clone, Default)]
pub struct RemoteWorkSatisfaction;

impl Analyzer for RemoteWorkSatisfaction {
    type Output = RemoteWorkReport;

    fn name(&self) -> &'static str {
        "remote_work_satisfaction"
    }

    fn analyze(&self, records: &[SurveyRecord]) -> Result<RemoteWorkReport> {
        let subset = CleanedSubset::collect(records, |record| {
            Some((record.remote_work()?, record.satisfaction()?))
        });
        logging::log_subset(self.name(), subset.len(), subset.excluded());

        // Scores are bucketed to whole points for the columns
        let crosstab = CrossTab::from_observations(
            subset
                .iter()
                .map(|&(mode, score)| (mode, score.round() as u8)),
        );

        let mut scores: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for &(mode, score) in &subset {
            scores.entry(mode).or_default().push(score);
        }
        let satisfaction = scores
            .into_iter()
            .map(|(mode, values)| SatisfactionStatistics {
                mode: mode.to_string(),
                satisfaction: describe(&values),
            })
            .collect();

        Ok(RemoteWorkReport {
            crosstab,
            satisfaction,
            rows: subset.len(),
            excluded: subset.excluded(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(mode: Option<&str>, score: Option<f64>) -> SurveyRecord {
        SurveyRecord {
            remote_work_mode: mode.map(str::to_string),
            job_satisfaction: score,
            ..Default::default()
        }
    }

    #[test]
    fn test_rows_are_normalized_to_hundred() -> Result<()> {
        let records = vec![
            record(Some("Remote"), Some(8.0)),
            record(Some("Remote"), Some(6.0)),
            record(Some("Remote"), Some(8.0)),
            record(Some("In-person"), Some(5.0)),
            record(Some("Hybrid (some remote, some in-person)"), Some(7.0)),
            record(Some("Hybrid (some remote, some in-person)"), Some(10.0)),
        ];

        let report = RemoteWorkSatisfaction.analyze(&records)?;
        assert_eq!(
            report.crosstab.row_labels,
            vec![
                "Hybrid (some remote, some in-person)",
                "In-person",
                "Remote"
            ]
        );
        assert_eq!(report.crosstab.column_labels, vec!["5", "6", "7", "8", "10"]);
        for row in &report.crosstab.row_percentages {
            let sum: f64 = row.iter().sum();
            assert!((sum - 100.0).abs() < 0.01);
        }
        Ok(())
    }

    #[test]
    fn test_mean_satisfaction_in_crosstab_order() -> Result<()> {
        let records = vec![
            record(Some("Remote"), Some(8.0)),
            record(Some("Remote"), Some(6.0)),
            record(Some("In-person"), Some(5.0)),
        ];

        let report = RemoteWorkSatisfaction.analyze(&records)?;
        let modes: Vec<&str> = report
            .satisfaction
            .iter()
            .map(|stats| stats.mode.as_str())
            .collect();
        assert_eq!(modes, report.crosstab.row_labels);
        assert_eq!(report.satisfaction[1].satisfaction.mean, Some(7.0));
        assert_eq!(report.satisfaction[1].satisfaction.count, 2);
        Ok(())
    }

    #[test]
    fn test_incomplete_rows_are_excluded() -> Result<()> {
        let records = vec![
            record(Some("Remote"), None),
            record(None, Some(5.0)),
            record(Some("Remote"), Some(11.0)),
            record(Some("Remote"), Some(9.0)),
        ];

        let report = RemoteWorkSatisfaction.analyze(&records)?;
        assert_eq!(report.rows, 1);
        assert_eq!(report.excluded, 3);
        assert_eq!(report.crosstab.counts, vec![vec![1]]);
        Ok(())
    }

    #[test]
    fn test_fractional_scores_round_to_columns() -> Result<()> {
        let records = vec![record(Some("Remote"), Some(6.6))];

        let report = RemoteWorkSatisfaction.analyze(&records)?;
        assert_eq!(report.crosstab.column_labels, vec!["7"]);
        assert_eq!(report.satisfaction[0].satisfaction.mean, Some(6.6));
        Ok(())
    }
}
