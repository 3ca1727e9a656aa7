use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::analysis::Analyzer;
use crate::analysis::brackets::BracketScheme;
use crate::analysis::stats::{CrossTab, percentages};
use crate::core::error::Result;
use crate::core::types::SurveyRecord;
use crate::ingest::CleanedSubset;
use crate::reporting::logging;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiThreatReport {
    /// Share of each answer, most frequent first
    pub overall: Vec<CategoryShare>,
    /// Experience bracket by answer, each bracket row in percent
    pub by_experience: CrossTab,
    pub rows: usize,
    pub excluded: usize,
    /// Rows that also fell into an experience bracket
    pub bracketed_rows: usize,
}

/// How do developers feel about the AI threat to their jobs?
#[derive(Debug, Clone)]
pub struct AiThreatPerception {
    brackets: BracketScheme,
}

impl AiThreatPerception {
    pub fn new(brackets: BracketScheme) -> Self {
        Self { brackets }
    }
}

impl Analyzer for AiThreatPerception {
    type Output = AiThreatReport;

    fn name(&self) -> &'static str {
        "ai_threat_perception"
    }

    fn analyze(&self, records: &[SurveyRecord]) -> Result<AiThreatReport> {
        let subset = CleanedSubset::collect(records, |record| {
            let bracket = record
                .work_experience()
                .and_then(|years| self.brackets.classify(years));
            Some((record.ai_threat()?, bracket))
        });
        logging::log_subset(self.name(), subset.len(), subset.excluded());

        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for &(category, _) in &subset {
            *counts.entry(category).or_insert(0) += 1;
        }
        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let shares = percentages(&ranked.iter().map(|(_, count)| *count).collect::<Vec<_>>());
        let overall = ranked
            .iter()
            .zip(shares)
            .map(|(&(category, count), percent)| CategoryShare {
                category: category.to_string(),
                count,
                percent,
            })
            .collect();

        let bracketed: Vec<_> = subset
            .iter()
            .filter_map(|&(category, bracket)| Some((self.brackets.key(bracket?), category)))
            .collect();
        let bracketed_rows = bracketed.len();
        let by_experience = CrossTab::from_observations(bracketed);

        Ok(AiThreatReport {
            overall,
            by_experience,
            rows: subset.len(),
            excluded: subset.excluded(),
            bracketed_rows,
        })
    }
}
