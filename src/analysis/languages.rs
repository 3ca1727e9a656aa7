use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::analysis::Analyzer;
use crate::core::constants::defaults;
use crate::core::error::{Result, SurveyError};
use crate::core::types::SurveyRecord;
use crate::ingest::CleanedSubset;
use crate::reporting::logging;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageCount {
    pub language: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageReport {
    /// Most used languages, descending count then ascending name
    pub top: Vec<LanguageCount>,
    /// Responses that listed at least one language
    pub respondents: usize,
    pub distinct_languages: usize,
}

/// What are the most popular programming languages?
#[derive(Debug, Clone)]
pub struct LanguagePopularity {
    top_n: usize,
}

impl Default for LanguagePopularity {
    fn default() -> Self {
        Self::new(defaults::TOP_LANGUAGES)
    }
}

impl LanguagePopularity {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }
}

/// Split a multi-select cell into trimmed, non-empty language names
pub fn split_languages(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(defaults::LANGUAGE_DELIMITER)
        .map(str::trim)
        .filter(|language| !language.is_empty())
}

/// Count language mentions over all cells
pub fn count_languages<'a, I>(cells: I) -> FxHashMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = FxHashMap::default();
    for cell in cells {
        for language in split_languages(cell) {
            *counts.entry(language).or_insert(0) += 1;
        }
    }
    counts
}

/// Order counts by descending count, ties by name, and keep the first `limit`
pub fn rank_languages(counts: FxHashMap<&str, usize>, limit: usize) -> Vec<LanguageCount> {
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(language, count)| LanguageCount {
            language: language.to_string(),
            count,
        })
        .collect()
}

impl Analyzer for LanguagePopularity {
    type Output = LanguageReport;

    fn name(&self) -> &'static str {
        "language_popularity"
    }

    fn analyze(&self, records: &[SurveyRecord]) -> Result<LanguageReport> {
        if self.top_n == 0 {
            return Err(SurveyError::Analysis(
                "language ranking needs a positive size".to_string(),
            ));
        }

        let subset = CleanedSubset::collect(records, SurveyRecord::languages);
        logging::log_subset(self.name(), subset.len(), subset.excluded());

        let counts = count_languages(subset.iter().copied());
        let respondents = subset
            .iter()
            .filter(|cell| split_languages(cell).next().is_some())
            .count();
        let distinct_languages = counts.len();

        Ok(LanguageReport {
            top: rank_languages(counts, self.top_n),
            respondents,
            distinct_languages,
        })
    }
}
