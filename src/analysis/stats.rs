//! Descriptive statistics, correlation and cross-tabulation helpers

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

/// Whisker reach as a multiple of the interquartile range
const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Five-number summary drawn by box plots.
///
/// Whiskers extend to the most extreme values within 1.5 IQR of the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

/// Count and central tendency of one group.
///
/// Every statistic is `None` for an empty group; `std_dev` also needs at
/// least two values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub box_summary: Option<BoxSummary>,
}

pub fn describe(values: &[f64]) -> DescriptiveStats {
    if values.is_empty() {
        return DescriptiveStats::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = mean(values);
    DescriptiveStats {
        count: values.len(),
        mean,
        median: Some(quantile(&sorted, 0.5)),
        std_dev: mean.and_then(|mean| sample_std_dev(values, mean)),
        box_summary: Some(box_summary(&sorted)),
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(quantile(&sorted, 0.5))
}

/// Standard deviation with Bessel's correction
pub fn sample_std_dev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let sum_of_squares: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
    Some((sum_of_squares / (values.len() - 1) as f64).sqrt())
}

/// Linear-interpolated quantile of an ascending, non-empty slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

fn box_summary(sorted: &[f64]) -> BoxSummary {
    let q1 = quantile(sorted, 0.25);
    let median = quantile(sorted, 0.5);
    let q3 = quantile(sorted, 0.75);
    let reach = (q3 - q1) * WHISKER_IQR_FACTOR;

    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|value| *value >= q1 - reach)
        .unwrap_or(q1);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|value| *value <= q3 + reach)
        .unwrap_or(q3);

    BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
    }
}

/// Pearson correlation coefficient of two paired samples.
///
/// `None` when fewer than two pairs exist, the lengths differ, or either
/// sample has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    let (mut covariance, mut variance_x, mut variance_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x == 0.0 || variance_y == 0.0 {
        return None;
    }

    Some((covariance / (variance_x * variance_y).sqrt()).clamp(-1.0, 1.0))
}

/// Shares of the total in percent; all zeros when the total is zero
pub fn percentages(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts
        .iter()
        .map(|count| *count as f64 * 100.0 / total as f64)
        .collect()
}

/// Two-way frequency table with row-normalized percentages.
///
/// Rows and columns are the observed categories in ascending key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrossTab {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
    pub row_percentages: Vec<Vec<f64>>,
}

impl CrossTab {
    pub fn from_observations<R, C, I>(observations: I) -> Self
    where
        R: Ord + Display,
        C: Ord + Clone + Display,
        I: IntoIterator<Item = (R, C)>,
    {
        let mut table: BTreeMap<R, BTreeMap<C, usize>> = BTreeMap::new();
        let mut columns: BTreeSet<C> = BTreeSet::new();

        for (row, column) in observations {
            columns.insert(column.clone());
            *table.entry(row).or_default().entry(column).or_insert(0) += 1;
        }

        let column_labels = columns.iter().map(ToString::to_string).collect();
        let mut row_labels = Vec::with_capacity(table.len());
        let mut counts = Vec::with_capacity(table.len());
        for (row, cells) in &table {
            row_labels.push(row.to_string());
            counts.push(
                columns
                    .iter()
                    .map(|column| cells.get(column).copied().unwrap_or(0))
                    .collect::<Vec<_>>(),
            );
        }
        let row_percentages = counts.iter().map(|row| percentages(row)).collect();

        Self {
            row_labels,
            column_labels,
            counts,
            row_percentages,
        }
    }

    pub fn row_total(&self, row: usize) -> usize {
        self.counts.get(row).map_or(0, |cells| cells.iter().sum())
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }
}
