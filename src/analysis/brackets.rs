use serde::Serialize;
use std::fmt;

use crate::core::constants::defaults;
use crate::core::error::{Result, SurveyError};

/// Partition of work experience into ordered brackets.
///
/// For edges `e0 < e1 < ... < en` the brackets are `[e0, e1]`, `(e1, e2]`,
/// ..., `(en-1, en]`. They do not overlap and cover `[e0, en]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketScheme {
    edges: Vec<f64>,
    labels: Vec<String>,
}

impl Default for BracketScheme {
    fn default() -> Self {
        let edges = defaults::EXPERIENCE_EDGES.to_vec();
        let labels = labels_for(&edges);
        Self { edges, labels }
    }
}

impl BracketScheme {
    pub fn new(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(SurveyError::Config(format!(
                "Experience brackets need at least 2 edges, got {}.",
                edges.len()
            )));
        }
        if edges.iter().any(|edge| !edge.is_finite() || *edge < 0.0) {
            return Err(SurveyError::Config(
                "Experience bracket edges must be finite, non-negative numbers.".to_string(),
            ));
        }
        if edges.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(SurveyError::Config(format!(
                "Experience bracket edges {edges:?} must be strictly increasing."
            )));
        }

        let labels = labels_for(&edges);
        Ok(Self { edges, labels })
    }

    /// Index of the bracket containing `years`, `None` outside the covered range
    pub fn classify(&self, years: f64) -> Option<usize> {
        let first = *self.edges.first()?;
        if years.is_nan() || years < first {
            return None;
        }
        self.edges[1..].iter().position(|upper| years <= *upper)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Sort key for the bracket at `index`, ordered by position
    pub fn key(&self, index: usize) -> BracketKey<'_> {
        BracketKey {
            index,
            label: self.labels.get(index).map_or("", String::as_str),
        }
    }
}

/// Bracket identity that orders by position and displays as its label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BracketKey<'a> {
    pub index: usize,
    pub label: &'a str,
}

impl fmt::Display for BracketKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

fn labels_for(edges: &[f64]) -> Vec<String> {
    let last = edges.len().saturating_sub(2);
    edges
        .windows(2)
        .enumerate()
        .map(|(index, pair)| {
            let (lower, upper) = (pair[0], pair[1]);
            if index == 0 {
                format!("{lower}-{upper} years")
            } else if index == last {
                format!("{lower}+ years")
            } else if lower.fract() == 0.0 {
                format!("{}-{upper} years", lower + 1.0)
            } else {
                format!(">{lower}-{upper} years")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels() {
        let scheme = BracketScheme::default();
        assert_eq!(
            scheme.labels(),
            &[
                "0-2 years",
                "3-5 years",
                "6-10 years",
                "11-20 years",
                "20+ years"
            ]
        );
        assert_eq!(scheme.len(), 5);
    }

    #[test]
    fn test_classify_boundaries() {
        let scheme = BracketScheme::default();

        assert_eq!(scheme.classify(0.0), Some(0));
        assert_eq!(scheme.classify(2.0), Some(0));
        assert_eq!(scheme.classify(2.5), Some(1));
        assert_eq!(scheme.classify(3.0), Some(1));
        assert_eq!(scheme.classify(5.0), Some(1));
        assert_eq!(scheme.classify(6.0), Some(2));
        assert_eq!(scheme.classify(10.0), Some(2));
        assert_eq!(scheme.classify(11.0), Some(3));
        assert_eq!(scheme.classify(20.0), Some(3));
        assert_eq!(scheme.classify(21.0), Some(4));
        assert_eq!(scheme.classify(100.0), Some(4));
    }

    #[test]
    fn test_classify_outside_range() {
        let scheme = BracketScheme::default();

        assert_eq!(scheme.classify(-1.0), None);
        assert_eq!(scheme.classify(100.5), None);
        assert_eq!(scheme.classify(f64::NAN), None);
    }

    #[test]
    fn test_new_rejects_invalid_edges() {
        assert!(BracketScheme::new(vec![0.0]).is_err());
        assert!(BracketScheme::new(vec![0.0, 5.0, 5.0]).is_err());
        assert!(BracketScheme::new(vec![10.0, 5.0]).is_err());
        assert!(BracketScheme::new(vec![-1.0, 5.0]).is_err());
        assert!(BracketScheme::new(vec![0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_single_bracket_label() {
        let scheme = BracketScheme::new(vec![0.0, 40.0]).unwrap();
        assert_eq!(scheme.labels(), &["0-40 years"]);
        assert_eq!(scheme.classify(40.0), Some(0));
    }

    #[test]
    fn test_bracket_keys_order_by_position() {
        let scheme = BracketScheme::default();
        let young = scheme.key(0);
        let senior = scheme.key(4);

        assert!(young < senior);
        assert_eq!(senior.to_string(), "20+ years");
    }
}
