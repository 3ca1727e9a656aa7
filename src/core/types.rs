use serde::{Deserialize, Serialize};

use crate::core::constants::{missing_values, validation};

/// One survey response, restricted to the columns the analysis reads.
///
/// Columns absent from the file deserialize to `None`, as do numeric cells
/// that do not parse. Call [`SurveyRecord::normalize`] after decoding to turn
/// the export's missing-value markers into `None` for text columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyRecord {
    #[serde(rename = "ConvertedCompYearly", deserialize_with = "csv::invalid_option")]
    pub compensation_yearly: Option<f64>,

    #[serde(rename = "WorkExp", deserialize_with = "csv::invalid_option")]
    pub work_experience_years: Option<f64>,

    #[serde(rename = "YearsCode", deserialize_with = "csv::invalid_option")]
    pub years_code: Option<f64>,

    #[serde(rename = "LanguageHaveWorkedWith")]
    pub languages_used: Option<String>,

    #[serde(rename = "EdLevel")]
    pub education_level: Option<String>,

    #[serde(rename = "RemoteWork")]
    pub remote_work_mode: Option<String>,

    #[serde(rename = "JobSat", deserialize_with = "csv::invalid_option")]
    pub job_satisfaction: Option<f64>,

    #[serde(rename = "AIThreat")]
    pub ai_threat_perception: Option<String>,

    #[serde(rename = "ToolCountWork", deserialize_with = "csv::invalid_option")]
    pub tool_count_work: Option<f64>,

    #[serde(rename = "Country")]
    pub country: Option<String>,

    #[serde(rename = "DevType")]
    pub dev_type: Option<String>,
}

impl SurveyRecord {
    /// Replace missing-value markers and non-finite numbers with `None`
    pub fn normalize(mut self) -> Self {
        for field in [
            &mut self.languages_used,
            &mut self.education_level,
            &mut self.remote_work_mode,
            &mut self.ai_threat_perception,
            &mut self.country,
            &mut self.dev_type,
        ] {
            *field = field.take().and_then(clean_text);
        }
        for field in [
            &mut self.compensation_yearly,
            &mut self.work_experience_years,
            &mut self.years_code,
            &mut self.job_satisfaction,
            &mut self.tool_count_work,
        ] {
            *field = field.filter(|value| value.is_finite());
        }
        self
    }

    pub fn compensation(&self) -> Option<f64> {
        self.compensation_yearly
    }

    /// Work experience, if present and non-negative
    pub fn work_experience(&self) -> Option<f64> {
        self.work_experience_years.filter(|years| *years >= 0.0)
    }

    /// Job satisfaction, if present and on the 0-10 scale
    pub fn satisfaction(&self) -> Option<f64> {
        self.job_satisfaction.filter(|score| {
            (validation::MIN_SATISFACTION..=validation::MAX_SATISFACTION).contains(score)
        })
    }

    pub fn languages(&self) -> Option<&str> {
        self.languages_used.as_deref()
    }

    pub fn education(&self) -> Option<&str> {
        self.education_level.as_deref()
    }

    pub fn remote_work(&self) -> Option<&str> {
        self.remote_work_mode.as_deref()
    }

    pub fn ai_threat(&self) -> Option<&str> {
        self.ai_threat_perception.as_deref()
    }

    /// Value of a numeric column by its survey column name
    pub fn numeric_field(&self, column: &str) -> Option<f64> {
        use crate::core::constants::columns;

        match column {
            columns::COMPENSATION => self.compensation(),
            columns::WORK_EXPERIENCE => self.work_experience(),
            columns::YEARS_CODE => self.years_code,
            columns::JOB_SATISFACTION => self.satisfaction(),
            columns::TOOL_COUNT_WORK => self.tool_count_work,
            _ => None,
        }
    }
}

fn clean_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if missing_values::MARKERS.contains(&trimmed) {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

/// Row and column count of the loaded table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetShape {
    pub rows: usize,
    pub columns: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::columns;

    fn parse(data: &str) -> Vec<SurveyRecord> {
        csv::Reader::from_reader(data.as_bytes())
            .deserialize::<SurveyRecord>()
            .map(|record| record.unwrap().normalize())
            .collect()
    }

    #[test]
    fn test_deserialize_known_columns() {
        let records = parse(
            "ConvertedCompYearly,WorkExp,LanguageHaveWorkedWith,EdLevel,JobSat\n\
             85000,7,Python;SQL,Something else,8\n",
        );

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.compensation(), Some(85000.0));
        assert_eq!(record.work_experience(), Some(7.0));
        assert_eq!(record.languages(), Some("Python;SQL"));
        assert_eq!(record.education(), Some("Something else"));
        assert_eq!(record.satisfaction(), Some(8.0));
        assert_eq!(record.remote_work(), None);
    }

    #[test]
    fn test_missing_markers_become_none() {
        let records = parse(
            "ConvertedCompYearly,WorkExp,RemoteWork,AIThreat,Country\n\
             NA,NA,NA,  ,N/A\n",
        );

        let record = &records[0];
        assert_eq!(record.compensation(), None);
        assert_eq!(record.work_experience(), None);
        assert_eq!(record.remote_work(), None);
        assert_eq!(record.ai_threat(), None);
        assert_eq!(record.country, None);
    }

    #[test]
    fn test_unparseable_numbers_become_none() {
        let records = parse("YearsCode,WorkExp\nLess than 1 year,abc\n");

        assert_eq!(records[0].years_code, None);
        assert_eq!(records[0].work_experience(), None);
    }

    #[test]
    fn test_text_values_are_trimmed() {
        let records = parse("RemoteWork\n\"  Remote \"\n");
        assert_eq!(records[0].remote_work(), Some("Remote"));
    }

    #[test]
    fn test_out_of_range_values_are_rejected_by_accessors() {
        let record = SurveyRecord {
            work_experience_years: Some(-1.0),
            job_satisfaction: Some(11.0),
            ..Default::default()
        };

        assert_eq!(record.work_experience(), None);
        assert_eq!(record.satisfaction(), None);
    }

    #[test]
    fn test_numeric_field_lookup() {
        let record = SurveyRecord {
            compensation_yearly: Some(1.0),
            work_experience_years: Some(2.0),
            years_code: Some(3.0),
            job_satisfaction: Some(4.0),
            tool_count_work: Some(5.0),
            ..Default::default()
        };

        let values: Vec<Option<f64>> = columns::CORRELATION_FIELDS
            .iter()
            .map(|column| record.numeric_field(column))
            .collect();
        assert_eq!(
            values,
            vec![Some(2.0), Some(3.0), Some(1.0), Some(4.0), Some(5.0)]
        );
        assert_eq!(record.numeric_field("Country"), None);
    }

    #[test]
    fn test_normalize_drops_non_finite_numbers() {
        let record = SurveyRecord {
            compensation_yearly: Some(f64::NAN),
            tool_count_work: Some(f64::INFINITY),
            ..Default::default()
        }
        .normalize();

        assert_eq!(record.compensation(), None);
        assert_eq!(record.tool_count_work, None);
    }
}
