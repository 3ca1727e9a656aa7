use std::collections::BTreeMap;
use std::path::Path;

use crate::core::constants::defaults;
use crate::core::error::{Result, SurveyError};
use crate::core::types::{DatasetShape, SurveyRecord};
use crate::reporting::logging;

/// Header names accepted for the column-name field of the schema file
const SCHEMA_NAME_HEADERS: [&str; 4] = ["qname", "column", "name", "field"];
/// Header names accepted for the description field of the schema file
const SCHEMA_DESCRIPTION_HEADERS: [&str; 4] = ["question", "questiontext", "description", "text"];

/// Survey records held in memory for one run
#[derive(Debug, Clone, Default)]
pub struct LoadedSurvey {
    pub records: Vec<SurveyRecord>,
    pub shape: DatasetShape,
    /// Rows that could not be decoded and were left out
    pub skipped_rows: usize,
}

/// Shape the dataset is expected to have; `None` disables a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedShape {
    pub rows: Option<usize>,
    pub columns: Option<usize>,
}

impl Default for ExpectedShape {
    fn default() -> Self {
        Self {
            rows: Some(defaults::EXPECTED_ROWS),
            columns: Some(defaults::EXPECTED_COLUMNS),
        }
    }
}

/// Load the full survey table from a CSV file with a header row.
///
/// Fails with [`SurveyError::DataUnavailable`] when the file is missing or
/// cannot be read. Rows that fail to decode are skipped and counted.
pub fn load_survey<P: AsRef<Path>>(path: P) -> Result<LoadedSurvey> {
    let path = path.as_ref();
    let unavailable = |reason: String| SurveyError::DataUnavailable {
        path: path.display().to_string(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| unavailable(e.to_string()))?;

    let columns = reader
        .headers()
        .map_err(|e| unavailable(e.to_string()))?
        .len();

    let mut records = Vec::new();
    let mut skipped_rows = 0;
    for (index, row) in reader.deserialize::<SurveyRecord>().enumerate() {
        match row {
            Ok(record) => records.push(record.normalize()),
            Err(e) if e.is_io_error() => return Err(unavailable(e.to_string())),
            Err(e) => {
                skipped_rows += 1;
                log::debug!("Skipping row {}: {e}", index + 1);
            }
        }
    }

    if skipped_rows > 0 {
        logging::log_warning(&format!(
            "Skipped {skipped_rows} row(s) of '{}' that could not be decoded",
            path.display()
        ));
    }

    let shape = DatasetShape {
        rows: records.len() + skipped_rows,
        columns,
    };
    logging::log_dataset_shape(&shape);

    Ok(LoadedSurvey {
        records,
        shape,
        skipped_rows,
    })
}

/// Compare the loaded shape against expectations, warning on mismatch.
///
/// Returns `true` when the shape matches every enabled expectation.
pub fn check_shape(shape: &DatasetShape, expected: &ExpectedShape) -> bool {
    let mut matches = true;

    if let Some(rows) = expected.rows
        && rows != shape.rows
    {
        logging::log_warning(&format!(
            "Dataset has {} rows, expected {rows}",
            shape.rows
        ));
        matches = false;
    }

    if let Some(columns) = expected.columns
        && columns != shape.columns
    {
        logging::log_warning(&format!(
            "Dataset has {} columns, expected {columns}",
            shape.columns
        ));
        matches = false;
    }

    matches
}

/// Load the schema file mapping column names to their descriptions.
///
/// The name and description columns are located by header; when the headers
/// are not recognised the first two columns are used.
pub fn load_schema<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, String>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| SurveyError::DataUnavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let headers = reader.headers()?.clone();
    let find = |candidates: &[&str], fallback: usize| {
        headers
            .iter()
            .position(|header| {
                candidates
                    .iter()
                    .any(|candidate| header.trim().eq_ignore_ascii_case(candidate))
            })
            .unwrap_or(fallback)
    };
    let name_index = find(&SCHEMA_NAME_HEADERS, 0);
    let description_index = find(&SCHEMA_DESCRIPTION_HEADERS, 1);

    let mut schema = BTreeMap::new();
    for row in reader.records() {
        let row = row?;
        let (Some(name), Some(description)) = (row.get(name_index), row.get(description_index))
        else {
            continue;
        };
        let name = name.trim();
        if !name.is_empty() {
            schema.insert(name.to_string(), description.trim().to_string());
        }
    }

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_survey_reads_records_and_shape() -> Result<()> {
        let file = write_csv(
            "ResponseId,ConvertedCompYearly,WorkExp,Country\n\
             1,85000,7,Germany\n\
             2,NA,3,France\n",
        );

        let survey = load_survey(file.path())?;
        assert_eq!(survey.records.len(), 2);
        assert_eq!(survey.shape, DatasetShape { rows: 2, columns: 4 });
        assert_eq!(survey.skipped_rows, 0);
        assert_eq!(survey.records[0].compensation(), Some(85000.0));
        assert_eq!(survey.records[1].compensation(), None);
        assert_eq!(survey.records[1].country.as_deref(), Some("France"));
        Ok(())
    }

    #[test]
    fn test_load_survey_missing_file_is_data_unavailable() {
        let result = load_survey("/definitely/not/here/survey.csv");

        match result {
            Err(SurveyError::DataUnavailable { path, .. }) => {
                assert_eq!(path, "/definitely/not/here/survey.csv");
            }
            other => panic!("Expected DataUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_load_survey_tolerates_ragged_rows() -> Result<()> {
        let file = write_csv("ConvertedCompYearly,WorkExp,Country\n1000,2\n2000,3,Spain\n");

        let survey = load_survey(file.path())?;
        assert_eq!(survey.records.len(), 2);
        assert_eq!(survey.records[0].country, None);
        assert_eq!(survey.records[1].country.as_deref(), Some("Spain"));
        Ok(())
    }

    #[test]
    fn test_load_survey_empty_file() -> Result<()> {
        let file = write_csv("");

        let survey = load_survey(file.path())?;
        assert!(survey.records.is_empty());
        assert_eq!(survey.shape, DatasetShape::default());
        Ok(())
    }

    #[test]
    fn test_check_shape() {
        let shape = DatasetShape {
            rows: 10,
            columns: 3,
        };

        assert!(check_shape(
            &shape,
            &ExpectedShape {
                rows: Some(10),
                columns: Some(3)
            }
        ));
        assert!(!check_shape(
            &shape,
            &ExpectedShape {
                rows: Some(11),
                columns: Some(3)
            }
        ));
        assert!(!check_shape(
            &shape,
            &ExpectedShape {
                rows: None,
                columns: Some(4)
            }
        ));
        assert!(check_shape(
            &shape,
            &ExpectedShape {
                rows: None,
                columns: None
            }
        ));
    }

    #[test]
    fn test_load_schema_by_header() -> Result<()> {
        let file = write_csv(
            "qid,qname,question,type\n\
             QID1,WorkExp,How many years of work experience do you have?,TE\n\
             QID2,RemoteWork,Which best describes your current work situation?,MC\n",
        );

        let schema = load_schema(file.path())?;
        assert_eq!(schema.len(), 2);
        assert_eq!(
            schema.get("WorkExp").map(String::as_str),
            Some("How many years of work experience do you have?")
        );
        Ok(())
    }

    #[test]
    fn test_load_schema_falls_back_to_first_columns() -> Result<()> {
        let file = write_csv("a,b\nJobSat,Job satisfaction score\n");

        let schema = load_schema(file.path())?;
        assert_eq!(
            schema.get("JobSat").map(String::as_str),
            Some("Job satisfaction score")
        );
        Ok(())
    }

    #[test]
    fn test_load_schema_missing_file() {
        assert!(matches!(
            load_schema("/definitely/not/here/schema.csv"),
            Err(SurveyError::DataUnavailable { .. })
        ));
    }
}
