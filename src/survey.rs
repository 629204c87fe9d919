//! Survey CSV ingestion
//!
//! Counts completed interviews in a fieldwork export: the number of rows whose
//! household identifier cell is present. The first row is the header and the
//! identifier column is found by name (`hh_num` in the default config).
//!
//! A cell counts as missing when the row is too short to reach the column or
//! the text is one of the usual spreadsheet/statistics NA markers.

use log::debug;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Cell values treated as missing, matched exactly
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Number of completed interviews in a loaded dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyCount {
    /// Identifier column that was counted
    pub column: String,
    /// Rows with a non-missing identifier
    pub completed: u64,
    /// Data rows read, header excluded
    pub rows: u64,
}

/// Error type for survey loading
#[derive(Debug)]
pub enum SurveyError {
    Io(std::io::Error),
    Csv { line: Option<u64>, source: csv::Error },
    MissingColumn { column: String, available: Vec<String> },
}

impl fmt::Display for SurveyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyError::Io(e) => write!(f, "Cannot read survey file: {}", e),
            SurveyError::Csv { line: Some(line), source } => {
                write!(f, "Malformed CSV at line {}: {}", line, source)
            }
            SurveyError::Csv { line: None, source } => write!(f, "Malformed CSV: {}", source),
            SurveyError::MissingColumn { column, available } => write!(
                f,
                "Column '{}' not found (available: {})",
                column,
                available.join(", ")
            ),
        }
    }
}

impl std::error::Error for SurveyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SurveyError::Io(e) => Some(e),
            SurveyError::Csv { source, .. } => Some(source),
            SurveyError::MissingColumn { .. } => None,
        }
    }
}

impl From<std::io::Error> for SurveyError {
    fn from(e: std::io::Error) -> Self {
        SurveyError::Io(e)
    }
}

impl From<csv::Error> for SurveyError {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map(|p| p.line());
        SurveyError::Csv { line, source: e }
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;

/// True when a cell holds a real value
pub fn is_present(cell: &str) -> bool {
    !NA_VALUES.contains(&cell)
}

impl SurveyCount {
    /// Load and count the identifier column of a CSV file
    pub fn from_path<P: AsRef<Path>>(path: P, column: &str) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading survey data from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file, column)
    }

    pub fn from_reader<R: Read>(reader: R, column: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let idx = headers.iter().position(|h| h == column).ok_or_else(|| {
            SurveyError::MissingColumn {
                column: column.to_string(),
                available: headers.iter().map(str::to_string).collect(),
            }
        })?;

        let mut completed = 0u64;
        let mut rows = 0u64;
        for record in rdr.records() {
            let record = record?;
            rows += 1;
            if record.get(idx).map(is_present).unwrap_or(false) {
                completed += 1;
            }
        }

        debug!("Column '{}': {} of {} rows present", column, completed, rows);

        Ok(Self {
            column: column.to_string(),
            completed,
            rows,
        })
    }
}
