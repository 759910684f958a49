use thiserror::Error;

/// Failures that prevent a usable dataset from being loaded.
#[derive(Debug, Error)]
pub enum DataError {
    /// The source could not be reached or did not return tabular data.
    #[error("data source unavailable: {0}")]
    DataSource(String),
    /// The CSV is missing one or more expected columns.
    #[error("missing expected column(s): {}", .0.join(", "))]
    Schema(Vec<String>),
    /// A cell could not be interpreted (e.g. a non-numeric valuation).
    #[error("parse error: {0}")]
    Parse(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::DataSource(format!("malformed CSV payload: {err}"))
    }
}

impl DataError {
    /// Whether the failure came from fetching rather than interpreting data.
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            DataError::DataSource(_) | DataError::Http(_) | DataError::Io(_)
        )
    }
}
