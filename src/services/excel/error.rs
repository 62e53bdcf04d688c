use serde::Serialize;
use std::fmt;

/// The spreadsheet could not be turned into a table.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("workbook contains no sheets")]
    NoSheets,

    #[error("sheet contains no columns")]
    NoColumns,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("no column matches pattern `{pattern}`")]
    NoMatch { pattern: String },

    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Which column the pipeline was looking for when classification failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lane,
    Activity,
    Name,
    Time,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Lane => "lane",
            Stage::Activity => "activity",
            Stage::Name => "name",
            Stage::Time => "time",
        };
        f.write_str(name)
    }
}

/// Fatal failure of an extraction run.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("{stage} column: {source}")]
    Classify {
        stage: Stage,
        #[source]
        source: ClassifyError,
    },

    #[error("experiment time marker `time (min)` not found in {searched}")]
    TimeNotFound { searched: String },

    #[error("invalid experiment time `{value}` in column {column}: {reason}")]
    InvalidTime {
        value: String,
        column: String,
        reason: String,
    },
}

impl ExtractionError {
    pub fn classify(stage: Stage) -> impl FnOnce(ClassifyError) -> Self {
        move |source| ExtractionError::Classify { stage, source }
    }
}

/// A single lane row whose activity could not be normalized.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("row {row} ({name}): {reason}")]
pub struct RowProcessingError {
    /// Row index in the loaded table.
    pub row: usize,
    pub name: String,
    pub reason: String,
}
