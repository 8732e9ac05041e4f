use std::path::PathBuf;

use thiserror::Error;

use super::model::Column;

// ---------------------------------------------------------------------------
// Load-time errors: fatal for the load, surfaced to the user
// ---------------------------------------------------------------------------

/// Failure to turn a delimited-text resource into a [`CarDataset`](super::model::CarDataset).
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("unsupported file extension: .{extension} (expected .csv)")]
    UnsupportedFormat { extension: String },

    #[error("cannot open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot read CSV header")]
    Header(#[source] csv::Error),

    #[error("CSV is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// `line` is the 1-based line in the file; the header is line 1.
    #[error("CSV line {line} is malformed")]
    Row {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("CSV line {line}: '{column}' must not be empty")]
    EmptyField { line: usize, column: Column },
}

// ---------------------------------------------------------------------------
// Query errors: programmer errors, reported immediately
// ---------------------------------------------------------------------------

/// A structurally invalid query. Never produced by bad cell data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' cannot be used as a group key")]
    NotGroupable(Column),

    #[error("column '{0}' is not numeric")]
    NotNumeric(Column),

    #[error("at least one group key is required")]
    NoGroupKeys,

    #[error("column '{0}' is not part of this table")]
    NotInTable(Column),
}
