//! Error taxonomy shared by every importer.
//!
//! Only document-level failures are errors. A single bad row or placemark is
//! skipped and counted by the importer that saw it, never raised here.

use std::path::PathBuf;

use thiserror::Error;

/// Why an import produced nothing usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The input held no rows or placemarks at all.
    EmptyInput,
    /// Rows were present but every one was rejected.
    NoValidRows { rejected: usize },
}

impl std::fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmptyReason::EmptyInput => write!(f, "no data found"),
            EmptyReason::NoValidRows { rejected } => write!(
                f,
                "{} rows rejected (site name, latitude and longitude are required)",
                rejected
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed document: {message}")]
    MalformedDocument { message: String },

    #[error("no valid records: {reason}")]
    NoValidRecords { reason: EmptyReason },

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("another import is already running")]
    ImportInProgress,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ImportError {
    /// Non-fatal outcome: the caller shows a notice instead of failing.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, ImportError::NoValidRecords { .. })
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
