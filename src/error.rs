//! Error handling for scenario ingestion and message encoding
//!
//! Only whole-workbook failures are surfaced to callers. Row-level anomalies
//! are recovered inside the block parser and reported as diagnostics.

use thiserror::Error;

/// Main error type for an ingestion call
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    #[error("Workbook contains no sheets")]
    EmptyWorkbook,

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the structural XML construction step
///
/// Missing field values never produce this error; they are encoded as
/// empty text or zero.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Invalid XML element name '{name}'")]
    InvalidElementName { name: String },

    #[error("XML serialization failed: {0}")]
    Xml(String),
}

impl From<calamine::Error> for IngestError {
    fn from(error: calamine::Error) -> Self {
        IngestError::WorkbookOpen(error.to_string())
    }
}
