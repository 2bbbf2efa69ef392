//! Error types for report generation.

use thiserror::Error;

/// Errors that can occur while composing or rendering a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The request lacks the ticker or the analysis.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// The PDF backend failed.
    #[error("Render error: {0}")]
    Render(String),

    /// Writing the report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The report request could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReportError {
    /// Returns true if the error was caused by an incomplete request.
    #[must_use]
    pub const fn is_missing_data(&self) -> bool {
        matches!(self, Self::MissingData(_))
    }
}

/// Result type alias using [`ReportError`].
pub type Result<T> = std::result::Result<T, ReportError>;
