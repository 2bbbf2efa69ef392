//! Errors surfaced by the [`Stockscope`](crate::Stockscope) service.

use stockscope_core::{DataError, Symbol};
use stockscope_report::ReportError;
use thiserror::Error;

/// Errors from any layer the service drives.
#[derive(Error, Debug)]
pub enum Error {
    /// Data fetching, validation, or analysis failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Composing or rendering a report failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// The analysis a report depends on did not succeed.
    #[error("Analysis failed for {ticker}: {message}")]
    Analysis {
        /// Ticker that failed.
        ticker: Symbol,
        /// Failure message from the analysis.
        message: String,
    },

    /// No insight generator has been configured.
    #[error("AI insights are not configured; set OPENAI_API_KEY")]
    InsightsUnavailable,
}

impl Error {
    /// Returns true if the request itself was incomplete or invalid.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        match self {
            Self::Data(err) => err.is_invalid_input(),
            Self::Report(err) => err.is_missing_data(),
            Self::Analysis { .. } | Self::InsightsUnavailable => false,
        }
    }
}

impl Error {
    /// Message shown to API and CLI users. Validation errors carry only their
    /// message, without the error kind prefix.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Data(DataError::InvalidParameter(message)) => message.clone(),
            Self::Report(ReportError::MissingData(_)) => "Missing data".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
