//! Error types for fetching and analyzing market data.
//!
//! [`DataError`] separates failures caused by the caller's input
//! ([`DataError::is_invalid_input`]) from failures of the upstream source.
//! Per-ticker analyses turn the latter into a message instead of failing the
//! whole request.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while fetching or transforming market data.
#[derive(Error, Debug)]
pub enum DataError {
    /// The request did not produce a usable HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// The source asked us to slow down.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// Name of the source.
        provider: String,
        /// Retry hint, if the source gave one.
        retry_after: Option<Duration>,
    },

    /// The source does not know the ticker.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The ticker is known but has no price history in the window.
    #[error("No price history for {symbol} between {start} and {end}")]
    NoPriceHistory {
        /// Ticker that was requested.
        symbol: String,
        /// First day of the window.
        start: String,
        /// Last day of the window.
        end: String,
    },

    /// A payload or frame could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The caller's input was rejected. The message is shown to the caller as is.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The source cannot serve this kind of request.
    #[error("Feature not supported: {0}")]
    NotSupported(String),

    /// Any other upstream failure.
    #[error("{0}")]
    Other(String),
}

impl DataError {
    /// Returns true if the caller's input caused the error.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidParameter(_))
    }

    /// Returns true if the ticker or its history does not exist upstream.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::SymbolNotFound(_) | Self::NoPriceHistory { .. })
    }
}

impl From<polars::prelude::PolarsError> for DataError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let blank = DataError::InvalidParameter("Please provide a ticker symbol".to_string());
        assert!(blank.is_invalid_input());
        assert!(!blank.is_not_found());

        let missing = DataError::NoPriceHistory {
            symbol: "NEW".to_string(),
            start: "2024-01-01".to_string(),
            end: "2024-12-31".to_string(),
        };
        assert!(missing.is_not_found());
        assert!(!missing.is_invalid_input());
        assert_eq!(
            missing.to_string(),
            "No price history for NEW between 2024-01-01 and 2024-12-31"
        );
    }

    #[test]
    fn test_polars_errors_are_parse_errors() {
        let err: DataError = polars::prelude::PolarsError::ColumnNotFound("close".into()).into();
        assert!(matches!(err, DataError::Parse(_)));
    }
}
