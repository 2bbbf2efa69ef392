//! Core market data types.
//!
//! - [`Symbol`] - Normalized ticker symbol
//! - [`PriceBar`] - One daily close/volume sample
//! - [`PriceSeries`] - Chronologically ascending price history

use chrono::NaiveDate;
use polars::prelude::{DataFrame, DataType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DataError, Result};

/// Days between 0001-01-01 (CE day 1) and the Unix epoch; polars dates count from the epoch.
pub(crate) const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Converts a polars `Date` value (days since the Unix epoch) into a calendar date.
#[must_use]
pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

/// A trading symbol/ticker.
///
/// Symbols are trimmed and uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, trimming and converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Creates a symbol from user input, rejecting empty tickers.
    pub fn parse(s: &str) -> Result<Self> {
        let symbol = Self::new(s);
        if symbol.0.is_empty() {
            return Err(DataError::InvalidParameter(
                "Please provide a ticker symbol".to_string(),
            ));
        }
        Ok(symbol)
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A single daily sample of the price history.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date.
    pub date: NaiveDate,
    /// Closing price. Always finite.
    pub close: f64,
    /// Traded volume.
    pub volume: u64,
}

impl PriceBar {
    /// Creates a new price bar.
    #[must_use]
    pub const fn new(date: NaiveDate, close: f64, volume: u64) -> Self {
        Self {
            date,
            close,
            volume,
        }
    }
}

/// Price history ordered by ascending date.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Creates a series from bars, sorting them by date and dropping non-finite closes.
    #[must_use]
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        bars.retain(|bar| bar.close.is_finite());
        bars.sort_by_key(|bar| bar.date);
        Self { bars }
    }

    /// Builds a series from an OHLCV frame with `date`, `close`, and `volume` columns.
    ///
    /// Rows without a close are skipped; a missing volume is recorded as zero.
    pub fn from_ohlcv(df: &DataFrame) -> Result<Self> {
        let date_col = df.column("date")?.cast(&DataType::Int32)?;
        let close_col = df.column("close")?.cast(&DataType::Float64)?;
        let volume_col = df.column("volume")?.cast(&DataType::UInt64)?;

        let dates = date_col.as_materialized_series().i32()?;
        let closes = close_col.as_materialized_series().f64()?;
        let volumes = volume_col.as_materialized_series().u64()?;

        let mut bars = Vec::with_capacity(df.height());
        for ((date, close), volume) in dates.into_iter().zip(closes).zip(volumes) {
            let (Some(days), Some(close)) = (date, close) else {
                continue;
            };
            let date = date_from_epoch_days(days)
                .ok_or_else(|| DataError::Parse(format!("Invalid date offset: {days}")))?;
            bars.push(PriceBar::new(date, close, volume.unwrap_or(0)));
        }

        Ok(Self::new(bars))
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if the series has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns the samples in ascending date order.
    #[must_use]
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Returns the closing prices in ascending date order.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Returns the most recent `n` samples, or the whole series if shorter.
    #[must_use]
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }
}

impl FromIterator<PriceBar> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PriceBar>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
