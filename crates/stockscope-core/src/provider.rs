//! Provider traits for fetching market data.
//!
//! This module defines the core provider traits:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`PriceDataProvider`] - OHLCV price data
//! - [`FundamentalDataProvider`] - Raw attributes and financial statement frames
//! - [`NewsProvider`] - Recent headlines for a symbol
//! - [`MarketDataSource`] - Everything an analysis needs, as one object

use async_trait::async_trait;
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::{
    error::{DataError, Result},
    frequency::{DataFrequency, PeriodType, StatementKind},
    news::NewsItem,
    types::Symbol,
    value::Value,
};

/// Loosely structured per-security attributes, keyed by provider field name
/// (e.g. `trailingPE`, `longName`).
pub type RawAttributes = BTreeMap<String, Value>;

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Yahoo Finance").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;

    /// Returns the data frequencies supported by this provider.
    fn supported_frequencies(&self) -> &[DataFrequency];
}

/// Provider for OHLCV price data.
#[async_trait]
pub trait PriceDataProvider: DataProvider {
    /// Fetches OHLCV data for a single symbol.
    ///
    /// Returns a DataFrame with at least the columns `date`, `close`, and `volume`,
    /// ordered by ascending date.
    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
        frequency: DataFrequency,
    ) -> Result<DataFrame>;
}

/// Provider for fundamental data.
#[async_trait]
pub trait FundamentalDataProvider: DataProvider {
    /// Fetches the raw attribute map for a symbol.
    async fn fetch_attributes(&self, symbol: &Symbol) -> Result<RawAttributes>;

    /// Fetches one financial statement as a frame.
    ///
    /// The frame has a `period` column (one row per reporting period, most recent
    /// first) and one column per line item. An empty frame means the statement
    /// is not available.
    async fn fetch_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
        period_type: PeriodType,
    ) -> Result<DataFrame>;
}

/// Provider for per-symbol headlines.
#[async_trait]
pub trait NewsProvider: DataProvider {
    /// Fetches at most `limit` recent headlines, most recent first.
    async fn fetch_news(&self, symbol: &Symbol, limit: usize) -> Result<Vec<NewsItem>> {
        let _ = limit;
        Err(DataError::NotSupported(format!(
            "News for {symbol} from {}",
            self.name()
        )))
    }
}

/// A provider that can serve a full analysis: prices, fundamentals, and news.
pub trait MarketDataSource: PriceDataProvider + FundamentalDataProvider + NewsProvider {}

impl<T> MarketDataSource for T where
    T: PriceDataProvider + FundamentalDataProvider + NewsProvider
{
}
