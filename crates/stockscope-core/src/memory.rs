//! In-memory provider serving preloaded data.
//!
//! [`StaticProvider`] answers every provider trait from data registered up front.
//! It is used for offline runs and for tests that need a deterministic source.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use polars::prelude::{Column, DataFrame, DataType};
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::{
    error::{DataError, Result},
    frequency::{DataFrequency, PeriodType, StatementKind},
    news::NewsItem,
    provider::{
        DataProvider, FundamentalDataProvider, NewsProvider, PriceDataProvider, RawAttributes,
    },
    types::{PriceBar, PriceSeries, Symbol, UNIX_EPOCH_DAYS_FROM_CE},
    value::Value,
};

/// Preloaded data for one symbol.
#[derive(Debug, Clone, Default)]
struct SymbolData {
    attributes: RawAttributes,
    statements: HashMap<(StatementKind, PeriodType), DataFrame>,
    prices: PriceSeries,
    news: Vec<NewsItem>,
}

/// Provider that serves preloaded attributes, statements, and prices.
///
/// Symbols that were never registered fail with [`DataError::SymbolNotFound`].
/// Statements that were not registered come back as empty frames.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    symbols: HashMap<Symbol, SymbolData>,
}

impl StaticProvider {
    /// Create a new empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a raw attribute for a symbol.
    #[must_use]
    pub fn with_attribute(
        mut self,
        symbol: impl Into<Symbol>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.entry(symbol)
            .attributes
            .insert(key.into(), value.into());
        self
    }

    /// Registers the full raw attribute map for a symbol.
    #[must_use]
    pub fn with_attributes(mut self, symbol: impl Into<Symbol>, attributes: RawAttributes) -> Self {
        self.entry(symbol).attributes = attributes;
        self
    }

    /// Registers a statement frame for a symbol.
    #[must_use]
    pub fn with_statement(
        mut self,
        symbol: impl Into<Symbol>,
        kind: StatementKind,
        period_type: PeriodType,
        frame: DataFrame,
    ) -> Self {
        self.entry(symbol)
            .statements
            .insert((kind, period_type), frame);
        self
    }

    /// Registers the daily price history for a symbol.
    #[must_use]
    pub fn with_prices(mut self, symbol: impl Into<Symbol>, bars: Vec<PriceBar>) -> Self {
        self.entry(symbol).prices = PriceSeries::new(bars);
        self
    }

    /// Registers headlines for a symbol, most recent first.
    #[must_use]
    pub fn with_news(mut self, symbol: impl Into<Symbol>, news: Vec<NewsItem>) -> Self {
        self.entry(symbol).news = news;
        self
    }

    fn entry(&mut self, symbol: impl Into<Symbol>) -> &mut SymbolData {
        self.symbols.entry(symbol.into()).or_default()
    }

    fn lookup(&self, symbol: &Symbol) -> Result<&SymbolData> {
        self.symbols
            .get(symbol)
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }
}

/// Builds an OHLCV-shaped frame (`date`, `close`, `volume`) from price bars.
pub fn price_frame(bars: &[PriceBar]) -> Result<DataFrame> {
    let days: Vec<i32> = bars
        .iter()
        .map(|bar| bar.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        .collect();
    let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
    let volumes: Vec<u64> = bars.iter().map(|bar| bar.volume).collect();

    let df = DataFrame::new(vec![
        Column::new("date".into(), days).cast(&DataType::Date)?,
        Column::new("close".into(), closes),
        Column::new("volume".into(), volumes),
    ])?;
    Ok(df)
}

impl DataProvider for StaticProvider {
    fn name(&self) -> &str {
        "Static"
    }

    fn description(&self) -> &str {
        "Preloaded in-memory market data"
    }

    fn supported_frequencies(&self) -> &[DataFrequency] {
        &[DataFrequency::Daily]
    }
}

#[async_trait]
impl PriceDataProvider for StaticProvider {
    #[instrument(skip(self), fields(symbol = %symbol))]
    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
        frequency: DataFrequency,
    ) -> Result<DataFrame> {
        if frequency != DataFrequency::Daily {
            return Err(DataError::NotSupported(format!(
                "{frequency:?} bars from static provider"
            )));
        }

        let data = self.lookup(symbol)?;
        let bars: Vec<PriceBar> = data
            .prices
            .bars()
            .iter()
            .filter(|bar| bar.date >= start && bar.date <= end)
            .copied()
            .collect();

        debug!(rows = bars.len(), "Serving static OHLCV data");
        price_frame(&bars)
    }
}

#[async_trait]
impl FundamentalDataProvider for StaticProvider {
    async fn fetch_attributes(&self, symbol: &Symbol) -> Result<RawAttributes> {
        Ok(self.lookup(symbol)?.attributes.clone())
    }

    async fn fetch_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
        period_type: PeriodType,
    ) -> Result<DataFrame> {
        let data = self.lookup(symbol)?;
        Ok(data
            .statements
            .get(&(kind, period_type))
            .cloned()
            .unwrap_or_else(DataFrame::empty))
    }
}

#[async_trait]
impl NewsProvider for StaticProvider {
    async fn fetch_news(&self, symbol: &Symbol, limit: usize) -> Result<Vec<NewsItem>> {
        let data = self.lookup(symbol)?;
        Ok(data.news.iter().take(limit).cloned().collect())
    }
}
