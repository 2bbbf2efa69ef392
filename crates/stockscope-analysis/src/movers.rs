//! Top gainers and losers over a fixed sample universe.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use stockscope_core::{DataFrequency, MarketDataSource, PriceSeries, Result, Symbol};
use tracing::{debug, warn};

/// Tickers scanned when no universe is given.
pub const DEFAULT_UNIVERSE: [&str; 18] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "AMD", "NFLX", "DIS", "BA", "GE",
    "GM", "F", "INTC", "CSCO", "ORCL", "IBM",
];

/// Calendar days of bars fetched per ticker.
pub const LOOKBACK_DAYS: i64 = 7;

/// Number of entries kept on each side.
pub const TOP_N: usize = 10;

/// Day-over-day move of one ticker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    /// Ticker.
    pub symbol: Symbol,
    /// Company name, or the ticker when unknown.
    pub name: String,
    /// Last close.
    pub price: f64,
    /// Last close minus the previous close.
    pub change: f64,
    /// Change relative to the previous close, in percent.
    pub change_percent: f64,
    /// Closes over the lookback window.
    pub sparkline: Vec<f64>,
}

impl Mover {
    /// Computes the move from a price series. Needs at least two samples and a
    /// non-zero previous close.
    #[must_use]
    pub fn from_series(symbol: Symbol, name: String, series: &PriceSeries) -> Option<Self> {
        let closes = series.closes();
        let (previous, last) = match closes.as_slice() {
            [.., previous, last] if *previous != 0.0 => (*previous, *last),
            _ => return None,
        };
        let change = last - previous;
        Some(Self {
            symbol,
            name,
            price: last,
            change,
            change_percent: change / previous * 100.0,
            sparkline: closes,
        })
    }
}

/// Top gainers and losers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketMovers {
    /// Largest percent gains first.
    pub gainers: Vec<Mover>,
    /// Largest percent losses first.
    pub losers: Vec<Mover>,
}

impl MarketMovers {
    /// Ranks already computed moves.
    #[must_use]
    pub fn rank(mut movers: Vec<Mover>) -> Self {
        movers.sort_by(|a, b| b.change_percent.total_cmp(&a.change_percent));
        let gainers = movers.iter().take(TOP_N).cloned().collect();
        let losers = movers.iter().rev().take(TOP_N).cloned().collect();
        Self { gainers, losers }
    }

    /// Fetches recent bars for each ticker in turn and ranks the moves.
    ///
    /// Tickers whose attributes or bars fail to load, or that have fewer than
    /// two bars, are skipped.
    pub async fn scan(source: &dyn MarketDataSource, tickers: &[Symbol], end: NaiveDate) -> Self {
        let start = end - Duration::days(LOOKBACK_DAYS);
        let mut movers = Vec::with_capacity(tickers.len());

        for symbol in tickers {
            match Self::load(source, symbol, start, end).await {
                Ok(Some(mover)) => movers.push(mover),
                Ok(None) => debug!(ticker = %symbol, "Not enough bars for a move"),
                Err(err) => warn!(ticker = %symbol, error = %err, "Skipping ticker"),
            }
        }

        Self::rank(movers)
    }

    async fn load(
        source: &dyn MarketDataSource,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Mover>> {
        let attributes = source.fetch_attributes(symbol).await?;
        let name = attributes
            .get("longName")
            .and_then(|v| v.as_str())
            .map_or_else(|| symbol.to_string(), str::to_string);

        let ohlcv = source
            .fetch_ohlcv(symbol, start, end, DataFrequency::Daily)
            .await?;
        let series = PriceSeries::from_ohlcv(&ohlcv)?;
        Ok(Mover::from_series(symbol.clone(), name, &series))
    }
}

/// Returns the default sample universe as symbols.
#[must_use]
pub fn default_universe() -> Vec<Symbol> {
    DEFAULT_UNIVERSE.iter().map(|&t| Symbol::new(t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use async_trait::async_trait;
    use polars::prelude::DataFrame;
    use stockscope_core::{
        DataError, DataProvider, FundamentalDataProvider, NewsProvider, PeriodType, PriceBar,
        PriceDataProvider, RawAttributes, StaticProvider, StatementKind,
    };

    /// Serves prices but fails every attribute lookup.
    #[derive(Debug)]
    struct NoAttributes(StaticProvider);

    impl DataProvider for NoAttributes {
        fn name(&self) -> &str {
            "No attributes"
        }

        fn description(&self) -> &str {
            "Prices without attributes"
        }

        fn supported_frequencies(&self) -> &[DataFrequency] {
            self.0.supported_frequencies()
        }
    }

    #[async_trait]
    impl PriceDataProvider for NoAttributes {
        async fn fetch_ohlcv(
            &self,
            symbol: &Symbol,
            start: NaiveDate,
            end: NaiveDate,
            frequency: DataFrequency,
        ) -> Result<DataFrame> {
            self.0.fetch_ohlcv(symbol, start, end, frequency).await
        }
    }

    #[async_trait]
    impl FundamentalDataProvider for NoAttributes {
        async fn fetch_attributes(&self, _symbol: &Symbol) -> Result<RawAttributes> {
            Err(DataError::Network("connection reset".to_string()))
        }

        async fn fetch_statement(
            &self,
            symbol: &Symbol,
            kind: StatementKind,
            period_type: PeriodType,
        ) -> Result<DataFrame> {
            self.0.fetch_statement(symbol, kind, period_type).await
        }
    }

    impl NewsProvider for NoAttributes {}

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn mover(symbol: &str, change_percent: f64) -> Mover {
        Mover {
            symbol: Symbol::new(symbol),
            name: symbol.to_string(),
            price: 100.0,
            change: change_percent,
            change_percent,
            sparkline: vec![],
        }
    }

    #[test]
    fn test_from_series() {
        let series = PriceSeries::new(vec![
            PriceBar::new(day(3), 100.0, 1),
            PriceBar::new(day(4), 110.0, 1),
            PriceBar::new(day(5), 99.0, 1),
        ]);

        let m = Mover::from_series(Symbol::new("AAPL"), "Apple".to_string(), &series).unwrap();
        assert_relative_eq!(m.price, 99.0);
        assert_relative_eq!(m.change, -11.0);
        assert_relative_eq!(m.change_percent, -10.0, epsilon = 1e-9);
        assert_eq!(m.sparkline.len(), 3);

        let single = PriceSeries::new(vec![PriceBar::new(day(3), 100.0, 1)]);
        assert!(Mover::from_series(Symbol::new("AAPL"), String::new(), &single).is_none());
    }

    #[test]
    fn test_rank() {
        let movers: Vec<Mover> = (0..25)
            .map(|i| mover(&format!("T{i}"), f64::from(i) - 12.0))
            .collect();

        let ranked = MarketMovers::rank(movers);

        assert_eq!(ranked.gainers.len(), 10);
        assert_eq!(ranked.losers.len(), 10);
        assert_eq!(ranked.gainers[0].symbol.as_str(), "T24");
        assert_eq!(ranked.losers[0].symbol.as_str(), "T0");
        assert!(ranked.losers[0].change_percent < ranked.losers[1].change_percent);
    }

    #[tokio::test]
    async fn test_scan_skips_failures() {
        let provider = StaticProvider::new()
            .with_attribute("AAPL", "longName", "Apple Inc.")
            .with_prices(
                "AAPL",
                vec![PriceBar::new(day(6), 200.0, 1), PriceBar::new(day(7), 210.0, 1)],
            )
            .with_prices("MSFT", vec![PriceBar::new(day(7), 400.0, 1)]);

        let tickers = [Symbol::new("AAPL"), Symbol::new("MSFT"), Symbol::new("BAD")];
        let movers = MarketMovers::scan(&provider, &tickers, day(7)).await;

        assert_eq!(movers.gainers.len(), 1);
        assert_eq!(movers.gainers[0].name, "Apple Inc.");
        assert_relative_eq!(movers.gainers[0].change_percent, 5.0, epsilon = 1e-9);
        assert_eq!(movers.losers.len(), 1);
    }

    #[tokio::test]
    async fn test_scan_skips_tickers_without_attributes() {
        let provider = NoAttributes(StaticProvider::new().with_prices(
            "AAPL",
            vec![PriceBar::new(day(6), 200.0, 1), PriceBar::new(day(7), 210.0, 1)],
        ));

        let movers = MarketMovers::scan(&provider, &[Symbol::new("AAPL")], day(7)).await;

        assert!(movers.gainers.is_empty());
        assert!(movers.losers.is_empty());
    }

    #[test]
    fn test_default_universe() {
        let universe = default_universe();
        assert_eq!(universe.len(), 18);
        assert_eq!(universe[0].as_str(), "AAPL");
    }
}
