//! Analysis assembly: fetch, normalize, detect, and bundle per ticker.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use stockscope_core::{
    Analysis, AnalysisEnvelope, AnalysisOutcome, DataError, DataFrequency, MarketDataSource,
    PeriodType, PriceSeries, Result, StatementKind, Symbol,
};
use tracing::{debug, instrument, warn};

use crate::crossover::CrossoverDetector;
use crate::extract::extract;
use crate::statements::normalize_statements;

/// Calendar days of price history fetched per analysis (two years).
pub const DEFAULT_HISTORY_DAYS: i64 = 730;

/// Result of comparing several tickers. Only successful analyses are kept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Always true once validation passed.
    pub success: bool,
    /// One envelope per successfully analyzed ticker, in request order.
    pub data: Vec<AnalysisEnvelope>,
}

/// Assembles analyses from a market data source.
///
/// Every fetch is awaited in turn; a failure for one ticker is reported in its
/// [`AnalysisOutcome`] and never affects other tickers.
#[derive(Clone, Debug)]
pub struct Analyzer {
    source: Arc<dyn MarketDataSource>,
    detector: CrossoverDetector,
    history_days: i64,
    as_of: Option<NaiveDate>,
}

impl Analyzer {
    /// Creates an analyzer over a data source with the default detector.
    #[must_use]
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            detector: CrossoverDetector::default(),
            history_days: DEFAULT_HISTORY_DAYS,
            as_of: None,
        }
    }

    /// Sets the crossover detector.
    #[must_use]
    pub const fn with_detector(mut self, detector: CrossoverDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Sets how many calendar days of price history to fetch.
    #[must_use]
    pub const fn with_history_days(mut self, days: i64) -> Self {
        self.history_days = days;
        self
    }

    /// Pins the end of the price history instead of using today's date.
    #[must_use]
    pub const fn with_as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    /// Returns the underlying data source.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn MarketDataSource> {
        &self.source
    }

    /// Returns the crossover detector.
    #[must_use]
    pub const fn detector(&self) -> &CrossoverDetector {
        &self.detector
    }

    fn end_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }

    async fn try_analyze(&self, symbol: &Symbol) -> Result<Analysis> {
        let attributes = self.source.fetch_attributes(symbol).await?;
        let analysis = extract(&attributes);

        let mut frames = Vec::with_capacity(6);
        for period_type in [PeriodType::Annual, PeriodType::Quarterly] {
            for kind in StatementKind::ALL {
                let frame = self
                    .source
                    .fetch_statement(symbol, kind, period_type)
                    .await?;
                frames.push((kind, period_type, frame));
            }
        }
        let financial_statements = normalize_statements(
            frames
                .iter()
                .map(|(kind, period_type, frame)| (*kind, *period_type, Some(frame))),
        )?;

        let end = self.end_date();
        let start = end - Duration::days(self.history_days);
        let ohlcv = self
            .source
            .fetch_ohlcv(symbol, start, end, DataFrequency::Daily)
            .await?;
        let series = PriceSeries::from_ohlcv(&ohlcv)?;
        let historical_data = self.detector.historical_data(symbol, &series);

        Ok(Analysis {
            ticker: symbol.clone(),
            analysis,
            financial_statements,
            historical_data,
        })
    }

    /// Analyzes one ticker.
    ///
    /// Never fails: any error becomes [`AnalysisOutcome::Failure`] carrying the
    /// error message.
    #[instrument(skip_all, fields(ticker = %symbol, provider = self.source.name()))]
    pub async fn analyze(&self, symbol: &Symbol) -> AnalysisOutcome {
        match self.try_analyze(symbol).await {
            Ok(analysis) => {
                debug!(
                    signals = analysis.historical_data.cross_signals.len(),
                    "Analysis complete"
                );
                AnalysisOutcome::Success(Box::new(analysis))
            }
            Err(err) => {
                warn!(error = %err, "Analysis failed");
                AnalysisOutcome::Failure {
                    ticker: symbol.clone(),
                    error: err.to_string(),
                }
            }
        }
    }

    /// Analyzes several tickers in order and keeps the successful ones.
    ///
    /// Fails only when fewer than two tickers are given.
    pub async fn compare(&self, tickers: &[Symbol]) -> Result<Comparison> {
        if tickers.len() < 2 {
            return Err(DataError::InvalidParameter(
                "Please provide at least 2 tickers to compare".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            match self.analyze(ticker).await {
                AnalysisOutcome::Success(analysis) => data.push((*analysis).into()),
                AnalysisOutcome::Failure { ticker, error } => {
                    warn!(ticker = %ticker, error = %error, "Dropping ticker from comparison");
                }
            }
        }

        Ok(Comparison {
            success: true,
            data,
        })
    }
}
