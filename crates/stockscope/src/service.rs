//! One entry point for analysis, reports, insights, movers, and news.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use stockscope_analysis::{
    Analyzer, Comparison, InsightGenerator, MarketMovers, default_universe, insight_prompt,
};
use serde::Serialize;
use stockscope_core::{
    AnalysisOutcome, DEFAULT_NEWS_LIMIT, DataError, GroupedMetrics, MarketDataSource, NewsItem,
    NewsProvider, Symbol, market_headlines,
};
use stockscope_report::{
    ReportDocument, ReportRequest, compose, render_pdf, report_filename, save_pdf,
};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// A rendered PDF report.
#[derive(Clone, Debug)]
pub struct RenderedReport {
    /// Attachment file name, `{TICKER}_analysis_{YYYYMMDD}.pdf`.
    pub filename: String,
    /// The composed document.
    pub document: ReportDocument,
    /// PDF bytes.
    pub bytes: Vec<u8>,
}

/// Latest headlines for one ticker.
#[derive(Clone, Debug, Serialize)]
pub struct TickerNews {
    /// Normalized ticker.
    pub ticker: Symbol,
    /// Headlines, most recent first.
    pub news: Vec<NewsItem>,
}

/// Drives analysis, reporting, insights, and movers over one data source.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use stockscope::{OpenAiInsights, Stockscope};
///
/// let service = Stockscope::yahoo()
///     .with_insights(Arc::new(OpenAiInsights::new(api_key)));
///
/// let comparison = service.compare(&["AAPL", "MSFT"]).await?;
/// ```
#[derive(Clone)]
pub struct Stockscope {
    analyzer: Analyzer,
    insights: Option<Arc<dyn InsightGenerator>>,
    universe: Vec<Symbol>,
}

impl std::fmt::Debug for Stockscope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stockscope")
            .field("source", &self.analyzer.source().name())
            .field("insights", &self.insights.as_ref().map(|_| "configured"))
            .field("universe", &self.universe.len())
            .finish()
    }
}

impl Stockscope {
    /// Creates a service over a data source, without insights.
    #[must_use]
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        debug!(provider = source.name(), "Creating service");
        Self::with_analyzer(Analyzer::new(source))
    }

    /// Creates a service around a configured analyzer.
    #[must_use]
    pub fn with_analyzer(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            insights: None,
            universe: default_universe(),
        }
    }

    /// Creates a service backed by Yahoo Finance.
    #[cfg(feature = "yahoo")]
    #[must_use]
    pub fn yahoo() -> Self {
        Self::new(Arc::new(stockscope_yahoo::YahooProvider::new()))
    }

    /// Sets the insight generator.
    #[must_use]
    pub fn with_insights(mut self, generator: Arc<dyn InsightGenerator>) -> Self {
        self.insights = Some(generator);
        self
    }

    /// Sets the tickers scanned for market movers.
    #[must_use]
    pub fn with_universe(mut self, universe: Vec<Symbol>) -> Self {
        self.universe = universe;
        self
    }

    /// Returns the analyzer.
    #[must_use]
    pub const fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Returns true if an insight generator is configured.
    #[must_use]
    pub const fn has_insights(&self) -> bool {
        self.insights.is_some()
    }

    /// Analyzes one ticker.
    ///
    /// # Errors
    ///
    /// Fails only for a blank ticker; upstream failures are reported inside
    /// the returned [`AnalysisOutcome`].
    pub async fn analyze(&self, ticker: &str) -> Result<AnalysisOutcome> {
        let symbol = Symbol::parse(ticker)?;
        Ok(self.analyzer.analyze(&symbol).await)
    }

    /// Analyzes several tickers and keeps the successful ones.
    ///
    /// # Errors
    ///
    /// Fails when fewer than two tickers are given.
    pub async fn compare<S: AsRef<str>>(&self, tickers: &[S]) -> Result<Comparison> {
        let symbols: Vec<Symbol> = tickers.iter().map(|t| Symbol::new(t.as_ref())).collect();
        Ok(self.analyzer.compare(&symbols).await?)
    }

    /// Composes and renders the report for a request.
    ///
    /// # Errors
    ///
    /// Fails when the request lacks a ticker or analysis, or rendering fails.
    pub fn report(
        &self,
        request: &ReportRequest,
        generated_at: NaiveDateTime,
    ) -> Result<RenderedReport> {
        let document = compose(request, generated_at)?;
        let bytes = render_pdf(&document)?;
        let filename = report_filename(&document.ticker, generated_at.date());
        info!(
            ticker = %document.ticker,
            filename = %filename,
            bytes = bytes.len(),
            "Generated report"
        );
        Ok(RenderedReport {
            filename,
            document,
            bytes,
        })
    }

    /// Analyzes a ticker and renders its report.
    ///
    /// # Errors
    ///
    /// Fails for a blank ticker, when the analysis does not succeed, or when
    /// the report cannot be rendered.
    pub async fn analyze_and_report(
        &self,
        ticker: &str,
        generated_at: NaiveDateTime,
    ) -> Result<RenderedReport> {
        let request = self.report_request(ticker).await?;
        self.report(&request, generated_at)
    }

    /// Analyzes a ticker and writes its report into `dir`, returning the path.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::analyze_and_report`], or when the file cannot be
    /// written.
    pub async fn analyze_and_save(
        &self,
        ticker: &str,
        generated_at: NaiveDateTime,
        dir: &Path,
    ) -> Result<PathBuf> {
        let request = self.report_request(ticker).await?;
        let document = compose(&request, generated_at)?;
        Ok(save_pdf(&document, dir)?)
    }

    async fn report_request(&self, ticker: &str) -> Result<ReportRequest> {
        let analysis = match self.analyze(ticker).await? {
            AnalysisOutcome::Success(analysis) => analysis,
            AnalysisOutcome::Failure { ticker, error } => {
                return Err(Error::Analysis {
                    ticker,
                    message: error,
                });
            }
        };
        Ok(
            ReportRequest::new(analysis.ticker.as_str(), analysis.analysis)
                .with_statements(analysis.financial_statements),
        )
    }

    /// Generates narrative insights for a ticker's metrics.
    ///
    /// # Errors
    ///
    /// Fails when the ticker or metrics are missing, when no generator is
    /// configured, or when the generator fails.
    pub async fn insights(&self, ticker: &str, metrics: &GroupedMetrics) -> Result<String> {
        let symbol = Symbol::new(ticker);
        if symbol.as_str().is_empty() || metrics.is_empty() {
            return Err(DataError::InvalidParameter(
                "Missing ticker or analysis data".to_string(),
            )
            .into());
        }
        let generator = self.insights.as_ref().ok_or(Error::InsightsUnavailable)?;
        let prompt = insight_prompt(&symbol, metrics);
        Ok(generator.generate_insights(&prompt).await?)
    }

    /// Ranks recent moves over the configured universe, ending at `end`.
    pub async fn movers(&self, end: NaiveDate) -> MarketMovers {
        MarketMovers::scan(self.analyzer.source().as_ref(), &self.universe, end).await
    }

    /// Fetches the latest headlines for a ticker.
    ///
    /// # Errors
    ///
    /// Fails for a blank ticker or when the source cannot serve news.
    pub async fn news(&self, ticker: &str) -> Result<TickerNews> {
        let symbol = Symbol::parse(ticker)?;
        let source = self.analyzer.source().as_ref();
        let news = NewsProvider::fetch_news(source, &symbol, DEFAULT_NEWS_LIMIT).await?;
        debug!(ticker = %symbol, items = news.len(), "Fetched news");
        Ok(TickerNews {
            ticker: symbol,
            news,
        })
    }

    /// Returns the market-wide headlines.
    #[must_use]
    pub fn market_news(&self) -> Vec<String> {
        market_headlines()
    }
}
