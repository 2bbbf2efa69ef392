#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockscope/stockscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Yahoo Finance market data source.
//!
//! [`YahooProvider`] implements [`PriceDataProvider`] over the chart endpoint
//! and [`FundamentalDataProvider`] over the quote summary endpoint, and
//! [`NewsProvider`] over the news stream, which makes it a complete
//! [`MarketDataSource`](stockscope_core::MarketDataSource).
//!
//! - Daily, weekly, and monthly closes with volumes
//! - Raw attributes merged from the profile, price, and statistics modules
//! - Annual and quarterly statements from the history modules
//! - Latest headlines per ticker
//! - Requests spaced at least one second apart by default
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use stockscope_core::{DataFrequency, FundamentalDataProvider, PriceDataProvider, Symbol};
//! use stockscope_yahoo::YahooProvider;
//!
//! # async fn example() -> stockscope_core::Result<()> {
//! let provider = YahooProvider::new();
//! let symbol = Symbol::new("AAPL");
//!
//! let attributes = provider.fetch_attributes(&symbol).await?;
//! println!("{:?}", attributes.get("longName"));
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
//! let df = provider.fetch_ohlcv(&symbol, start, end, DataFrequency::Daily).await?;
//! println!("{} closes", df.height());
//! # Ok(())
//! # }
//! ```

mod chart;
mod news;
mod summary;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use stockscope_core::{
    DataError, DataFrequency, DataProvider, FundamentalDataProvider, NewsItem, NewsProvider,
    PeriodType, PriceDataProvider, RawAttributes, Result, StatementKind, Symbol, Value,
};
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace, warn};

use crate::chart::ChartPayload;
use crate::news::{NewsPayload, NewsQuery};
use crate::summary::SummaryPayload;

const PROVIDER_NAME: &str = "Yahoo Finance";

/// Minimum spacing between two requests.
pub const DEFAULT_REQUEST_SPACING: Duration = Duration::from_secs(1);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry hint reported with HTTP 429.
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(60);

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Error object embedded in chart and quote summary payloads.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    description: String,
}

impl ApiError {
    fn into_data_error(self, symbol: &Symbol) -> DataError {
        if self.code == "Not Found" {
            DataError::SymbolNotFound(symbol.to_string())
        } else {
            DataError::Other(format!("{}: {}", self.code, self.description))
        }
    }
}

/// Yahoo Finance market data source.
#[derive(Debug)]
pub struct YahooProvider {
    client: reqwest::Client,
    spacing: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl YahooProvider {
    /// Creates a provider with the default request spacing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_spacing(DEFAULT_REQUEST_SPACING)
    }

    /// Creates a provider that waits at least `spacing` between requests.
    #[must_use]
    pub fn with_request_spacing(spacing: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });
        Self::with_client(client).spacing(spacing)
    }

    /// Creates a provider around an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            spacing: DEFAULT_REQUEST_SPACING,
            next_slot: Mutex::new(None),
        }
    }

    /// Sets the minimum spacing between requests.
    #[must_use]
    pub const fn spacing(mut self, spacing: Duration) -> Self {
        self.spacing = spacing;
        self
    }

    /// Waits for the next request slot and reserves the one after it.
    async fn pace(&self) {
        let mut next_slot = self.next_slot.lock().await;
        if let Some(slot) = (*next_slot).filter(|slot| *slot > Instant::now()) {
            trace!(wait_ms = (slot - Instant::now()).as_millis(), "Pacing request");
            sleep_until(slot).await;
        }
        *next_slot = Some(Instant::now() + self.spacing);
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, symbol: &Symbol) -> Result<T> {
        debug!(url, "GET");
        self.send_json(self.client.get(url), symbol).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        symbol: &Symbol,
    ) -> Result<T> {
        self.pace().await;

        let response = request
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(DataError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                retry_after: Some(RATE_LIMIT_BACKOFF),
            }),
            StatusCode::NOT_FOUND => Err(DataError::SymbolNotFound(symbol.to_string())),
            status if !status.is_success() => {
                Err(DataError::Network(format!("HTTP {status} for {symbol}")))
            }
            _ => response
                .json::<T>()
                .await
                .map_err(|e| DataError::Parse(e.to_string())),
        }
    }

    async fn quote_summary(&self, symbol: &Symbol, modules: &[&str]) -> Result<Value> {
        let url = summary::summary_url(symbol, modules);
        self.get_json::<SummaryPayload>(&url, symbol)
            .await?
            .into_result(symbol)
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "Prices, key statistics, and financial statements from Yahoo Finance"
    }

    fn supported_frequencies(&self) -> &[DataFrequency] {
        &[
            DataFrequency::Daily,
            DataFrequency::Weekly,
            DataFrequency::Monthly,
        ]
    }
}

#[async_trait]
impl PriceDataProvider for YahooProvider {
    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
        frequency: DataFrequency,
    ) -> Result<DataFrame> {
        if start > end {
            return Err(DataError::InvalidParameter(format!(
                "Start date {start} is after end date {end}"
            )));
        }
        let url = chart::chart_url(symbol, start, end, frequency);
        self.get_json::<ChartPayload>(&url, symbol)
            .await?
            .into_frame(symbol, start, end)
    }
}

#[async_trait]
impl FundamentalDataProvider for YahooProvider {
    async fn fetch_attributes(&self, symbol: &Symbol) -> Result<RawAttributes> {
        let result = self
            .quote_summary(symbol, &summary::ATTRIBUTE_MODULES)
            .await?;
        let attributes = summary::flatten_attributes(&result);
        debug!(symbol = %symbol, fields = attributes.len(), "Fetched attributes");
        Ok(attributes)
    }

    async fn fetch_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
        period_type: PeriodType,
    ) -> Result<DataFrame> {
        let (module, _) = summary::statement_module(kind, period_type);
        let result = self.quote_summary(symbol, &[module]).await?;
        summary::statement_frame(&result, kind, period_type)
    }
}

#[async_trait]
impl NewsProvider for YahooProvider {
    async fn fetch_news(&self, symbol: &Symbol, limit: usize) -> Result<Vec<NewsItem>> {
        debug!(url = news::NEWS_URL, symbol = %symbol, "POST");
        let request = self
            .client
            .post(news::NEWS_URL)
            .json(&NewsQuery::new(symbol, limit));
        let items = self
            .send_json::<NewsPayload>(request, symbol)
            .await?
            .into_items(limit);
        debug!(symbol = %symbol, items = items.len(), "Fetched news");
        Ok(items)
    }
}
