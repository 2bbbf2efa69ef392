#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockscope/stockscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for stock analysis.
//!
//! This crate provides the foundational abstractions shared by every other crate:
//!
//! - [`Value`](value::Value) and [`sanitize`](value::sanitize) - Metric values safe to serialize
//! - [`GroupedMetrics`](record::GroupedMetrics), [`StatementTable`](record::StatementTable),
//!   [`HistoricalData`](record::HistoricalData) - Normalized analysis records
//! - [`PriceDataProvider`](provider::PriceDataProvider) - OHLCV price data
//! - [`FundamentalDataProvider`](provider::FundamentalDataProvider) - Raw attributes and statements
//! - [`StaticProvider`](memory::StaticProvider) - Preloaded in-memory provider

/// Error types for data operations.
pub mod error;
/// Data frequency, period type, and statement kind definitions.
pub mod frequency;
/// In-memory provider serving preloaded data.
pub mod memory;

/// Headlines.
pub mod news;
/// Provider traits for fetching market data.
pub mod provider;
/// Normalized analysis records.
pub mod record;
/// Core data types (Symbol, PriceBar, PriceSeries).
pub mod types;
/// Metric values and the sanitizer.
pub mod value;

// Re-export commonly used items at crate root
pub use error::{DataError, Result};
pub use frequency::{DataFrequency, PeriodType, StatementKind};
pub use memory::{StaticProvider, price_frame};
pub use news::{
    DEFAULT_NEWS_LIMIT, MARKET_HEADLINES, NewsItem, market_headlines, published_label,
};
pub use provider::{
    DataProvider, FundamentalDataProvider, MarketDataSource, NewsProvider, PriceDataProvider,
    RawAttributes,
};
pub use record::{
    Analysis, AnalysisEnvelope, AnalysisOutcome, CrossKind, CrossSignal, FinancialStatements,
    GroupedMetrics, HistoricalData, LineItem, MetricGroup, StatementTable,
};
pub use types::{PriceBar, PriceSeries, Symbol, date_from_epoch_days};
pub use value::{Value, sanitize, sanitize_f64};
