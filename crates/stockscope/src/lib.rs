#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockscope/stockscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Stock analysis over any market data source.
//!
//! This crate re-exports the core types, the analysis and report layers, and
//! the provider implementations, and provides [`Stockscope`] to drive them
//! from one place.
//!
//! # Features
//!
//! - `yahoo` - Yahoo Finance provider for prices, attributes, statements, and news

// Core types and traits
pub use stockscope_core::*;

// Analysis
pub use stockscope_analysis::{
    Analyzer, Comparison, CrossoverDetector, InsightGenerator, MarketMovers, Mover,
    OpenAiInsights, default_universe, insight_prompt,
};

// Reports
pub use stockscope_report::{
    ReportDocument, ReportError, ReportRequest, Scorecard, Section, compose, render_pdf,
    report_filename, save_pdf,
};

// Providers
#[cfg(feature = "yahoo")]
pub use stockscope_yahoo::YahooProvider;

mod error;
pub use error::{Error, Result};

mod service;
pub use service::{RenderedReport, Stockscope, TickerNews};
