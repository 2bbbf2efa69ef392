#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockscope/stockscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Turns provider data into an analysis record.
//!
//! - [`extract`](extract::extract) - Raw attributes → eight-group metrics
//! - [`normalize_statement`](statements::normalize_statement) - Statement frames → line item tables
//! - [`CrossoverDetector`](crossover::CrossoverDetector) - 50/200 moving average crossovers
//! - [`Analyzer`](analyzer::Analyzer) - Per-ticker assembly and multi-ticker comparison
//! - [`MarketMovers`](movers::MarketMovers) - Top gainers and losers
//! - [`InsightGenerator`](insights::InsightGenerator) - Narrative insights from a language model

/// Analysis assembly and comparison.
pub mod analyzer;
/// Moving average crossover detection.
pub mod crossover;
/// Ratio extraction into the grouped metrics schema.
pub mod extract;
/// Language model insights.
pub mod insights;
/// Top gainers and losers.
pub mod movers;
/// Statement normalization.
pub mod statements;

pub use analyzer::{Analyzer, Comparison};
pub use crossover::{CrossoverDetector, simple_moving_average};
pub use extract::{FieldKind, FieldSpec, extract};
pub use insights::{InsightGenerator, OpenAiInsights, insight_prompt};
pub use movers::{MarketMovers, Mover, default_universe};
pub use statements::{normalize_statement, normalize_statements};
