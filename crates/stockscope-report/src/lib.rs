#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockscope/stockscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Report composition and rendering.
//!
//! - [`compose`](compose::compose) - Analysis record → ordered sections
//! - [`Scorecard`](scorecard::Scorecard) - Eight fixed pass/fail criteria
//! - [`render_pdf`](render::render_pdf) - Sections → letter-size PDF

/// Section composition.
pub mod compose;
/// The section model.
pub mod document;
/// Error types.
pub mod error;
/// Cell formatting.
pub mod format;
/// PDF layout and painting.
pub mod render;
/// The pass/fail scorecard.
pub mod scorecard;

pub use compose::{ReportRequest, compose};
pub use document::{ReportDocument, Section, Table, TableStyle};
pub use error::{ReportError, Result};
pub use render::{layout, render_pdf, report_filename, save_pdf};
pub use scorecard::{Scorecard, ScorecardRow, Threshold};
