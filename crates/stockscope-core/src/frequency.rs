//! Data frequency, period type, and statement kind definitions.
//!
//! This module defines [`DataFrequency`] for the granularity of price history,
//! [`PeriodType`] for fundamental reporting periods, and [`StatementKind`] for the
//! three financial statements.

use serde::{Deserialize, Serialize};

/// Frequency/granularity of price history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataFrequency {
    /// Daily bars.
    #[default]
    Daily,
    /// Weekly bars.
    Weekly,
    /// Monthly bars.
    Monthly,
}

impl DataFrequency {
    /// Returns the interval code used by chart APIs (`1d`, `1wk`, `1mo`).
    #[must_use]
    pub const fn interval(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        }
    }
}

/// Period type for fundamental financial data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodType {
    /// Annual reporting period.
    #[default]
    Annual,
    /// Quarterly reporting period.
    Quarterly,
}

/// The three financial statements reported per period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Income statement.
    Income,
    /// Balance sheet.
    BalanceSheet,
    /// Cash flow statement.
    CashFlow,
}

impl StatementKind {
    /// All statement kinds in reporting order.
    pub const ALL: [Self; 3] = [Self::Income, Self::BalanceSheet, Self::CashFlow];
}
