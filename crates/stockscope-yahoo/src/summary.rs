//! Quote summary payload handling.
//!
//! The quote summary endpoint returns one object per requested module. Numeric
//! fields are wrapped as `{"raw": 1.5, "fmt": "1.50"}`, unavailable fields as
//! `{}`. This module flattens the profile/price/statistics modules into a
//! [`RawAttributes`] map and turns the statement history modules into frames.

use polars::prelude::{Column, DataFrame, DataType};
use serde::Deserialize;
use stockscope_core::{
    DataError, PeriodType, RawAttributes, Result, StatementKind, Symbol, Value,
};

use crate::ApiError;

/// Quote summary endpoint base URL.
pub(crate) const SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

/// Modules merged into the raw attribute map, in precedence order.
pub(crate) const ATTRIBUTE_MODULES: [&str; 5] = [
    "financialData",
    "summaryDetail",
    "defaultKeyStatistics",
    "price",
    "assetProfile",
];

/// Keys that describe the payload rather than the security.
const SKIPPED_KEYS: [&str; 2] = ["maxAge", "endDate"];

const SECONDS_PER_DAY: i64 = 86_400;

/// Builds the quote summary URL for a set of modules.
pub(crate) fn summary_url(symbol: &Symbol, modules: &[&str]) -> String {
    format!("{SUMMARY_URL}/{symbol}?modules={}", modules.join(","))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummaryPayload {
    quote_summary: SummaryBody,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    #[serde(default)]
    result: Option<Vec<Value>>,
    #[serde(default)]
    error: Option<ApiError>,
}

impl SummaryPayload {
    /// Returns the single result object holding the requested modules.
    pub(crate) fn into_result(self, symbol: &Symbol) -> Result<Value> {
        if let Some(error) = self.quote_summary.error {
            return Err(error.into_data_error(symbol));
        }
        self.quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }
}

/// Returns the quote summary module and list key holding a statement history.
pub(crate) const fn statement_module(
    kind: StatementKind,
    period_type: PeriodType,
) -> (&'static str, &'static str) {
    match (kind, period_type) {
        (StatementKind::Income, PeriodType::Annual) => {
            ("incomeStatementHistory", "incomeStatementHistory")
        }
        (StatementKind::Income, PeriodType::Quarterly) => {
            ("incomeStatementHistoryQuarterly", "incomeStatementHistory")
        }
        (StatementKind::BalanceSheet, PeriodType::Annual) => {
            ("balanceSheetHistory", "balanceSheetStatements")
        }
        (StatementKind::BalanceSheet, PeriodType::Quarterly) => {
            ("balanceSheetHistoryQuarterly", "balanceSheetStatements")
        }
        (StatementKind::CashFlow, PeriodType::Annual) => {
            ("cashflowStatementHistory", "cashflowStatements")
        }
        (StatementKind::CashFlow, PeriodType::Quarterly) => {
            ("cashflowStatementHistoryQuarterly", "cashflowStatements")
        }
    }
}

/// Unwraps a `{raw, fmt}` field. Returns `None` for fields with no value.
fn unwrap_field(value: &Value) -> Option<Value> {
    match value {
        Value::Absent | Value::List(_) => None,
        Value::Map(_) => value.get("raw").filter(|raw| !raw.is_absent()).cloned(),
        other => Some(other.clone()),
    }
}

/// Merges the attribute modules of one quote summary result.
///
/// The first module that carries a key wins.
pub(crate) fn flatten_attributes(result: &Value) -> RawAttributes {
    let mut attributes = RawAttributes::new();

    for module in ATTRIBUTE_MODULES {
        let Some(Value::Map(fields)) = result.get(module) else {
            continue;
        };
        for (key, field) in fields {
            if SKIPPED_KEYS.contains(&key.as_str()) || attributes.contains_key(key) {
                continue;
            }
            if let Some(value) = unwrap_field(field) {
                attributes.insert(key.clone(), value);
            }
        }
    }

    attributes
}

/// Converts a camelCase field name into a line item label
/// (`totalRevenue` → `Total Revenue`).
pub(crate) fn line_item_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else {
            if c.is_uppercase() {
                label.push(' ');
            }
            label.push(c);
        }
    }
    label
}

/// Builds a statement frame from a quote summary result.
///
/// The frame has a `period` date column followed by one `Float64` column per
/// line item, in first-seen order. Rows follow the payload order (most recent
/// first). A missing module yields an empty frame.
pub(crate) fn statement_frame(
    result: &Value,
    kind: StatementKind,
    period_type: PeriodType,
) -> Result<DataFrame> {
    let (module, list_key) = statement_module(kind, period_type);
    let Some(Value::List(entries)) = result.get(module).and_then(|m| m.get(list_key)) else {
        return Ok(DataFrame::empty());
    };

    let mut periods: Vec<i32> = Vec::with_capacity(entries.len());
    let mut keys: Vec<&str> = Vec::new();
    for entry in entries {
        let end_date = entry
            .get("endDate")
            .and_then(unwrap_field)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| DataError::Parse(format!("{module} entry without endDate")))?;
        let days = (end_date as i64).div_euclid(SECONDS_PER_DAY);
        periods.push(
            i32::try_from(days)
                .map_err(|_| DataError::Parse(format!("Period out of range: {end_date}")))?,
        );

        if let Value::Map(fields) = entry {
            for (key, _) in fields {
                if !SKIPPED_KEYS.contains(&key.as_str()) && !keys.contains(&key.as_str()) {
                    keys.push(key);
                }
            }
        }
    }

    let mut columns = Vec::with_capacity(keys.len() + 1);
    columns.push(Column::new("period".into(), periods).cast(&DataType::Date)?);
    for key in keys {
        let values: Vec<Option<f64>> = entries
            .iter()
            .map(|entry| {
                entry
                    .get(key)
                    .and_then(unwrap_field)
                    .and_then(|v| v.as_f64())
            })
            .collect();
        columns.push(Column::new(line_item_label(key).into(), values));
    }

    Ok(DataFrame::new(columns)?)
}
