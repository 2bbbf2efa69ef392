//! The eight-criterion pass/fail scorecard.

use serde::Serialize;
use stockscope_core::{GroupedMetrics, MetricGroup, Value};

use crate::document::{Table, TableStyle};
use crate::format;

/// Header row of the scorecard table.
pub const HEADER: [&str; 4] = ["Metric", "Value", "Preference", "Status"];

/// Column widths of the scorecard table, in inches.
pub const COLUMN_WIDTHS: [f32; 4] = [1.8, 1.5, 1.5, 1.0];

/// How a criterion decides pass or fail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Threshold {
    /// Passes when the metric is non-zero and strictly below the bound.
    Below(f64),
    /// Passes when the metric is non-zero and strictly above the bound.
    Above(f64),
    /// Always passes.
    Always,
}

impl Threshold {
    /// Applies the rule to a metric value. Zero, absent and non-numeric values
    /// fail every bounded rule.
    #[must_use]
    pub fn passes(self, value: &Value) -> bool {
        match self {
            Self::Always => true,
            Self::Below(bound) => format::truthy(value).is_some_and(|v| v < bound),
            Self::Above(bound) => format::truthy(value).is_some_and(|v| v > bound),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Source {
    Valuation,
    Profitability,
    Health,
    Growth,
    Market,
}

impl Source {
    const fn group(self, metrics: &GroupedMetrics) -> &MetricGroup {
        match self {
            Self::Valuation => &metrics.valuation_ratios,
            Self::Profitability => &metrics.profitability_ratios,
            Self::Health => &metrics.financial_health,
            Self::Growth => &metrics.growth_metrics,
            Self::Market => &metrics.market_data,
        }
    }
}

struct Criterion {
    metric: &'static str,
    source: Source,
    field: &'static str,
    display: fn(&Value) -> String,
    preference: &'static str,
    threshold: Threshold,
}

// "Shares Outstanding" reads average volume and always passes.
const CRITERIA: [Criterion; 8] = [
    Criterion {
        metric: "5Y P/E Ratio",
        source: Source::Valuation,
        field: "pe_ratio",
        display: format::ratio,
        preference: "Below 22.5",
        threshold: Threshold::Below(22.5),
    },
    Criterion {
        metric: "5Y Price/FCF",
        source: Source::Valuation,
        field: "forward_pe",
        display: format::ratio,
        preference: "Below 22.5",
        threshold: Threshold::Below(22.5),
    },
    Criterion {
        metric: "5Y ROIC",
        source: Source::Profitability,
        field: "roic",
        display: format::percent,
        preference: "Above 9%",
        threshold: Threshold::Above(0.09),
    },
    Criterion {
        metric: "Debt Ratio",
        source: Source::Health,
        field: "debt_to_equity",
        display: format::ratio,
        preference: "Below 5",
        threshold: Threshold::Below(5.0),
    },
    Criterion {
        metric: "FCF Growth",
        source: Source::Health,
        field: "free_cash_flow",
        display: format::billions,
        preference: "Above 9%",
        threshold: Threshold::Above(0.0),
    },
    Criterion {
        metric: "Earnings Growth",
        source: Source::Growth,
        field: "earnings_growth",
        display: format::percent,
        preference: "Above 12%",
        threshold: Threshold::Above(0.12),
    },
    Criterion {
        metric: "Revenue Growth",
        source: Source::Growth,
        field: "revenue_growth",
        display: format::percent,
        preference: "Above 4%",
        threshold: Threshold::Above(0.04),
    },
    Criterion {
        metric: "Shares Outstanding",
        source: Source::Market,
        field: "avg_volume",
        display: format::millions,
        preference: "Decline",
        threshold: Threshold::Always,
    },
];

/// One evaluated criterion.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScorecardRow {
    /// Row label.
    pub metric: &'static str,
    /// Formatted metric value.
    pub value: String,
    /// What a strong reading looks like.
    pub preference: &'static str,
    /// Whether the criterion passed.
    pub pass: bool,
}

impl ScorecardRow {
    /// Status cell text.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        if self.pass { "PASS" } else { "FAIL" }
    }
}

/// The evaluated scorecard.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scorecard {
    rows: Vec<ScorecardRow>,
}

impl Scorecard {
    /// Evaluates every criterion against the metrics.
    #[must_use]
    pub fn evaluate(metrics: &GroupedMetrics) -> Self {
        let rows = CRITERIA
            .iter()
            .map(|criterion| {
                let value = criterion.source.group(metrics).get(criterion.field);
                ScorecardRow {
                    metric: criterion.metric,
                    value: (criterion.display)(value),
                    preference: criterion.preference,
                    pass: criterion.threshold.passes(value),
                }
            })
            .collect();
        Self { rows }
    }

    /// Rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[ScorecardRow] {
        &self.rows
    }

    /// Looks up a row by its label.
    #[must_use]
    pub fn row(&self, metric: &str) -> Option<&ScorecardRow> {
        self.rows.iter().find(|row| row.metric == metric)
    }

    /// Number of passing rows.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.rows.iter().filter(|row| row.pass).count()
    }

    /// Converts the scorecard into a report table.
    #[must_use]
    pub fn to_table(&self) -> Table {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                vec![
                    row.metric.to_string(),
                    row.value.clone(),
                    row.preference.to_string(),
                    row.status().to_string(),
                ]
            })
            .collect();
        Table::with_header(TableStyle::Scorecard, COLUMN_WIDTHS.to_vec(), &HEADER, rows)
    }
}
