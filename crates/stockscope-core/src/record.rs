//! Normalized analysis records.
//!
//! These are the structures produced by one analysis request:
//!
//! - [`GroupedMetrics`] - eight named groups of [`MetricGroup`] fields
//! - [`StatementTable`] / [`FinancialStatements`] - line item → period → value
//! - [`HistoricalData`] - the one-year display window with moving averages and
//!   [`CrossSignal`]s
//! - [`Analysis`] / [`AnalysisOutcome`] - the assembled result and its
//!   success/failure envelope

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::{Deserialize, Serialize as DeriveSerialize};

use crate::frequency::{PeriodType, StatementKind};
use crate::types::Symbol;
use crate::value::Value;

static ABSENT: Value = Value::Absent;

/// An ordered mapping from field name to [`Value`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct MetricGroup {
    fields: Vec<(String, Value)>,
}

impl MetricGroup {
    /// Creates an empty group.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Sets a field, replacing an existing value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Sets a field and returns the group.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    /// Returns the field value, or the absent marker if the field is unknown.
    #[must_use]
    pub fn get(&self, name: &str) -> &Value {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map_or(&ABSENT, |(_, v)| v)
    }

    /// Returns the field as a finite number.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).as_f64()
    }

    /// Returns the field as text.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).as_str()
    }

    /// Iterates over the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the group has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Value> for MetricGroup {
    fn from(value: Value) -> Self {
        match value {
            Value::Map(fields) => Self { fields },
            _ => Self::default(),
        }
    }
}

impl Serialize for MetricGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// The fixed eight-group metrics record for one security.
#[derive(Clone, Debug, Default, PartialEq, DeriveSerialize, Deserialize)]
#[serde(default)]
pub struct GroupedMetrics {
    /// Name, sector, industry, country, website, description, employees.
    pub company_info: MetricGroup,
    /// Price, market cap, enterprise value, 52-week range, beta, volume.
    pub market_data: MetricGroup,
    /// Price multiples.
    pub valuation_ratios: MetricGroup,
    /// Margins and returns.
    pub profitability_ratios: MetricGroup,
    /// Liquidity, leverage, and cash flow.
    pub financial_health: MetricGroup,
    /// Growth rates and per-share figures.
    pub growth_metrics: MetricGroup,
    /// Dividend rate, yield, payout, ex-dividend date.
    pub dividend_info: MetricGroup,
    /// Price targets and consensus recommendation.
    pub analyst_recommendations: MetricGroup,
}

impl GroupedMetrics {
    /// Returns true if every group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.company_info,
            &self.market_data,
            &self.valuation_ratios,
            &self.profitability_ratios,
            &self.financial_health,
            &self.growth_metrics,
            &self.dividend_info,
            &self.analyst_recommendations,
        ]
        .iter()
        .all(|group| group.is_empty())
    }
}

/// One statement line item and its values by period label.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineItem {
    /// Line item name (e.g. "Total Revenue").
    pub name: String,
    /// Values keyed by period label, in provider order (most recent first).
    pub values: Vec<(String, Value)>,
}

impl LineItem {
    /// Creates a line item.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<(String, Value)>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Returns the first period label and value.
    #[must_use]
    pub fn latest(&self) -> Option<(&str, &Value)> {
        self.values.first().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the value for a period label.
    #[must_use]
    pub fn value(&self, period: &str) -> Option<&Value> {
        self.values.iter().find(|(k, _)| k == period).map(|(_, v)| v)
    }
}

/// A normalized financial statement: line item → period label → value.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct StatementTable {
    items: Vec<LineItem>,
}

impl StatementTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends a line item.
    pub fn push(&mut self, item: LineItem) {
        self.items.push(item);
    }

    /// Returns the line items in order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Looks up a line item by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Returns the number of line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the table has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<LineItem> for StatementTable {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl From<Value> for StatementTable {
    fn from(value: Value) -> Self {
        let Value::Map(entries) = value else {
            return Self::default();
        };
        entries
            .into_iter()
            .filter_map(|(name, values)| match values {
                Value::Map(values) => Some(LineItem { name, values }),
                _ => None,
            })
            .collect()
    }
}

impl Serialize for StatementTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Periods<'a>(&'a [(String, Value)]);

        impl Serialize for Periods<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (period, value) in self.0 {
                    map.serialize_entry(period, value)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for item in &self.items {
            map.serialize_entry(&item.name, &Periods(&item.values))?;
        }
        map.end()
    }
}

/// The six normalized statements of one analysis.
#[derive(Clone, Debug, Default, PartialEq, DeriveSerialize, Deserialize)]
#[serde(default)]
pub struct FinancialStatements {
    /// Annual income statement.
    pub income_statement: StatementTable,
    /// Annual balance sheet.
    pub balance_sheet: StatementTable,
    /// Annual cash flow statement.
    pub cash_flow: StatementTable,
    /// Quarterly income statement.
    pub quarterly_income: StatementTable,
    /// Quarterly balance sheet.
    pub quarterly_balance: StatementTable,
    /// Quarterly cash flow statement.
    pub quarterly_cashflow: StatementTable,
}

impl FinancialStatements {
    /// Returns the table for a statement kind and period type.
    #[must_use]
    pub const fn get(&self, kind: StatementKind, period: PeriodType) -> &StatementTable {
        match (kind, period) {
            (StatementKind::Income, PeriodType::Annual) => &self.income_statement,
            (StatementKind::BalanceSheet, PeriodType::Annual) => &self.balance_sheet,
            (StatementKind::CashFlow, PeriodType::Annual) => &self.cash_flow,
            (StatementKind::Income, PeriodType::Quarterly) => &self.quarterly_income,
            (StatementKind::BalanceSheet, PeriodType::Quarterly) => &self.quarterly_balance,
            (StatementKind::CashFlow, PeriodType::Quarterly) => &self.quarterly_cashflow,
        }
    }

    /// Replaces the table for a statement kind and period type.
    pub fn set(&mut self, kind: StatementKind, period: PeriodType, table: StatementTable) {
        let slot = match (kind, period) {
            (StatementKind::Income, PeriodType::Annual) => &mut self.income_statement,
            (StatementKind::BalanceSheet, PeriodType::Annual) => &mut self.balance_sheet,
            (StatementKind::CashFlow, PeriodType::Annual) => &mut self.cash_flow,
            (StatementKind::Income, PeriodType::Quarterly) => &mut self.quarterly_income,
            (StatementKind::BalanceSheet, PeriodType::Quarterly) => &mut self.quarterly_balance,
            (StatementKind::CashFlow, PeriodType::Quarterly) => &mut self.quarterly_cashflow,
        };
        *slot = table;
    }

    /// Returns true if all six tables are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        StatementKind::ALL.iter().all(|&kind| {
            self.get(kind, PeriodType::Annual).is_empty()
                && self.get(kind, PeriodType::Quarterly).is_empty()
        })
    }
}

/// Direction of a moving-average crossover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, DeriveSerialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossKind {
    /// Fast average rises above the slow average.
    Golden,
    /// Fast average falls below the slow average.
    Death,
}

/// A detected crossover event.
#[derive(Clone, Debug, PartialEq, DeriveSerialize, Deserialize)]
pub struct CrossSignal {
    /// Golden or death cross.
    #[serde(rename = "type")]
    pub kind: CrossKind,
    /// Date of the sample where the cross completed.
    pub date: NaiveDate,
    /// Closing price on that date.
    pub price: f64,
}

/// The one-year display window of the price history.
#[derive(Clone, Debug, Default, PartialEq, DeriveSerialize, Deserialize)]
pub struct HistoricalData {
    /// Sample dates, ascending.
    pub dates: Vec<NaiveDate>,
    /// Closing prices.
    pub close: Vec<f64>,
    /// Traded volumes.
    pub volume: Vec<u64>,
    /// 50-sample moving average, `null` where undefined.
    pub ma_50: Vec<Option<f64>>,
    /// 200-sample moving average, `null` where undefined.
    pub ma_200: Vec<Option<f64>>,
    /// Crossovers detected in the trailing year of the full history.
    pub cross_signals: Vec<CrossSignal>,
    /// Ticker the window belongs to.
    pub ticker: Symbol,
}

/// The assembled analysis of one security.
#[derive(Clone, Debug, PartialEq, DeriveSerialize, Deserialize)]
pub struct Analysis {
    /// Normalized ticker.
    pub ticker: Symbol,
    /// Grouped fundamental metrics.
    pub analysis: GroupedMetrics,
    /// Six normalized statements.
    pub financial_statements: FinancialStatements,
    /// Display window with averages and crossovers.
    pub historical_data: HistoricalData,
}

/// Result of analyzing one ticker.
///
/// Failures carry a human-readable message instead of propagating, so batch
/// operations can fold over outcomes.
#[derive(Clone, Debug, PartialEq, DeriveSerialize)]
#[serde(into = "AnalysisEnvelope")]
pub enum AnalysisOutcome {
    /// The analysis completed.
    Success(Box<Analysis>),
    /// Fetching or transforming the ticker's data failed.
    Failure {
        /// Normalized ticker.
        ticker: Symbol,
        /// Error message.
        error: String,
    },
}

impl AnalysisOutcome {
    /// Returns true for a successful analysis.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the ticker of either variant.
    #[must_use]
    pub fn ticker(&self) -> &Symbol {
        match self {
            Self::Success(analysis) => &analysis.ticker,
            Self::Failure { ticker, .. } => ticker,
        }
    }

    /// Returns the analysis if successful.
    #[must_use]
    pub fn into_analysis(self) -> Option<Analysis> {
        match self {
            Self::Success(analysis) => Some(*analysis),
            Self::Failure { .. } => None,
        }
    }
}

/// Wire form of an [`AnalysisOutcome`].
#[derive(Clone, Debug, PartialEq, DeriveSerialize, Deserialize)]
pub struct AnalysisEnvelope {
    /// Whether the analysis succeeded.
    pub success: bool,
    /// Normalized ticker.
    pub ticker: Symbol,
    /// Grouped metrics, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<GroupedMetrics>,
    /// Statements, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_statements: Option<FinancialStatements>,
    /// Display window, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_data: Option<HistoricalData>,
    /// Error message, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<AnalysisOutcome> for AnalysisEnvelope {
    fn from(outcome: AnalysisOutcome) -> Self {
        match outcome {
            AnalysisOutcome::Success(analysis) => {
                let Analysis {
                    ticker,
                    analysis,
                    financial_statements,
                    historical_data,
                } = *analysis;
                Self {
                    success: true,
                    ticker,
                    analysis: Some(analysis),
                    financial_statements: Some(financial_statements),
                    historical_data: Some(historical_data),
                    error: None,
                }
            }
            AnalysisOutcome::Failure { ticker, error } => Self {
                success: false,
                ticker,
                analysis: None,
                financial_statements: None,
                historical_data: None,
                error: Some(error),
            },
        }
    }
}

impl From<Analysis> for AnalysisEnvelope {
    fn from(analysis: Analysis) -> Self {
        AnalysisOutcome::Success(Box::new(analysis)).into()
    }
}
