//! Ratio extraction: raw attributes → the eight-group metrics record.
//!
//! Each group is described by a static table of [`FieldSpec`]s naming the output
//! field, the provider key it is read from, and how a missing key is filled in.

use stockscope_core::{GroupedMetrics, MetricGroup, RawAttributes, Value, sanitize};

/// How a field is filled in when its source key is missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Numeric field, defaults to `0`.
    Number,
    /// Text field, defaults to `"N/A"`.
    Text,
    /// Field with no default, left absent.
    Optional,
}

impl FieldKind {
    /// Returns the value used when the source key is missing.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::Number => Value::Int(0),
            Self::Text => Value::from("N/A"),
            Self::Optional => Value::Absent,
        }
    }
}

/// One output field and the provider key it comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Output field name.
    pub name: &'static str,
    /// Provider attribute key.
    pub key: &'static str,
    /// Default policy.
    pub kind: FieldKind,
}

const fn number(name: &'static str, key: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        key,
        kind: FieldKind::Number,
    }
}

const fn text(name: &'static str, key: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        key,
        kind: FieldKind::Text,
    }
}

const fn optional(name: &'static str, key: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        key,
        kind: FieldKind::Optional,
    }
}

/// Company profile fields.
pub const COMPANY_INFO: &[FieldSpec] = &[
    text("name", "longName"),
    text("sector", "sector"),
    text("industry", "industry"),
    text("country", "country"),
    text("website", "website"),
    text("description", "longBusinessSummary"),
    optional("employees", "fullTimeEmployees"),
];

/// Quote and size fields.
pub const MARKET_DATA: &[FieldSpec] = &[
    number("current_price", "currentPrice"),
    number("market_cap", "marketCap"),
    number("enterprise_value", "enterpriseValue"),
    number("52_week_high", "fiftyTwoWeekHigh"),
    number("52_week_low", "fiftyTwoWeekLow"),
    number("beta", "beta"),
    number("avg_volume", "averageVolume"),
];

/// Price multiples.
pub const VALUATION_RATIOS: &[FieldSpec] = &[
    number("pe_ratio", "trailingPE"),
    number("forward_pe", "forwardPE"),
    number("peg_ratio", "pegRatio"),
    number("price_to_book", "priceToBook"),
    number("price_to_sales", "priceToSalesTrailing12Months"),
    number("ev_to_revenue", "enterpriseToRevenue"),
    number("ev_to_ebitda", "enterpriseToEbitda"),
];

/// Margins and returns.
pub const PROFITABILITY_RATIOS: &[FieldSpec] = &[
    number("profit_margin", "profitMargins"),
    number("operating_margin", "operatingMargins"),
    number("gross_margin", "grossMargins"),
    number("roe", "returnOnEquity"),
    number("roa", "returnOnAssets"),
    number("roic", "returnOnCapital"),
];

/// Liquidity, leverage, and cash flow.
pub const FINANCIAL_HEALTH: &[FieldSpec] = &[
    number("current_ratio", "currentRatio"),
    number("quick_ratio", "quickRatio"),
    number("debt_to_equity", "debtToEquity"),
    number("total_debt", "totalDebt"),
    number("total_cash", "totalCash"),
    number("free_cash_flow", "freeCashflow"),
    number("operating_cash_flow", "operatingCashflow"),
];

/// Growth rates and per-share figures.
pub const GROWTH_METRICS: &[FieldSpec] = &[
    number("revenue_growth", "revenueGrowth"),
    number("earnings_growth", "earningsGrowth"),
    number("revenue_per_share", "revenuePerShare"),
    number("eps_trailing", "trailingEps"),
    number("eps_forward", "forwardEps"),
];

/// Dividend fields.
pub const DIVIDEND_INFO: &[FieldSpec] = &[
    number("dividend_rate", "dividendRate"),
    number("dividend_yield", "dividendYield"),
    number("payout_ratio", "payoutRatio"),
    text("ex_dividend_date", "exDividendDate"),
];

/// Analyst targets and consensus.
pub const ANALYST_RECOMMENDATIONS: &[FieldSpec] = &[
    number("target_high_price", "targetHighPrice"),
    number("target_low_price", "targetLowPrice"),
    number("target_mean_price", "targetMeanPrice"),
    number("target_median_price", "targetMedianPrice"),
    text("recommendation", "recommendationKey"),
    number("number_of_analyst_opinions", "numberOfAnalystOpinions"),
];

/// Builds one group from its field table.
///
/// A present key is sanitized (so a stored NaN becomes absent); a missing key
/// takes the field's default.
#[must_use]
pub fn extract_group(attributes: &RawAttributes, specs: &[FieldSpec]) -> MetricGroup {
    let mut group = MetricGroup::new();
    for spec in specs {
        let value = attributes
            .get(spec.key)
            .map_or_else(|| spec.kind.default_value(), |raw| sanitize(raw.clone()));
        group.insert(spec.name, value);
    }
    group
}

/// Maps a raw attribute map into the fixed eight-group record.
#[must_use]
pub fn extract(attributes: &RawAttributes) -> GroupedMetrics {
    GroupedMetrics {
        company_info: extract_group(attributes, COMPANY_INFO),
        market_data: extract_group(attributes, MARKET_DATA),
        valuation_ratios: extract_group(attributes, VALUATION_RATIOS),
        profitability_ratios: extract_group(attributes, PROFITABILITY_RATIOS),
        financial_health: extract_group(attributes, FINANCIAL_HEALTH),
        growth_metrics: extract_group(attributes, GROWTH_METRICS),
        dividend_info: extract_group(attributes, DIVIDEND_INFO),
        analyst_recommendations: extract_group(attributes, ANALYST_RECOMMENDATIONS),
    }
}
