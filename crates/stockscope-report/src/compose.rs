//! Report composition: analysis record in, ordered section list out.

use chrono::NaiveDateTime;
use serde::Deserialize;
use stockscope_core::{FinancialStatements, GroupedMetrics, MetricGroup, StatementTable, Symbol};
use tracing::debug;

use crate::document::{ReportDocument, Section, Table, TableStyle};
use crate::error::{ReportError, Result};
use crate::format;
use crate::scorecard::Scorecard;

/// Maximum number of income statement line items in the summary.
pub const SUMMARY_ITEMS: usize = 6;

const SUMMARY_HEADER: [&str; 2] = ["Metric", "Value"];
const SUMMARY_WIDTHS: [f32; 2] = [3.0, 2.0];

/// Everything needed to compose a report.
///
/// Deserializes from the same JSON shape the analysis endpoint returns, so a
/// client can post an analysis straight back.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ReportRequest {
    /// Ticker the report covers.
    #[serde(default)]
    pub ticker: String,
    /// Grouped metrics.
    #[serde(default)]
    pub analysis: GroupedMetrics,
    /// Normalized statements; only the annual income statement is used.
    #[serde(default)]
    pub financial_statements: FinancialStatements,
}

impl ReportRequest {
    /// Creates a request without statements.
    #[must_use]
    pub fn new(ticker: impl Into<String>, analysis: GroupedMetrics) -> Self {
        Self {
            ticker: ticker.into(),
            analysis,
            financial_statements: FinancialStatements::default(),
        }
    }

    /// Attaches statements.
    #[must_use]
    pub fn with_statements(mut self, statements: FinancialStatements) -> Self {
        self.financial_statements = statements;
        self
    }
}

/// Composes the report for a request.
///
/// # Errors
///
/// Returns [`ReportError::MissingData`] if the ticker is blank or the analysis
/// has no metrics.
pub fn compose(request: &ReportRequest, generated_at: NaiveDateTime) -> Result<ReportDocument> {
    let ticker = Symbol::new(request.ticker.as_str());
    if ticker.as_str().is_empty() || request.analysis.is_empty() {
        return Err(ReportError::MissingData(
            "ticker and analysis are required".to_string(),
        ));
    }

    let metrics = &request.analysis;
    let mut sections = Vec::with_capacity(48);

    let name = metrics
        .company_info
        .text("name")
        .unwrap_or(ticker.as_str());
    sections.push(Section::Title(format!(
        "Stock Analysis Report: {name} ({ticker})"
    )));
    sections.push(Section::Paragraph(format!(
        "Generated on {}",
        generated_at.format("%B %d, %Y at %I:%M %p")
    )));
    sections.push(Section::Spacer(0.3));

    key_value(&mut sections, "Company Overview", company_rows(&metrics.company_info));
    sections.push(Section::Spacer(0.2));
    key_value(&mut sections, "Market Data", market_rows(&metrics.market_data));
    sections.push(Section::Spacer(0.2));
    key_value(
        &mut sections,
        "Valuation Metrics",
        valuation_rows(&metrics.valuation_ratios),
    );
    sections.push(Section::PageBreak);

    key_value(
        &mut sections,
        "Profitability Metrics",
        profitability_rows(&metrics.profitability_ratios),
    );
    sections.push(Section::Spacer(0.2));
    key_value(
        &mut sections,
        "Financial Health",
        health_rows(&metrics.financial_health),
    );
    sections.push(Section::Spacer(0.2));
    key_value(
        &mut sections,
        "Growth Metrics",
        growth_rows(&metrics.growth_metrics),
    );
    sections.push(Section::Spacer(0.2));
    key_value(
        &mut sections,
        "Analyst Recommendations",
        analyst_rows(&metrics.analyst_recommendations),
    );
    sections.push(Section::PageBreak);

    let scorecard = Scorecard::evaluate(metrics);
    sections.push(Section::Heading("Eight Commandments".to_string()));
    sections.push(Section::Paragraph(
        "Key metrics to evaluate stock strength".to_string(),
    ));
    sections.push(Section::Spacer(0.2));
    sections.push(Section::Table(scorecard.to_table()));
    sections.push(Section::Spacer(0.3));

    let income = &request.financial_statements.income_statement;
    if !income.is_empty() {
        sections.push(Section::Heading("Financial Statements Summary".to_string()));
        sections.push(Section::Paragraph(
            "Recent Income Statement Highlights".to_string(),
        ));
        sections.push(Section::Spacer(0.1));
        let rows = income_summary(income);
        if !rows.is_empty() {
            sections.push(Section::Table(Table::with_header(
                TableStyle::Summary,
                SUMMARY_WIDTHS.to_vec(),
                &SUMMARY_HEADER,
                rows,
            )));
            sections.push(Section::Spacer(0.2));
        }
    }

    debug!(
        ticker = %ticker,
        sections = sections.len(),
        passed = scorecard.passed(),
        "Composed report"
    );

    Ok(ReportDocument {
        ticker,
        generated_at,
        sections,
    })
}

fn key_value(sections: &mut Vec<Section>, heading: &str, rows: Vec<(&'static str, String)>) {
    sections.push(Section::Heading(heading.to_string()));
    sections.push(Section::Table(Table::key_value(rows)));
}

fn company_rows(group: &MetricGroup) -> Vec<(&'static str, String)> {
    vec![
        ("Sector", format::text(group.get("sector"))),
        ("Industry", format::text(group.get("industry"))),
        ("Country", format::text(group.get("country"))),
        ("Employees", format::thousands(group.get("employees"))),
    ]
}

fn market_rows(group: &MetricGroup) -> Vec<(&'static str, String)> {
    vec![
        ("Current Price", format::price(group.get("current_price"))),
        ("Market Cap", format::billions(group.get("market_cap"))),
        ("52 Week High", format::money(group.get("52_week_high"))),
        ("52 Week Low", format::money(group.get("52_week_low"))),
        ("Beta", format::ratio(group.get("beta"))),
    ]
}

fn valuation_rows(group: &MetricGroup) -> Vec<(&'static str, String)> {
    vec![
        ("P/E Ratio", format::ratio(group.get("pe_ratio"))),
        ("Forward P/E", format::ratio(group.get("forward_pe"))),
        ("PEG Ratio", format::ratio(group.get("peg_ratio"))),
        ("Price/Book", format::ratio(group.get("price_to_book"))),
        ("Price/Sales", format::ratio(group.get("price_to_sales"))),
        ("EV/EBITDA", format::ratio(group.get("ev_to_ebitda"))),
    ]
}

fn profitability_rows(group: &MetricGroup) -> Vec<(&'static str, String)> {
    vec![
        ("Profit Margin", format::percent(group.get("profit_margin"))),
        ("Operating Margin", format::percent(group.get("operating_margin"))),
        ("Gross Margin", format::percent(group.get("gross_margin"))),
        ("ROE", format::percent(group.get("roe"))),
        ("ROA", format::percent(group.get("roa"))),
        ("ROIC", format::percent(group.get("roic"))),
    ]
}

fn health_rows(group: &MetricGroup) -> Vec<(&'static str, String)> {
    vec![
        ("Current Ratio", format::ratio(group.get("current_ratio"))),
        ("Quick Ratio", format::ratio(group.get("quick_ratio"))),
        ("Debt/Equity", format::ratio(group.get("debt_to_equity"))),
        ("Total Debt", format::billions(group.get("total_debt"))),
        ("Total Cash", format::billions(group.get("total_cash"))),
        ("Free Cash Flow", format::billions(group.get("free_cash_flow"))),
    ]
}

fn growth_rows(group: &MetricGroup) -> Vec<(&'static str, String)> {
    vec![
        ("Revenue Growth", format::percent(group.get("revenue_growth"))),
        ("Earnings Growth", format::percent(group.get("earnings_growth"))),
        ("EPS (Trailing)", format::money(group.get("eps_trailing"))),
        ("EPS (Forward)", format::money(group.get("eps_forward"))),
    ]
}

fn analyst_rows(group: &MetricGroup) -> Vec<(&'static str, String)> {
    vec![
        ("Recommendation", format::upper(group.get("recommendation"))),
        ("Target Mean Price", format::money(group.get("target_mean_price"))),
        ("Target High Price", format::money(group.get("target_high_price"))),
        ("Target Low Price", format::money(group.get("target_low_price"))),
        (
            "Number of Analysts",
            format::text(group.get("number_of_analyst_opinions")),
        ),
    ]
}

/// Latest value of the first line items, skipping zero and non-numeric ones.
fn income_summary(income: &StatementTable) -> Vec<Vec<String>> {
    income
        .items()
        .iter()
        .take(SUMMARY_ITEMS)
        .filter_map(|item| {
            let (_, value) = item.latest()?;
            let amount = format::truthy(value)?;
            Some(vec![
                format::title_case(&item.name),
                format::statement_amount(amount),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stockscope_core::{LineItem, Value};

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    }

    fn metrics() -> GroupedMetrics {
        GroupedMetrics {
            company_info: MetricGroup::new()
                .with("name", "Apple Inc.")
                .with("sector", "Technology")
                .with("employees", 161_000),
            market_data: MetricGroup::new()
                .with("current_price", 227.5)
                .with("market_cap", 3.4e12),
            valuation_ratios: MetricGroup::new().with("pe_ratio", 0),
            analyst_recommendations: MetricGroup::new()
                .with("recommendation", "buy")
                .with("number_of_analyst_opinions", 38),
            ..GroupedMetrics::default()
        }
    }

    fn income() -> StatementTable {
        let item = |name: &str, value: Value| {
            LineItem::new(name, vec![("2024-09-30".to_string(), value)])
        };
        [
            item("Total Revenue", Value::Float(391_035_000_000.0)),
            item("Tax_Rate_For_Calcs", Value::Float(0.0)),
            item("research_development", Value::Float(31_370_000_000.0)),
            item("Interest Expense", Value::Absent),
            item("Other Income", Value::Float(-269_000_000.0)),
            item("Basic Eps Note", Value::from("n/a")),
            item("Net Income", Value::Float(93_736_000_000.0)),
        ]
        .into_iter()
        .collect()
    }

    fn request() -> ReportRequest {
        ReportRequest::new("aapl", metrics())
    }

    #[test]
    fn test_section_order() {
        let doc = compose(&request(), generated_at()).unwrap();

        let headings: Vec<&str> = doc.headings().collect();
        assert_eq!(
            headings,
            [
                "Company Overview",
                "Market Data",
                "Valuation Metrics",
                "Profitability Metrics",
                "Financial Health",
                "Growth Metrics",
                "Analyst Recommendations",
                "Eight Commandments",
            ]
        );
        assert_eq!(doc.page_breaks(), 2);
        assert_eq!(doc.ticker.as_str(), "AAPL");
        assert_eq!(
            doc.sections[0],
            Section::Title("Stock Analysis Report: Apple Inc. (AAPL)".to_string())
        );
        assert_eq!(
            doc.sections[1],
            Section::Paragraph("Generated on March 07, 2025 at 02:05 PM".to_string())
        );
    }

    #[test]
    fn test_page_breaks_follow_valuation_and_analyst() {
        let doc = compose(&request(), generated_at()).unwrap();

        let before_breaks: Vec<&str> = doc
            .sections
            .windows(3)
            .filter(|w| w[2] == Section::PageBreak)
            .filter_map(|w| match &w[0] {
                Section::Heading(h) => Some(h.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(before_breaks, ["Valuation Metrics", "Analyst Recommendations"]);
    }

    #[test]
    fn test_key_value_cells() {
        let doc = compose(&request(), generated_at()).unwrap();

        let company = doc.table_after("Company Overview").unwrap();
        assert_eq!(company.style, TableStyle::KeyValue);
        assert_eq!(company.column_widths, [2.0_f32, 4.5]);
        assert_eq!(company.cell(0, 1), Some("Technology"));
        assert_eq!(company.cell(1, 1), Some("N/A"));
        assert_eq!(company.cell(3, 1), Some("161,000"));

        let market = doc.table_after("Market Data").unwrap();
        assert_eq!(market.cell(0, 1), Some("$227.50"));
        assert_eq!(market.cell(1, 1), Some("$3400.00B"));
        assert_eq!(market.cell(4, 1), Some("N/A"));

        let valuation = doc.table_after("Valuation Metrics").unwrap();
        assert_eq!(valuation.cell(0, 1), Some("N/A"));

        let analyst = doc.table_after("Analyst Recommendations").unwrap();
        assert_eq!(analyst.cell(0, 1), Some("BUY"));
        assert_eq!(analyst.cell(4, 1), Some("38"));
    }

    #[test]
    fn test_scorecard_section() {
        let doc = compose(&request(), generated_at()).unwrap();

        let table = doc.table_after("Eight Commandments").unwrap();
        assert_eq!(table.style, TableStyle::Scorecard);
        assert_eq!(table.rows.len(), 8);
        assert_eq!(table.cell(0, 3), Some("FAIL"));
        assert_eq!(table.cell(7, 3), Some("PASS"));
    }

    #[test]
    fn test_no_summary_without_income_statement() {
        let doc = compose(&request(), generated_at()).unwrap();

        assert!(!doc.headings().any(|h| h == "Financial Statements Summary"));
        assert_eq!(doc.sections.last(), Some(&Section::Spacer(0.3)));
    }

    #[test]
    fn test_income_summary() {
        let mut statements = FinancialStatements::default();
        statements.income_statement = income();
        let doc = compose(&request().with_statements(statements), generated_at()).unwrap();

        let table = doc.table_after("Financial Statements Summary").unwrap();
        assert_eq!(table.style, TableStyle::Summary);
        assert_eq!(
            table.rows,
            [
                vec!["Total Revenue".to_string(), "$391.04B".to_string()],
                vec!["Research Development".to_string(), "$31.37B".to_string()],
                vec!["Other Income".to_string(), "$-269.00M".to_string()],
            ]
        );
    }

    #[test]
    fn test_missing_data() {
        let blank = ReportRequest::new("  ", metrics());
        assert!(compose(&blank, generated_at()).unwrap_err().is_missing_data());

        let empty = ReportRequest::new("AAPL", GroupedMetrics::default());
        assert!(compose(&empty, generated_at()).unwrap_err().is_missing_data());
    }

    #[test]
    fn test_composition_is_deterministic() {
        let first = compose(&request(), generated_at()).unwrap();
        let second = compose(&request(), generated_at()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_request_from_json() {
        let request: ReportRequest = serde_json::from_str(
            r#"{
                "ticker": "MSFT",
                "analysis": {"company_info": {"name": "Microsoft", "employees": null}},
                "financial_statements": {
                    "income_statement": {"Total Revenue": {"2024-06-30": 245122000000.0}}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(request.analysis.company_info.get("employees"), &Value::Absent);
        assert_eq!(request.financial_statements.income_statement.len(), 1);

        let doc = compose(&request, generated_at()).unwrap();
        let summary = doc.table_after("Financial Statements Summary").unwrap();
        assert_eq!(summary.cell(0, 1), Some("$245.12B"));
    }
}
