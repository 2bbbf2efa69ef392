//! The report section model.
//!
//! A [`ReportDocument`] is an ordered list of [`Section`]s. Composition fills it
//! in; rendering lays it out. Nothing in between mutates it.

use chrono::NaiveDateTime;
use serde::Serialize;
use stockscope_core::Symbol;

/// Visual treatment of a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStyle {
    /// Label/value pairs with a shaded, bold label column.
    KeyValue,
    /// Header row on a colored band, centered cells.
    Scorecard,
    /// Bold shaded header row, right-aligned values.
    Summary,
}

/// A table section.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Table {
    /// Visual treatment.
    pub style: TableStyle,
    /// Column widths in inches.
    pub column_widths: Vec<f32>,
    /// Optional header row.
    pub header: Option<Vec<String>>,
    /// Body rows.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a two-column label/value table.
    #[must_use]
    pub fn key_value<I, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            style: TableStyle::KeyValue,
            column_widths: vec![2.0, 4.5],
            header: None,
            rows: rows
                .into_iter()
                .map(|(k, v)| vec![k.into(), v.into()])
                .collect(),
        }
    }

    /// Creates a table with a header row.
    #[must_use]
    pub fn with_header(
        style: TableStyle,
        column_widths: Vec<f32>,
        header: &[&str],
        rows: Vec<Vec<String>>,
    ) -> Self {
        Self {
            style,
            column_widths,
            header: Some(header.iter().map(|h| (*h).to_string()).collect()),
            rows,
        }
    }

    /// Returns the total number of rows, header included.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len() + usize::from(self.header.is_some())
    }

    /// Returns the cell in a body row, if present.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

/// One block of the report.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Section {
    /// Centered document title.
    Title(String),
    /// Body text.
    Paragraph(String),
    /// Section heading.
    Heading(String),
    /// A table.
    Table(Table),
    /// Vertical space in inches.
    Spacer(f32),
    /// Forces the next section onto a new page.
    PageBreak,
}

/// A composed report, ready to render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportDocument {
    /// Ticker the report covers.
    pub ticker: Symbol,
    /// When the report was generated.
    pub generated_at: NaiveDateTime,
    /// Sections in display order.
    pub sections: Vec<Section>,
}

impl ReportDocument {
    /// Returns the headings in order.
    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().filter_map(|section| match section {
            Section::Heading(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns the table that directly follows the given heading, skipping
    /// paragraphs and spacers.
    #[must_use]
    pub fn table_after(&self, heading: &str) -> Option<&Table> {
        let start = self
            .sections
            .iter()
            .position(|s| matches!(s, Section::Heading(h) if h == heading))?;
        self.sections[start + 1..]
            .iter()
            .take_while(|s| !matches!(s, Section::Heading(_) | Section::PageBreak))
            .find_map(|s| match s {
                Section::Table(table) => Some(table),
                _ => None,
            })
    }

    /// Returns the number of explicit page breaks.
    #[must_use]
    pub fn page_breaks(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| matches!(s, Section::PageBreak))
            .count()
    }
}
