//! PDF rendering.
//!
//! Rendering runs in two passes. [`layout`] places every section on letter
//! pages and produces plain drawing operations in points; the paint pass feeds
//! those operations to `printpdf`. Text width is estimated from the font size,
//! since the builtin fonts carry no metrics here.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon,
    Rgb,
};
use stockscope_core::Symbol;
use tracing::{debug, info};

use crate::document::{ReportDocument, Section, Table, TableStyle};
use crate::error::{ReportError, Result};

const POINTS_PER_INCH: f32 = 72.0;
const PAGE_WIDTH: f32 = 8.5 * POINTS_PER_INCH;
const PAGE_HEIGHT: f32 = 11.0 * POINTS_PER_INCH;
const MARGIN_VERTICAL: f32 = 0.5 * POINTS_PER_INCH;
const MARGIN_HORIZONTAL: f32 = 1.0 * POINTS_PER_INCH;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_HORIZONTAL;

const TITLE_SIZE: f32 = 24.0;
const TITLE_SPACE_AFTER: f32 = 30.0;
const HEADING_SIZE: f32 = 16.0;
const HEADING_SPACE_BEFORE: f32 = 20.0;
const HEADING_SPACE_AFTER: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const LEADING: f32 = 1.2;
const CELL_INSET: f32 = 6.0;
const GRID_WIDTH: f32 = 1.0;
const ELLIPSIS: &str = "...";

/// An RGB color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb3(f32, f32, f32);

impl Rgb3 {
    const fn hex(rgb: u32) -> Self {
        Self(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }

    fn color(self) -> Color {
        Color::Rgb(Rgb::new(self.0, self.1, self.2, None))
    }
}

const INK: Rgb3 = Rgb3::hex(0x1f_29_37);
const ACCENT: Rgb3 = Rgb3::hex(0x3b_82_f6);
const SHADE: Rgb3 = Rgb3::hex(0xf3_f4_f6);
const GRID: Rgb3 = Rgb3::hex(0xe5_e7_eb);
const WHITE: Rgb3 = Rgb3(1.0, 1.0, 1.0);
const BLACK: Rgb3 = Rgb3(0.0, 0.0, 0.0);

/// A positioned drawing operation. Coordinates are points from the bottom-left
/// corner of the page; rectangles are anchored at their bottom-left corner.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// A single line of text at a baseline.
    Text {
        /// The text.
        text: String,
        /// Left edge.
        x: f32,
        /// Baseline.
        y: f32,
        /// Font size in points.
        size: f32,
        /// Bold face.
        bold: bool,
        /// Text color.
        color: Rgb3,
    },
    /// A filled rectangle.
    Fill {
        /// Left edge.
        x: f32,
        /// Bottom edge.
        y: f32,
        /// Width.
        width: f32,
        /// Height.
        height: f32,
        /// Fill color.
        color: Rgb3,
    },
    /// A stroked rectangle outline.
    Stroke {
        /// Left edge.
        x: f32,
        /// Bottom edge.
        y: f32,
        /// Width.
        width: f32,
        /// Height.
        height: f32,
        /// Line color.
        color: Rgb3,
    },
}

impl DrawOp {
    /// Returns the text of a text operation.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Drawing operations of one page.
pub type PageOps = Vec<DrawOp>;

/// Approximate Helvetica advance width in thousandths of an em.
const fn glyph_width(c: char) -> u32 {
    match c {
        ' ' | '.' | ',' | ':' | ';' | '!' | '|' | 'i' | 'j' | 'l' | 'I' | '\'' => 278,
        'f' | 't' | 'r' | '/' | '(' | ')' | '[' | ']' | '-' => 333,
        'm' | 'M' => 833,
        'w' | 'W' | '%' => 889,
        's' | 'c' | 'k' | 'v' | 'x' | 'y' | 'z' => 500,
        c if c.is_ascii_uppercase() => 667,
        _ => 556,
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(glyph_width).sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap against the estimated text width.
fn wrap(text: &str, size: f32, width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if !current.is_empty() && text_width(&candidate, size) > width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wraps cell text to `width`, cutting words that alone overflow it.
fn fit_cell(text: &str, size: f32, width: f32) -> Vec<String> {
    wrap(text, size, width)
        .into_iter()
        .map(|line| {
            if text_width(&line, size) <= width {
                return line;
            }
            let mut cut = line;
            while !cut.is_empty() && text_width(&format!("{cut}{ELLIPSIS}"), size) > width {
                cut.pop();
            }
            format!("{}{ELLIPSIS}", cut.trim_end())
        })
        .collect()
}

struct TableLook {
    font_size: f32,
    padding: f32,
}

impl TableLook {
    const fn of(style: TableStyle) -> Self {
        match style {
            TableStyle::KeyValue => Self {
                font_size: 10.0,
                padding: 8.0,
            },
            TableStyle::Scorecard => Self {
                font_size: 9.0,
                padding: 8.0,
            },
            TableStyle::Summary => Self {
                font_size: 9.0,
                padding: 6.0,
            },
        }
    }

    fn row_height(&self) -> f32 {
        self.font_size + 2.0 * self.padding
    }
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

struct CellLook {
    fill: Option<Rgb3>,
    bold: bool,
    color: Rgb3,
    align: Align,
}

fn cell_look(style: TableStyle, is_header: bool, column: usize) -> CellLook {
    match style {
        TableStyle::KeyValue => CellLook {
            fill: (column == 0).then_some(SHADE),
            bold: column == 0,
            color: INK,
            align: Align::Left,
        },
        TableStyle::Scorecard => CellLook {
            fill: Some(if is_header { ACCENT } else { WHITE }),
            bold: is_header,
            color: if is_header { WHITE } else { BLACK },
            align: Align::Center,
        },
        TableStyle::Summary => CellLook {
            fill: is_header.then_some(SHADE),
            bold: is_header,
            color: INK,
            align: if column == 0 { Align::Left } else { Align::Right },
        },
    }
}

struct Layout {
    pages: Vec<PageOps>,
    /// Distance from the top of the page to the next free line.
    cursor: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: MARGIN_VERTICAL,
        }
    }

    fn ops(&mut self) -> &mut PageOps {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= MARGIN_VERTICAL
    }

    fn remaining(&self) -> f32 {
        PAGE_HEIGHT - MARGIN_VERTICAL - self.cursor
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor = MARGIN_VERTICAL;
    }

    /// Starts a new page unless `height` still fits on the current one.
    fn reserve(&mut self, height: f32) {
        if height > self.remaining() && !self.at_page_top() {
            self.new_page();
        }
    }

    fn baseline(&self, line_height: f32, size: f32) -> f32 {
        PAGE_HEIGHT - self.cursor - line_height + (line_height - size) / 2.0
    }

    fn text_line(&mut self, text: String, size: f32, bold: bool, color: Rgb3, centered: bool) {
        let line_height = size * LEADING;
        self.reserve(line_height);
        let x = if centered {
            MARGIN_HORIZONTAL + ((CONTENT_WIDTH - text_width(&text, size)) / 2.0).max(0.0)
        } else {
            MARGIN_HORIZONTAL
        };
        let y = self.baseline(line_height, size);
        self.ops().push(DrawOp::Text {
            text,
            x,
            y,
            size,
            bold,
            color,
        });
        self.cursor += line_height;
    }

    fn title(&mut self, text: &str) {
        for line in wrap(text, TITLE_SIZE, CONTENT_WIDTH) {
            self.text_line(line, TITLE_SIZE, true, INK, true);
        }
        self.cursor += TITLE_SPACE_AFTER;
    }

    fn heading(&mut self, text: &str) {
        // Keep the heading together with its first table row.
        self.reserve(HEADING_SPACE_BEFORE + HEADING_SIZE * LEADING + 3.0 * HEADING_SPACE_AFTER);
        if !self.at_page_top() {
            self.cursor += HEADING_SPACE_BEFORE;
        }
        for line in wrap(text, HEADING_SIZE, CONTENT_WIDTH) {
            self.text_line(line, HEADING_SIZE, true, ACCENT, false);
        }
        self.cursor += HEADING_SPACE_AFTER;
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap(text, BODY_SIZE, CONTENT_WIDTH) {
            self.text_line(line, BODY_SIZE, false, BLACK, false);
        }
    }

    fn spacer(&mut self, inches: f32) {
        let height = inches * POINTS_PER_INCH;
        if height > self.remaining() {
            self.new_page();
        } else {
            self.cursor += height;
        }
    }

    fn table(&mut self, table: &Table) {
        let look = TableLook::of(table.style);
        let widths: Vec<f32> = table
            .column_widths
            .iter()
            .map(|w| w * POINTS_PER_INCH)
            .collect();
        let total: f32 = widths.iter().sum();
        let left = MARGIN_HORIZONTAL + ((CONTENT_WIDTH - total) / 2.0).max(0.0);

        if let Some(header) = &table.header {
            self.table_row(table.style, &look, &widths, left, header, true);
        }
        for row in &table.rows {
            self.table_row(table.style, &look, &widths, left, row, false);
        }
    }

    fn table_row(
        &mut self,
        style: TableStyle,
        look: &TableLook,
        widths: &[f32],
        left: f32,
        cells: &[String],
        is_header: bool,
    ) {
        let line_height = look.font_size * LEADING;
        let lines: Vec<Vec<String>> = widths
            .iter()
            .enumerate()
            .map(|(column, &width)| {
                let text = cells.get(column).map_or("", String::as_str);
                fit_cell(text, look.font_size, width - 2.0 * CELL_INSET)
            })
            .collect();
        let extra_lines = lines.iter().map(Vec::len).max().unwrap_or(1).max(1) - 1;
        let height = look.row_height() + extra_lines as f32 * line_height;
        self.reserve(height);
        let top = PAGE_HEIGHT - self.cursor;
        let bottom = top - height;
        let first_baseline = top - look.padding - look.font_size * 0.8;

        let mut x = left;
        for (column, (&width, cell_lines)) in widths.iter().zip(&lines).enumerate() {
            let cell = cell_look(style, is_header, column);
            let ops = self.ops();

            if let Some(fill) = cell.fill {
                ops.push(DrawOp::Fill {
                    x,
                    y: bottom,
                    width,
                    height,
                    color: fill,
                });
            }
            ops.push(DrawOp::Stroke {
                x,
                y: bottom,
                width,
                height,
                color: GRID,
            });
            for (i, text) in cell_lines.iter().enumerate() {
                let text_width = text_width(text, look.font_size);
                let text_x = match cell.align {
                    Align::Left => x + CELL_INSET,
                    Align::Center => x + ((width - text_width) / 2.0).max(CELL_INSET),
                    Align::Right => (x + width - CELL_INSET - text_width).max(x + CELL_INSET),
                };
                ops.push(DrawOp::Text {
                    text: text.clone(),
                    x: text_x,
                    y: first_baseline - i as f32 * line_height,
                    size: look.font_size,
                    bold: cell.bold,
                    color: cell.color,
                });
            }
            x += width;
        }
        self.cursor += height;
    }

    fn section(&mut self, section: &Section) {
        match section {
            Section::Title(text) => self.title(text),
            Section::Paragraph(text) => self.paragraph(text),
            Section::Heading(text) => self.heading(text),
            Section::Table(table) => self.table(table),
            Section::Spacer(inches) => self.spacer(*inches),
            Section::PageBreak => {
                if !self.at_page_top() {
                    self.new_page();
                }
            }
        }
    }

    fn finish(mut self) -> Vec<PageOps> {
        if self.pages.len() > 1 && self.pages.last().is_some_and(Vec::is_empty) {
            self.pages.pop();
        }
        self.pages
    }
}

/// Places every section on letter pages.
#[must_use]
pub fn layout(document: &ReportDocument) -> Vec<PageOps> {
    let mut layout = Layout::new();
    for section in &document.sections {
        layout.section(section);
    }
    layout.finish()
}

fn to_mm(points: f32) -> Mm {
    Mm(points * 25.4 / POINTS_PER_INCH)
}

fn render_error(err: impl std::fmt::Display) -> ReportError {
    ReportError::Render(err.to_string())
}

fn paint(
    layer: &PdfLayerReference,
    ops: &[DrawOp],
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    layer.set_outline_thickness(GRID_WIDTH);
    for op in ops {
        match op {
            DrawOp::Text {
                text,
                x,
                y,
                size,
                bold: is_bold,
                color,
            } => {
                layer.set_fill_color(color.color());
                let font = if *is_bold { bold } else { regular };
                layer.use_text(text.as_str(), *size, to_mm(*x), to_mm(*y), font);
            }
            DrawOp::Fill {
                x,
                y,
                width,
                height,
                color,
            } => {
                layer.set_fill_color(color.color());
                layer.add_polygon(Polygon {
                    rings: vec![rectangle(*x, *y, *width, *height)],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                });
            }
            DrawOp::Stroke {
                x,
                y,
                width,
                height,
                color,
            } => {
                layer.set_outline_color(color.color());
                layer.add_line(Line {
                    points: rectangle(*x, *y, *width, *height),
                    is_closed: true,
                });
            }
        }
    }
}

fn rectangle(x: f32, y: f32, width: f32, height: f32) -> Vec<(Point, bool)> {
    vec![
        (Point::new(to_mm(x), to_mm(y)), false),
        (Point::new(to_mm(x + width), to_mm(y)), false),
        (Point::new(to_mm(x + width), to_mm(y + height)), false),
        (Point::new(to_mm(x), to_mm(y + height)), false),
    ]
}

/// Renders the document to PDF bytes.
///
/// # Errors
///
/// Returns [`ReportError::Render`] if the PDF backend fails.
pub fn render_pdf(document: &ReportDocument) -> Result<Vec<u8>> {
    let pages = layout(document);
    let title = format!("Stock Analysis Report: {}", document.ticker);
    let (width, height) = (to_mm(PAGE_WIDTH), to_mm(PAGE_HEIGHT));

    let (doc, first_page, first_layer) = PdfDocument::new(title.as_str(), width, height, "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(render_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_error)?;

    for (index, ops) in pages.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, "Layer 1")
        };
        paint(&doc.get_page(page).get_layer(layer), ops, &regular, &bold);
    }

    let bytes = doc.save_to_bytes().map_err(render_error)?;
    debug!(
        ticker = %document.ticker,
        pages = pages.len(),
        bytes = bytes.len(),
        "Rendered report"
    );
    Ok(bytes)
}

/// Attachment file name for a report: `{TICKER}_analysis_{YYYYMMDD}.pdf`.
#[must_use]
pub fn report_filename(ticker: &Symbol, date: NaiveDate) -> String {
    format!("{ticker}_analysis_{}.pdf", date.format("%Y%m%d"))
}

/// Renders the document and writes it into `dir` under [`report_filename`].
///
/// # Errors
///
/// Returns [`ReportError::Render`] if rendering fails and [`ReportError::Io`]
/// if the file cannot be written.
pub fn save_pdf(document: &ReportDocument, dir: &Path) -> Result<PathBuf> {
    let bytes = render_pdf(document)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_filename(
        &document.ticker,
        document.generated_at.date(),
    ));
    std::fs::write(&path, bytes)?;
    info!(path = %path.display(), "Saved report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn document(sections: Vec<Section>) -> ReportDocument {
        ReportDocument {
            ticker: Symbol::new("AAPL"),
            generated_at: generated_at(),
            sections,
        }
    }

    fn texts(page: &[DrawOp]) -> Vec<&str> {
        page.iter().filter_map(DrawOp::text).collect()
    }

    #[test]
    fn test_report_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(
            report_filename(&Symbol::new("brk-b"), date),
            "BRK-B_analysis_20250109.pdf"
        );
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 10.0, 40.0), ["one two", "three"]);
        assert_eq!(
            wrap("Stock Analysis Report: Apple Inc. (AAPL)", TITLE_SIZE, CONTENT_WIDTH).len(),
            1
        );
        assert_eq!(wrap("", 10.0, 40.0), Vec::<String>::new());
        assert_eq!(wrap("unbreakablewordthatislong", 10.0, 40.0).len(), 1);
    }

    #[test]
    fn test_page_breaks_start_new_pages() {
        let doc = document(vec![
            Section::Title("Report".to_string()),
            Section::PageBreak,
            Section::Paragraph("second".to_string()),
            Section::PageBreak,
            Section::Paragraph("third".to_string()),
        ]);

        let pages = layout(&doc);

        assert_eq!(pages.len(), 3);
        assert_eq!(texts(&pages[0]), ["Report"]);
        assert_eq!(texts(&pages[2]), ["third"]);
    }

    #[test]
    fn test_trailing_page_break_adds_no_blank_page() {
        let doc = document(vec![
            Section::Paragraph("only".to_string()),
            Section::PageBreak,
            Section::PageBreak,
        ]);
        assert_eq!(layout(&doc).len(), 1);
    }

    #[test]
    fn test_overflow_flows_to_next_page() {
        let rows = (0..40)
            .map(|i| (format!("Row {i}"), i.to_string()))
            .collect::<Vec<_>>();
        let doc = document(vec![Section::Table(Table::key_value(rows))]);

        let pages = layout(&doc);

        assert_eq!(pages.len(), 2);
        for page in &pages {
            for op in page {
                if let DrawOp::Text { y, .. } | DrawOp::Fill { y, .. } = op {
                    assert!(*y >= MARGIN_VERTICAL - 1e-3);
                    assert!(*y <= PAGE_HEIGHT - MARGIN_VERTICAL);
                }
            }
        }
        let mut all: Vec<&str> = pages.iter().flat_map(|p| texts(p)).collect();
        all.retain(|t| t.starts_with("Row"));
        assert_eq!(all.len(), 40);
    }

    #[test]
    fn test_table_cell_styles() {
        let table = Table::with_header(
            TableStyle::Scorecard,
            vec![1.8, 1.5, 1.5, 1.0],
            &["Metric", "Value", "Preference", "Status"],
            vec![vec![
                "5Y ROIC".to_string(),
                "10.00%".to_string(),
                "Above 9%".to_string(),
                "PASS".to_string(),
            ]],
        );
        let pages = layout(&document(vec![Section::Table(table)]));
        let page = &pages[0];

        let header_fills = page
            .iter()
            .filter(|op| matches!(op, DrawOp::Fill { color, .. } if *color == ACCENT))
            .count();
        assert_eq!(header_fills, 4);
        assert!(page.iter().any(|op| matches!(
            op,
            DrawOp::Text { text, bold: true, color, .. } if text == "Metric" && *color == WHITE
        )));
        assert!(page.iter().any(|op| matches!(
            op,
            DrawOp::Text { text, bold: false, .. } if text == "PASS"
        )));
        let strokes = page
            .iter()
            .filter(|op| matches!(op, DrawOp::Stroke { .. }))
            .count();
        assert_eq!(strokes, 8);
    }

    #[test]
    fn test_fit_cell() {
        assert_eq!(fit_cell("Technology", 10.0, 200.0), ["Technology"]);
        assert_eq!(
            fit_cell("Semiconductor Equipment & Materials", 9.0, 80.0),
            ["Semiconductor", "Equipment &", "Materials"]
        );

        let cut = fit_cell("Supercalifragilisticexpialidocious", 9.0, 60.0);
        assert_eq!(cut.len(), 1);
        assert!(cut[0].ends_with("..."));
        assert!(text_width(&cut[0], 9.0) <= 60.0);
        assert!(fit_cell("", 9.0, 60.0).is_empty());
    }

    #[test]
    fn test_long_cells_stay_inside_their_column() {
        let table = Table::with_header(
            TableStyle::Scorecard,
            vec![1.5, 1.5],
            &["Industry", "Status"],
            vec![vec![
                "Semiconductor Equipment & Materials".to_string(),
                "PASS".to_string(),
            ]],
        );
        let pages = layout(&document(vec![Section::Table(table)]));
        let page = &pages[0];

        let column = 1.5 * POINTS_PER_INCH;
        let left = MARGIN_HORIZONTAL + (CONTENT_WIDTH - 2.0 * column) / 2.0;
        let industry: Vec<(&str, f32, f32)> = page
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, x, y, size, .. } if *x < left + column => {
                    Some((text.as_str(), *x + text_width(text, *size), *y))
                }
                _ => None,
            })
            .filter(|(text, ..)| *text != "Industry")
            .collect();

        assert_eq!(
            industry.iter().map(|(t, ..)| *t).collect::<Vec<_>>(),
            ["Semiconductor", "Equipment & Materials"]
        );
        for (_, right, _) in &industry {
            assert!(*right <= left + column - CELL_INSET + 1e-3);
        }
        assert!(industry[1].2 < industry[0].2);

        let row_stroke = page
            .iter()
            .filter_map(|op| match op {
                DrawOp::Stroke { height, .. } => Some(*height),
                _ => None,
            })
            .fold(0.0_f32, f32::max);
        let single = TableLook::of(TableStyle::Scorecard).row_height();
        assert!((row_stroke - (single + 9.0 * LEADING)).abs() < 1e-3);
    }

    #[test]
    fn test_render_pdf_bytes() {
        let doc = document(vec![
            Section::Title("Stock Analysis Report: Apple Inc. (AAPL)".to_string()),
            Section::Heading("Company Overview".to_string()),
            Section::Table(Table::key_value([("Sector", "Technology")])),
            Section::PageBreak,
            Section::Paragraph("Key metrics to evaluate stock strength".to_string()),
        ]);

        let bytes = render_pdf(&doc).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_save_pdf() {
        let dir = std::env::temp_dir().join(format!("stockscope-report-{}", std::process::id()));
        let doc = document(vec![Section::Paragraph("saved".to_string())]);

        let path = save_pdf(&doc, &dir).unwrap();

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("AAPL_analysis_20250307.pdf")
        );
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
