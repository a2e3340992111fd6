// src/render/drawing.rs
//! The vector tier: a paginated table layout drawn with `printpdf` primitives.
//!
//! Layout and drawing are separate passes. [`layout_pages`] positions bands
//! and text runs in top-down page coordinates; [`draw_pages`] turns them into
//! `printpdf` operations.

use super::{validate_pdf, RenderError, RenderInput, RenderTier, TierRenderer};
use crate::pipeline::config::DrawingConfig;
use async_trait::async_trait;
use estimo_types::{format_display, format_number, EstimateValue, QuoteDocument, CURRENCY_UNIT, HOURS_UNIT};
use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use estimo_pdf_writer::to_win_ansi;
use printpdf::{BuiltinFont, DictItem, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb, TextMatrix};
use std::panic::{self, AssertUnwindSafe};

// A4 in points.
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 40.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const PAGE_BOTTOM: f32 = PAGE_HEIGHT - 60.0;

const TITLE_BAND_HEIGHT: f32 = 64.0;
const COLUMN_HEADER_HEIGHT: f32 = 22.0;
const ROW_HEIGHT: f32 = 16.0;
const BODY_SIZE: f32 = 10.0;
const DETAIL_SIZE: f32 = 8.5;

const NOT_SPECIFIED: &str = "Not specified";

const COL_NUMBER: f32 = MARGIN + 6.0;
const COL_ITEM: f32 = MARGIN + 30.0;
const COL_HOURS: f32 = MARGIN + 340.0;
const COL_COST: f32 = MARGIN + 430.0;

// Wrap widths in characters for the item column.
const NAME_WRAP: usize = 52;
const DETAIL_WRAP: usize = 64;
const INFO_WRAP: usize = 90;

/// An RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shade(pub f32, pub f32, pub f32);

const ACCENT: Shade = Shade(0.29, 0.56, 0.89);
const HEADER_FILL: Shade = Shade(0.92, 0.94, 0.97);
const TOTAL_FILL: Shade = Shade(0.91, 0.96, 0.91);
const WHITE: Shade = Shade(1.0, 1.0, 1.0);
const INK: Shade = Shade(0.2, 0.2, 0.2);
const MUTED: Shade = Shade(0.45, 0.45, 0.45);

/// One drawing primitive. `y` is measured from the top of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    Band { x: f32, y: f32, width: f32, height: f32, fill: Shade },
    Text { x: f32, y: f32, size: f32, bold: bool, color: Shade, text: String },
}

/// The primitives of one page, in painting order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub items: Vec<DrawItem>,
}

impl PageLayout {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Text { text, .. } => Some(text.as_str()),
            DrawItem::Band { .. } => None,
        })
    }
}

/// Totals derived from the line items alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub grand_total: f64,
}

impl DerivedTotals {
    /// The caller's `total_price` is deliberately ignored so the table and its
    /// totals always agree.
    pub fn compute(doc: &QuoteDocument, tax_rate: f64) -> Self {
        let subtotal = doc.line_item_subtotal();
        let tax = subtotal * tax_rate;
        Self { subtotal, tax, grand_total: subtotal + tax }
    }
}

struct Cursor {
    pages: Vec<PageLayout>,
    current: PageLayout,
    y: f32,
    // Set once the first column header is drawn; later pages repeat it.
    in_table: bool,
}

impl Cursor {
    fn new() -> Self {
        Self { pages: Vec::new(), current: PageLayout::default(), y: MARGIN, in_table: false }
    }

    fn band(&mut self, y: f32, height: f32, fill: Shade) {
        self.current.items.push(DrawItem::Band { x: MARGIN, y, width: CONTENT_WIDTH, height, fill });
    }

    fn text(&mut self, x: f32, y: f32, size: f32, bold: bool, color: Shade, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.current.items.push(DrawItem::Text { x, y, size, bold, color, text });
        }
    }

    fn column_header(&mut self) {
        let top = self.y;
        self.band(top, COLUMN_HEADER_HEIGHT, HEADER_FILL);
        let baseline = top + 15.0;
        self.text(COL_NUMBER, baseline, BODY_SIZE, true, INK, "#");
        self.text(COL_ITEM, baseline, BODY_SIZE, true, INK, "Item");
        self.text(COL_HOURS, baseline, BODY_SIZE, true, INK, "Hours");
        self.text(COL_COST, baseline, BODY_SIZE, true, INK, "Cost");
        self.y += COLUMN_HEADER_HEIGHT + 4.0;
        self.in_table = true;
    }

    /// Starts a new page when the next row would cross the bottom threshold.
    fn ensure_row(&mut self) {
        if self.y + ROW_HEIGHT > PAGE_BOTTOM {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = MARGIN;
        if self.in_table {
            self.column_header();
        }
    }

    fn finish(mut self) -> Vec<PageLayout> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Positions every band and text run of the quote across as many pages as needed.
pub fn layout_pages(doc: &QuoteDocument, tax_rate: f64) -> Vec<PageLayout> {
    let mut cur = Cursor::new();

    cur.band(cur.y, TITLE_BAND_HEIGHT, ACCENT);
    cur.text(MARGIN + 16.0, cur.y + 40.0, 24.0, true, WHITE, "QUOTE");
    if let Some(date) = doc.issued_on {
        cur.text(COL_COST - 40.0, cur.y + 38.0, BODY_SIZE, false, WHITE, format!("Issued {}", date.format("%Y-%m-%d")));
    }
    cur.y += TITLE_BAND_HEIGHT + 24.0;

    let client = match (doc.client_name.trim(), doc.client_email.trim()) {
        ("", "") => NOT_SPECIFIED.to_string(),
        (name, "") => name.to_string(),
        ("", email) => format!("<{email}>"),
        (name, email) => format!("{name} <{email}>"),
    };
    let info = [
        ("Project", or_placeholder(&doc.title)),
        ("Client", client.as_str()),
        ("Description", or_placeholder(&doc.description)),
    ];
    for (label, value) in info {
        for (i, line) in wrap(value, INFO_WRAP).into_iter().enumerate() {
            cur.ensure_row();
            if i == 0 {
                cur.text(MARGIN, cur.y, BODY_SIZE, true, INK, format!("{label}:"));
            }
            cur.text(MARGIN + 80.0, cur.y, BODY_SIZE, false, INK, line);
            cur.y += ROW_HEIGHT;
        }
    }
    cur.y += 12.0;
    if cur.y + COLUMN_HEADER_HEIGHT + ROW_HEIGHT > PAGE_BOTTOM {
        cur.break_page();
    }
    cur.column_header();

    if doc.line_items.is_empty() {
        cur.ensure_row();
        cur.text(COL_ITEM, cur.y + 11.0, BODY_SIZE, false, MUTED, "No line items");
        cur.y += ROW_HEIGHT;
    }

    for (index, item) in doc.line_items.iter().enumerate() {
        let name = if item.name.trim().is_empty() { format!("Task {}", index + 1) } else { item.name.clone() };
        let name_lines = wrap(&name, NAME_WRAP);
        let detail_lines = wrap(&item.description, DETAIL_WRAP);

        for (row, line) in name_lines.iter().enumerate() {
            cur.ensure_row();
            let baseline = cur.y + 11.0;
            if row == 0 {
                cur.text(COL_NUMBER, baseline, BODY_SIZE, false, INK, (index + 1).to_string());
                cur.text(COL_HOURS, baseline, BODY_SIZE, false, INK, format_display(&item.hours, HOURS_UNIT));
                cur.text(COL_COST, baseline, BODY_SIZE, false, INK, format_display(&item.cost, CURRENCY_UNIT));
            }
            cur.text(COL_ITEM, baseline, BODY_SIZE, row == 0, INK, line.as_str());
            cur.y += ROW_HEIGHT;
        }
        for line in detail_lines {
            cur.ensure_row();
            cur.text(COL_ITEM, cur.y + 10.0, DETAIL_SIZE, false, MUTED, line);
            cur.y += ROW_HEIGHT;
        }
        cur.y += 4.0;
    }

    let totals = DerivedTotals::compute(doc, tax_rate);
    let rows = [
        ("Subtotal".to_string(), totals.subtotal, false),
        (format!("Tax ({}%)", format_number(tax_rate * 100.0)), totals.tax, false),
        ("Total".to_string(), totals.grand_total, true),
    ];
    cur.y += 8.0;
    for (label, amount, emphasised) in rows {
        cur.ensure_row();
        if emphasised {
            cur.band(cur.y, ROW_HEIGHT + 4.0, TOTAL_FILL);
        }
        let baseline = cur.y + 12.0;
        cur.text(COL_HOURS, baseline, BODY_SIZE, emphasised, INK, label);
        cur.text(COL_COST, baseline, BODY_SIZE, emphasised, INK, format_display(&EstimateValue::Precise(amount), CURRENCY_UNIT));
        cur.y += ROW_HEIGHT + 4.0;
    }

    cur.finish()
}

/// Greedy word wrap by character count. Never returns an empty list.
fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() { NOT_SPECIFIED } else { value }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() { word.chars().count() } else { line.chars().count() + 1 + word.chars().count() };
            if needed > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn to_pdf_color(shade: Shade) -> printpdf::color::Color {
    printpdf::color::Color::Rgb(Rgb::new(shade.0, shade.1, shade.2, None))
}

fn rect_polygon(x: f32, y: f32, width: f32, height: f32) -> Polygon {
    // Convert top-left to PDF bottom-left origin.
    let bottom = PAGE_HEIGHT - (y + height);
    Polygon {
        rings: vec![PolygonRing {
            points: vec![
                LinePoint { p: Point { x: Pt(x), y: Pt(bottom) }, bezier: false },
                LinePoint { p: Point { x: Pt(x + width), y: Pt(bottom) }, bezier: false },
                LinePoint { p: Point { x: Pt(x + width), y: Pt(bottom + height) }, bezier: false },
                LinePoint { p: Point { x: Pt(x), y: Pt(bottom + height) }, bezier: false },
            ],
        }],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::EvenOdd,
    }
}

fn page_ops(layout: &PageLayout) -> Vec<Op> {
    let mut ops = Vec::with_capacity(layout.items.len() * 5);
    for item in &layout.items {
        match item {
            DrawItem::Band { x, y, width, height, fill } => {
                ops.push(Op::SetFillColor { col: to_pdf_color(*fill) });
                ops.push(Op::DrawPolygon { polygon: rect_polygon(*x, *y, *width, *height) });
            }
            DrawItem::Text { x, y, size, bold, color, text } => {
                let font = if *bold { BuiltinFont::HelveticaBold } else { BuiltinFont::Helvetica };
                ops.push(Op::StartTextSection);
                ops.push(Op::SetFillColor { col: to_pdf_color(*color) });
                ops.push(Op::SetFontSizeBuiltinFont { size: Pt(*size), font });
                ops.push(Op::SetTextMatrix { matrix: TextMatrix::Translate(Pt(*x), Pt(PAGE_HEIGHT - *y)) });
                // printpdf writes builtin-font text as UTF-8 under /WinAnsiEncoding.
                ops.push(Op::Unknown {
                    key: "Tj".to_string(),
                    value: vec![DictItem::String { data: to_win_ansi(text), literal: true }],
                });
                ops.push(Op::EndTextSection);
            }
        }
    }
    ops
}

/// Empty writes that make printpdf emit the font resources used by raw `Tj`.
fn font_registration_ops() -> Vec<Op> {
    [BuiltinFont::Helvetica, BuiltinFont::HelveticaBold]
        .into_iter()
        .map(|font| Op::WriteTextBuiltinFont { items: Vec::new(), font })
        .collect()
}

/// Turns laid-out pages into PDF bytes.
pub fn draw_pages(title: &str, layouts: &[PageLayout]) -> Vec<u8> {
    let mut doc = PdfDocument::new(title);
    let pages: Vec<PdfPage> = layouts
        .iter()
        .enumerate()
        .map(|(i, layout)| {
            let mut ops = if i == 0 { font_registration_ops() } else { Vec::new() };
            ops.extend(page_ops(layout));
            PdfPage::new(Mm(210.0), Mm(297.0), ops)
        })
        .collect();
    // Raw `Tj` operators are dropped in secure mode.
    let options = PdfSaveOptions { secure: false, ..PdfSaveOptions::default() };
    let mut warnings = Vec::new();
    doc.with_pages(pages).save(&options, &mut warnings)
}

/// Draws the quote with vector primitives.
#[derive(Debug, Clone)]
pub struct VectorDrawingRenderer {
    tax_rate: f64,
}

impl Default for VectorDrawingRenderer {
    fn default() -> Self {
        Self::new(&DrawingConfig::default())
    }
}

impl VectorDrawingRenderer {
    pub fn new(config: &DrawingConfig) -> Self {
        Self { tax_rate: config.tax_rate }
    }

    /// Lays out and draws `doc`. A panic inside the drawing backend is
    /// contained and reported as [`RenderError::DrawingBackendError`].
    pub fn render_document(&self, doc: &QuoteDocument) -> Result<Vec<u8>, RenderError> {
        let title = if doc.title.trim().is_empty() { "Quote" } else { doc.title.as_str() };
        let tax_rate = self.tax_rate;

        let bytes = panic::catch_unwind(AssertUnwindSafe(|| {
            let layouts = layout_pages(doc, tax_rate);
            log::debug!("[DRAWING] Laid out {} page(s).", layouts.len());
            draw_pages(title, &layouts)
        }))
        .map_err(|payload| RenderError::DrawingBackendError(panic_message(payload.as_ref())))?;

        validate_pdf(&bytes)?;
        Ok(bytes)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "drawing backend panicked".to_string())
}

#[async_trait]
impl TierRenderer for VectorDrawingRenderer {
    fn tier(&self) -> RenderTier {
        RenderTier::VectorDrawing
    }

    async fn render(&self, input: RenderInput<'_>) -> Result<Vec<u8>, RenderError> {
        self.render_document(input.document)
    }
}
