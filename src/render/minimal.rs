// src/render/minimal.rs
//! The last PDF tier: a single-page, text-only document written byte by byte.
//!
//! It depends on nothing but in-memory buffers, so [`serialize`] has no error
//! path at all.

use super::{RenderError, RenderInput, RenderTier, TierRenderer};
use async_trait::async_trait;
use estimo_pdf_writer::{literal_string, ContentStream, Dict, ObjectTable};
use estimo_types::{format_display, QuoteDocument, CURRENCY_UNIT, HOURS_UNIT};

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const FONT_SIZE: f32 = 12.0;
const LEFT: f32 = 50.0;
const TOP: f32 = 750.0;
const LINE_STEP: f32 = 15.0;
const BLANK_STEP: f32 = 10.0;
const PRODUCER: &str = concat!("estimo ", env!("CARGO_PKG_VERSION"));

/// Serializes `doc` as a minimal PDF.
pub fn serialize(doc: &QuoteDocument) -> Vec<u8> {
    let payload = content_stream(&flatten(doc));

    let mut table = ObjectTable::new();
    let catalog = table.reserve();
    let pages = table.reserve();
    let page = table.reserve();
    let contents = table.add_stream(Dict::new(), &payload);
    let info = table.add(
        Dict::new()
            .entry("Title", literal_string(title_or_default(doc)))
            .entry("Producer", literal_string(PRODUCER)),
    );

    let font = Dict::typed("Font")
        .name("Subtype", "Type1")
        .name("BaseFont", "Helvetica")
        .name("Encoding", "WinAnsiEncoding");
    table.set(
        page,
        Dict::typed("Page")
            .reference("Parent", pages)
            .entry("MediaBox", format!("[0 0 {PAGE_WIDTH} {PAGE_HEIGHT}]"))
            .reference("Contents", contents)
            .dict("Resources", Dict::new().dict("Font", Dict::new().dict("F1", font))),
    );
    table.set(pages, Dict::typed("Pages").reference_array("Kids", &[page]).number("Count", 1));
    table.set(catalog, Dict::typed("Catalog").reference("Pages", pages));

    log::debug!(
        "[MINIMAL] {} objects, {} byte content stream",
        table.len(),
        payload.len()
    );
    table.finish(catalog, Some(info))
}

/// The quote as plain text lines. Empty strings are vertical spacers.
pub fn flatten(doc: &QuoteDocument) -> Vec<String> {
    let mut text = String::from("QUOTE\n");
    if let Some(date) = doc.issued_on {
        text.push_str(&format!("Issued {}\n", date.format("%Y-%m-%d")));
    }
    text.push('\n');
    text.push_str(&format!("Project: {}\n", title_or_default(doc)));
    text.push_str(&format!("Description: {}\n", or_na(&doc.description)));
    text.push_str(&format!("Client: {} ({})\n\n", or_na(&doc.client_name), or_na(&doc.client_email)));
    text.push_str("ESTIMATE DETAILS\n");

    if doc.line_items.is_empty() {
        text.push_str("No line items\n\n");
    }
    for (index, item) in doc.line_items.iter().enumerate() {
        let name = if item.name.trim().is_empty() { format!("Task {}", index + 1) } else { item.name.clone() };
        text.push_str(&format!("{}. {}\n", index + 1, name));
        text.push_str(&format!("   Price: {}\n", format_display(&item.cost, CURRENCY_UNIT)));
        text.push_str(&format!("   Time: {}\n\n", format_display(&item.hours, HOURS_UNIT)));
    }

    text.push_str(&format!(
        "TOTAL: {} - {}",
        format_display(&doc.total_price, CURRENCY_UNIT),
        format_display(&doc.total_hours, HOURS_UNIT)
    ));

    text.lines().map(str::to_string).collect()
}

fn content_stream(lines: &[String]) -> Vec<u8> {
    let mut stream = ContentStream::new();
    stream.begin_text().set_font("F1", FONT_SIZE);

    let mut y = TOP;
    for line in lines {
        if line.trim().is_empty() {
            y -= BLANK_STEP;
            continue;
        }
        stream.move_to(LEFT, y).show_text(line);
        y -= LINE_STEP;
    }
    stream.into_bytes()
}

fn title_or_default(doc: &QuoteDocument) -> &str {
    if doc.title.trim().is_empty() { "Quote" } else { &doc.title }
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() { "N/A" } else { value }
}

/// Tier adapter for [`serialize`]. Always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinimalFormatRenderer;

#[async_trait]
impl TierRenderer for MinimalFormatRenderer {
    fn tier(&self) -> RenderTier {
        RenderTier::MinimalFormat
    }

    async fn render(&self, input: RenderInput<'_>) -> Result<Vec<u8>, RenderError> {
        Ok(serialize(input.document))
    }
}
