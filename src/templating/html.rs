// src/templating/html.rs
use super::escape::escape_markup;
use super::node::Element;
use super::MarkupDocument;
use estimo_types::{format_display, LineItem, QuoteDocument, CURRENCY_UNIT, HOURS_UNIT};

const NOT_SPECIFIED: &str = "Not specified";

// Page size, margins and background printing are fixed here so the browser
// export picks them up from the document itself.
const STYLESHEET: &str = r#"
@page { size: A4; margin: 15mm; }
* { box-sizing: border-box; -webkit-print-color-adjust: exact; print-color-adjust: exact; }
body { font-family: Arial, sans-serif; margin: 0; color: #333; font-size: 11pt; line-height: 1.4; background: white; }
.header { text-align: center; border-bottom: 2px solid #4a90e2; padding-bottom: 20px; margin-bottom: 30px; break-inside: avoid; }
.header h1 { color: #4a90e2; margin: 0; font-size: 24pt; }
.header p { margin: 10px 0; color: #666; }
.info-section { margin-bottom: 25px; }
.info-section h2 { color: #444; border-bottom: 1px solid #ddd; padding-bottom: 5px; margin-bottom: 15px; font-size: 16pt; }
.info-section p { margin: 8px 0; }
.estimate-item { background: #f9f9f9; padding: 15px; margin: 10px 0; border-left: 4px solid #4a90e2; border-radius: 3px; break-inside: avoid; }
.estimate-item h3 { margin: 0 0 10px 0; color: #4a90e2; font-size: 13pt; }
.estimate-item p { margin: 5px 0; }
.price { font-weight: bold; color: #2e7d32; }
.no-items { font-style: italic; color: #666; }
.total { background: #e8f5e9; padding: 20px; text-align: center; border-radius: 5px; margin-top: 30px; border: 1px solid #c8e6c9; break-inside: avoid; }
.total h2 { margin: 0 0 10px 0; color: #2e7d32; font-size: 18pt; }
.total .amount { font-size: 1.3em; margin: 10px 0; }
.footer { margin-top: 40px; text-align: center; color: #666; font-size: 10pt; }
"#;

/// Builds the markup rendition of a quote.
///
/// Pure: the same document always yields the same markup. Sections appear in
/// a fixed order: header, project information, line items, totals, footer.
pub fn synthesize(doc: &QuoteDocument) -> MarkupDocument {
    let title = or_placeholder(&doc.title, NOT_SPECIFIED);

    let mut html = String::with_capacity(4096 + doc.line_items.len() * 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("<title>Quote - {}</title>\n", escape_markup(title)));
    html.push_str("<style>");
    html.push_str(STYLESHEET);
    html.push_str("</style>\n</head>\n<body>\n");

    for block in [
        header_block(doc),
        project_block(doc),
        line_items_block(&doc.line_items),
        totals_block(doc),
        footer_block(),
    ] {
        block.write_to(&mut html);
    }

    html.push_str("</body>\n</html>\n");
    MarkupDocument::new(html)
}

fn header_block(doc: &QuoteDocument) -> Element {
    let header = Element::new("div").class("header").child(Element::new("h1").text("QUOTE"));
    match doc.issued_on {
        Some(date) => header.child(Element::new("p").text(format!("Issued {}", date.format("%Y-%m-%d")))),
        None => header,
    }
}

fn project_block(doc: &QuoteDocument) -> Element {
    let client = format!(
        "{} ({})",
        or_placeholder(&doc.client_name, NOT_SPECIFIED),
        or_placeholder(&doc.client_email, NOT_SPECIFIED)
    );
    Element::new("div")
        .class("info-section")
        .child(Element::new("h2").text("Project information"))
        .child(Element::labelled("Title:", or_placeholder(&doc.title, NOT_SPECIFIED)))
        .child(Element::labelled("Description:", or_placeholder(&doc.description, NOT_SPECIFIED)))
        .child(Element::labelled("Client:", client))
}

fn line_items_block(items: &[LineItem]) -> Element {
    let section = Element::new("div")
        .class("info-section")
        .child(Element::new("h2").text("Estimate details"));

    if items.is_empty() {
        return section.child(Element::new("p").class("no-items").text("No line items"));
    }

    section.children(items.iter().enumerate().map(|(index, item)| line_item_block(index + 1, item)))
}

fn line_item_block(number: usize, item: &LineItem) -> Element {
    let name = if item.name.trim().is_empty() { format!("Task {number}") } else { item.name.clone() };
    Element::new("div")
        .class("estimate-item")
        .child(Element::new("h3").text(format!("{number}. {name}")))
        .child(Element::new("p").text(or_placeholder(&item.description, "No description available")))
        .child(
            Element::new("p")
                .class("price")
                .text(format!("Fixed price: {}", format_display(&item.cost, CURRENCY_UNIT))),
        )
        .child(Element::new("p").text(format!("Estimated time: {}", format_display(&item.hours, HOURS_UNIT))))
}

fn totals_block(doc: &QuoteDocument) -> Element {
    Element::new("div")
        .class("total")
        .child(Element::new("h2").text("Estimated total"))
        .child(Element::new("p").class("amount").text(format_display(&doc.total_price, CURRENCY_UNIT)))
        .child(Element::new("p").text(format!(
            "Total estimated time: {}",
            format_display(&doc.total_hours, HOURS_UNIT)
        )))
}

fn footer_block() -> Element {
    Element::new("div")
        .class("footer")
        .child(Element::new("p").text("Document generated automatically"))
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() { placeholder } else { value }
}
