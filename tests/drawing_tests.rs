mod common;

use common::fixtures::*;
use common::{GeneratedPdf, TestResult};
use estimo::render::drawing::{layout_pages, DerivedTotals, VectorDrawingRenderer};
use estimo::{DrawingConfig, EstimateValue, QuoteDocument};

#[test]
fn test_single_page_quote() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let bytes = VectorDrawingRenderer::default().render_document(&design_quote())?;
    let pdf = GeneratedPdf::from_bytes(bytes)?;
    assert_pdf_page_count!(pdf, 1);
    Ok(())
}

#[test]
fn test_long_quote_paginates() -> TestResult {
    let doc = quote_with_items(120);
    let expected_pages = layout_pages(&doc, 0.2).len();
    assert!(expected_pages > 1);

    let pdf = GeneratedPdf::from_bytes(VectorDrawingRenderer::default().render_document(&doc)?)?;
    assert_pdf_min_pages!(pdf, 2);
    assert_pdf_page_count!(pdf, expected_pages);
    Ok(())
}

#[test]
fn test_every_page_after_the_first_starts_with_column_header() {
    let pages = layout_pages(&quote_with_items(120), 0.2);
    for page in &pages[1..] {
        let texts: Vec<&str> = page.texts().take(4).collect();
        assert_eq!(texts, vec!["#", "Item", "Hours", "Cost"]);
    }
}

#[test]
fn test_tax_rate_comes_from_config() {
    let doc = quote_with_items(2);
    let totals = DerivedTotals::compute(&doc, 0.1);
    assert!((totals.grand_total - 880.0).abs() < 1e-9);

    let texts: Vec<String> = layout_pages(&doc, 0.1)
        .iter()
        .flat_map(|p| p.texts().map(str::to_string).collect::<Vec<_>>())
        .collect();
    assert!(texts.contains(&"Tax (10%)".to_string()));
    assert!(texts.contains(&"880€".to_string()));
}

#[test]
fn test_supplied_total_is_ignored() {
    let mut doc = design_quote();
    doc.total_price = EstimateValue::Precise(1.0);
    let totals = DerivedTotals::compute(&doc, 0.2);
    assert_eq!(totals.subtotal, 500.0);
}

#[test]
fn test_hostile_and_empty_documents_render() -> TestResult {
    let renderer = VectorDrawingRenderer::new(&DrawingConfig { tax_rate: 0.2 });
    for doc in [hostile_quote(), QuoteDocument::default()] {
        let bytes = renderer.render_document(&doc)?;
        GeneratedPdf::from_bytes(bytes)?;
    }
    Ok(())
}

#[test]
fn test_currency_and_accents_survive_text_extraction() -> TestResult {
    let mut doc = design_quote();
    doc.title = "Café relaunch".into();
    let pdf = GeneratedPdf::from_bytes(VectorDrawingRenderer::default().render_document(&doc)?)?;
    assert_pdf_contains_text!(pdf, "500€");
    assert_pdf_contains_text!(pdf, "Café relaunch");
    Ok(())
}
