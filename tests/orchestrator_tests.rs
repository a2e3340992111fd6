mod common;

use common::fixtures::*;
use common::{GeneratedPdf, SimulatedFailure, TestResult};
use estimo::render::minimal::MinimalFormatRenderer;
use estimo::{
    synthesize, BrowserConfig, ContentKind, PipelineBuilder, QuoteDocument, RenderConfig, RenderTier, TierRenderer,
};
use std::sync::Arc;

fn no_browser() -> RenderConfig {
    RenderConfig { browser: BrowserConfig { enabled: false, ..Default::default() }, ..Default::default() }
}

#[tokio::test]
async fn test_all_pdf_tiers_failing_yields_markup() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let tiers: Vec<Arc<SimulatedFailure>> = [RenderTier::Browser, RenderTier::VectorDrawing, RenderTier::MinimalFormat]
        .into_iter()
        .map(|t| Arc::new(SimulatedFailure::new(t)))
        .collect();
    let orchestrator = PipelineBuilder::new()
        .with_tiers(tiers.iter().map(|t| t.clone() as Arc<dyn TierRenderer>).collect())
        .build()?;

    let doc = design_quote();
    let result = orchestrator.render(&doc).await;

    assert_eq!(result.content_kind, ContentKind::Html);
    assert_eq!(result.bytes, synthesize(&doc).into_bytes());
    assert!(tiers.iter().all(|t| t.calls() == 1), "each tier is tried exactly once");
    Ok(())
}

#[tokio::test]
async fn test_minimal_tier_rescues_failed_upper_tiers() -> TestResult {
    let orchestrator = PipelineBuilder::new()
        .with_tiers(vec![
            Arc::new(SimulatedFailure::new(RenderTier::Browser)),
            Arc::new(SimulatedFailure::new(RenderTier::VectorDrawing)),
            Arc::new(MinimalFormatRenderer),
        ])
        .build()?;

    let result = orchestrator.render(&design_quote()).await;
    assert_eq!(result.content_kind, ContentKind::Pdf);
    let pdf = GeneratedPdf::from_bytes(result.bytes)?;
    assert_pdf_contains_text!(pdf, "Project: Site");
    Ok(())
}

#[tokio::test]
async fn test_default_chain_without_browser_produces_pdf() -> TestResult {
    let orchestrator = PipelineBuilder::new().with_config(no_browser()).build()?;
    let result = orchestrator.render(&quote_with_items(5)).await;
    assert!(result.is_pdf());
    assert!(result.bytes.starts_with(b"%PDF"));
    assert_eq!(ContentKind::sniff(&result.bytes), Some(ContentKind::Pdf));
    Ok(())
}

#[tokio::test]
async fn test_unavailable_browser_falls_through() -> TestResult {
    let config = RenderConfig {
        browser: BrowserConfig { executable: Some("/nonexistent/chromium".into()), ..Default::default() },
        ..Default::default()
    };
    let orchestrator = PipelineBuilder::new().with_config(config).build()?;
    assert_eq!(orchestrator.tier_order()[0], RenderTier::Browser);

    let result = orchestrator.render(&design_quote()).await;
    assert_eq!(result.content_kind, ContentKind::Pdf);
    Ok(())
}

#[tokio::test]
async fn test_empty_document_never_fails() -> TestResult {
    let orchestrator = PipelineBuilder::new().with_config(no_browser()).build()?;
    let result = orchestrator.render(&QuoteDocument::default()).await;
    assert!(!result.bytes.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_renders_are_independent() -> TestResult {
    let orchestrator = Arc::new(
        PipelineBuilder::new()
            .with_tiers(vec![Arc::new(SimulatedFailure::new(RenderTier::Browser)), Arc::new(MinimalFormatRenderer)])
            .build()?,
    );

    let handles: Vec<_> = (1..=16)
        .map(|n| {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move {
                let doc = quote_with_items(n);
                let result = orchestrator.render(&doc).await;
                (doc, result)
            })
        })
        .collect();

    for handle in handles {
        let (doc, result) = handle.await?;
        assert_eq!(result.bytes, estimo::render::minimal::serialize(&doc));
    }
    Ok(())
}

#[test]
fn test_render_blocking_from_sync_code() -> TestResult {
    let orchestrator = PipelineBuilder::new().with_config(no_browser()).build()?;
    let result = orchestrator.render_blocking(&design_quote());
    assert!(result.is_pdf());
    assert_eq!(result.suggested_filename("Site"), "quote-site.pdf");
    Ok(())
}

#[test]
fn test_quote_json_renders() -> TestResult {
    let doc: QuoteDocument = serde_json::from_str(QUOTE_JSON)?;
    assert_eq!(doc.line_items.len(), 2);
    assert_eq!(doc.line_item_subtotal(), 1700.5);

    let orchestrator = PipelineBuilder::new()
        .with_tiers(vec![Arc::new(MinimalFormatRenderer)])
        .build()?;
    let pdf = GeneratedPdf::from_bytes(orchestrator.render_blocking(&doc).bytes)?;
    assert_pdf_contains_text!(pdf, "Issued 2024-05-02");
    assert_pdf_contains_text!(pdf, "Client: Ada Lovelace (ada@example.com)");
    assert_pdf_contains_text!(pdf, "Time: 20 hours");
    Ok(())
}
