// src/pipeline/orchestrator.rs
use crate::render::markup::MarkupFallback;
use crate::render::minimal;
use crate::render::{log_pdf_summary, validate_pdf, RenderInput, RenderTier, TierRenderer};
use crate::templating::synthesize;
use estimo_pdf_writer::has_pdf_magic;
use estimo_types::QuoteDocument;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::{Handle, RuntimeFlavor};

/// What the bytes of a [`RenderResult`] are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Pdf,
    Html,
}

impl ContentKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            ContentKind::Pdf => "application/pdf",
            ContentKind::Html => "text/html",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ContentKind::Pdf => "pdf",
            ContentKind::Html => "html",
        }
    }

    /// Guesses the kind from leading bytes, for callers holding bytes of
    /// unknown origin. Results from [`RenderOrchestrator`] are already labelled.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if has_pdf_magic(bytes) {
            return Some(ContentKind::Pdf);
        }
        let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
        let head = &bytes[start..bytes.len().min(start + 9)];
        if head.eq_ignore_ascii_case(b"<!doctype") || head.get(..5).is_some_and(|h| h.eq_ignore_ascii_case(b"<html")) {
            return Some(ContentKind::Html);
        }
        None
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentKind::Pdf => "pdf",
            ContentKind::Html => "html",
        })
    }
}

/// The rendered document. `Html` means every PDF tier failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub bytes: Vec<u8>,
    pub content_kind: ContentKind,
}

impl RenderResult {
    pub fn is_pdf(&self) -> bool {
        self.content_kind == ContentKind::Pdf
    }

    /// `quote-<slug-of-title>.<ext>`, or `quote.<ext>` for an empty title.
    pub fn suggested_filename(&self, title: &str) -> String {
        let slug = slug::slugify(title);
        let ext = self.content_kind.extension();
        if slug.is_empty() { format!("quote.{ext}") } else { format!("quote-{slug}.{ext}") }
    }
}

/// Progress through the tier sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    NotStarted,
    /// Attempting the tier at this index.
    TrySequence(usize),
    Succeeded,
    ExhaustedButFallbackUsed,
}

/// Runs the tiers in order and returns the first success.
///
/// Holds only immutable tiers, so one instance can serve concurrent renders.
pub struct RenderOrchestrator {
    tiers: Vec<Arc<dyn TierRenderer>>,
    fallback: MarkupFallback,
}

impl RenderOrchestrator {
    pub fn new(tiers: Vec<Arc<dyn TierRenderer>>) -> Self {
        Self { tiers, fallback: MarkupFallback }
    }

    /// The fallible tiers in attempt order. The raw markup tier always follows.
    pub fn tier_order(&self) -> Vec<RenderTier> {
        self.tiers.iter().map(|t| t.tier()).collect()
    }

    /// Renders `doc`. Never fails: if no PDF tier succeeds the markup itself is
    /// returned as [`ContentKind::Html`].
    pub async fn render(&self, doc: &QuoteDocument) -> RenderResult {
        let started = Instant::now();
        let markup = synthesize(doc);
        let input = RenderInput { document: doc, markup: &markup };
        let mut state = RenderState::NotStarted;
        log::debug!("[ORCHESTRATOR] {:?}: {} tier(s) configured.", state, self.tiers.len());

        for (index, tier) in self.tiers.iter().enumerate() {
            state = RenderState::TrySequence(index);
            log::debug!("[ORCHESTRATOR] {:?}: trying {}.", state, tier.tier());

            // Every tier's output must carry the PDF magic.
            match tier.render(input).await.and_then(|bytes| validate_pdf(&bytes).map(|()| bytes)) {
                Ok(bytes) => {
                    state = RenderState::Succeeded;
                    log::info!(
                        "[ORCHESTRATOR] {:?} with {} ({} bytes) in {:?}.",
                        state,
                        tier.tier(),
                        bytes.len(),
                        started.elapsed()
                    );
                    log_pdf_summary(tier.tier(), &bytes);
                    return RenderResult { bytes, content_kind: ContentKind::Pdf };
                }
                Err(e) => log::warn!("[ORCHESTRATOR] {} failed: {}", tier.tier(), e),
            }
        }

        state = RenderState::ExhaustedButFallbackUsed;
        log::warn!("[ORCHESTRATOR] {:?}: falling back to {}.", state, self.fallback.tier());
        RenderResult { bytes: self.fallback.render(&markup), content_kind: ContentKind::Html }
    }

    /// Drives [`Self::render`] to completion from synchronous code.
    ///
    /// Outside a runtime a private current-thread runtime is built. Inside a
    /// multi-thread runtime the worker is handed over with `block_in_place`.
    /// A current-thread runtime cannot be blocked, so the minimal serializer is
    /// used directly there, as it is when no runtime can be built.
    pub fn render_blocking(&self, doc: &QuoteDocument) -> RenderResult {
        if let Ok(handle) = Handle::try_current() {
            if handle.runtime_flavor() == RuntimeFlavor::MultiThread {
                return tokio::task::block_in_place(|| handle.block_on(self.render(doc)));
            }
            log::warn!(
                "[ORCHESTRATOR] Blocking render inside a current-thread runtime; using {}.",
                RenderTier::MinimalFormat
            );
            return Self::minimal_result(doc);
        }
        match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime.block_on(self.render(doc)),
            Err(e) => {
                log::warn!("[ORCHESTRATOR] Could not start a runtime ({}); using {}.", e, RenderTier::MinimalFormat);
                Self::minimal_result(doc)
            }
        }
    }

    fn minimal_result(doc: &QuoteDocument) -> RenderResult {
        RenderResult { bytes: minimal::serialize(doc), content_kind: ContentKind::Pdf }
    }
}

impl fmt::Debug for RenderOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOrchestrator").field("tiers", &self.tier_order()).finish()
    }
}
