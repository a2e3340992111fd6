pub mod fixtures;
pub mod pdf_assertions;

use async_trait::async_trait;
use estimo::{RenderError, RenderInput, RenderTier, TierRenderer};
use lopdf::Document as LopdfDocument;
use std::sync::atomic::{AtomicUsize, Ordering};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }
}

/// A tier that always fails the way the named tier would, counting its calls.
pub struct SimulatedFailure {
    pub tier: RenderTier,
    pub calls: AtomicUsize,
}

impl SimulatedFailure {
    pub fn new(tier: RenderTier) -> Self {
        Self { tier, calls: AtomicUsize::new(0) }
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TierRenderer for SimulatedFailure {
    fn tier(&self) -> RenderTier {
        self.tier
    }

    async fn render(&self, _input: RenderInput<'_>) -> Result<Vec<u8>, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(match self.tier {
            RenderTier::Browser => RenderError::ExternalProcessUnavailable("simulated".to_string()),
            RenderTier::VectorDrawing => RenderError::DrawingBackendError("simulated".to_string()),
            _ => RenderError::InvalidOutput("simulated".to_string()),
        })
    }
}
