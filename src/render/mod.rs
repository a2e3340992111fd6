// src/render/mod.rs
//! Rendering tiers.
//!
//! Every fallible tier implements [`TierRenderer`]. The orchestrator walks an
//! ordered list of them and, if all fail, hands the markup to
//! [`markup::MarkupFallback`], which cannot fail.

use crate::templating::MarkupDocument;
use async_trait::async_trait;
use estimo_pdf_writer::has_pdf_magic;
use estimo_types::QuoteDocument;
use std::fmt;

pub use crate::error::RenderError;

pub mod browser;
pub mod drawing;
pub mod markup;
pub mod minimal;

/// Identifies a tier in logs and in the fallback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTier {
    Browser,
    VectorDrawing,
    MinimalFormat,
    RawMarkup,
}

impl fmt::Display for RenderTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderTier::Browser => "browser",
            RenderTier::VectorDrawing => "vector-drawing",
            RenderTier::MinimalFormat => "minimal-format",
            RenderTier::RawMarkup => "raw-markup",
        };
        f.write_str(name)
    }
}

/// Everything a tier may read. The markup is synthesized once per render call
/// and shared by the tiers that need it.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub document: &'a QuoteDocument,
    pub markup: &'a MarkupDocument,
}

/// A rendering strategy that produces PDF bytes or explains why it could not.
#[async_trait]
pub trait TierRenderer: Send + Sync {
    fn tier(&self) -> RenderTier;

    async fn render(&self, input: RenderInput<'_>) -> Result<Vec<u8>, RenderError>;
}

/// Rejects empty output and output that does not start with `%PDF`.
pub fn validate_pdf(bytes: &[u8]) -> Result<(), RenderError> {
    if bytes.is_empty() {
        return Err(RenderError::InvalidOutput("PDF buffer is empty".to_string()));
    }
    if !has_pdf_magic(bytes) {
        let head = String::from_utf8_lossy(&bytes[..bytes.len().min(4)]).into_owned();
        return Err(RenderError::InvalidOutput(format!("Invalid PDF header: {head:?}")));
    }
    Ok(())
}

/// Logs size, leading and trailing bytes of a produced document.
pub fn log_pdf_summary(tier: RenderTier, bytes: &[u8]) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    let head = &bytes[..bytes.len().min(8)];
    let tail = &bytes[bytes.len().saturating_sub(8)..];
    log::debug!(
        "[{}] {} bytes, head={} tail={} valid_magic={}",
        tier,
        bytes.len(),
        to_hex(head),
        to_hex(tail),
        has_pdf_magic(bytes)
    );
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_pdf_rejects_empty_and_foreign_bytes() {
        assert!(matches!(validate_pdf(b""), Err(RenderError::InvalidOutput(_))));
        assert!(matches!(validate_pdf(b"<html>"), Err(RenderError::InvalidOutput(_))));
        assert!(matches!(validate_pdf(b"%PD"), Err(RenderError::InvalidOutput(_))));
        assert!(validate_pdf(b"%PDF-1.7\n").is_ok());
    }

    #[test]
    fn hex_is_lowercase_pairs() {
        assert_eq!(to_hex(b"%PDF"), "25504446");
    }
}
