// src/render/markup.rs
//! The terminal tier. It hands back the synthesized markup itself.

use super::RenderTier;
use crate::templating::MarkupDocument;

/// Returns the markup bytes unchanged. There is no failure path, which is why
/// this type does not implement [`super::TierRenderer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupFallback;

impl MarkupFallback {
    pub fn tier(&self) -> RenderTier {
        RenderTier::RawMarkup
    }

    pub fn render(&self, markup: &MarkupDocument) -> Vec<u8> {
        log::warn!("[{}] Returning {} bytes of markup instead of a PDF.", self.tier(), markup.len());
        markup.as_bytes().to_vec()
    }
}
