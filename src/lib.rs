//! Renders quotes to PDF through an ordered chain of rendering tiers.
//!
//! The chain is headless browser, vector drawing, then a hand-written minimal
//! PDF. If all of them fail the synthesized HTML is returned instead, so
//! [`RenderOrchestrator::render`] always produces bytes. [`ContentKind`] tells
//! the caller which kind it got.

pub mod error;
pub mod pipeline;
pub mod render;
pub mod storage;
pub mod templating;

pub use error::{PipelineError, RenderError};
pub use estimo_types::{EstimateValue, LineItem, QuoteDocument};
pub use pipeline::{
    BrowserConfig, ContentKind, DrawingConfig, PipelineBuilder, RenderConfig, RenderOrchestrator, RenderResult,
    RenderState,
};
pub use render::{RenderInput, RenderTier, TierRenderer};
pub use templating::{synthesize, MarkupDocument};
