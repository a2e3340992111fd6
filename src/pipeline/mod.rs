//! Tier sequencing and its configuration.
//!
//! - [`PipelineBuilder`]: assembles a [`RenderOrchestrator`] from a [`RenderConfig`]
//! - [`RenderOrchestrator`]: tries each tier in order and always returns a [`RenderResult`]
//!
//! # Example
//!
//! ```ignore
//! use estimo::{PipelineBuilder, RenderConfig};
//!
//! let orchestrator = PipelineBuilder::new()
//!     .with_config(RenderConfig::load(None)?)
//!     .build()?;
//!
//! let result = orchestrator.render(&quote).await;
//! std::fs::write(result.suggested_filename(&quote.title), &result.bytes)?;
//! ```

pub mod builder;
pub mod config;
pub mod orchestrator;

pub use builder::PipelineBuilder;
pub use config::{BrowserConfig, DrawingConfig, RenderConfig};
pub use orchestrator::{ContentKind, RenderOrchestrator, RenderResult, RenderState};
