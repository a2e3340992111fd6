// src/error.rs
use std::time::Duration;
use thiserror::Error;

/// Why a single rendering tier gave up.
///
/// These never reach the caller of [`crate::RenderOrchestrator::render`]; the
/// orchestrator logs them and moves on to the next tier.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("External rendering process is unavailable: {0}")]
    ExternalProcessUnavailable(String),

    #[error("Rendering exceeded the {0:?} deadline")]
    RenderTimeout(Duration),

    #[error("Renderer produced invalid output: {0}")]
    InvalidOutput(String),

    #[error("Drawing backend failed: {0}")]
    DrawingBackendError(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from building the pipeline, loading configuration, or storing output.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
