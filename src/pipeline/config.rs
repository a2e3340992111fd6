// src/pipeline/config.rs
use crate::error::PipelineError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix for environment overrides, e.g. `ESTIMO__BROWSER__TIMEOUT_MS=5000`.
pub const ENV_PREFIX: &str = "ESTIMO";

/// All tunables of the rendering pipeline.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub browser: BrowserConfig,
    pub drawing: DrawingConfig,
}

/// Settings for the headless browser tier.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrowserConfig {
    pub enabled: bool,
    /// Explicit executable. When unset, well-known Chromium names are tried in order.
    pub executable: Option<PathBuf>,
    pub timeout_ms: u64,
    /// Virtual time the page gets to settle before printing.
    pub settle_ms: u64,
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            executable: None,
            timeout_ms: 60_000,
            settle_ms: 1_000,
            extra_args: Vec::new(),
        }
    }
}

impl BrowserConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Settings for the vector drawing tier.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DrawingConfig {
    pub tax_rate: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self { tax_rate: 0.20 }
    }
}

impl RenderConfig {
    /// Layers defaults, an optional config file, then `ESTIMO__*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, PipelineError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            if !path.exists() {
                return Err(PipelineError::Config(format!("Config file '{}' does not exist", path.display())));
            }
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(" ")
                .with_list_parse_key("browser.extra_args")
                .try_parsing(true),
        );

        let loaded: RenderConfig = builder.build()?.try_deserialize()?;
        loaded.validate()?;
        log::debug!("[CONFIG] Loaded render configuration: {:?}", loaded);
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.drawing.tax_rate.is_finite() || self.drawing.tax_rate < 0.0 {
            return Err(PipelineError::Config(format!("Invalid tax rate: {}", self.drawing.tax_rate)));
        }
        if self.browser.timeout_ms == 0 {
            return Err(PipelineError::Config("Browser timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}
