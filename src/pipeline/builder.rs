// src/pipeline/builder.rs
use super::config::RenderConfig;
use super::orchestrator::RenderOrchestrator;
use crate::error::PipelineError;
use crate::render::browser::BrowserRenderer;
use crate::render::drawing::VectorDrawingRenderer;
use crate::render::minimal::MinimalFormatRenderer;
use crate::render::TierRenderer;
use std::path::Path;
use std::sync::Arc;

/// A builder for creating a [`RenderOrchestrator`].
///
/// By default the tiers are Browser, VectorDrawing and MinimalFormat, built
/// from [`RenderConfig::default`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: RenderConfig,
    tiers: Option<Vec<Arc<dyn TierRenderer>>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads configuration from an optional file plus `ESTIMO__*` variables.
    pub fn with_config_file(mut self, path: Option<&Path>) -> Result<Self, PipelineError> {
        self.config = RenderConfig::load(path)?;
        Ok(self)
    }

    /// Replaces the default tier sequence. The raw markup fallback is always appended.
    pub fn with_tiers(mut self, tiers: Vec<Arc<dyn TierRenderer>>) -> Self {
        self.tiers = Some(tiers);
        self
    }

    pub fn without_browser(mut self) -> Self {
        self.config.browser.enabled = false;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn build(self) -> Result<RenderOrchestrator, PipelineError> {
        self.config.validate()?;
        let tiers = match self.tiers {
            Some(tiers) => tiers,
            None => default_tiers(&self.config),
        };
        let orchestrator = RenderOrchestrator::new(tiers);
        log::info!("[PIPELINE] Built {:?}", orchestrator);
        Ok(orchestrator)
    }
}

fn default_tiers(config: &RenderConfig) -> Vec<Arc<dyn TierRenderer>> {
    let mut tiers: Vec<Arc<dyn TierRenderer>> = Vec::with_capacity(3);
    if config.browser.enabled {
        tiers.push(Arc::new(BrowserRenderer::new(config.browser.clone())));
    }
    tiers.push(Arc::new(VectorDrawingRenderer::new(&config.drawing)));
    tiers.push(Arc::new(MinimalFormatRenderer));
    tiers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderTier;

    #[test]
    fn default_order_is_browser_vector_minimal() {
        let orchestrator = PipelineBuilder::new().build().unwrap();
        assert_eq!(
            orchestrator.tier_order(),
            vec![RenderTier::Browser, RenderTier::VectorDrawing, RenderTier::MinimalFormat]
        );
    }

    #[test]
    fn without_browser_drops_the_first_tier() {
        let orchestrator = PipelineBuilder::new().without_browser().build().unwrap();
        assert_eq!(orchestrator.tier_order(), vec![RenderTier::VectorDrawing, RenderTier::MinimalFormat]);
    }

    #[test]
    fn invalid_config_fails_the_build() {
        let mut config = RenderConfig::default();
        config.drawing.tax_rate = f64::NAN;
        assert!(matches!(PipelineBuilder::new().with_config(config).build(), Err(PipelineError::Config(_))));
    }
}
