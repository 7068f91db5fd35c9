//! Generator entry point

use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use stepforge_common::{AnalysisResult, Result};

use crate::assemble::TemplateAssembler;
use crate::js::slug;
use crate::options::GeneratorOptions;
use crate::patterns::PatternRegistry;
use crate::plan::GenerationPlan;

/// File suffix of generated modules
pub const MODULE_SUFFIX: &str = ".steps.js";

/// A rendered step-definition module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedModule {
    pub feature_name: String,
    /// Suggested file name, `<feature-slug>.steps.js`
    pub file_name: String,
    pub source: String,
}

impl GeneratedModule {
    /// SHA-256 of the module source, hex encoded
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Destination inside `dir`
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }
}

/// Turns analysis results into step-definition modules
#[derive(Debug, Clone)]
pub struct StepDefinitionGenerator<'r> {
    registry: &'r PatternRegistry,
    options: GeneratorOptions,
}

impl Default for StepDefinitionGenerator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl StepDefinitionGenerator<'static> {
    /// Generator over the built-in registry with default options
    pub fn new() -> Self {
        Self {
            registry: PatternRegistry::standard(),
            options: GeneratorOptions::default(),
        }
    }
}

impl<'r> StepDefinitionGenerator<'r> {
    /// Generator over a caller-supplied registry
    pub fn with_registry(registry: &'r PatternRegistry) -> Self {
        Self {
            registry,
            options: GeneratorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &PatternRegistry {
        self.registry
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn assembler(&self) -> TemplateAssembler<'_> {
        TemplateAssembler::new(self.registry, &self.options)
    }

    /// Resolve steps without rendering
    pub fn plan(&self, analysis: &AnalysisResult) -> GenerationPlan {
        self.assembler().plan(analysis)
    }

    /// Render the module for one analysis result
    pub fn generate(&self, analysis: &AnalysisResult) -> Result<GeneratedModule> {
        let source = self.assembler().assemble(analysis)?;
        let module = GeneratedModule {
            feature_name: analysis.feature_name.clone(),
            file_name: format!("{}{}", slug(&analysis.feature_name), MODULE_SUFFIX),
            source,
        };
        info!(
            "Generated {} for feature '{}' ({} scenarios, {} bytes)",
            module.file_name,
            module.feature_name,
            analysis.cucumber_scenarios.len(),
            module.source.len()
        );
        Ok(module)
    }
}
