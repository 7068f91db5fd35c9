//! CLI Commands

pub mod generate;
pub mod inspect;
pub mod verify;

use stepforge_synth::StepDefinitionGenerator;

use crate::config::CliConfig;
use crate::output::OutputFormat;

/// Settings shared by every command
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub config: CliConfig,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config: CliConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    /// Generator over the built-in registry with the configured options
    pub fn generator(&self) -> StepDefinitionGenerator<'static> {
        StepDefinitionGenerator::new().with_options(self.config.generator.clone())
    }
}
