//! Idempotence check against a previously generated module

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use tracing::debug;

use stepforge_common::input;
use stepforge_synth::StepDefinitionGenerator;

use super::Context;
use crate::output::{print_error, print_success};

#[derive(Args)]
pub struct VerifyArgs {
    /// Analysis document (.json, .yaml or .yml)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Previously generated module
    #[arg(required = true)]
    pub existing: PathBuf,
}

/// Result of comparing a regenerated module with a file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    UpToDate { digest: String },
    /// First differing line, 1-based
    Differs { line: usize },
}

/// Regenerate from `input` and compare with `existing`
pub fn verify(
    input_path: &Path,
    existing: &Path,
    generator: &StepDefinitionGenerator<'_>,
) -> anyhow::Result<Verification> {
    let analysis = input::from_file(input_path)
        .with_context(|| format!("Failed to load analysis from {}", input_path.display()))?;
    let module = generator.generate(&analysis)?;
    let current = std::fs::read_to_string(existing)
        .with_context(|| format!("Failed to read {}", existing.display()))?;

    if current == module.source {
        return Ok(Verification::UpToDate {
            digest: module.digest(),
        });
    }

    // Equal line prefixes with unequal text means only the trailing newline differs
    let line = module
        .source
        .lines()
        .zip(current.lines())
        .take_while(|(expected, actual)| expected == actual)
        .count()
        + 1;
    debug!("{} differs from regenerated output at line {}", existing.display(), line);
    Ok(Verification::Differs { line })
}

/// Returns whether the existing module is up to date
pub fn execute(args: VerifyArgs, ctx: &Context) -> anyhow::Result<bool> {
    match verify(&args.input, &args.existing, &ctx.generator())? {
        Verification::UpToDate { digest } => {
            print_success(&format!(
                "{} is up to date (sha256 {})",
                args.existing.display(),
                digest
            ));
            Ok(true)
        }
        Verification::Differs { line } => {
            print_error(&format!(
                "{} differs from regenerated output at line {}",
                args.existing.display(),
                line
            ));
            Ok(false)
        }
    }
}
