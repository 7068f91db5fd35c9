//! Module generation commands

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use clap::Args;
use serde::Serialize;
use tracing::info;

use stepforge_common::input;
use stepforge_synth::{GeneratedModule, StepDefinitionGenerator};

use super::Context;
use crate::output::{print_list, print_success, TableDisplay};

#[derive(Args)]
pub struct GenerateArgs {
    /// Analysis document (.json, .yaml or .yml)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file; the module is written to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateAllArgs {
    /// Directory of analysis documents
    #[arg(required = true)]
    pub dir: PathBuf,

    /// Output directory [default: output.dir from the config file]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// One written module
#[derive(Debug, Clone, Serialize)]
pub struct WrittenModule {
    pub feature: String,
    pub source: PathBuf,
    pub path: PathBuf,
    pub digest: String,
}

impl TableDisplay for WrittenModule {
    fn headers() -> Vec<&'static str> {
        vec!["Feature", "Input", "Output", "SHA-256"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.feature.clone(),
            self.source.display().to_string(),
            self.path.display().to_string(),
            self.digest[..12].to_string(),
        ]
    }
}

pub fn execute(args: GenerateArgs, ctx: &Context) -> anyhow::Result<()> {
    let analysis = input::from_file(&args.input)
        .with_context(|| format!("Failed to load analysis from {}", args.input.display()))?;
    let module = ctx.generator().generate(&analysis)?;

    match args.output {
        Some(path) => {
            write_module(&path, &module, ctx.config.output.overwrite)?;
            info!("Wrote {} (sha256 {})", path.display(), module.digest());
            print_success(&format!(
                "Generated step definitions for '{}' at {}",
                module.feature_name,
                path.display()
            ));
        }
        None => {
            info!("Generated {} (sha256 {})", module.file_name, module.digest());
            print!("{}", module.source);
        }
    }

    Ok(())
}

pub fn execute_all(args: GenerateAllArgs, ctx: &Context) -> anyhow::Result<()> {
    let out_dir = args
        .output
        .unwrap_or_else(|| ctx.config.output.dir.clone());
    let written = generate_all(&args.dir, &out_dir, &ctx.generator(), ctx.config.output.overwrite)?;

    print_list(&written, ctx.format);
    print_success(&format!(
        "Generated {} module(s) into {}",
        written.len(),
        out_dir.display()
    ));
    Ok(())
}

/// Generate one module per analysis document in `dir` and write them into `out_dir`.
///
/// Every document is loaded and generated, and every destination checked,
/// before the first file is written.
pub fn generate_all(
    dir: &Path,
    out_dir: &Path,
    generator: &StepDefinitionGenerator<'_>,
    overwrite: bool,
) -> anyhow::Result<Vec<WrittenModule>> {
    let documents = input::load_all(dir)
        .with_context(|| format!("Failed to load analyses from {}", dir.display()))?;
    if documents.is_empty() {
        bail!("No analysis documents found in {}", dir.display());
    }

    let mut modules = Vec::with_capacity(documents.len());
    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    for (source, analysis) in documents {
        let module = generator
            .generate(&analysis)
            .with_context(|| format!("Failed to generate from {}", source.display()))?;
        if let Some(previous) = claimed.insert(module.file_name.clone(), source.clone()) {
            bail!(
                "{} and {} both generate {}",
                previous.display(),
                source.display(),
                module.file_name
            );
        }
        let path = module.path_in(out_dir);
        if !overwrite && path.exists() {
            bail!("Refusing to overwrite {}", path.display());
        }
        modules.push((source, path, module));
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(modules.len());
    for (source, path, module) in modules {
        write_module(&path, &module, true)?;
        info!("Wrote {} (sha256 {})", path.display(), module.digest());
        written.push(WrittenModule {
            feature: module.feature_name.clone(),
            source,
            digest: module.digest(),
            path,
        });
    }

    Ok(written)
}

fn write_module(path: &Path, module: &GeneratedModule, overwrite: bool) -> anyhow::Result<()> {
    if !overwrite && path.exists() {
        bail!("Refusing to overwrite {}", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, &module.source)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
