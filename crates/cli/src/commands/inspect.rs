//! Plan and registry inspection commands

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;

use stepforge_common::input;
use stepforge_synth::{GenerationPlan, PatternRegistry};

use super::Context;
use crate::output::{print_info, print_list, print_warning, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct InspectArgs {
    /// Analysis document (.json, .yaml or .yml)
    #[arg(required = true)]
    pub input: PathBuf,
}

/// One resolved step
#[derive(Debug, Clone, Serialize)]
pub struct PlanRow {
    pub category: String,
    pub text: String,
    pub resolution: String,
}

impl TableDisplay for PlanRow {
    fn headers() -> Vec<&'static str> {
        vec!["Category", "Step", "Resolution"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.category.clone(),
            self.text.clone(),
            self.resolution.clone(),
        ]
    }
}

/// One registry entry
#[derive(Debug, Clone, Serialize)]
pub struct PatternRow {
    pub category: String,
    pub order: usize,
    pub name: String,
    pub pattern: String,
}

impl TableDisplay for PatternRow {
    fn headers() -> Vec<&'static str> {
        vec!["Category", "Order", "Name", "Pattern"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.category.clone(),
            self.order.to_string(),
            self.name.clone(),
            self.pattern.clone(),
        ]
    }
}

pub fn plan_rows(plan: &GenerationPlan) -> Vec<PlanRow> {
    plan.steps()
        .map(|planned| PlanRow {
            category: planned.step.category.keyword().to_string(),
            text: planned.step.text.clone(),
            resolution: planned.resolution.label(),
        })
        .collect()
}

pub fn pattern_rows(registry: &PatternRegistry) -> Vec<PatternRow> {
    registry
        .iter()
        .map(|(category, order, pattern)| PatternRow {
            category: category.keyword().to_string(),
            order,
            name: pattern.name().to_string(),
            pattern: pattern.pattern().to_string(),
        })
        .collect()
}

pub fn execute(args: InspectArgs, ctx: &Context) -> anyhow::Result<()> {
    let analysis = input::from_file(&args.input)
        .with_context(|| format!("Failed to load analysis from {}", args.input.display()))?;
    let plan = ctx.generator().plan(&analysis);

    print_list(&plan_rows(&plan), ctx.format);
    for collision in &plan.collisions {
        print_warning(&format!(
            "'{}' is bound under {}",
            collision.text,
            collision.bindings()
        ));
    }
    if ctx.format == OutputFormat::Table {
        print_info(&format!(
            "{}: {} unique step(s), {} stub(s)",
            plan.feature_name,
            plan.step_count(),
            plan.stub_count()
        ));
    }
    Ok(())
}

pub fn execute_patterns(ctx: &Context) -> anyhow::Result<()> {
    print_list(&pattern_rows(ctx.generator().registry()), ctx.format);
    Ok(())
}
