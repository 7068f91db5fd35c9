//! Module assembly
//!
//! Sections are emitted in a fixed order: header, imports, page objects,
//! lifecycle hooks, `Given`/`When`/`Then` blocks, helpers. Sections are
//! separated by one blank line and the module ends with a single newline.

use tracing::debug;

use stepforge_common::{AnalysisResult, Result, StepCategory};

use crate::collision::{enforce, find_collisions};
use crate::dedup::unique_steps;
use crate::helpers;
use crate::js::{comment_text, string_literal};
use crate::options::GeneratorOptions;
use crate::page_objects::{bind, PageObjectBindings};
use crate::patterns::PatternRegistry;
use crate::plan::{GenerationPlan, PlannedStep, Resolution, StepBlock};
use crate::synthesize::{synthesize, StubKind, COMPLETION_MARKER};

/// Combines registry matches, stubs and helpers into one module
#[derive(Debug, Clone, Copy)]
pub struct TemplateAssembler<'a> {
    registry: &'a PatternRegistry,
    options: &'a GeneratorOptions,
}

impl<'a> TemplateAssembler<'a> {
    pub fn new(registry: &'a PatternRegistry, options: &'a GeneratorOptions) -> Self {
        Self { registry, options }
    }

    /// Resolve every unique step to its implementation without rendering the module
    pub fn plan(&self, analysis: &AnalysisResult) -> GenerationPlan {
        let architecture = &analysis.technical_architecture;
        let mut blocks = Vec::with_capacity(StepCategory::ALL.len());

        for category in StepCategory::ALL {
            let steps = unique_steps(&analysis.cucumber_scenarios, category)
                .into_iter()
                .map(|step| {
                    let (resolution, code) = match self.registry.match_step(step) {
                        Some(pattern) => (
                            Resolution::Pattern(pattern.name().to_string()),
                            pattern.generate(step, architecture),
                        ),
                        None => (
                            Resolution::Stub(StubKind::classify(step)),
                            synthesize(step, architecture),
                        ),
                    };
                    debug!(
                        "{} '{}' -> {}",
                        category.keyword(),
                        step.text,
                        resolution.label()
                    );
                    PlannedStep {
                        step: step.clone(),
                        resolution,
                        code,
                    }
                })
                .collect();
            blocks.push(StepBlock { category, steps });
        }

        let collisions = find_collisions(
            blocks
                .iter()
                .flat_map(|block: &StepBlock| block.steps.iter().map(|planned| &planned.step)),
        );

        GenerationPlan {
            feature_name: analysis.feature_name.clone(),
            blocks,
            collisions,
        }
    }

    /// Render the complete module
    pub fn assemble(&self, analysis: &AnalysisResult) -> Result<String> {
        self.options.validate()?;
        let bindings = bind(&analysis.page_object_design, &self.options.page_object_dir)?;
        let plan = self.plan(analysis);
        enforce(self.options.collision_policy, &plan.collisions)?;

        let mut sections = vec![
            self.header(analysis),
            self.imports(analysis, &bindings),
        ];
        if let Some(instantiation) = &bindings.instantiation {
            sections.push(instantiation.clone());
        }
        sections.push(self.hooks(&bindings));
        sections.extend(plan.blocks.iter().map(StepBlock::render));
        sections.push(helpers::render(analysis, &self.options.helpers));

        let mut module = sections.join("\n\n");
        module.push('\n');
        Ok(module)
    }

    fn header(&self, analysis: &AnalysisResult) -> String {
        format!(
            "// Step definitions for feature: {}\n\
             // Generated by stepforge. Implementations marked \"{}\" need manual completion.",
            comment_text(&analysis.feature_name),
            COMPLETION_MARKER
        )
    }

    fn imports(&self, analysis: &AnalysisResult, bindings: &PageObjectBindings) -> String {
        let support = self.options.support_dir.trim_end_matches('/');
        let support = if support.is_empty() { "." } else { support };

        let mut lines = vec![
            "const { Given, When, Then, Before, After } = require('@cucumber/cucumber');".to_string(),
            "const { expect } = require('@playwright/test');".to_string(),
            format!(
                "const {{ TestDataManager }} = require({});",
                string_literal(&format!("{}/test-data-manager", support))
            ),
        ];
        lines.extend(bindings.imports.iter().cloned());
        if !analysis.integration_points.is_empty() {
            lines.push(format!(
                "const {{ IntegrationValidator }} = require({});",
                string_literal(&format!("{}/integration-validator", support))
            ));
        }
        lines.join("\n")
    }

    fn hooks(&self, bindings: &PageObjectBindings) -> String {
        let mut out = String::from("// Lifecycle hooks\nBefore(async function () {\n");
        out.push_str("  this.testData = new TestDataManager();\n");
        if bindings.instantiation.is_some() {
            out.push_str("  initializePageObjects(this.page);\n");
            out.push_str("  this.pages = pages;\n");
        }
        out.push_str("  await setupFeatureContext(this);\n});\n\n");
        out.push_str("After(async function () {\n");
        out.push_str("  await this.testData.cleanup();\n");
        out.push_str("  await cleanupFeatureContext(this);\n});");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepforge_common::{IntegrationPoint, PageObjectSpec, Scenario, Step};

    fn assemble(analysis: &AnalysisResult) -> String {
        let options = GeneratorOptions::default();
        TemplateAssembler::new(PatternRegistry::standard(), &options)
            .assemble(analysis)
            .unwrap()
    }

    fn position(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("missing section: {}", needle))
    }

    #[test]
    fn test_section_order() {
        let analysis = AnalysisResult::new("Ordering")
            .with_page_object(PageObjectSpec::new("main", "MainPage", "main-page"))
            .with_scenario(Scenario::new(vec![
                Step::then("the total is shown"),
                Step::when("I wait"),
                Step::given("a basket"),
            ]));
        let module = assemble(&analysis);

        let order = [
            "// Step definitions for feature: Ordering",
            "const { Given, When, Then, Before, After }",
            "// Page objects",
            "// Lifecycle hooks",
            "// Given steps",
            "// When steps",
            "// Then steps",
            "// Helper functions",
        ];
        let positions: Vec<_> = order.iter().map(|s| position(&module, s)).collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert!(module.ends_with("}\n"));
        assert!(!module.ends_with("\n\n"));
    }

    #[test]
    fn test_empty_analysis_has_all_fixed_sections() {
        let module = assemble(&AnalysisResult::new("Empty"));
        assert!(module.contains("// Given steps\n\n// When steps\n\n// Then steps\n\n// Helper functions"));
        assert!(!module.contains("// Page objects"));
        assert!(!module.contains("initializePageObjects"));
        assert!(!module.contains("IntegrationValidator"));
    }

    #[test]
    fn test_integration_validator_import_is_conditional() {
        let analysis = AnalysisResult::new("f").with_integration_point(IntegrationPoint::new("Billing"));
        let module = assemble(&analysis);
        assert!(module.contains(
            "const { IntegrationValidator } = require('../support/integration-validator');"
        ));
        assert!(module.contains("async function validateBillingIntegration(world) {"));
    }

    #[test]
    fn test_hooks_initialize_page_objects() {
        let analysis = AnalysisResult::new("f")
            .with_page_object(PageObjectSpec::new("main", "MainPage", "main-page"));
        let module = assemble(&analysis);
        assert!(module.contains(
            "Before(async function () {\n  this.testData = new TestDataManager();\n  \
             initializePageObjects(this.page);\n  this.pages = pages;\n  \
             await setupFeatureContext(this);\n});"
        ));
    }

    #[test]
    fn test_plan_resolutions() {
        let analysis = AnalysisResult::new("f").with_scenario(Scenario::new(vec![
            Step::given("the application is running"),
            Step::when("I scroll to the footer"),
        ]));
        let options = GeneratorOptions::default();
        let plan = TemplateAssembler::new(PatternRegistry::standard(), &options).plan(&analysis);

        assert_eq!(plan.step_count(), 2);
        assert_eq!(plan.stub_count(), 1);
        let given = plan.block(StepCategory::Precondition).unwrap();
        assert_eq!(
            given.steps[0].resolution,
            Resolution::Pattern("application-running".to_string())
        );
        let when = plan.block(StepCategory::Action).unwrap();
        assert_eq!(when.steps[0].resolution, Resolution::Stub(StubKind::Unimplemented));
    }

    #[test]
    fn test_custom_support_dir() {
        let options = GeneratorOptions {
            support_dir: "./support/".to_string(),
            ..GeneratorOptions::default()
        };
        let module = TemplateAssembler::new(PatternRegistry::standard(), &options)
            .assemble(&AnalysisResult::new("f"))
            .unwrap();
        assert!(module.contains("require('./support/test-data-manager');"));
    }
}
