//! Helper-function library appended to every generated module

use std::collections::HashSet;

use stepforge_common::{AnalysisResult, IntegrationPoint};

use crate::js::{comment_text, pascal_case, string_literal};
use crate::options::HelperDefaults;

/// Kinds of test data with generated setup and cleanup helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Project,
    Feature,
    Estimate,
    User,
}

impl DataKind {
    pub const ALL: [DataKind; 4] = [
        DataKind::Project,
        DataKind::Feature,
        DataKind::Estimate,
        DataKind::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Project => "project",
            DataKind::Feature => "feature",
            DataKind::Estimate => "estimate",
            DataKind::User => "user",
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            DataKind::Project => "Project",
            DataKind::Feature => "Feature",
            DataKind::Estimate => "Estimate",
            DataKind::User => "User",
        }
    }
}

/// Names of the per-integration validation helpers, one per distinct name
pub fn integration_helper_names(points: &[IntegrationPoint]) -> Vec<(String, &str)> {
    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut helpers = Vec::new();

    for point in points {
        if !seen_names.insert(point.name.as_str()) {
            continue;
        }
        let mut base = pascal_case(&point.name);
        if base.is_empty() {
            base = "Unnamed".to_string();
        }
        let mut function = format!("validate{}Integration", base);
        let mut suffix = 2;
        while !used.insert(function.clone()) {
            function = format!("validate{}{}Integration", base, suffix);
            suffix += 1;
        }
        helpers.push((function, point.name.as_str()));
    }

    helpers
}

/// Render the helper block
pub fn render(analysis: &AnalysisResult, defaults: &HelperDefaults) -> String {
    let mut out = String::from("// Helper functions\n");
    out.push_str(&format!(
        "const DEFAULT_WAIT_TIMEOUT = {};\n",
        defaults.wait_timeout_ms
    ));
    out.push_str(&format!(
        "const DEFAULT_RETRY_COUNT = {};\n",
        defaults.retry_count
    ));
    out.push_str(&format!(
        "const DEFAULT_RETRY_DELAY = {};\n",
        defaults.retry_delay_ms
    ));

    // serde_json maps are key-sorted, so the serialized form is stable
    let mocks = analysis
        .mock_requirements
        .as_ref()
        .filter(|value| !value.is_null())
        .map(|value| value.to_string());
    if let Some(json) = &mocks {
        out.push_str(&format!(
            "const MOCK_REQUIREMENTS = JSON.parse({});\n",
            string_literal(json)
        ));
    }

    out.push_str("\nasync function setupFeatureContext(world) {\n");
    out.push_str(&format!(
        "  // Feature-specific setup for: {}\n",
        comment_text(&analysis.feature_name)
    ));
    out.push_str(&format!(
        "  world.featureName = {};\n",
        string_literal(&analysis.feature_name)
    ));
    if mocks.is_some() {
        out.push_str("  world.mockRequirements = MOCK_REQUIREMENTS;\n");
    }
    out.push_str("}\n");

    out.push_str("\nasync function cleanupFeatureContext(world) {\n");
    out.push_str("  world.featureName = undefined;\n");
    if mocks.is_some() {
        out.push_str("  world.mockRequirements = undefined;\n");
    }
    out.push_str("}\n");

    for kind in DataKind::ALL {
        out.push_str(&format!(
            "\nasync function setup{name}Data(world, overrides = {{}}) {{\n  \
             const record = await world.testData.create{name}(overrides);\n  \
             world.testData.register('{kind}', record);\n  \
             return record;\n\
             }}\n",
            name = kind.type_name(),
            kind = kind.as_str()
        ));
        out.push_str(&format!(
            "\nasync function cleanup{name}Data(world) {{\n  \
             await world.testData.cleanup('{kind}');\n\
             }}\n",
            name = kind.type_name(),
            kind = kind.as_str()
        ));
    }

    out.push_str(
        "\nasync function waitForElement(page, selector, timeout = DEFAULT_WAIT_TIMEOUT) {\n  \
         await page.waitForSelector(selector, { state: 'visible', timeout });\n  \
         return page.locator(selector);\n\
         }\n",
    );

    out.push_str(
        "\nasync function retryAction(action, retries = DEFAULT_RETRY_COUNT, delay = DEFAULT_RETRY_DELAY) {\n  \
         let lastError;\n  \
         for (let attempt = 1; attempt <= retries; attempt++) {\n    \
         try {\n      \
         return await action();\n    \
         } catch (error) {\n      \
         lastError = error;\n      \
         if (attempt < retries) {\n        \
         await new Promise((resolve) => setTimeout(resolve, delay));\n      \
         }\n    \
         }\n  \
         }\n  \
         throw lastError;\n\
         }\n",
    );

    for (function, name) in integration_helper_names(&analysis.integration_points) {
        out.push_str(&format!(
            "\nasync function {}(world) {{\n  \
             const validator = new IntegrationValidator(world);\n  \
             return validator.validate({});\n\
             }}\n",
            function,
            string_literal(name)
        ));
    }

    // Sections are joined by the assembler; drop the final newline
    out.pop();
    out
}
