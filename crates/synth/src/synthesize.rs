//! Stub synthesis for steps no registered pattern recognizes
//!
//! The body is picked by lexical heuristics on the step text. Every stub
//! carries the completion marker and is a complete, bindable implementation.

use serde::Serialize;

use stepforge_common::{Step, StepCategory, TechnicalArchitecture};

use crate::extract::{
    extract_element, extract_expected_content, extract_expected_text, extract_field,
    extract_value,
};
use crate::js::{attribute_selector, comment_text, step_block, string_literal};

/// Comment prefix flagging generated code that needs manual follow-up
pub const COMPLETION_MARKER: &str = "TODO: implement step";

/// Body chosen for a synthesized stub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StubKind {
    ProjectData,
    FeatureData,
    Click,
    TypedInput,
    Visibility,
    Containment,
    Unimplemented,
}

impl StubKind {
    /// Classify a step by its category and wording
    pub fn classify(step: &Step) -> Self {
        let text = step.text.to_lowercase();
        match step.category {
            StepCategory::Precondition if text.contains("project") => StubKind::ProjectData,
            StepCategory::Precondition if text.contains("feature") => StubKind::FeatureData,
            StepCategory::Action if text.contains("click") => StubKind::Click,
            StepCategory::Action if text.contains("enter") || text.contains("type") => {
                StubKind::TypedInput
            }
            StepCategory::Verification if text.contains("should see") => StubKind::Visibility,
            StepCategory::Verification if text.contains("should contain") => {
                StubKind::Containment
            }
            _ => StubKind::Unimplemented,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StubKind::ProjectData => "project-data",
            StubKind::FeatureData => "feature-data",
            StubKind::Click => "click",
            StubKind::TypedInput => "typed-input",
            StubKind::Visibility => "visibility",
            StubKind::Containment => "containment",
            StubKind::Unimplemented => "unimplemented",
        }
    }
}

/// Render a stub implementation for `step`
pub fn synthesize(step: &Step, architecture: &TechnicalArchitecture) -> String {
    let kind = StubKind::classify(step);
    let mut body = vec![format!("// {}: {}", COMPLETION_MARKER, comment_text(&step.text))];

    match kind {
        StubKind::ProjectData => {
            body.push(format!(
                "const project = await this.testData.createProject({{ name: {} }});",
                string_literal(extract_value(&step.text))
            ));
            body.push("this.testData.register('project', project);".to_string());
            body.push("this.project = project;".to_string());
        }
        StubKind::FeatureData => {
            body.push(format!(
                "const feature = await this.testData.createFeature({{ name: {}, projectId: this.project ? this.project.id : undefined }});",
                string_literal(extract_value(&step.text))
            ));
            body.push("this.testData.register('feature', feature);".to_string());
            body.push("this.feature = feature;".to_string());
        }
        StubKind::Click => {
            let selector = attribute_selector(architecture, extract_element(&step.text), "-btn");
            body.push(format!("await this.page.click({});", string_literal(&selector)));
        }
        StubKind::TypedInput => {
            let selector = attribute_selector(architecture, extract_field(&step.text), "-input");
            body.push(format!(
                "await this.page.fill({}, {});",
                string_literal(&selector),
                string_literal(extract_value(&step.text))
            ));
        }
        StubKind::Visibility => {
            body.push(format!(
                "await expect(this.page.getByText({})).toBeVisible();",
                string_literal(extract_expected_text(&step.text))
            ));
        }
        StubKind::Containment => {
            body.push(format!(
                "await expect(this.page.locator('body')).toContainText({});",
                string_literal(extract_expected_content(&step.text))
            ));
        }
        StubKind::Unimplemented => {
            body.push("return 'pending';".to_string());
        }
    }

    step_block(step, &body)
}
