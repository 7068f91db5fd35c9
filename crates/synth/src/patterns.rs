//! Ordered step-pattern registry
//!
//! Patterns are kept in one list per category and evaluated in registration
//! order; the first matcher that accepts the step text wins. Reordering the
//! standard registry changes generated output.

use once_cell::sync::Lazy;
use regex::Regex;

use stepforge_common::{Error, Result, Step, StepCategory, TechnicalArchitecture};

use crate::extract::{quoted_literal, VALUE_FALLBACK};
use crate::js::{attribute_selector, selector_token, step_block, string_literal};

/// Renders one complete step implementation for a matched step
pub type Generator = fn(&Step, &TechnicalArchitecture) -> String;

/// A (matcher, generator) rule
#[derive(Clone)]
pub struct StepPattern {
    name: String,
    matcher: Regex,
    generator: Generator,
}

impl StepPattern {
    /// Build a pattern from a regular expression over the step text
    pub fn new(name: impl Into<String>, pattern: &str, generator: Generator) -> Result<Self> {
        let name = name.into();
        let matcher = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name,
            matcher,
            generator,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source of the matcher expression
    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    pub fn generate(&self, step: &Step, architecture: &TechnicalArchitecture) -> String {
        (self.generator)(step, architecture)
    }
}

impl std::fmt::Debug for StepPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepPattern")
            .field("name", &self.name)
            .field("pattern", &self.matcher.as_str())
            .finish()
    }
}

/// Immutable, category-partitioned pattern table
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    preconditions: Vec<StepPattern>,
    actions: Vec<StepPattern>,
    verifications: Vec<StepPattern>,
}

impl PatternRegistry {
    /// A registry with no patterns; every step falls through to stub synthesis
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in registry
    pub fn standard() -> &'static PatternRegistry {
        &STANDARD
    }

    /// Append a pattern after every pattern already registered for `category`
    pub fn register(mut self, category: StepCategory, pattern: StepPattern) -> Self {
        match category {
            StepCategory::Precondition => self.preconditions.push(pattern),
            StepCategory::Action => self.actions.push(pattern),
            StepCategory::Verification => self.verifications.push(pattern),
        }
        self
    }

    /// Patterns of a category in evaluation order
    pub fn patterns(&self, category: StepCategory) -> &[StepPattern] {
        match category {
            StepCategory::Precondition => &self.preconditions,
            StepCategory::Action => &self.actions,
            StepCategory::Verification => &self.verifications,
        }
    }

    /// First pattern of `category` whose matcher accepts `text`
    pub fn find(&self, category: StepCategory, text: &str) -> Option<&StepPattern> {
        self.patterns(category)
            .iter()
            .find(|pattern| pattern.matches(text))
    }

    /// First pattern matching a step under its own category
    pub fn match_step(&self, step: &Step) -> Option<&StepPattern> {
        self.find(step.category, &step.text)
    }

    /// Every pattern with its category and position, in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = (StepCategory, usize, &StepPattern)> {
        StepCategory::ALL.into_iter().flat_map(move |category| {
            self.patterns(category)
                .iter()
                .enumerate()
                .map(move |(position, pattern)| (category, position, pattern))
        })
    }

    pub fn len(&self) -> usize {
        self.preconditions.len() + self.actions.len() + self.verifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Standard registry
// ============================================================================

static STANDARD: Lazy<PatternRegistry> = Lazy::new(|| {
    use StepCategory::{Action, Precondition, Verification};

    PatternRegistry::empty()
        // Preconditions
        .register(Precondition, builtin("application-running", r"(?i)^the (?:.+ )?application is running$", application_running))
        .register(Precondition, builtin("on-page", r#"(?i)^I am on the "[^"]+" page$"#, on_page))
        .register(Precondition, builtin("logged-in", r#"(?i)^I am logged in as (?:an? )?"[^"]+"$"#, logged_in))
        .register(Precondition, builtin("project-exists", r#"(?i)^a project (?:named|called) "[^"]+" exists$"#, project_exists))
        // Actions
        .register(Action, builtin("click-button", r#"(?i)^I click (?:on )?the "[^"]+" button$"#, click_button))
        .register(Action, builtin("click-text", r#"(?i)^I click (?:on )?"[^"]+"$"#, click_text))
        .register(Action, builtin("fill-field", r#"(?i)^I (?:enter|type|fill in) "[^"]*" (?:in|into) the "[^"]+" field$"#, fill_field))
        .register(Action, builtin("navigate", r#"(?i)^I navigate to the "[^"]+" page$"#, on_page))
        .register(Action, builtin("open-modal", r#"(?i)^I open the "[^"]+" (?:modal|dialog)$"#, open_modal))
        // Verifications
        .register(Verification, builtin("see-modal", r#"(?i)^I should see the "[^"]+" (?:modal|dialog)$"#, see_modal))
        .register(Verification, builtin("see-notification", r#"(?i)^I should see an? (?:(?:success|error|info|warning) )?notification "[^"]+"$"#, see_notification))
        .register(Verification, builtin("see-text", r#"(?i)^I should see "[^"]+"$"#, see_text))
        .register(Verification, builtin("field-value", r#"(?i)^the "[^"]+" field should contain "[^"]*"$"#, field_value))
        .register(Verification, builtin("page-title", r#"(?i)^the page title should be "[^"]+"$"#, page_title))
});

fn builtin(name: &str, pattern: &str, generator: Generator) -> StepPattern {
    StepPattern::new(name, pattern, generator).expect("built-in step pattern compiles")
}

fn first(step: &Step) -> &str {
    quoted_literal(&step.text, 0, VALUE_FALLBACK)
}

fn second(step: &Step) -> &str {
    quoted_literal(&step.text, 1, VALUE_FALLBACK)
}

fn application_running(step: &Step, _: &TechnicalArchitecture) -> String {
    step_block(
        step,
        &[
            "expect(this.page).toBeDefined();",
            "await this.page.waitForLoadState('networkidle');",
        ],
    )
}

fn on_page(step: &Step, _: &TechnicalArchitecture) -> String {
    let route = format!("/{}", selector_token(first(step)));
    step_block(
        step,
        &[
            format!("await this.page.goto({});", string_literal(&route)),
            "await this.page.waitForLoadState('networkidle');".to_string(),
        ],
    )
}

fn logged_in(step: &Step, _: &TechnicalArchitecture) -> String {
    step_block(
        step,
        &[
            format!(
                "this.currentUser = await this.testData.createUser({{ role: {} }});",
                string_literal(first(step))
            ),
            "await this.page.evaluate((user) => window.localStorage.setItem('currentUser', JSON.stringify(user)), this.currentUser);".to_string(),
            "await this.page.reload();".to_string(),
            "await this.page.waitForLoadState('networkidle');".to_string(),
        ],
    )
}

fn project_exists(step: &Step, _: &TechnicalArchitecture) -> String {
    step_block(
        step,
        &[format!(
            "this.project = await setupProjectData(this, {{ name: {} }});",
            string_literal(first(step))
        )],
    )
}

fn click_button(step: &Step, architecture: &TechnicalArchitecture) -> String {
    let selector = attribute_selector(architecture, first(step), "-btn");
    step_block(
        step,
        &[format!("await this.page.click({});", string_literal(&selector))],
    )
}

fn click_text(step: &Step, _: &TechnicalArchitecture) -> String {
    step_block(
        step,
        &[format!(
            "await this.page.getByText({}, {{ exact: true }}).click();",
            string_literal(first(step))
        )],
    )
}

fn fill_field(step: &Step, architecture: &TechnicalArchitecture) -> String {
    let selector = attribute_selector(architecture, second(step), "-input");
    step_block(
        step,
        &[format!(
            "await this.page.fill({}, {});",
            string_literal(&selector),
            string_literal(quoted_literal(&step.text, 0, ""))
        )],
    )
}

fn open_modal(step: &Step, architecture: &TechnicalArchitecture) -> String {
    let trigger = attribute_selector(architecture, first(step), "-btn");
    let modal = attribute_selector(architecture, first(step), "-modal");
    step_block(
        step,
        &[
            format!("await this.page.click({});", string_literal(&trigger)),
            format!("await waitForElement(this.page, {});", string_literal(&modal)),
        ],
    )
}

fn see_modal(step: &Step, architecture: &TechnicalArchitecture) -> String {
    let modal = attribute_selector(architecture, first(step), "-modal");
    step_block(
        step,
        &[format!(
            "await expect(this.page.locator({})).toBeVisible();",
            string_literal(&modal)
        )],
    )
}

fn see_notification(step: &Step, _: &TechnicalArchitecture) -> String {
    step_block(
        step,
        &[
            "const notification = await waitForElement(this.page, '.notification');".to_string(),
            format!(
                "await expect(notification).toContainText({});",
                string_literal(first(step))
            ),
        ],
    )
}

fn see_text(step: &Step, _: &TechnicalArchitecture) -> String {
    step_block(
        step,
        &[format!(
            "await expect(this.page.getByText({})).toBeVisible();",
            string_literal(first(step))
        )],
    )
}

fn field_value(step: &Step, architecture: &TechnicalArchitecture) -> String {
    let field = attribute_selector(architecture, first(step), "-input");
    step_block(
        step,
        &[format!(
            "await expect(this.page.locator({})).toHaveValue({});",
            string_literal(&field),
            string_literal(quoted_literal(&step.text, 1, ""))
        )],
    )
}

fn page_title(step: &Step, _: &TechnicalArchitecture) -> String {
    step_block(
        step,
        &[format!(
            "await expect(this.page).toHaveTitle({});",
            string_literal(first(step))
        )],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn marker(step: &Step, _: &TechnicalArchitecture) -> String {
        step_block(step, &[format!("// via {}", step.text.len())])
    }

    #[test_case(StepCategory::Precondition, "the Software Estimation Manager application is running", Some("application-running"))]
    #[test_case(StepCategory::Precondition, "the application is running", Some("application-running") ; "unnamed application")]
    #[test_case(StepCategory::Precondition, r#"I am on the "Projects" page"#, Some("on-page"))]
    #[test_case(StepCategory::Precondition, r#"a project named "Apollo" exists"#, Some("project-exists"))]
    #[test_case(StepCategory::Action, r#"I click the "Save" button"#, Some("click-button"))]
    #[test_case(StepCategory::Action, r#"I click "Save""#, Some("click-text"))]
    #[test_case(StepCategory::Action, r#"I enter "Apollo" into the "Project Name" field"#, Some("fill-field"))]
    #[test_case(StepCategory::Action, "I scroll to the footer", None)]
    #[test_case(StepCategory::Verification, r#"I should see "Saved""#, Some("see-text"))]
    #[test_case(StepCategory::Verification, r#"I should see the "Estimate" modal"#, Some("see-modal"))]
    #[test_case(StepCategory::Verification, r#"I should see a success notification "Saved""#, Some("see-notification"))]
    #[test_case(StepCategory::Verification, r#"the page should contain "x""#, None)]
    fn test_standard_registry_matches(category: StepCategory, text: &str, expected: Option<&str>) {
        let found = PatternRegistry::standard().find(category, text).map(|p| p.name());
        assert_eq!(found, expected);
    }

    #[test]
    fn test_match_is_scoped_by_category() {
        let registry = PatternRegistry::standard();
        assert!(registry
            .find(StepCategory::Action, "the Software Estimation Manager application is running")
            .is_none());
    }

    #[test]
    fn test_first_registered_pattern_wins() {
        let registry = PatternRegistry::empty()
            .register(StepCategory::Action, StepPattern::new("broad", "(?i)click", marker).unwrap())
            .register(StepCategory::Action, StepPattern::new("narrow", r#"^I click "Save"$"#, marker).unwrap());
        let step = Step::when(r#"I click "Save""#);
        assert_eq!(registry.match_step(&step).unwrap().name(), "broad");

        let reversed = PatternRegistry::empty()
            .register(StepCategory::Action, StepPattern::new("narrow", r#"^I click "Save"$"#, marker).unwrap())
            .register(StepCategory::Action, StepPattern::new("broad", "(?i)click", marker).unwrap());
        assert_eq!(reversed.match_step(&step).unwrap().name(), "narrow");
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = StepPattern::new("broken", "(unclosed", marker).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_iter_follows_category_then_registration_order() {
        let order: Vec<_> = PatternRegistry::standard()
            .iter()
            .map(|(category, position, _)| (category, position))
            .collect();
        assert_eq!(order.len(), PatternRegistry::standard().len());
        assert_eq!(order[0], (StepCategory::Precondition, 0));
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_application_running_output() {
        let step = Step::given("the Software Estimation Manager application is running");
        let code = PatternRegistry::standard()
            .match_step(&step)
            .unwrap()
            .generate(&step, &TechnicalArchitecture::default());
        assert_eq!(
            code,
            "Given('the Software Estimation Manager application is running', async function () {\n  \
             expect(this.page).toBeDefined();\n  \
             await this.page.waitForLoadState('networkidle');\n\
             });"
        );
    }

    #[test]
    fn test_click_button_derives_selector() {
        let step = Step::when(r#"I click the "Save Draft" button"#);
        let code = PatternRegistry::standard()
            .match_step(&step)
            .unwrap()
            .generate(&step, &TechnicalArchitecture::default());
        assert!(code.contains(r#"await this.page.click('[data-testid="save-draft-btn"]');"#));
    }

    #[test]
    fn test_fill_field_uses_both_literals() {
        let step = Step::when(r#"I enter "Apollo" into the "Project Name" field"#);
        let code = PatternRegistry::standard()
            .match_step(&step)
            .unwrap()
            .generate(&step, &TechnicalArchitecture::default());
        assert!(code.contains(r#"await this.page.fill('[data-testid="project-name-input"]', 'Apollo');"#));
    }
}
