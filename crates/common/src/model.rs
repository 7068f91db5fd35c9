//! Core types for StepForge
//!
//! The analysis result is the single input of the step-definition generator.
//! It is produced upstream, consumed once, and never mutated by the generator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector attribute used when the architecture descriptor does not name one
pub const DEFAULT_SELECTOR_ATTRIBUTE: &str = "data-testid";

/// Category of a step, which decides the binding keyword it is registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StepCategory {
    #[serde(rename = "Given")]
    Precondition,
    #[serde(rename = "When")]
    Action,
    #[serde(rename = "Then")]
    Verification,
}

impl StepCategory {
    /// Canonical block order of the generated module
    pub const ALL: [StepCategory; 3] = [
        StepCategory::Precondition,
        StepCategory::Action,
        StepCategory::Verification,
    ];

    /// Binding function name in the generated module
    pub fn keyword(&self) -> &'static str {
        match self {
            StepCategory::Precondition => "Given",
            StepCategory::Action => "When",
            StepCategory::Verification => "Then",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepCategory::Precondition => "precondition",
            StepCategory::Action => "action",
            StepCategory::Verification => "verification",
        }
    }
}

impl fmt::Display for StepCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword found on an input step record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKeyword {
    Category(StepCategory),
    /// `And`, `But` or `*`: continues the previous step's category
    Conjunction,
}

impl StepKeyword {
    /// Parse a keyword; surrounding whitespace and case are ignored
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "given" | "precondition" => Some(Self::Category(StepCategory::Precondition)),
            "when" | "action" => Some(Self::Category(StepCategory::Action)),
            "then" | "verification" => Some(Self::Category(StepCategory::Verification)),
            "and" | "but" | "*" => Some(Self::Conjunction),
            _ => None,
        }
    }
}

/// Argument attached to a step
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepData {
    /// Data table, row-major
    Table(Vec<Vec<String>>),
    /// Block string
    DocString(String),
}

impl StepData {
    /// Name of the extra argument the binding function receives
    pub fn argument_name(&self) -> &'static str {
        match self {
            StepData::Table(_) => "dataTable",
            StepData::DocString(_) => "docString",
        }
    }
}

/// A single step. Equality and hashing cover the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Step {
    #[serde(rename = "keyword")]
    pub category: StepCategory,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StepData>,
}

impl Step {
    pub fn new(category: StepCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
            data: None,
        }
    }

    pub fn given(text: impl Into<String>) -> Self {
        Self::new(StepCategory::Precondition, text)
    }

    pub fn when(text: impl Into<String>) -> Self {
        Self::new(StepCategory::Action, text)
    }

    pub fn then(text: impl Into<String>) -> Self {
        Self::new(StepCategory::Verification, text)
    }

    pub fn with_data(mut self, data: StepData) -> Self {
        self.data = Some(data);
        self
    }
}

/// Step record as it appears in an input document
#[derive(Debug, Clone, Deserialize)]
pub struct StepRecord {
    pub keyword: String,
    pub text: String,
    #[serde(default)]
    pub data: Option<StepData>,
}

/// An ordered list of steps. Only the steps matter for generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScenarioDocument")]
pub struct Scenario {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { name: None, steps }
    }

    pub fn named(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: Some(name.into()),
            steps,
        }
    }
}

/// Scenario as it appears in an input document: a bare step list or a named object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScenarioDocument {
    Steps(Vec<StepRecord>),
    Named {
        #[serde(default)]
        name: Option<String>,
        steps: Vec<StepRecord>,
    },
}

impl TryFrom<ScenarioDocument> for Scenario {
    type Error = String;

    fn try_from(doc: ScenarioDocument) -> std::result::Result<Self, Self::Error> {
        let (name, records) = match doc {
            ScenarioDocument::Steps(records) => (None, records),
            ScenarioDocument::Named { name, steps } => (name, steps),
        };

        let mut steps = Vec::with_capacity(records.len());
        let mut previous: Option<StepCategory> = None;
        for (index, record) in records.into_iter().enumerate() {
            let category = match StepKeyword::parse(&record.keyword) {
                Some(StepKeyword::Category(category)) => category,
                Some(StepKeyword::Conjunction) => previous.ok_or_else(|| {
                    format!(
                        "step {} uses '{}' without a preceding step",
                        index,
                        record.keyword.trim()
                    )
                })?,
                None => {
                    return Err(format!(
                        "step {} has unknown keyword '{}'",
                        index,
                        record.keyword.trim()
                    ))
                }
            };
            previous = Some(category);
            steps.push(Step {
                category,
                text: record.text,
                data: record.data,
            });
        }

        Ok(Scenario { name, steps })
    }
}

/// External system the feature integrates with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "IntegrationPointDocument")]
pub struct IntegrationPoint {
    pub name: String,
    /// Remaining descriptor fields, forwarded untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl IntegrationPoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IntegrationPointDocument {
    Name(String),
    Detailed {
        name: String,
        #[serde(flatten)]
        extra: serde_json::Map<String, serde_json::Value>,
    },
}

impl From<IntegrationPointDocument> for IntegrationPoint {
    fn from(doc: IntegrationPointDocument) -> Self {
        match doc {
            IntegrationPointDocument::Name(name) => IntegrationPoint::new(name),
            IntegrationPointDocument::Detailed { name, extra } => IntegrationPoint { name, extra },
        }
    }
}

/// Page object referenced by generated steps through the shared registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageObjectSpec {
    /// Key in the shared registry
    pub name: String,
    pub class_name: String,
    /// Import target, relative to the page-object directory
    pub file_name: String,
}

impl PageObjectSpec {
    pub fn new(
        name: impl Into<String>,
        class_name: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
            file_name: file_name.into(),
        }
    }
}

/// Opaque architecture descriptor, forwarded to pattern generators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechnicalArchitecture(pub serde_json::Value);

impl TechnicalArchitecture {
    /// Attribute used to build element selectors
    pub fn selector_attribute(&self) -> &str {
        self.0
            .get("selectorAttribute")
            .and_then(serde_json::Value::as_str)
            .filter(|attr| !attr.is_empty())
            .unwrap_or(DEFAULT_SELECTOR_ATTRIBUTE)
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_null()
    }
}

/// Input of the generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub feature_name: String,

    #[serde(default)]
    pub cucumber_scenarios: Vec<Scenario>,

    #[serde(default, skip_serializing_if = "TechnicalArchitecture::is_absent")]
    pub technical_architecture: TechnicalArchitecture,

    #[serde(default)]
    pub integration_points: Vec<IntegrationPoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_requirements: Option<serde_json::Value>,

    #[serde(default)]
    pub page_object_design: Vec<PageObjectSpec>,
}

impl AnalysisResult {
    pub fn new(feature_name: impl Into<String>) -> Self {
        Self {
            feature_name: feature_name.into(),
            ..Default::default()
        }
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.cucumber_scenarios.push(scenario);
        self
    }

    pub fn with_page_object(mut self, page_object: PageObjectSpec) -> Self {
        self.page_object_design.push(page_object);
        self
    }

    pub fn with_integration_point(mut self, point: IntegrationPoint) -> Self {
        self.integration_points.push(point);
        self
    }

    pub fn with_architecture(mut self, architecture: serde_json::Value) -> Self {
        self.technical_architecture = TechnicalArchitecture(architecture);
        self
    }

    pub fn with_mock_requirements(mut self, mocks: serde_json::Value) -> Self {
        self.mock_requirements = Some(mocks);
        self
    }

    /// Total number of steps across all scenarios, duplicates included
    pub fn step_count(&self) -> usize {
        self.cucumber_scenarios.iter().map(|s| s.steps.len()).sum()
    }
}
