//! Resolved generation plan: what every unique step turns into

use serde::Serialize;

use stepforge_common::{Step, StepCategory};

use crate::collision::BindingCollision;
use crate::synthesize::StubKind;

/// How a step implementation was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Resolution {
    /// Emitted by the named registry pattern
    Pattern(String),
    /// Synthesized stub
    Stub(StubKind),
}

impl Resolution {
    pub fn is_stub(&self) -> bool {
        matches!(self, Resolution::Stub(_))
    }

    /// Short label, e.g. `pattern:click-button` or `stub:unimplemented`
    pub fn label(&self) -> String {
        match self {
            Resolution::Pattern(name) => format!("pattern:{}", name),
            Resolution::Stub(kind) => format!("stub:{}", kind.as_str()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedStep {
    pub step: Step,
    pub resolution: Resolution,
    pub code: String,
}

/// Unique steps of one category, in first-seen order
#[derive(Debug, Clone, Serialize)]
pub struct StepBlock {
    pub category: StepCategory,
    pub steps: Vec<PlannedStep>,
}

impl StepBlock {
    /// Rendered block: heading comment followed by every implementation
    pub fn render(&self) -> String {
        let mut out = format!("// {} steps", self.category.keyword());
        for planned in &self.steps {
            out.push_str("\n\n");
            out.push_str(&planned.code);
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationPlan {
    pub feature_name: String,
    /// One block per category, in canonical order
    pub blocks: Vec<StepBlock>,
    pub collisions: Vec<BindingCollision>,
}

impl GenerationPlan {
    pub fn block(&self, category: StepCategory) -> Option<&StepBlock> {
        self.blocks.iter().find(|b| b.category == category)
    }

    pub fn steps(&self) -> impl Iterator<Item = &PlannedStep> {
        self.blocks.iter().flat_map(|b| b.steps.iter())
    }

    pub fn step_count(&self) -> usize {
        self.blocks.iter().map(|b| b.steps.len()).sum()
    }

    pub fn stub_count(&self) -> usize {
        self.steps().filter(|s| s.resolution.is_stub()).count()
    }
}
