//! Binding-collision detection
//!
//! Cucumber registers step definitions by expression text alone, so the same
//! text under two categories, or twice in one category with different step
//! data, is ambiguous at runtime even though both implementations are emitted.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use stepforge_common::{Error, Result, Step, StepCategory};

use crate::options::CollisionPolicy;

/// One step text bound more than once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingCollision {
    pub text: String,
    /// Category of every binding, in block order
    pub categories: Vec<StepCategory>,
}

impl BindingCollision {
    /// Human-readable binding list, e.g. `Given, Then`
    pub fn bindings(&self) -> String {
        self.categories
            .iter()
            .map(|c| c.keyword())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Collisions among already-deduplicated steps, sorted by text
pub fn find_collisions<'a, I>(steps: I) -> Vec<BindingCollision>
where
    I: IntoIterator<Item = &'a Step>,
{
    let mut by_text: BTreeMap<&str, Vec<StepCategory>> = BTreeMap::new();
    for step in steps {
        by_text.entry(step.text.as_str()).or_default().push(step.category);
    }

    by_text
        .into_iter()
        .filter(|(_, categories)| categories.len() > 1)
        .map(|(text, mut categories)| {
            categories.sort();
            BindingCollision {
                text: text.to_string(),
                categories,
            }
        })
        .collect()
}

/// Apply the configured policy to detected collisions
pub fn enforce(policy: CollisionPolicy, collisions: &[BindingCollision]) -> Result<()> {
    match policy {
        CollisionPolicy::Allow => Ok(()),
        CollisionPolicy::Warn => {
            for collision in collisions {
                warn!(
                    "Step text '{}' is bound {} times ({}); the test runner may report it as ambiguous",
                    collision.text,
                    collision.categories.len(),
                    collision.bindings()
                );
            }
            Ok(())
        }
        CollisionPolicy::Reject => match collisions.first() {
            Some(collision) => Err(Error::BindingCollision {
                text: collision.text.clone(),
                bindings: collision.bindings(),
            }),
            None => Ok(()),
        },
    }
}
