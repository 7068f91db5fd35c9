//! Step deduplication

use std::collections::HashSet;

use stepforge_common::{Scenario, Step, StepCategory};

/// Unique steps of one category across every scenario, in first-seen order.
///
/// Two steps are the same iff category, text and attached data are all equal;
/// identical wording under another category is kept separately.
pub fn unique_steps(scenarios: &[Scenario], category: StepCategory) -> Vec<&Step> {
    let mut seen: HashSet<&Step> = HashSet::new();
    scenarios
        .iter()
        .flat_map(|scenario| scenario.steps.iter())
        .filter(|step| step.category == category)
        .filter(|step| seen.insert(*step))
        .collect()
}
