//! StepForge synthesis engine
//!
//! Turns a structured feature analysis into one Cucumber step-definition
//! module. Steps are deduplicated per category, matched against an ordered
//! pattern registry and, when nothing matches, given a heuristic stub that
//! carries a completion marker.

pub mod assemble;
pub mod collision;
pub mod dedup;
pub mod extract;
pub mod generator;
pub mod helpers;
pub mod js;
pub mod options;
pub mod page_objects;
pub mod patterns;
pub mod plan;
pub mod synthesize;

pub use assemble::TemplateAssembler;
pub use collision::BindingCollision;
pub use generator::{GeneratedModule, StepDefinitionGenerator, MODULE_SUFFIX};
pub use options::{CollisionPolicy, GeneratorOptions, HelperDefaults};
pub use patterns::{PatternRegistry, StepPattern};
pub use plan::{GenerationPlan, PlannedStep, Resolution, StepBlock};
pub use synthesize::{StubKind, COMPLETION_MARKER};
