//! Scientific schematic generation with critique-gated regeneration.

mod evaluator;
mod improver;
mod prompts;

pub use evaluator::SchematicEvaluator;
pub use improver::CritiqueImprover;
pub use prompts::{PromptBuilder, DIAGRAM_GUIDELINES};
