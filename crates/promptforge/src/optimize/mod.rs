//! Prompt optimization against a fixed test suite.

mod evaluator;
mod metrics;
mod suite;
mod variants;

pub use evaluator::{AbReport, SuiteEvaluator, TARGET_ACCURACY};
pub use metrics::{percentile, CaseResult, PromptMetrics};
pub use suite::{default_suite, load_suite, render_template, TestCase, DEFAULT_SYSTEM_PROMPT};
pub use variants::PromptVariants;
