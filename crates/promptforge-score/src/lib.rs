//! Scoring for refinement runs: word-overlap accuracy against expected
//! output, and numeric score extraction from free-text critiques.

mod critique;
mod overlap;
mod thresholds;

pub use critique::{parse_review, Review, FALLBACK_SCORE};
pub use overlap::overlap_score;
pub use thresholds::{DocType, QualityThresholds};
