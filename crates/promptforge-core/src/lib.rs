//! Core refinement loop: generate → score → decide → mutate, bounded by an
//! iteration cap, stopping early once quality is acceptable.

mod attempt;
mod controller;
mod outcome;
mod traits;

pub use attempt::{Attempt, AttemptKind, Evaluation};
pub use controller::{RefinementConfig, RefinementController, MAX_VARIANTS};
pub use outcome::RunOutcome;
pub use traits::{Evaluate, Mutate};
