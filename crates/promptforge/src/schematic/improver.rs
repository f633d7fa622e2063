use std::sync::atomic::{AtomicUsize, Ordering};

use promptforge_core::Mutate;

use crate::schematic::PromptBuilder;

/// Produces the single regeneration prompt for the next pass: guidelines
/// plus the original request plus the reviewer's critique.
pub struct CritiqueImprover {
    builder: PromptBuilder,
    user_request: String,
    /// Counts mutation rounds so the improved prompt names the upcoming pass.
    rounds: AtomicUsize,
}

impl CritiqueImprover {
    pub fn new(builder: PromptBuilder, user_request: String) -> Self {
        Self {
            builder,
            user_request,
            rounds: AtomicUsize::new(0),
        }
    }
}

impl Mutate for CritiqueImprover {
    fn variants(&self, _candidate: &str, feedback: &str) -> Vec<String> {
        // Round k of mutation prepares iteration k + 1
        let next_iteration = self.rounds.fetch_add(1, Ordering::SeqCst) + 2;
        vec![self
            .builder
            .improved(&self.user_request, feedback, next_iteration)]
    }
}
