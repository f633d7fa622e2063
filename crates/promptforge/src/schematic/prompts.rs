use promptforge_score::DocType;

/// Best-practices block prepended to every generation prompt.
pub const DIAGRAM_GUIDELINES: &str = r#"Create a high-quality scientific diagram with these requirements:

VISUAL QUALITY:
- Clean white or light background (no textures or gradients)
- High contrast for readability and printing
- Professional, publication-ready appearance
- Sharp, clear lines and text
- Adequate spacing between elements to prevent crowding

TYPOGRAPHY:
- Clear, readable sans-serif fonts (Arial, Helvetica style)
- Minimum 10pt font size for all labels
- Consistent font sizes throughout
- All text horizontal or clearly readable
- No overlapping text

SCIENTIFIC STANDARDS:
- Accurate representation of concepts
- Clear labels for all components
- Include scale bars, legends, or axes where appropriate
- Use standard scientific notation and symbols
- Include units where applicable

ACCESSIBILITY:
- Colorblind-friendly color palette (use Okabe-Ito colors if using color)
- High contrast between elements
- Redundant encoding (shapes + colors, not just colors)
- Works well in grayscale

LAYOUT:
- Logical flow (left-to-right or top-to-bottom)
- Clear visual hierarchy
- Balanced composition
- Appropriate use of whitespace
- No clutter or unnecessary decorative elements"#;

/// Assembles generation and review prompts. Holds the guideline text so it
/// is configuration, not a process-wide constant lookup.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    guidelines: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            guidelines: DIAGRAM_GUIDELINES.to_string(),
        }
    }
}

impl PromptBuilder {
    pub fn with_guidelines(guidelines: impl Into<String>) -> Self {
        Self {
            guidelines: guidelines.into(),
        }
    }

    /// Prompt for the first generation pass.
    pub fn initial(&self, user_request: &str) -> String {
        format!(
            "{}\n\nUSER REQUEST: {}\n\nGenerate a publication-quality scientific diagram that meets all the guidelines above.",
            self.guidelines, user_request
        )
    }

    /// Prompt for a regeneration pass, folding in the previous critique.
    pub fn improved(&self, user_request: &str, critique: &str, iteration: usize) -> String {
        format!(
            "{}\n\nUSER REQUEST: {}\n\nITERATION {}: Based on previous feedback, address these specific improvements:\n{}\n\nGenerate an improved version that addresses all the critique points while maintaining scientific accuracy and professional quality.",
            self.guidelines, user_request, iteration, critique
        )
    }

    /// Structured review prompt sent with the generated image attached.
    pub fn review(
        &self,
        user_request: &str,
        doc_type: DocType,
        threshold: f64,
        iteration: usize,
        max_iterations: usize,
    ) -> String {
        format!(
            r#"You are an expert reviewer evaluating a scientific diagram for publication quality.

ORIGINAL REQUEST: {user_request}

DOCUMENT TYPE: {doc_type} (quality threshold: {threshold}/10)
ITERATION: {iteration}/{max_iterations}

Carefully evaluate this diagram on these criteria:

1. **Scientific Accuracy** (0-2 points)
   - Correct representation of concepts
   - Proper notation and symbols
   - Accurate relationships shown

2. **Clarity and Readability** (0-2 points)
   - Easy to understand at a glance
   - Clear visual hierarchy
   - No ambiguous elements

3. **Label Quality** (0-2 points)
   - All important elements labeled
   - Labels are readable (appropriate font size)
   - Consistent labeling style

4. **Layout and Composition** (0-2 points)
   - Logical flow (top-to-bottom or left-to-right)
   - Balanced use of space
   - No overlapping elements

5. **Professional Appearance** (0-2 points)
   - Publication-ready quality
   - Clean, crisp lines and shapes
   - Appropriate colors/contrast

RESPOND IN THIS EXACT FORMAT:
SCORE: [total score 0-10]

STRENGTHS:
- [strength 1]
- [strength 2]

ISSUES:
- [issue 1 if any]
- [issue 2 if any]

VERDICT: [ACCEPTABLE or NEEDS_IMPROVEMENT]

If score >= {threshold}, diagram is ACCEPTABLE for {doc_type} publication.
If score < {threshold}, mark as NEEDS_IMPROVEMENT with specific suggestions."#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_prompt_carries_guidelines_and_request() {
        let builder = PromptBuilder::default();
        let prompt = builder.initial("CONSORT participant flow diagram");
        assert!(prompt.contains("VISUAL QUALITY"));
        assert!(prompt.contains("USER REQUEST: CONSORT participant flow diagram"));
    }

    #[test]
    fn test_improved_prompt_embeds_critique() {
        let builder = PromptBuilder::default();
        let prompt = builder.improved("flow diagram", "labels too small", 2);
        assert!(prompt.contains("ITERATION 2"));
        assert!(prompt.contains("labels too small"));
    }

    #[test]
    fn test_review_prompt_names_threshold_and_format() {
        let builder = PromptBuilder::default();
        let prompt = builder.review("flow diagram", DocType::Journal, 8.5, 1, 2);
        assert!(prompt.contains("quality threshold: 8.5/10"));
        assert!(prompt.contains("SCORE: [total score 0-10]"));
        assert!(prompt.contains("VERDICT: [ACCEPTABLE or NEEDS_IMPROVEMENT]"));
    }

    #[test]
    fn test_custom_guidelines() {
        let builder = PromptBuilder::with_guidelines("Keep it simple.");
        assert!(builder.initial("a diagram").starts_with("Keep it simple."));
    }
}
