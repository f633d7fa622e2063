use promptforge_core::Mutate;

/// Fixed menu of prompt transformations, in construction order. The
/// controller caps the list at three entries.
pub struct PromptVariants;

impl Mutate for PromptVariants {
    fn variants(&self, candidate: &str, _feedback: &str) -> Vec<String> {
        let mut variants = Vec::new();

        // Explicit format instruction
        variants.push(format!(
            "{}\n\nProvide your answer in a clear, concise format.",
            candidate
        ));

        // Step-by-step instruction
        variants.push(format!("Let's solve this step by step.\n\n{}", candidate));

        // Verification step
        variants.push(format!(
            "{}\n\nVerify your answer before responding.",
            candidate
        ));

        // Shorter phrasing, only when the substitutions change anything
        let concise = make_concise(candidate);
        if concise != candidate {
            variants.push(concise);
        }

        // Example block, only when the prompt has none
        if !candidate.to_lowercase().contains("example") {
            variants.push(add_examples(candidate));
        }

        variants
    }
}

/// Replace wordy phrasings with shorter equivalents.
fn make_concise(prompt: &str) -> String {
    let replacements = [
        ("in order to", "to"),
        ("due to the fact that", "because"),
        ("at this point in time", "now"),
        ("in the event that", "if"),
    ];

    let mut result = prompt.to_string();
    for (old, new) in replacements {
        result = result.replace(old, new);
    }
    result
}

fn add_examples(prompt: &str) -> String {
    format!(
        "{}\n\nExample:\nInput: Sample input\nOutput: Sample output\n",
        prompt
    )
}
