use std::collections::HashSet;

/// Accuracy of a model response against the expected output.
///
/// Exact match after trimming and case-folding scores 1.0. Otherwise the
/// score is the fraction of expected words present in the response:
/// `|words(response) ∩ words(expected)| / |words(expected)|`.
///
/// An expected string with no words scores 0.0. Pure function.
pub fn overlap_score(response: &str, expected: &str) -> f64 {
    let response_norm = response.trim().to_lowercase();
    let expected_norm = expected.trim().to_lowercase();

    if response_norm == expected_norm {
        return 1.0;
    }

    let expected_words: HashSet<&str> = expected_norm.split_whitespace().collect();
    if expected_words.is_empty() {
        return 0.0;
    }

    let response_words: HashSet<&str> = response_norm.split_whitespace().collect();
    let overlap = response_words.intersection(&expected_words).count();
    overlap as f64 / expected_words.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_case_insensitive() {
        assert_eq!(overlap_score("positive", "Positive"), 1.0);
        assert_eq!(overlap_score("  Positive \n", "positive"), 1.0);
    }

    #[test]
    fn test_partial_word_overlap() {
        // |{good, product}| / |{very, good, product}|
        let score = overlap_score("this product is good", "very good product");
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_word_overlap() {
        let score = overlap_score("it was good", "very nice product");
        assert_eq!(score, 0.0);
        let score = overlap_score("a very fine thing", "very nice product");
        assert!((score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_expected_is_zero_not_error() {
        assert_eq!(overlap_score("anything", ""), 0.0);
        assert_eq!(overlap_score("anything", "   "), 0.0);
    }

    #[test]
    fn test_empty_response_against_nonempty_expected() {
        assert_eq!(overlap_score("", "Positive"), 0.0);
    }

    #[test]
    fn test_idempotent() {
        let a = overlap_score("the cat sat", "the dog sat");
        let b = overlap_score("the cat sat", "the dog sat");
        assert_eq!(a, b);
    }
}
