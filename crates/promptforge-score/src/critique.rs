use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Score assumed when the critique carries no recognizable score pattern.
/// Such critiques are treated as acceptable rather than failing the run.
pub const FALLBACK_SCORE: f64 = 7.5;

lazy_static! {
    /// Strict form the review prompt asks for: `SCORE: 8.5`
    static ref SCORE_LINE: Regex =
        Regex::new(r"(?i)SCORE:\s*(\d+(?:\.\d+)?)").expect("valid regex");
    /// Looser fallback: `score/rating/quality: 8.5/10`
    static ref SCORE_LOOSE: Regex =
        Regex::new(r"(?i)(?:score|rating|quality)[:\s]+(\d+(?:\.\d+)?)\s*(?:/\s*10)?")
            .expect("valid regex");
}

/// A parsed critique: the raw text, its numeric score, and whether the
/// reviewed artifact needs another pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub critique: String,
    pub score: f64,
    pub needs_improvement: bool,
}

/// Extract a quality signal from free-text critique.
///
/// The score pattern chain is tried in order and the first match wins; with
/// no match the documented fallback of 7.5 applies. Extracted scores are
/// clamped to the 0-10 scale. A `NEEDS_IMPROVEMENT` verdict keyword in the
/// critique takes priority over the numeric threshold comparison.
pub fn parse_review(critique: &str, threshold: f64) -> Review {
    let (score, matched) = extract_score(critique);

    let needs_improvement = if critique.to_uppercase().contains("NEEDS_IMPROVEMENT") {
        true
    } else {
        score < threshold
    };

    debug!(
        score,
        threshold,
        needs_improvement,
        fallback = !matched,
        "parsed critique"
    );

    Review {
        critique: critique.to_string(),
        score,
        needs_improvement,
    }
}

fn extract_score(critique: &str) -> (f64, bool) {
    let raw = SCORE_LINE
        .captures(critique)
        .or_else(|| SCORE_LOOSE.captures(critique))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok());

    match raw {
        Some(score) => {
            let clamped = score.clamp(0.0, 10.0);
            if clamped != score {
                warn!(score, clamped, "critique score outside 0-10, clamping");
            }
            (clamped, true)
        }
        None => {
            debug!("no score pattern in critique, using fallback {FALLBACK_SCORE}");
            (FALLBACK_SCORE, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_above_threshold_is_acceptable() {
        let review = parse_review("Looks solid.\nSCORE: 9.0\nVERDICT: ACCEPTABLE", 8.5);
        assert_eq!(review.score, 9.0);
        assert!(!review.needs_improvement);
    }

    #[test]
    fn test_verdict_keyword_takes_priority() {
        let review = parse_review("SCORE: 6.0\nVERDICT: NEEDS_IMPROVEMENT", 7.0);
        assert_eq!(review.score, 6.0);
        assert!(review.needs_improvement);
    }

    #[test]
    fn test_verdict_keyword_overrides_passing_score() {
        let review = parse_review("SCORE: 9.5\nVERDICT: NEEDS_IMPROVEMENT", 7.0);
        assert!(review.needs_improvement);
    }

    #[test]
    fn test_score_below_threshold_without_verdict() {
        let review = parse_review("SCORE: 6.5\nsome issues noted", 7.0);
        assert!(review.needs_improvement);
    }

    #[test]
    fn test_case_insensitive_score_line() {
        let review = parse_review("score: 8", 7.5);
        assert_eq!(review.score, 8.0);
    }

    #[test]
    fn test_loose_pattern_with_denominator() {
        let review = parse_review("Overall rating: 8.5/10, nice work", 8.0);
        assert_eq!(review.score, 8.5);
        assert!(!review.needs_improvement);
    }

    #[test]
    fn test_strict_pattern_wins_over_loose() {
        // Both patterns could match; the SCORE: line is authoritative
        let review = parse_review("quality: 3\nSCORE: 9.0", 8.0);
        assert_eq!(review.score, 9.0);
    }

    #[test]
    fn test_fallback_is_acceptable_by_default() {
        let review = parse_review("A thoughtful critique with no numbers at all.", 8.0);
        assert_eq!(review.score, FALLBACK_SCORE);
        assert!(review.needs_improvement); // 7.5 < 8.0 threshold still applies
    }

    #[test]
    fn test_fallback_meets_lower_threshold() {
        let review = parse_review("No numeric verdict here.", 7.0);
        assert_eq!(review.score, FALLBACK_SCORE);
        assert!(!review.needs_improvement);
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        let review = parse_review("SCORE: 95", 8.0);
        assert_eq!(review.score, 10.0);
    }
}
