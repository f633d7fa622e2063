use serde::{Deserialize, Serialize};

/// Measurements from a single test case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub accuracy: f64,
    pub latency_secs: f64,
    pub token_count: usize,
    pub success: bool,
}

/// Aggregated metrics for one prompt across the whole suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMetrics {
    pub avg_accuracy: f64,
    pub avg_latency: f64,
    pub p95_latency: f64,
    pub avg_tokens: f64,
    pub success_rate: f64,
}

impl PromptMetrics {
    pub fn aggregate(results: &[CaseResult]) -> Self {
        let accuracies: Vec<f64> = results.iter().map(|r| r.accuracy).collect();
        let latencies: Vec<f64> = results.iter().map(|r| r.latency_secs).collect();
        let tokens: Vec<f64> = results.iter().map(|r| r.token_count as f64).collect();
        let successes: Vec<f64> = results
            .iter()
            .map(|r| if r.success { 1.0 } else { 0.0 })
            .collect();

        Self {
            avg_accuracy: mean(&accuracies),
            avg_latency: mean(&latencies),
            p95_latency: percentile(&latencies, 95.0),
            avg_tokens: mean(&tokens),
            success_rate: mean(&successes),
        }
    }

    /// One-line summary used as evaluation feedback and console output.
    pub fn summary(&self) -> String {
        format!(
            "accuracy {:.2}, latency {:.2}s (p95 {:.2}s), avg tokens {:.0}, success rate {:.2}",
            self.avg_accuracy, self.avg_latency, self.p95_latency, self.avg_tokens, self.success_rate
        )
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percentile with linear interpolation between closest ranks.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let weight = rank - lo as f64;
    sorted[lo] * (1.0 - weight) + sorted[hi] * weight
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(accuracy: f64, latency: f64, tokens: usize, success: bool) -> CaseResult {
        CaseResult {
            accuracy,
            latency_secs: latency,
            token_count: tokens,
            success,
        }
    }

    #[test]
    fn test_aggregate_means() {
        let results = vec![
            result(1.0, 0.5, 10, true),
            result(0.0, 1.5, 20, true),
            result(0.5, 1.0, 30, false),
        ];
        let metrics = PromptMetrics::aggregate(&results);
        assert!((metrics.avg_accuracy - 0.5).abs() < 1e-9);
        assert!((metrics.avg_latency - 1.0).abs() < 1e-9);
        assert!((metrics.avg_tokens - 20.0).abs() < 1e-9);
        assert!((metrics.success_rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_empty_is_zeros() {
        let metrics = PromptMetrics::aggregate(&[]);
        assert_eq!(metrics.avg_accuracy, 0.0);
        assert_eq!(metrics.p95_latency, 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = vec![1.0, 2.0, 3.0, 4.0];
        // rank = 0.95 * 3 = 2.85 -> between 3.0 and 4.0
        let p95 = percentile(&values, 95.0);
        assert!((p95 - 3.85).abs() < 1e-9);
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 100.0), 4.0);
    }

    #[test]
    fn test_percentile_single_value() {
        assert_eq!(percentile(&[2.5], 95.0), 2.5);
    }

    #[test]
    fn test_percentile_unsorted_input() {
        let values = vec![4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&values, 50.0), 2.5);
    }
}
