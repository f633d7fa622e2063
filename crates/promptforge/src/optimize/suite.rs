use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// System prompt for the default sentiment-classification suite.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a sentiment classifier. Respond with only 'Positive', 'Negative', or 'Neutral'.";

/// One test case: template inputs and the output the model should produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: HashMap<String, String>,
    pub expected_output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl TestCase {
    fn sentiment(text: &str, expected: &str) -> Self {
        Self {
            input: HashMap::from([("text".to_string(), text.to_string())]),
            expected_output: expected.to_string(),
            metadata: None,
        }
    }
}

/// The built-in sentiment-analysis suite used when no file is given or the
/// given file yields nothing usable.
pub fn default_suite() -> Vec<TestCase> {
    vec![
        TestCase::sentiment("This product is amazing! I love it.", "Positive"),
        TestCase::sentiment("Terrible quality, would not recommend.", "Negative"),
        TestCase::sentiment("The product arrived on time.", "Neutral"),
        TestCase::sentiment("I'm so disappointed with this purchase.", "Negative"),
        TestCase::sentiment("It works exactly as described.", "Neutral"),
    ]
}

/// Load test cases from a JSON file.
///
/// Accepts either a top-level list of cases or an object with cases under
/// `test_cases`, `tests`, or `sentiment_analysis`. Anything unreadable or
/// empty falls back to the default suite with a warning.
pub fn load_suite(path: &Path) -> Vec<TestCase> {
    let value: serde_json::Value = match std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load test suite, using default");
            return default_suite();
        }
    };

    let items: Vec<&serde_json::Value> = match &value {
        serde_json::Value::Array(items) => items.iter().collect(),
        serde_json::Value::Object(map) => ["test_cases", "tests", "sentiment_analysis"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_array()))
            .map(|items| items.iter().collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    let cases: Vec<TestCase> = items.into_iter().filter_map(parse_case).collect();

    if cases.is_empty() {
        warn!(path = %path.display(), "no valid test cases found, using default suite");
        return default_suite();
    }
    cases
}

fn parse_case(item: &serde_json::Value) -> Option<TestCase> {
    let obj = item.as_object()?;
    let input = obj.get("input")?.as_object()?;
    let expected = obj.get("expected_output")?.as_str()?;

    let input = input
        .iter()
        .map(|(k, v)| {
            let s = v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string());
            (k.clone(), s)
        })
        .collect();

    Some(TestCase {
        input,
        expected_output: expected.to_string(),
        metadata: obj.get("metadata").cloned(),
    })
}

/// Substitute `{key}` placeholders in a prompt template from the case input.
pub fn render_template(template: &str, input: &HashMap<String, String>) -> String {
    let mut rendered = template.to_string();
    for (key, value) in input {
        rendered = rendered.replace(&format!("{{{}}}", key), value);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template_substitutes_keys() {
        let input = HashMap::from([("text".to_string(), "great stuff".to_string())]);
        let rendered = render_template("Classify the sentiment of: {text}\nSentiment:", &input);
        assert_eq!(rendered, "Classify the sentiment of: great stuff\nSentiment:");
    }

    #[test]
    fn test_render_template_leaves_unknown_placeholders() {
        let input = HashMap::new();
        assert_eq!(render_template("keep {this}", &input), "keep {this}");
    }

    #[test]
    fn test_default_suite_has_five_cases() {
        let suite = default_suite();
        assert_eq!(suite.len(), 5);
        assert!(suite.iter().all(|c| c.input.contains_key("text")));
    }
}
