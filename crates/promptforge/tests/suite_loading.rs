use promptforge::optimize::{default_suite, load_suite};
use tempfile::TempDir;

#[test]
fn loads_top_level_list() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("suite.json");
    std::fs::write(
        &path,
        r#"[
            {"input": {"text": "love it"}, "expected_output": "Positive"},
            {"input": {"text": "hate it"}, "expected_output": "Negative", "metadata": {"source": "manual"}}
        ]"#,
    )
    .unwrap();

    let suite = load_suite(&path);
    assert_eq!(suite.len(), 2);
    assert_eq!(suite[0].expected_output, "Positive");
    assert!(suite[1].metadata.is_some());
}

#[test]
fn loads_cases_nested_under_known_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("suite.json");
    std::fs::write(
        &path,
        r#"{"sentiment_analysis": [
            {"input": {"text": "fine"}, "expected_output": "Neutral"}
        ]}"#,
    )
    .unwrap();

    let suite = load_suite(&path);
    assert_eq!(suite.len(), 1);
    assert_eq!(suite[0].input.get("text").map(String::as_str), Some("fine"));
}

#[test]
fn malformed_file_falls_back_to_default_suite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "not json at all").unwrap();

    let suite = load_suite(&path);
    assert_eq!(suite.len(), default_suite().len());
}

#[test]
fn missing_file_falls_back_to_default_suite() {
    let dir = TempDir::new().unwrap();
    let suite = load_suite(&dir.path().join("nope.json"));
    assert_eq!(suite.len(), default_suite().len());
}

#[test]
fn cases_without_required_fields_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("suite.json");
    std::fs::write(
        &path,
        r#"[
            {"input": {"text": "ok"}, "expected_output": "Neutral"},
            {"input": {"text": "no expectation"}},
            {"expected_output": "orphan"}
        ]"#,
    )
    .unwrap();

    let suite = load_suite(&path);
    assert_eq!(suite.len(), 1);
}
