// CLI commands for building and checking runner payloads
use anyhow::{Context, Result};
use judge_common::codec;
use judge_common::plan::TestPlan;
use judge_common::types::ProblemSpec;
use std::fmt::Write as _;
use std::path::Path;

/// Read a problem JSON file, validate it, and return its payload
pub async fn encode_file(path: &Path) -> Result<String> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let spec: ProblemSpec = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    codec::validate(&spec).context("Problem is not valid")?;
    TestPlan::build(&spec).context("Setup/teardown code cannot be paired")?;

    codec::encode(&spec).context("Failed to encode problem")
}

/// Decode a payload and render the problem as pretty JSON
pub fn decode_payload(payload: &str) -> Result<String> {
    let spec = codec::decode(payload).context("Failed to decode payload")?;
    serde_json::to_string_pretty(&spec).context("Failed to serialize problem")
}

/// Describe the test plan and enabled checks of a payload
pub fn inspect_payload(payload: &str) -> Result<String> {
    let spec = codec::decode(payload).context("Failed to decode payload")?;
    let plan = TestPlan::build(&spec).context("Setup/teardown code cannot be paired")?;

    let enabled = |on: bool| if on { "yes" } else { "no" };
    let private = (0..spec.test_count()).filter(|&i| spec.is_private(i)).count();
    let fixtures = (0..spec.test_count())
        .filter(|&i| spec.files_to_create(i).is_some_and(|f| !f.is_empty()))
        .count();
    let file_checks = (0..spec.test_count())
        .filter(|&i| spec.expected_files(i).is_some_and(|f| !f.is_empty()))
        .count();

    let mut out = String::new();
    writeln!(out, "Test cases:        {}", plan.test_count())?;
    writeln!(out, "Private tests:     {}", private)?;
    writeln!(out, "Wrappers:          {}", plan.wrappers().len())?;
    writeln!(out, "Rewrite per test:  {}", enabled(plan.rewrites_per_test()))?;
    writeln!(out, "Check stdout:      {}", enabled(spec.expected_stdout.is_some()))?;
    writeln!(out, "Check stderr:      {}", enabled(spec.expected_stderr.is_some()))?;
    writeln!(out, "Tests w/ fixtures: {}", fixtures)?;
    writeln!(out, "Tests w/ files:    {}", file_checks)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBLEM: &str = r#"{
        "Code": "print(int(input())**2)\n",
        "ExecBefore": ["import sys\n"],
        "ExecAfter": ["", "print('done')\n"],
        "O": ["25\n", "36\n"],
        "I": ["5\n", "6\n"],
        "Private": [false, true],
        "FilesToMake": [[{"Name": "in.txt", "Content": "x"}]]
    }"#;

    #[tokio::test]
    async fn test_encode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problem.json");
        std::fs::write(&path, PROBLEM).unwrap();

        let payload = encode_file(&path).await.unwrap();
        let spec = codec::decode(&payload).unwrap();

        assert_eq!(spec.test_count(), 2);
        assert_eq!(spec.setup_code, vec!["import sys\n".to_string()]);
    }

    #[tokio::test]
    async fn test_encode_rejects_unpaired_wrappers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problem.json");
        std::fs::write(&path, r#"{"ExecBefore": ["a"], "I": [""]}"#).unwrap();

        assert!(encode_file(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_encode_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = encode_file(&dir.path().join("absent.json")).await.unwrap_err();

        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_inspect_summary() {
        let spec: ProblemSpec = serde_json::from_str(PROBLEM).unwrap();
        let payload = codec::encode(&spec).unwrap();

        let summary = inspect_payload(&payload).unwrap();

        assert!(summary.contains("Test cases:        2\n"));
        assert!(summary.contains("Private tests:     1\n"));
        assert!(summary.contains("Wrappers:          2\n"));
        assert!(summary.contains("Rewrite per test:  yes\n"));
        assert!(summary.contains("Check stdout:      yes\n"));
        assert!(summary.contains("Check stderr:      no\n"));
        assert!(summary.contains("Tests w/ fixtures: 1\n"));
        assert!(summary.contains("Tests w/ files:    0\n"));
    }

    #[test]
    fn test_decode_payload_uses_wire_names() {
        let spec: ProblemSpec = serde_json::from_str(PROBLEM).unwrap();
        let payload = codec::encode(&spec).unwrap();

        let json = decode_payload(&payload).unwrap();

        assert!(json.contains("\"Code\""));
        assert!(json.contains("\"Private\""));
    }

    #[test]
    fn test_decode_bad_payload() {
        assert!(decode_payload("%%%").is_err());
    }
}
