/// Test Evaluator - verdict and verification logic
///
/// **Core Responsibility:**
/// Compare raw execution outputs and produced files against expectations
/// and describe the first failure.
///
/// **Critical Properties:**
/// - Knows nothing about how the script was executed
/// - Comparison is exact: no trimming, no newline normalization
/// - Files are compared byte-for-byte
///
/// **Redaction Rules:**
/// - Private test cases report only `Test {i} failed`
/// - Public test cases show expected and actual values
/// - File open/read errors are always shown verbatim, even for private tests
use crate::engine::Execution;
use judge_common::types::File;
use std::fmt;
use std::path::Path;

/// Single result of a grading job
///
/// Empty means every test case passed. Otherwise it holds the display
/// message of the first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    failure: Option<String>,
}

impl Verdict {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    pub fn message(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Text printed as the job result
    pub fn render(&self) -> &str {
        self.failure.as_deref().unwrap_or("Ok")
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render())
    }
}

/// Expectations for the output streams of one test case
#[derive(Debug, Clone, Copy)]
pub struct StreamExpectation<'a> {
    pub index: usize,
    pub stdout: Option<&'a str>,
    pub stderr: Option<&'a str>,
    pub private: bool,
}

fn redacted(index: usize) -> String {
    format!("Test {} failed\n", index)
}

/// Check outcome, stdout and stderr, in that order
///
/// Returns the failure message of the first mismatch, or `None` if the test
/// case passed its stream checks.
pub fn check_outcome(execution: &Execution, expected: &StreamExpectation<'_>) -> Option<String> {
    let i = expected.index;

    if !execution.outcome.is_success() {
        if expected.private {
            return Some(redacted(i));
        }
        return Some(format!("Test {} failed with error {}\n", i, execution.outcome));
    }

    if let Some(stdout) = expected.stdout {
        if execution.stdout != stdout {
            if expected.private {
                return Some(redacted(i));
            }
            return Some(format!(
                "Test {}\nExpected output\n{}\nActual Output\n{}\n",
                i, stdout, execution.stdout
            ));
        }
    }

    if let Some(stderr) = expected.stderr {
        if execution.stderr != stderr {
            if expected.private {
                return Some(redacted(i));
            }
            return Some(format!(
                "Test {}\nExpected stderr\n{}\nActual Stderr\n{}\n",
                i, stderr, execution.stderr
            ));
        }
    }

    None
}

/// Check each expected file under `root`, stopping at the first mismatch
pub async fn check_files(root: &Path, files: &[File]) -> Option<String> {
    for file in files {
        let actual = match tokio::fs::read(root.join(&file.name)).await {
            Ok(bytes) => bytes,
            Err(e) => return Some(format!("open {}: {}", file.name, e)),
        };

        if actual != file.content.as_bytes() {
            return Some(format!(
                "File {} does not have the correct contents\nExpected:\n{}\nGot:\n{}\n",
                file.name,
                file.content,
                String::from_utf8_lossy(&actual)
            ));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Outcome;

    fn run(stdout: &str, stderr: &str, outcome: Outcome) -> Execution {
        Execution {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            outcome,
        }
    }

    fn expect<'a>(stdout: Option<&'a str>, stderr: Option<&'a str>, private: bool) -> StreamExpectation<'a> {
        StreamExpectation {
            index: 0,
            stdout,
            stderr,
            private,
        }
    }

    #[test]
    fn test_verdict_render() {
        assert_eq!(Verdict::ok().render(), "Ok");
        assert!(Verdict::ok().is_ok());
        assert_eq!(Verdict::failed("Test 1 failed\n").to_string(), "Test 1 failed\n");
    }

    #[test]
    fn test_nothing_expected_passes() {
        let result = check_outcome(&run("anything", "noise", Outcome::Success), &expect(None, None, false));
        assert_eq!(result, None);
    }

    #[test]
    fn test_runtime_error_public() {
        let exec = run("", "Traceback", Outcome::RuntimeError("exit status 1".into()));
        let result = check_outcome(&exec, &expect(Some(""), None, false));

        assert_eq!(result.as_deref(), Some("Test 0 failed with error exit status 1\n"));
    }

    #[test]
    fn test_runtime_error_private() {
        let exec = run("", "", Outcome::RuntimeError("exit status 1".into()));
        let mut expected = expect(None, None, true);
        expected.index = 4;

        assert_eq!(check_outcome(&exec, &expected).as_deref(), Some("Test 4 failed\n"));
    }

    #[test]
    fn test_timeout_is_execution_failure() {
        let exec = run("25\n", "", Outcome::TimedOut);
        let result = check_outcome(&exec, &expect(Some("25\n"), None, false));

        assert_eq!(result.as_deref(), Some("Test 0 failed with error signal: killed\n"));
    }

    #[test]
    fn test_stdout_mismatch_public() {
        let exec = run("25\n", "", Outcome::Success);
        let result = check_outcome(&exec, &expect(Some("24\n"), None, false)).unwrap();

        assert_eq!(result, "Test 0\nExpected output\n24\n\nActual Output\n25\n\n");
        assert!(result.contains("Expected output\n24\n"));
        assert!(result.contains("Actual Output\n25\n"));
    }

    #[test]
    fn test_stdout_mismatch_private() {
        let exec = run("25\n", "", Outcome::Success);
        let result = check_outcome(&exec, &expect(Some("24\n"), None, true));

        assert_eq!(result.as_deref(), Some("Test 0 failed\n"));
    }

    #[test]
    fn test_stdout_comparison_is_exact() {
        let exec = run("25", "", Outcome::Success);
        assert!(check_outcome(&exec, &expect(Some("25\n"), None, false)).is_some());
    }

    #[test]
    fn test_stderr_mismatch_shows_actual_stderr() {
        let exec = run("out", "err", Outcome::Success);
        let result = check_outcome(&exec, &expect(Some("out"), Some("warn"), false)).unwrap();

        assert_eq!(result, "Test 0\nExpected stderr\nwarn\nActual Stderr\nerr\n");
    }

    #[test]
    fn test_stderr_mismatch_private() {
        let exec = run("out", "err", Outcome::Success);
        let result = check_outcome(&exec, &expect(Some("out"), Some("warn"), true));

        assert_eq!(result.as_deref(), Some("Test 0 failed\n"));
    }

    #[test]
    fn test_stdout_checked_before_stderr() {
        let exec = run("bad", "bad", Outcome::Success);
        let result = check_outcome(&exec, &expect(Some("good"), Some("good"), false)).unwrap();

        assert!(result.contains("Expected output"));
    }

    #[tokio::test]
    async fn test_file_mismatch_names_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("out.txt"), "bye").unwrap();

        let result = check_files(dir.path(), &[File::new("out.txt", "hi")]).await.unwrap();

        assert_eq!(
            result,
            "File out.txt does not have the correct contents\nExpected:\nhi\nGot:\nbye\n"
        );
    }

    #[tokio::test]
    async fn test_missing_file_shows_raw_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = check_files(dir.path(), &[File::new("nope.txt", "x")]).await.unwrap();

        assert!(result.starts_with("open nope.txt: "));
        assert!(!result.starts_with("Test"));
    }

    #[tokio::test]
    async fn test_first_mismatched_file_stops_check() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "A").unwrap();
        std::fs::write(dir.path().join("b.txt"), "wrong").unwrap();

        let files = [
            File::new("a.txt", "A"),
            File::new("b.txt", "B"),
            File::new("c.txt", "C"),
        ];
        let result = check_files(dir.path(), &files).await.unwrap();

        assert!(result.starts_with("File b.txt"));
    }

    #[tokio::test]
    async fn test_file_check_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("out.txt"), "hi").unwrap();
        let files = [File::new("out.txt", "hi")];

        let first = check_files(dir.path(), &files).await;
        let second = check_files(dir.path(), &files).await;

        assert_eq!(first, None);
        assert_eq!(first, second);
    }
}
