use serde::{Deserialize, Serialize};

/// A named file, used both as a fixture to create and as an expectation to verify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Content", default)]
    pub content: String,
}

impl File {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A complete grading job
///
/// `inputs` defines the number of test cases. Every other per-test sequence
/// is optional: `None` disables the corresponding check for the whole job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemSpec {
    #[serde(rename = "Code", default)]
    pub code: String,

    #[serde(rename = "ExecBefore", default, deserialize_with = "nullable_vec")]
    pub setup_code: Vec<String>,

    #[serde(rename = "ExecAfter", default, deserialize_with = "nullable_vec")]
    pub teardown_code: Vec<String>,

    #[serde(rename = "FilesToMake", default, skip_serializing_if = "Option::is_none")]
    pub files_to_create: Option<Vec<Vec<File>>>,

    #[serde(rename = "ExpectedFiles", default, skip_serializing_if = "Option::is_none")]
    pub expected_files: Option<Vec<Vec<File>>>,

    #[serde(rename = "O", default, skip_serializing_if = "Option::is_none")]
    pub expected_stdout: Option<Vec<String>>,

    #[serde(rename = "E", default, skip_serializing_if = "Option::is_none")]
    pub expected_stderr: Option<Vec<String>>,

    #[serde(rename = "I", default, deserialize_with = "nullable_vec")]
    pub inputs: Vec<String>,

    #[serde(rename = "Private", default, deserialize_with = "nullable_vec")]
    pub is_private: Vec<bool>,
}

impl ProblemSpec {
    /// Number of test cases in the job
    pub fn test_count(&self) -> usize {
        self.inputs.len()
    }

    /// Missing privacy flags are treated as private so answer keys never leak
    pub fn is_private(&self, index: usize) -> bool {
        self.is_private.get(index).copied().unwrap_or(true)
    }

    pub fn expected_stdout(&self, index: usize) -> Option<&str> {
        self.expected_stdout
            .as_ref()
            .and_then(|o| o.get(index))
            .map(String::as_str)
    }

    pub fn expected_stderr(&self, index: usize) -> Option<&str> {
        self.expected_stderr
            .as_ref()
            .and_then(|e| e.get(index))
            .map(String::as_str)
    }

    /// Fixture files for a test case, if any were declared for it
    pub fn files_to_create(&self, index: usize) -> Option<&[File]> {
        self.files_to_create
            .as_ref()
            .and_then(|f| f.get(index))
            .map(Vec::as_slice)
    }

    /// Files whose content is checked after a test case, if any were declared for it
    pub fn expected_files(&self, index: usize) -> Option<&[File]> {
        self.expected_files
            .as_ref()
            .and_then(|f| f.get(index))
            .map(Vec::as_slice)
    }
}

/// Treat an explicit `null` the same as a missing key
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
