/// Working area for a single grading job
///
/// Owns the directory the candidate runs in. Tracks every path it writes
/// (the script and fixture files) so the job can be cleaned up afterwards,
/// and remembers the last script it wrote so an unchanged script is never
/// rewritten between test cases.
use judge_common::plan::Wrapper;
use judge_common::types::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Fixture creation failed; this is an infrastructure fault, not a candidate failure
#[derive(Debug, thiserror::Error)]
#[error("{source} {name} {content}")]
pub struct FixtureError {
    pub name: String,
    pub content: String,
    #[source]
    pub source: io::Error,
}

pub struct Workspace {
    root: PathBuf,
    script_name: String,
    last_script: Option<String>,
    written: Vec<PathBuf>,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, script_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            script_name: script_name.into(),
            last_script: None,
            written: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn script_path(&self) -> PathBuf {
        self.root.join(&self.script_name)
    }

    /// Write `setup + code + teardown` to the script path
    ///
    /// Returns `false` without touching the disk when the composed script is
    /// identical to the one already written.
    pub async fn materialize(&mut self, wrapper: &Wrapper, code: &str) -> io::Result<bool> {
        let script = wrapper.compose(code);
        if self.last_script.as_deref() == Some(script.as_str()) {
            return Ok(false);
        }

        let path = self.script_path();
        tokio::fs::write(&path, &script).await?;
        debug!(path = %path.display(), bytes = script.len(), "Script written");

        self.track(path);
        self.last_script = Some(script);
        Ok(true)
    }

    /// Create (or truncate) each fixture file and write its content
    pub async fn create_files(&mut self, files: &[File]) -> Result<(), FixtureError> {
        for file in files {
            let path = self.root.join(&file.name);
            tokio::fs::write(&path, file.content.as_bytes())
                .await
                .map_err(|source| FixtureError {
                    name: file.name.clone(),
                    content: file.content.clone(),
                    source,
                })?;
            debug!(file = %file.name, "Fixture created");
            self.track(path);
        }
        Ok(())
    }

    /// Paths written by this workspace, in first-write order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Remove every tracked path; missing files are ignored
    pub async fn cleanup(&mut self) {
        for path in self.written.drain(..) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove file"),
            }
        }
        self.last_script = None;
    }

    fn track(&mut self, path: PathBuf) {
        if !self.written.contains(&path) {
            self.written.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapper(setup: &str, teardown: &str) -> Wrapper {
        Wrapper {
            setup: setup.to_string(),
            teardown: teardown.to_string(),
        }
    }

    #[tokio::test]
    async fn test_materialize_concatenates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::new(dir.path(), "f.py");

        assert!(ws.materialize(&wrapper("a\n", "\nc"), "b").await.unwrap());

        let content = std::fs::read_to_string(dir.path().join("f.py")).unwrap();
        assert_eq!(content, "a\nb\nc");
    }

    #[tokio::test]
    async fn test_materialize_overwrites_longer_script() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::new(dir.path(), "f.py");

        ws.materialize(&wrapper("long setup ", ""), "code").await.unwrap();
        ws.materialize(&wrapper("", ""), "x").await.unwrap();

        let content = std::fs::read_to_string(ws.script_path()).unwrap();
        assert_eq!(content, "x");
    }

    #[tokio::test]
    async fn test_unchanged_script_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::new(dir.path(), "f.py");
        let w = wrapper("s", "t");

        assert!(ws.materialize(&w, "c").await.unwrap());
        assert!(!ws.materialize(&w, "c").await.unwrap());
        assert!(ws.materialize(&wrapper("s2", "t"), "c").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_files_truncates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("in.txt"), "previous long content").unwrap();
        let mut ws = Workspace::new(dir.path(), "f.py");

        ws.create_files(&[File::new("in.txt", "new"), File::new("empty.txt", "")])
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(dir.path().join("in.txt")).unwrap(), "new");
        assert_eq!(std::fs::read_to_string(dir.path().join("empty.txt")).unwrap(), "");
        assert_eq!(ws.written().len(), 2);
    }

    #[tokio::test]
    async fn test_create_files_failure_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::new(dir.path(), "f.py");

        let err = ws
            .create_files(&[File::new("missing/dir/x.txt", "body")])
            .await
            .unwrap_err();

        assert_eq!(err.name, "missing/dir/x.txt");
        assert!(err.to_string().ends_with("missing/dir/x.txt body"));
    }

    #[tokio::test]
    async fn test_cleanup_removes_tracked_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::new(dir.path(), "f.py");

        ws.materialize(&wrapper("", ""), "code").await.unwrap();
        ws.create_files(&[File::new("a.txt", "a")]).await.unwrap();
        std::fs::remove_file(dir.path().join("a.txt")).unwrap();

        ws.cleanup().await;

        assert!(!dir.path().join("f.py").exists());
        assert!(ws.written().is_empty());
        // Script must be written again after cleanup
        assert!(ws.materialize(&wrapper("", ""), "code").await.unwrap());
    }
}
