//! Per-invocation temporary workspace.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::config::WorkspaceConfig;
use crate::request::Request;

/// An isolated directory holding one invocation's input and output files.
///
/// `release` consumes the workspace, so cleanup can only run once. A
/// workspace dropped without being released (for example while unwinding)
/// still has its directory removed by `TempDir`.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    input_path: PathBuf,
    output_path: PathBuf,
}

impl Workspace {
    /// Creates a uniquely named directory under the configured root.
    pub fn allocate(config: &WorkspaceConfig, request: &Request) -> io::Result<Self> {
        std::fs::create_dir_all(&config.root)?;
        let dir = tempfile::Builder::new()
            .prefix(&config.prefix)
            .tempdir_in(&config.root)?;

        let input_path = dir.path().join(request.input_file_name());
        let output_path = dir.path().join(request.output_file_name());
        debug!(dir = %dir.path().display(), "Allocated workspace");

        Ok(Self {
            dir,
            input_path,
            output_path,
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Deletes the input and output files, then the directory.
    ///
    /// Missing files are not an error. Other failures are logged and
    /// otherwise ignored.
    pub async fn release(self) {
        for path in [&self.input_path, &self.output_path] {
            remove_if_present(path).await;
        }

        let dir = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!(dir = %dir.display(), error = %e, "Failed to remove workspace directory");
        } else {
            debug!(dir = %dir.display(), "Released workspace");
        }
    }
}

async fn remove_if_present(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove workspace file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn request(input: &str, output: &str) -> Request {
        let params: HashMap<String, String> = [
            ("fileUrl", "https://cdn.test/a"),
            ("inputExtension", input),
            ("outputExtension", output),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Request::from_query(&params).unwrap()
    }

    fn config(root: &Path) -> WorkspaceConfig {
        WorkspaceConfig {
            root: root.to_path_buf(),
            prefix: "lambda-".to_string(),
        }
    }

    #[tokio::test]
    async fn test_allocate_paths() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::allocate(&config(root.path()), &request("wav", "ogg")).unwrap();

        assert!(workspace.dir().starts_with(root.path()));
        assert!(workspace
            .dir()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("lambda-"));
        assert_eq!(workspace.input_path(), workspace.dir().join("input.wav"));
        assert_eq!(workspace.output_path(), workspace.dir().join("output.ogg"));
        assert!(!workspace.input_path().exists());

        workspace.release().await;
    }

    #[tokio::test]
    async fn test_allocations_are_distinct() {
        let root = tempfile::tempdir().unwrap();
        let request = request("mp3", "mp3");
        let a = Workspace::allocate(&config(root.path()), &request).unwrap();
        let b = Workspace::allocate(&config(root.path()), &request).unwrap();
        assert_ne!(a.dir(), b.dir());
        a.release().await;
        b.release().await;
    }

    #[tokio::test]
    async fn test_release_removes_files_and_dir() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::allocate(&config(root.path()), &request("mp3", "mp3")).unwrap();
        std::fs::write(workspace.input_path(), b"in").unwrap();
        std::fs::write(workspace.output_path(), b"out").unwrap();
        let dir = workspace.dir().to_path_buf();

        workspace.release().await;

        assert!(!dir.exists());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_release_tolerates_missing_files() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::allocate(&config(root.path()), &request("mp3", "mp3")).unwrap();
        // Only the input was ever written.
        std::fs::write(workspace.input_path(), b"in").unwrap();

        workspace.release().await;

        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_allocate_creates_missing_root() {
        let base = tempfile::tempdir().unwrap();
        let root = base.path().join("nested").join("root");
        let workspace = Workspace::allocate(&config(&root), &request("mp3", "mp3")).unwrap();
        assert!(workspace.dir().starts_with(&root));
        drop(workspace);
        assert_eq!(std::fs::read_dir(&root).unwrap().count(), 0);
    }
}
