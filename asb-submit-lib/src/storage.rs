//! Versioned storage seam, the publish lock and the on-disk output layout.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::SubmitError;

/// Outcome of a synchronization step (pull, push).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncResult {
    Completed,
    Failed(String),
}

impl fmt::Display for SyncResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("Completed"),
            Self::Failed(detail) => write!(f, "Failed: {detail}"),
        }
    }
}

/// A versioned directory that submissions are published into.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Working directory that output files are written under.
    fn root(&self) -> &Path;

    /// Bring the working directory up to date.
    async fn sync(&self) -> SyncResult;

    /// Stage changes matching `pattern` (relative to [`Storage::root`]).
    async fn stage(&self, pattern: &str) -> SyncResult;

    /// Record staged changes. `false` when nothing could be committed.
    async fn commit(&self, message: &str) -> bool;

    /// Publish recorded changes.
    async fn push(&self) -> SyncResult;

    /// Return to the state of the last successful [`Storage::sync`],
    /// discarding local commits and anything left under `pattern`.
    async fn rollback(&self, pattern: &str) -> SyncResult;
}

/// Serializes the publish sequence across concurrent submissions.
///
/// Clones share one lock; every workflow publishing into the same storage
/// root must hold a clone of the same `PublishLock`.
#[derive(Debug, Clone, Default)]
pub struct PublishLock {
    inner: Arc<Mutex<()>>,
}

impl PublishLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> OwnedMutexGuard<()> {
        self.inner.clone().lock_owned().await
    }

    /// Whether another holder currently owns the lock.
    pub fn is_held(&self) -> bool {
        self.inner.try_lock().is_err()
    }
}

/// One file to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub contents: String,
}

/// `{root}/{submitter}/{label}`, with both parts made safe as single path
/// components.
pub fn submission_dir(root: &Path, submitter: &str, label: &str) -> PathBuf {
    root.join(path_component(submitter)).join(path_component(label))
}

/// Replace anything but ASCII letters, digits, `-`, `_` and `.` with `_`.
/// Names made only of dots become underscores too.
pub fn path_component(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "_".repeat(cleaned.len().max(1))
    } else {
        cleaned
    }
}

/// Write every file into `dir`, creating it as needed. On failure the files
/// written so far are removed again before the error is returned.
pub fn write_output(dir: &Path, files: &[OutputFile]) -> Result<Vec<PathBuf>, SubmitError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.name);
        if let Err(e) = std::fs::write(&path, &file.contents) {
            remove_output(&written);
            return Err(e.into());
        }
        written.push(path);
    }
    Ok(written)
}

/// Remove previously written files, then any directories left empty.
pub fn remove_output(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("Could not remove {}: {e}", path.display());
        }
    }
    let mut dirs: Vec<&Path> = paths.iter().filter_map(|p| p.parent()).collect();
    dirs.sort();
    dirs.dedup();
    for dir in dirs {
        // Fails harmlessly when other files are still present.
        let _ = std::fs::remove_dir(dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> Vec<OutputFile> {
        vec![
            OutputFile {
                name: "Game.ini".into(),
                contents: "[a]\nb=c\n\n".into(),
            },
            OutputFile {
                name: "DinoExport_1.ini".into(),
                contents: "[Dino Data]\n\n".into(),
            },
        ]
    }

    #[test]
    fn test_write_then_remove() {
        let root = tempfile::tempdir().unwrap();
        let dir = submission_dir(root.path(), "42", "label");
        let written = write_output(&dir, &files()).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(
            std::fs::read_to_string(dir.join("Game.ini")).unwrap(),
            "[a]\nb=c\n\n"
        );

        remove_output(&written);
        assert!(!dir.exists());
        assert!(root.path().join("42").exists());
    }

    #[test]
    fn test_remove_keeps_unrelated_files() {
        let root = tempfile::tempdir().unwrap();
        let dir = submission_dir(root.path(), "42", "label");
        let written = write_output(&dir, &files()).unwrap();
        std::fs::write(dir.join("other.ini"), "x").unwrap();
        remove_output(&written);
        assert!(dir.join("other.ini").exists());
    }

    #[test]
    fn test_path_component() {
        assert_eq!(path_component("351794468870946827"), "351794468870946827");
        assert_eq!(path_component("../etc"), ".._etc");
        assert_eq!(path_component(".."), "__");
        assert_eq!(path_component(""), "_");
        assert_eq!(path_component("a b/c"), "a_b_c");
    }

    #[tokio::test]
    async fn test_publish_lock_is_shared_between_clones() {
        let lock = PublishLock::new();
        let other = lock.clone();
        assert!(!other.is_held());
        let guard = lock.acquire().await;
        assert!(other.is_held());
        drop(guard);
        assert!(!other.is_held());
    }

    #[test]
    fn test_sync_result_display() {
        assert_eq!(SyncResult::Completed.to_string(), "Completed");
        assert_eq!(
            SyncResult::Failed("no remote".into()).to_string(),
            "Failed: no remote"
        );
    }
}
