//! [`Storage`] backed by a git working copy, driving the `git` binary.
//!
//! The working copy is owned by the publisher: a rollback hard-resets it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Mutex;

use crate::storage::{Storage, SyncResult};

#[derive(Debug)]
pub struct GitStorage {
    root: PathBuf,
    remote: String,
    /// `HEAD` right after the last successful sync.
    synced_head: Mutex<Option<String>>,
}

impl GitStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            remote: "origin".to_string(),
            synced_head: Mutex::new(None),
        }
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Run git in the working copy, returning trimmed stdout.
    async fn output(&self, args: &[&str]) -> Result<String, String> {
        log::debug!("git -C {} {}", self.root.display(), args.join(" "));
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .await
            .map_err(|e| format!("could not run git: {e}"))?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if output.status.success() {
            return Ok(stdout);
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let detail = if stderr.is_empty() { stdout } else { stderr };
        Err(format!("git {} ({}): {detail}", args[0], output.status))
    }

    async fn git(&self, args: &[&str]) -> SyncResult {
        match self.output(args).await {
            Ok(_) => SyncResult::Completed,
            Err(detail) => SyncResult::Failed(detail),
        }
    }
}

#[async_trait]
impl Storage for GitStorage {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn sync(&self) -> SyncResult {
        let mut synced_head = self.synced_head.lock().await;
        *synced_head = None;
        if let SyncResult::Failed(detail) = self.git(&["pull", "--ff-only", &self.remote]).await {
            return SyncResult::Failed(detail);
        }
        match self.output(&["rev-parse", "HEAD"]).await {
            Ok(head) => {
                *synced_head = Some(head);
                SyncResult::Completed
            }
            Err(detail) => SyncResult::Failed(detail),
        }
    }

    async fn stage(&self, pattern: &str) -> SyncResult {
        self.git(&["add", "--", pattern]).await
    }

    async fn commit(&self, message: &str) -> bool {
        match self.git(&["commit", "-m", message]).await {
            SyncResult::Completed => true,
            SyncResult::Failed(detail) => {
                log::error!("{detail}");
                false
            }
        }
    }

    async fn push(&self) -> SyncResult {
        self.git(&["push", &self.remote]).await
    }

    async fn rollback(&self, pattern: &str) -> SyncResult {
        let synced_head = self.synced_head.lock().await.clone();
        let target = synced_head.as_deref().unwrap_or("HEAD");
        log::warn!("Resetting {} to {target}", self.root.display());
        if let SyncResult::Failed(detail) = self.git(&["reset", "--hard", target]).await {
            return SyncResult::Failed(detail);
        }
        self.git(&["clean", "-fd", "--", pattern]).await
    }
}
