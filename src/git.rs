//! The git executable boundary.
//!
//! All version-control work is delegated to the `git` binary via
//! `tokio::process`; removal is a plain recursive delete. Each operation
//! returns a `GitOutput` tri-state (succeeded, raw output, raw error) and
//! nothing here interprets git's output beyond capturing it.
//!
//! `VcsExecutor` is the seam the batch coordinator works against, so the
//! coordinator can be driven by a fake in tests.

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use crate::models::OpKind;
use crate::remote;
use crate::scanner::GIT_MARKER;

/// Result of one invocation of the external VCS tooling.
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

impl GitOutput {
    fn ok(output: String) -> Self {
        Self {
            success: true,
            output,
            error: None,
        }
    }

    fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
        }
    }
}

/// Executor seam used by the batch coordinator.
///
/// For clone operations `target` is the source URL; for update and remove
/// it is the repository's path relative to the root.
pub trait VcsExecutor: Send + Sync + 'static {
    fn run_op(&self, kind: OpKind, target: &str) -> impl Future<Output = GitOutput> + Send;

    /// Pre-flight existence probe, used for remove-batch admission.
    fn target_exists(&self, target: &str) -> bool;
}

/// Runs git operations against repositories under the codebases root.
pub struct Git {
    base_path: PathBuf,
}

impl Git {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Absolute path for a repository name relative to the root.
    pub fn full_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    pub fn path_exists(&self, name: &str) -> bool {
        self.full_path(name).exists()
    }

    pub fn is_repository(&self, name: &str) -> bool {
        self.full_path(name).join(GIT_MARKER).is_dir()
    }

    /// `git clone <url> <destination>`, creating the parent directory first.
    pub async fn clone_repo(&self, url: &str, destination: &Path) -> GitOutput {
        if let Some(parent) = destination.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                return GitOutput::fail(format!("failed to create directory: {}", e));
            }
        }

        debug!(url, destination = %destination.display(), "cloning");
        let mut cmd = Command::new("git");
        cmd.arg("clone").arg(url).arg(destination);
        run_command(cmd).await
    }

    /// `git -C <path> pull`.
    pub async fn pull(&self, repo_path: &Path) -> GitOutput {
        debug!(path = %repo_path.display(), "pulling");
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(repo_path).arg("pull");
        run_command(cmd).await
    }

    /// Recursive delete of the working copy.
    pub async fn remove(&self, repo_path: &Path) -> GitOutput {
        debug!(path = %repo_path.display(), "removing");
        match tokio::fs::remove_dir_all(repo_path).await {
            Ok(()) => GitOutput::ok(String::new()),
            Err(e) => GitOutput::fail(e.to_string()),
        }
    }
}

impl VcsExecutor for Git {
    async fn run_op(&self, kind: OpKind, target: &str) -> GitOutput {
        match kind {
            OpKind::Clone => {
                if let Err(e) = remote::validate_url(target) {
                    return GitOutput::fail(e.to_string());
                }
                let url = remote::expand_short_notation(target);
                let destination = self.full_path(&remote::clone_path(target));
                if destination.exists() {
                    return GitOutput::fail(format!(
                        "repository already exists at {}",
                        destination.display()
                    ));
                }
                self.clone_repo(&url, &destination).await
            }
            OpKind::Update => self.pull(&self.full_path(target)).await,
            OpKind::Remove => self.remove(&self.full_path(target)).await,
        }
    }

    fn target_exists(&self, target: &str) -> bool {
        self.path_exists(target)
    }
}

/// Run a command capturing stdout and stderr. On failure the error text is
/// stderr when present, stdout otherwise.
async fn run_command(mut cmd: Command) -> GitOutput {
    match cmd.output().await {
        Ok(out) => {
            let stdout = String::from_utf8_lossy(&out.stdout).to_string();
            if out.status.success() {
                GitOutput::ok(stdout)
            } else {
                let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
                let message = if stderr.is_empty() {
                    stdout.trim().to_string()
                } else {
                    stderr
                };
                GitOutput::fail(message)
            }
        }
        Err(e) => GitOutput::fail(format!("failed to run git: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn remove_deletes_the_working_copy() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("github.com/alice/foo");
        fs::create_dir_all(repo.join(GIT_MARKER)).unwrap();

        let git = Git::new(tmp.path());
        let out = git.run_op(OpKind::Remove, "github.com/alice/foo").await;

        assert!(out.success);
        assert!(!repo.exists());
    }

    #[tokio::test]
    async fn remove_missing_path_fails() {
        let tmp = TempDir::new().unwrap();
        let git = Git::new(tmp.path());

        let out = git.run_op(OpKind::Remove, "github.com/alice/gone").await;
        assert!(!out.success);
        assert!(out.error.is_some());
    }

    #[tokio::test]
    async fn clone_rejects_invalid_urls_without_running_git() {
        let tmp = TempDir::new().unwrap();
        let git = Git::new(tmp.path());

        let out = git.run_op(OpKind::Clone, "not a url").await;
        assert!(!out.success);
    }

    #[test]
    fn repository_probe_checks_the_marker() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("github.com/alice/foo").join(GIT_MARKER)).unwrap();
        fs::create_dir_all(tmp.path().join("github.com/alice/notes")).unwrap();

        let git = Git::new(tmp.path());
        assert!(git.is_repository("github.com/alice/foo"));
        assert!(!git.is_repository("github.com/alice/notes"));
        assert!(git.path_exists("github.com/alice/notes"));
        assert!(!git.path_exists("github.com/alice/gone"));
    }
}
