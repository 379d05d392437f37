//! Filesystem discovery of repositories and grouping directories.
//!
//! Two passes over the codebases root:
//! 1. Find every directory that contains a `.git` marker, record it as a
//!    repository, and never descend into it.
//! 2. Record remaining directories up to two segments deep (provider and
//!    owner levels) as organizational entries.
//!
//! Hidden directories are skipped entirely in both passes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::RepoEntry;

pub const GIT_MARKER: &str = ".git";

/// Maximum segment depth at which plain directories are recorded.
/// Anything deeper is presumed to live inside a repository.
const MAX_ORG_DEPTH: usize = 2;

pub struct Scanner {
    root: PathBuf,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Scan the root and return the unordered set of discovered entries.
    ///
    /// Fails with `NotFound` when the root does not exist; callers must not
    /// build a tree in that case.
    pub fn scan(&self) -> Result<Vec<RepoEntry>> {
        if !self.root.is_dir() {
            return Err(AppError::NotFound(self.root.display().to_string()));
        }

        let mut entries = Vec::new();
        let mut repositories = HashSet::new();

        self.walk_repositories(&self.root, &mut entries, &mut repositories)?;
        debug!(count = repositories.len(), "repository pass complete");

        self.walk_directories(&self.root, 0, &mut entries, &repositories)?;
        debug!(total = entries.len(), "scan complete");

        Ok(entries)
    }

    /// Pass 1: depth-first search for the `.git` marker. A directory that
    /// carries the marker is recorded and its contents are never traversed.
    fn walk_repositories(
        &self,
        dir: &Path,
        entries: &mut Vec<RepoEntry>,
        repositories: &mut HashSet<String>,
    ) -> Result<()> {
        for child in read_subdirs(dir)? {
            let name = dir_name(&child);
            if name.starts_with('.') {
                continue;
            }

            if child.join(GIT_MARKER).is_dir() {
                let rel = self.relative_name(&child);
                debug!(path = %rel, "found repository");
                repositories.insert(rel.clone());
                entries.push(RepoEntry::repository(rel));
                continue;
            }

            self.walk_repositories(&child, entries, repositories)?;
        }
        Ok(())
    }

    /// Pass 2: record grouping directories not already claimed as
    /// repositories, down to `MAX_ORG_DEPTH` segments.
    fn walk_directories(
        &self,
        dir: &Path,
        depth: usize,
        entries: &mut Vec<RepoEntry>,
        repositories: &HashSet<String>,
    ) -> Result<()> {
        if depth >= MAX_ORG_DEPTH {
            return Ok(());
        }

        for child in read_subdirs(dir)? {
            let name = dir_name(&child);
            if name.starts_with('.') {
                continue;
            }

            let rel = self.relative_name(&child);
            if repositories.contains(&rel) {
                continue;
            }

            entries.push(RepoEntry::directory(rel));
            self.walk_directories(&child, depth + 1, entries, repositories)?;
        }
        Ok(())
    }

    /// Path relative to the root with `/`-joined segments.
    fn relative_name(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn read_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    Ok(dirs)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_repo(root: &Path, rel: &str) {
        let dir = root.join(rel).join(GIT_MARKER);
        fs::create_dir_all(dir).unwrap();
    }

    fn names(entries: &[RepoEntry], repo: bool) -> Vec<String> {
        let mut v: Vec<String> = entries
            .iter()
            .filter(|e| e.is_repository == repo)
            .map(|e| e.name.clone())
            .collect();
        v.sort();
        v
    }

    #[test]
    fn missing_root_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let scanner = Scanner::new(tmp.path().join("absent"));
        assert!(matches!(scanner.scan(), Err(AppError::NotFound(_))));
    }

    #[test]
    fn finds_repositories_and_grouping_directories() {
        let tmp = TempDir::new().unwrap();
        make_repo(tmp.path(), "github.com/alice/foo");
        make_repo(tmp.path(), "github.com/alice/bar");
        make_repo(tmp.path(), "gitlab.com/bob/baz");

        let entries = Scanner::new(tmp.path()).scan().unwrap();

        assert_eq!(
            names(&entries, true),
            vec!["github.com/alice/bar", "github.com/alice/foo", "gitlab.com/bob/baz"]
        );
        assert_eq!(
            names(&entries, false),
            vec!["github.com", "github.com/alice", "gitlab.com", "gitlab.com/bob"]
        );
    }

    #[test]
    fn repository_contents_are_not_traversed() {
        let tmp = TempDir::new().unwrap();
        make_repo(tmp.path(), "github.com/alice/foo");
        // A vendored repository inside the working copy must stay invisible.
        make_repo(tmp.path(), "github.com/alice/foo/vendor/dep");

        let entries = Scanner::new(tmp.path()).scan().unwrap();

        assert_eq!(names(&entries, true), vec!["github.com/alice/foo"]);
        assert!(!entries.iter().any(|e| e.name.contains("vendor")));
    }

    #[test]
    fn hidden_directories_are_skipped() {
        let tmp = TempDir::new().unwrap();
        make_repo(tmp.path(), "github.com/alice/foo");
        make_repo(tmp.path(), ".cache/github.com/ghost");
        fs::create_dir_all(tmp.path().join(".config")).unwrap();

        let entries = Scanner::new(tmp.path()).scan().unwrap();

        assert_eq!(names(&entries, true), vec!["github.com/alice/foo"]);
        assert!(!entries.iter().any(|e| e.name.starts_with('.')));
    }

    #[test]
    fn deep_plain_directories_are_not_recorded() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("github.com/alice/notes/drafts")).unwrap();

        let entries = Scanner::new(tmp.path()).scan().unwrap();

        assert_eq!(names(&entries, false), vec!["github.com", "github.com/alice"]);
    }
}
