//! Scanner output: one entry per discovered repository or grouping directory.

/// A single discovery result under the codebases root.
///
/// `name` is the path relative to the root with `/`-joined segments
/// (e.g. `github.com/alice/foo`), regardless of platform separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    pub name: String,
    pub is_repository: bool,
}

impl RepoEntry {
    pub fn repository(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_repository: true,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_repository: false,
        }
    }
}
