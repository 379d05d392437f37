//! Arena-backed repository tree.
//!
//! Nodes live in a single `Vec` and refer to each other through `NodeId`
//! indices: children are owned top-down, the parent link is a plain index
//! used only to walk upward. The tree retains its root list directly, so
//! re-flattening never has to re-derive roots from visible rows.

use std::cmp::Ordering;

use crate::models::{OpStatus, RepoEntry};

/// Handle to a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
pub struct TreeNode {
    /// Single path segment, unique among siblings.
    pub name: String,
    /// `/`-joined path from the root down to this node.
    pub full_path: String,
    /// True only for leaf nodes confirmed as repositories.
    pub is_repository: bool,
    /// Providers (level 0) start expanded, everything else collapsed.
    pub expanded: bool,
    pub level: usize,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub status: OpStatus,
    pub status_message: Option<String>,
}

#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl Tree {
    /// Build the tree from scanner output.
    ///
    /// Entries are sorted by full path for determinism, then inserted
    /// segment by segment, reusing an existing sibling when one matches.
    /// Sibling lists are sorted afterwards: alphabetical at the provider
    /// level, directories before repositories (then alphabetical) below.
    pub fn build(mut entries: Vec<RepoEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let mut tree = Tree::default();
        for entry in &entries {
            tree.insert(entry);
        }

        let roots = tree.roots.clone();
        tree.sort_siblings(roots);
        tree
    }

    fn insert(&mut self, entry: &RepoEntry) {
        let segments: Vec<&str> = entry.name.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return;
        }

        let mut parent: Option<NodeId> = None;
        let mut full_path = String::new();

        for (level, segment) in segments.iter().enumerate() {
            if !full_path.is_empty() {
                full_path.push('/');
            }
            full_path.push_str(segment);

            let siblings = match parent {
                Some(id) => &self.nodes[id.0].children,
                None => &self.roots,
            };

            let existing = siblings
                .iter()
                .copied()
                .find(|id| self.nodes[id.0].name == *segment);

            let id = match existing {
                Some(id) => id,
                None => {
                    let is_last = level == segments.len() - 1;
                    let id = NodeId(self.nodes.len());
                    self.nodes.push(TreeNode {
                        name: segment.to_string(),
                        full_path: full_path.clone(),
                        is_repository: is_last && entry.is_repository,
                        expanded: level == 0,
                        level,
                        children: Vec::new(),
                        parent,
                        status: OpStatus::None,
                        status_message: None,
                    });
                    match parent {
                        Some(pid) => {
                            self.nodes[pid.0].children.push(id);
                            // A node that gains children is organizational
                            // no matter what the classifier said about it.
                            self.nodes[pid.0].is_repository = false;
                        }
                        None => self.roots.push(id),
                    }
                    id
                }
            };

            parent = Some(id);
        }
    }

    fn sort_siblings(&mut self, mut ids: Vec<NodeId>) {
        let Some(first) = ids.first().copied() else {
            return;
        };
        ids.sort_by(|a, b| self.order(*a, *b));

        // Siblings share a parent, so any member identifies the list owner.
        match self.nodes[first.0].parent {
            None => self.roots = ids.clone(),
            Some(parent) => self.nodes[parent.0].children = ids.clone(),
        }

        for id in ids {
            let children = self.nodes[id.0].children.clone();
            if !children.is_empty() {
                self.sort_siblings(children);
            }
        }
    }

    fn order(&self, a: NodeId, b: NodeId) -> Ordering {
        let (a, b) = (&self.nodes[a.0], &self.nodes[b.0]);
        if a.level > 0 && a.is_repository != b.is_repository {
            // Directories sort before repositories below the provider level.
            return if a.is_repository {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }
        a.name.cmp(&b.name)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Toggle or set expansion. Returns false (no-op) for childless nodes.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> bool {
        if self.nodes[id.0].children.is_empty() {
            return false;
        }
        if self.nodes[id.0].expanded == expanded {
            return false;
        }
        self.nodes[id.0].expanded = expanded;
        true
    }

    /// Find the repository node with the given full path.
    pub fn find_repository(&self, full_path: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.is_repository && n.full_path == full_path)
            .map(NodeId)
    }

    /// Set operation status on a repository node. Returns false when no
    /// repository matches the path.
    pub fn set_status(
        &mut self,
        full_path: &str,
        status: OpStatus,
        message: Option<String>,
    ) -> bool {
        match self.find_repository(full_path) {
            Some(id) => {
                let node = &mut self.nodes[id.0];
                node.status = status;
                node.status_message = message;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<RepoEntry> {
        vec![
            RepoEntry::repository("github.com/alice/foo"),
            RepoEntry::repository("github.com/alice/bar"),
            RepoEntry::repository("gitlab.com/bob/baz"),
            RepoEntry::directory("github.com"),
            RepoEntry::directory("github.com/alice"),
            RepoEntry::directory("gitlab.com"),
            RepoEntry::directory("gitlab.com/bob"),
        ]
    }

    #[test]
    fn builds_provider_owner_repo_hierarchy() {
        let tree = Tree::build(sample_entries());

        let roots: Vec<&str> = tree
            .roots()
            .iter()
            .map(|id| tree.node(*id).name.as_str())
            .collect();
        assert_eq!(roots, vec!["github.com", "gitlab.com"]);

        let github = tree.roots()[0];
        assert_eq!(tree.node(github).children.len(), 1);

        let alice = tree.node(github).children[0];
        assert_eq!(tree.node(alice).name, "alice");
        assert_eq!(tree.node(alice).full_path, "github.com/alice");
        assert!(!tree.node(alice).is_repository);

        let repos: Vec<&str> = tree
            .node(alice)
            .children
            .iter()
            .map(|id| tree.node(*id).name.as_str())
            .collect();
        assert_eq!(repos, vec!["bar", "foo"]);
        for id in &tree.node(alice).children {
            assert!(tree.node(*id).is_repository);
            assert!(tree.node(*id).children.is_empty());
        }
    }

    #[test]
    fn shared_prefixes_reuse_nodes() {
        let tree = Tree::build(sample_entries());

        // github.com appears once even though three entries mention it.
        let count = tree
            .roots()
            .iter()
            .filter(|id| tree.node(**id).name == "github.com")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn directories_sort_before_repositories_below_provider_level() {
        let tree = Tree::build(vec![
            RepoEntry::directory("github.com"),
            RepoEntry::repository("github.com/aardvark"),
            RepoEntry::directory("github.com/zeta"),
            RepoEntry::repository("github.com/zeta/repo"),
        ]);

        let github = tree.roots()[0];
        let children: Vec<(&str, bool)> = tree
            .node(github)
            .children
            .iter()
            .map(|id| {
                let n = tree.node(*id);
                (n.name.as_str(), n.is_repository)
            })
            .collect();
        // zeta is a directory, so it precedes the aardvark repository.
        assert_eq!(children, vec![("zeta", false), ("aardvark", true)]);
    }

    #[test]
    fn providers_expanded_by_default_owners_collapsed() {
        let tree = Tree::build(sample_entries());

        for id in tree.roots() {
            assert!(tree.node(*id).expanded);
            for child in &tree.node(*id).children {
                assert!(!tree.node(*child).expanded);
            }
        }
    }

    #[test]
    fn expansion_toggle_is_noop_on_leaves() {
        let mut tree = Tree::build(sample_entries());
        let repo = tree.find_repository("github.com/alice/foo").unwrap();
        assert!(!tree.set_expanded(repo, true));
        assert!(!tree.node(repo).expanded);
    }

    #[test]
    fn status_updates_target_repository_nodes_only() {
        let mut tree = Tree::build(sample_entries());

        assert!(tree.set_status(
            "github.com/alice/foo",
            OpStatus::Failed,
            Some("Permission denied - check credentials".into()),
        ));
        // Organizational paths never match.
        assert!(!tree.set_status("github.com/alice", OpStatus::Failed, None));

        let id = tree.find_repository("github.com/alice/foo").unwrap();
        assert_eq!(tree.node(id).status, OpStatus::Failed);
    }

    #[test]
    fn node_with_children_is_never_a_repository() {
        // A stray classification marking an intermediate segment as a
        // repository is overruled once it gains children.
        let tree = Tree::build(vec![
            RepoEntry::repository("github.com/alice"),
            RepoEntry::repository("github.com/alice/foo"),
        ]);

        let github = tree.roots()[0];
        let alice = tree.node(github).children[0];
        assert!(!tree.node(alice).is_repository);
        assert!(tree.node(tree.node(alice).children[0]).is_repository);
    }
}
