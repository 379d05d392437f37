//! Tree linearization for display.
//!
//! `flatten` is a pure function from the tree (plus each node's expansion
//! flag) to the ordered row list the display renders. It is re-run after
//! every structural or status change instead of patching rows in place,
//! so the view can never drift from the tree.

use crate::models::OpStatus;
use crate::tree::node::{NodeId, Tree};

/// One visible row derived from a tree node.
///
/// `selected` belongs to the view layer, not the tree: it starts false on
/// every rebuild and the caller re-applies its selection set afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: NodeId,
    pub name: String,
    pub full_path: String,
    pub level: usize,
    pub is_repository: bool,
    pub expandable: bool,
    pub expanded: bool,
    pub status: OpStatus,
    pub status_message: Option<String>,
    pub selected: bool,
}

/// Produce the ordered visible rows for the whole tree.
pub fn flatten(tree: &Tree) -> Vec<DisplayRow> {
    let mut rows = Vec::new();
    for root in tree.roots() {
        flatten_node(tree, *root, &mut rows);
    }
    rows
}

fn flatten_node(tree: &Tree, id: NodeId, rows: &mut Vec<DisplayRow>) {
    let node = tree.node(id);
    rows.push(DisplayRow {
        id,
        name: node.name.clone(),
        full_path: node.full_path.clone(),
        level: node.level,
        is_repository: node.is_repository,
        expandable: !node.children.is_empty(),
        expanded: node.expanded,
        status: node.status,
        status_message: node.status_message.clone(),
        selected: false,
    });

    if node.expanded {
        for child in &node.children {
            flatten_node(tree, *child, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RepoEntry;

    fn sample_tree() -> Tree {
        Tree::build(vec![
            RepoEntry::repository("github.com/alice/foo"),
            RepoEntry::repository("github.com/alice/bar"),
            RepoEntry::repository("gitlab.com/bob/baz"),
            RepoEntry::directory("github.com"),
            RepoEntry::directory("github.com/alice"),
            RepoEntry::directory("gitlab.com"),
            RepoEntry::directory("gitlab.com/bob"),
        ])
    }

    fn expand_all(tree: &mut Tree) {
        let mut stack: Vec<NodeId> = tree.roots().to_vec();
        while let Some(id) = stack.pop() {
            tree.set_expanded(id, true);
            stack.extend(tree.node(id).children.iter().copied());
        }
    }

    #[test]
    fn fully_expanded_emits_one_row_per_entry() {
        let mut tree = sample_tree();
        expand_all(&mut tree);

        let rows = flatten(&tree);
        let paths: Vec<&str> = rows.iter().map(|r| r.full_path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "github.com",
                "github.com/alice",
                "github.com/alice/bar",
                "github.com/alice/foo",
                "gitlab.com",
                "gitlab.com/bob",
                "gitlab.com/bob/baz",
            ]
        );
    }

    #[test]
    fn flattening_is_deterministic() {
        let tree = sample_tree();
        assert_eq!(flatten(&tree), flatten(&tree));
    }

    #[test]
    fn collapsed_subtree_contributes_exactly_one_row() {
        let tree = sample_tree();
        // Providers expanded, owners collapsed by default.
        let rows = flatten(&tree);
        let paths: Vec<&str> = rows.iter().map(|r| r.full_path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["github.com", "github.com/alice", "gitlab.com", "gitlab.com/bob"]
        );
    }

    #[test]
    fn collapse_then_expand_round_trips() {
        let mut tree = sample_tree();
        expand_all(&mut tree);
        let before = flatten(&tree);

        let github = tree.roots()[0];
        tree.set_expanded(github, false);
        let collapsed = flatten(&tree);
        assert_eq!(
            collapsed.iter().filter(|r| r.full_path.starts_with("github.com")).count(),
            1
        );

        tree.set_expanded(github, true);
        assert_eq!(flatten(&tree), before);
    }

    #[test]
    fn rows_carry_indentation_levels() {
        let mut tree = sample_tree();
        expand_all(&mut tree);

        for row in flatten(&tree) {
            assert_eq!(row.level, row.full_path.matches('/').count());
        }
    }
}
