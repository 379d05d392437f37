//! Interactive application state.
//!
//! `App` owns the tree, the flattened rows, the cursor, the view-layer
//! selection, and the progress mirror for the running batch. It is mutated
//! exclusively by the event loop: batch worker units never touch it, they
//! only produce `BatchEvent`s that the loop feeds into `apply_event`.
//!
//! Rows are always regenerated from the tree rather than patched, with the
//! selection re-applied by path identity afterwards; selection is dropped
//! entirely when a batch finishes.

use std::collections::HashSet;

use crate::models::{BatchEvent, OpKind, OpResult, OpStatus};
use crate::tree::{DisplayRow, Tree, flatten};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    ConfirmRemove,
}

/// Render-ready progress for the batch in flight.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress {
    pub kind: OpKind,
    pub total: usize,
    pub completed: usize,
}

pub struct App {
    tree: Tree,
    rows: Vec<DisplayRow>,
    pub cursor: usize,
    pub mode: Mode,
    pub status_line: Option<String>,
    pub batch: Option<BatchProgress>,
    /// Result log of the current or most recent batch, in arrival order.
    pub results: Vec<OpResult>,
    /// Targets awaiting the remove confirmation.
    pub pending_removal: Vec<String>,
}

impl App {
    pub fn new(tree: Tree) -> Self {
        let rows = flatten(&tree);
        Self {
            tree,
            rows,
            cursor: 0,
            mode: Mode::Browse,
            status_line: None,
            batch: None,
            results: Vec::new(),
            pending_removal: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn current_row(&self) -> Option<&DisplayRow> {
        self.rows.get(self.cursor)
    }

    pub fn batch_running(&self) -> bool {
        self.batch.is_some()
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }

    /// Toggle the view-layer selection flag on the cursor row.
    pub fn toggle_selected(&mut self) {
        if let Some(row) = self.rows.get_mut(self.cursor) {
            row.selected = !row.selected;
        }
    }

    /// Select every currently visible row. Collapsed descendants are not
    /// touched; selection scope matches what the user can see.
    pub fn select_all(&mut self) {
        for row in &mut self.rows {
            row.selected = true;
        }
    }

    pub fn select_none(&mut self) {
        for row in &mut self.rows {
            row.selected = false;
        }
    }

    pub fn selection_count(&self) -> usize {
        self.rows.iter().filter(|r| r.selected).count()
    }

    /// Full paths of selected repository rows; organizational rows are
    /// never batch targets even when selected.
    pub fn selected_repositories(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|r| r.selected && r.is_repository)
            .map(|r| r.full_path.clone())
            .collect()
    }

    /// Batch targets for a key press: the selection when present, else the
    /// repository under the cursor.
    pub fn batch_targets(&self) -> Vec<String> {
        let selected = self.selected_repositories();
        if !selected.is_empty() {
            return selected;
        }
        self.current_row()
            .filter(|r| r.is_repository)
            .map(|r| vec![r.full_path.clone()])
            .unwrap_or_default()
    }

    /// Expand or collapse the node under the cursor, keeping the cursor on
    /// the same node afterwards.
    pub fn set_expanded(&mut self, expand: bool) {
        let Some(row) = self.rows.get(self.cursor) else {
            return;
        };
        let (id, path) = (row.id, row.full_path.clone());
        if !self.tree.set_expanded(id, expand) {
            return;
        }

        self.rebuild_rows(true);
        if let Some(pos) = self.rows.iter().position(|r| r.full_path == path) {
            self.cursor = pos;
        }
    }

    pub fn begin_batch(&mut self, kind: OpKind, total: usize) {
        self.batch = Some(BatchProgress {
            kind,
            total,
            completed: 0,
        });
        self.results.clear();
        self.status_line = None;
    }

    /// Apply one coordinator message. This is the only place operation
    /// state reaches the tree.
    pub fn apply_event(&mut self, event: BatchEvent) {
        match event {
            BatchEvent::TargetPending { target } => {
                self.tree.set_status(
                    &target,
                    OpStatus::Pending,
                    Some("Operation in progress...".to_string()),
                );
                self.rebuild_rows(true);
            }
            BatchEvent::TargetDone { result } => {
                let status = if result.success {
                    OpStatus::Success
                } else {
                    OpStatus::Failed
                };
                self.tree
                    .set_status(&result.target, status, Some(result.message.clone()));
                if let Some(batch) = &mut self.batch {
                    batch.completed += 1;
                }
                self.results.push(result);
                self.rebuild_rows(true);
            }
            BatchEvent::BatchFinished { summary } => {
                self.status_line = Some(summary.to_string());
                self.batch = None;
                // Selection is cleared once the batch is over.
                self.rebuild_rows(false);
            }
        }
    }

    pub fn failed_results(&self) -> Vec<&OpResult> {
        self.results.iter().filter(|r| !r.success).collect()
    }

    /// Re-flatten the tree. Selection is carried across by path identity
    /// when `keep_selection` is set; the cursor is clamped to the new row
    /// count either way.
    fn rebuild_rows(&mut self, keep_selection: bool) {
        let selected: HashSet<String> = if keep_selection {
            self.rows
                .iter()
                .filter(|r| r.selected)
                .map(|r| r.full_path.clone())
                .collect()
        } else {
            HashSet::new()
        };

        self.rows = flatten(&self.tree);
        for row in &mut self.rows {
            row.selected = selected.contains(&row.full_path);
        }
        if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchSummary, RepoEntry};

    fn sample_app() -> App {
        App::new(Tree::build(vec![
            RepoEntry::repository("github.com/alice/foo"),
            RepoEntry::repository("github.com/alice/bar"),
            RepoEntry::repository("gitlab.com/bob/baz"),
            RepoEntry::directory("github.com"),
            RepoEntry::directory("github.com/alice"),
            RepoEntry::directory("gitlab.com"),
            RepoEntry::directory("gitlab.com/bob"),
        ]))
    }

    fn row_index(app: &App, path: &str) -> usize {
        app.rows().iter().position(|r| r.full_path == path).unwrap()
    }

    fn expand_owner(app: &mut App, path: &str) {
        app.cursor = row_index(app, path);
        app.set_expanded(true);
    }

    #[test]
    fn select_all_applies_to_visible_rows_only() {
        let mut app = sample_app();
        // Owners are collapsed, so repositories are hidden.
        app.select_all();
        assert!(app.selected_repositories().is_empty());

        expand_owner(&mut app, "github.com/alice");
        app.select_all();
        let mut repos = app.selected_repositories();
        repos.sort();
        assert_eq!(repos, vec!["github.com/alice/bar", "github.com/alice/foo"]);
    }

    #[test]
    fn selection_survives_status_rebuilds() {
        let mut app = sample_app();
        expand_owner(&mut app, "github.com/alice");
        app.cursor = row_index(&app, "github.com/alice/foo");
        app.toggle_selected();

        app.apply_event(BatchEvent::TargetPending {
            target: "github.com/alice/foo".to_string(),
        });

        assert_eq!(app.selected_repositories(), vec!["github.com/alice/foo"]);
        let row = &app.rows()[row_index(&app, "github.com/alice/foo")];
        assert_eq!(row.status, OpStatus::Pending);
    }

    #[test]
    fn selection_is_cleared_when_a_batch_finishes() {
        let mut app = sample_app();
        expand_owner(&mut app, "github.com/alice");
        app.select_all();
        assert!(app.selection_count() > 0);

        app.begin_batch(OpKind::Update, 2);
        app.apply_event(BatchEvent::BatchFinished {
            summary: BatchSummary {
                succeeded: 2,
                failed: 0,
            },
        });

        assert_eq!(app.selection_count(), 0);
        assert!(!app.batch_running());
        assert!(app.status_line.as_deref().unwrap().contains("2"));
    }

    #[test]
    fn batch_targets_fall_back_to_cursor_repository() {
        let mut app = sample_app();
        expand_owner(&mut app, "gitlab.com/bob");
        app.cursor = row_index(&app, "gitlab.com/bob/baz");
        assert_eq!(app.batch_targets(), vec!["gitlab.com/bob/baz"]);

        // An organizational row under the cursor yields no targets.
        app.cursor = row_index(&app, "gitlab.com");
        assert!(app.batch_targets().is_empty());
    }

    #[test]
    fn done_events_advance_progress_and_log_results() {
        let mut app = sample_app();
        app.begin_batch(OpKind::Update, 2);

        app.apply_event(BatchEvent::TargetDone {
            result: OpResult {
                target: "github.com/alice/foo".to_string(),
                success: false,
                message: "Permission denied - check credentials".to_string(),
            },
        });

        assert_eq!(app.batch.unwrap().completed, 1);
        assert_eq!(app.failed_results().len(), 1);
    }

    #[test]
    fn expansion_keeps_cursor_on_the_same_node() {
        let mut app = sample_app();
        app.cursor = row_index(&app, "gitlab.com/bob");
        app.set_expanded(true);
        assert_eq!(app.current_row().unwrap().full_path, "gitlab.com/bob");

        app.set_expanded(false);
        assert_eq!(app.current_row().unwrap().full_path, "gitlab.com/bob");
    }

    #[test]
    fn expanding_a_leaf_changes_nothing() {
        let mut app = sample_app();
        expand_owner(&mut app, "github.com/alice");
        let before: Vec<String> = app.rows().iter().map(|r| r.full_path.clone()).collect();

        app.cursor = row_index(&app, "github.com/alice/foo");
        app.set_expanded(true);

        let after: Vec<String> = app.rows().iter().map(|r| r.full_path.clone()).collect();
        assert_eq!(before, after);
    }
}
