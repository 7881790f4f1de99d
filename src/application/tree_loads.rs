use crate::application::state_cache::SavedTreeView;
use crate::infrastructure::adapters::{EpicTree, EpicTreeBuilder, Issue, QueryError};

/// Query text for "this root, expand downward, unlimited depth". Embedded
/// quotes in the root id are not escaped; the executor rejects such ids.
pub fn expand_query(root_id: &str) -> String {
    format!("id = \"{root_id}\" expand down depth *")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLoadRequest {
    pub root_id: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeLoadDisposition {
    Stale,
    Applied,
    Cleared { error: Option<String> },
}

/// Gates the epic tree behind async loads: one in-flight correlation key,
/// stale completions dropped, view state persisted per workflow across
/// navigation.
#[derive(Default)]
pub struct TreeLoadOrchestrator {
    in_flight_root: Option<String>,
    last_triggered_root: Option<String>,
    tree: Option<Box<dyn EpicTree>>,
}

impl TreeLoadOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> Option<&dyn EpicTree> {
        self.tree.as_deref()
    }

    pub fn tree_mut(&mut self) -> Option<&mut (dyn EpicTree + 'static)> {
        self.tree.as_deref_mut()
    }

    pub fn has_tree(&self) -> bool {
        self.tree.is_some()
    }

    /// Detail panel presence is derived, never stored: a panel exists when
    /// the live tree has a selected issue.
    pub fn details_visible(&self) -> bool {
        self.tree
            .as_deref()
            .is_some_and(|tree| tree.selected_issue().is_some())
    }

    pub fn in_flight_root(&self) -> Option<&str> {
        self.in_flight_root.as_deref()
    }

    /// Trigger policy: a load fires only for a non-empty root that differs
    /// from the last one triggered. No debounce; the backing query is
    /// assumed fast.
    pub fn request(&mut self, root_id: &str) -> Option<TreeLoadRequest> {
        if root_id.is_empty() || self.last_triggered_root.as_deref() == Some(root_id) {
            return None;
        }

        self.last_triggered_root = Some(root_id.to_string());
        self.in_flight_root = Some(root_id.to_string());
        Some(TreeLoadRequest {
            root_id: root_id.to_string(),
            query: expand_query(root_id),
        })
    }

    /// Re-runs the last triggered load, bypassing the dedupe check. Used
    /// by the explicit reload interaction; the live tree (if any) keeps
    /// its view state through the rebuild.
    pub fn refresh(&mut self) -> Option<TreeLoadRequest> {
        let root_id = self.last_triggered_root.clone()?;
        self.in_flight_root = Some(root_id.clone());
        Some(TreeLoadRequest {
            query: expand_query(&root_id),
            root_id,
        })
    }

    /// Applies a completed load. A completion whose root does not match
    /// the recorded in-flight root is stale and dropped unconditionally.
    pub fn complete(
        &mut self,
        root_id: &str,
        outcome: Result<Vec<Issue>, QueryError>,
        persisted: &SavedTreeView,
        builder: &dyn EpicTreeBuilder,
    ) -> TreeLoadDisposition {
        if self.in_flight_root.as_deref() != Some(root_id) {
            return TreeLoadDisposition::Stale;
        }
        self.in_flight_root = None;

        match outcome {
            Ok(issues) if !issues.is_empty() => {
                // View state precedence: a still-live tree wins over the
                // workflow's persisted values, which win over defaults.
                let (direction, mode, selected) = match self.tree.as_deref() {
                    Some(tree) => (tree.direction(), tree.mode(), tree.selected_issue()),
                    None => (
                        persisted.direction,
                        persisted.mode,
                        persisted.selected_issue.clone(),
                    ),
                };

                let mut tree = builder.build(root_id, &issues, direction, mode);
                if let Some(issue_id) = selected {
                    tree.select_issue(&issue_id);
                }
                self.tree = Some(tree);
                TreeLoadDisposition::Applied
            }
            Ok(_) => {
                self.tree = None;
                TreeLoadDisposition::Cleared { error: None }
            }
            Err(error) => {
                self.tree = None;
                TreeLoadDisposition::Cleared {
                    error: Some(error.message()),
                }
            }
        }
    }

    /// Persistence on navigation away: capture the live tree's triple into
    /// the outgoing workflow's cached fields (or reset them if no tree
    /// exists), then drop the live tree. An in-flight load loses its
    /// triggering context here, so its correlation key is forgotten too.
    pub fn save_and_clear(&mut self, saved: &mut SavedTreeView) {
        match self.tree.as_deref() {
            Some(tree) => {
                saved.direction = tree.direction();
                saved.mode = tree.mode();
                saved.selected_issue = tree.selected_issue();
            }
            None => *saved = SavedTreeView::default(),
        }

        self.tree = None;
        self.in_flight_root = None;
    }
}
