use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use canopy::domain::{LifecycleStatus, TreeDirection, TreeMode, Workflow};
use canopy::infrastructure::adapters::{
    EpicTree, EpicTreeBuilder, Issue, RosterError, WorkflowRoster,
};

pub type SharedWorkflows = Rc<RefCell<Vec<Workflow>>>;

pub fn workflow(id: &str, epic: Option<&str>, lifecycle: LifecycleStatus) -> Workflow {
    Workflow::try_new(
        id,
        format!("workflow {id}"),
        lifecycle,
        epic.map(str::to_string),
        PathBuf::from(format!("/work/{id}")),
    )
    .expect("workflow should be valid")
}

pub fn issue(id: &str) -> Issue {
    Issue {
        id: id.to_string(),
        title: format!("issue {id}"),
        status: "open".to_string(),
        parent_id: None,
        dep_ids: Vec::new(),
    }
}

/// Roster stub backed by shared storage, so a test can mutate the roster
/// between refresh ticks the way the orchestrator would.
pub struct SharedRoster {
    pub workflows: SharedWorkflows,
}

impl WorkflowRoster for SharedRoster {
    fn list(&self) -> Result<Vec<Workflow>, RosterError> {
        Ok(self.workflows.borrow().clone())
    }
}

/// Minimal tree double: a flat issue list whose cursor doubles as the
/// selection, which is all the capability surface promises.
pub struct ListTree {
    root_id: String,
    issue_ids: Vec<String>,
    direction: TreeDirection,
    mode: TreeMode,
    cursor: Option<usize>,
}

impl EpicTree for ListTree {
    fn root_id(&self) -> &str {
        &self.root_id
    }

    fn direction(&self) -> TreeDirection {
        self.direction
    }

    fn mode(&self) -> TreeMode {
        self.mode
    }

    fn selected_issue(&self) -> Option<String> {
        self.cursor.map(|index| self.issue_ids[index].clone())
    }

    fn move_cursor_up(&mut self) {
        if let Some(cursor) = self.cursor
            && cursor > 0
        {
            self.cursor = Some(cursor - 1);
        }
    }

    fn move_cursor_down(&mut self) {
        match self.cursor {
            None if !self.issue_ids.is_empty() => self.cursor = Some(0),
            Some(cursor) if cursor + 1 < self.issue_ids.len() => self.cursor = Some(cursor + 1),
            _ => {}
        }
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            TreeMode::Deps => TreeMode::Children,
            TreeMode::Children => TreeMode::Deps,
        };
    }

    fn focus_issue(&mut self, issue_id: &str) -> bool {
        self.select_issue(issue_id)
    }

    fn select_issue(&mut self, issue_id: &str) -> bool {
        match self.issue_ids.iter().position(|id| id == issue_id) {
            Some(index) => {
                self.cursor = Some(index);
                true
            }
            None => false,
        }
    }
}

pub struct ListTreeBuilder;

impl EpicTreeBuilder for ListTreeBuilder {
    fn build(
        &self,
        root_id: &str,
        issues: &[Issue],
        direction: TreeDirection,
        mode: TreeMode,
    ) -> Box<dyn EpicTree> {
        Box::new(ListTree {
            root_id: root_id.to_string(),
            issue_ids: issues.iter().map(|issue| issue.id.clone()).collect(),
            direction,
            mode,
            cursor: None,
        })
    }
}
