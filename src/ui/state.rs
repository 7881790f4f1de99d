use std::collections::BTreeSet;

use crate::domain::{Workflow, WorkflowId};
use crate::ui::focus::{DashboardFocus, step_backward, step_forward};

/// Roster, selection, and pane focus. Selection is positional for display
/// but re-bound by identity whenever the roster is replaced; everything
/// downstream that cares about "which workflow" uses ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    pub workflows: Vec<Workflow>,
    pub selected_index: usize,
    pub focus: DashboardFocus,
    pub coordinator_open: bool,
    pub help_open: bool,
}

impl DashboardState {
    pub fn new(workflows: Vec<Workflow>) -> Self {
        Self {
            workflows,
            selected_index: 0,
            focus: DashboardFocus::Table,
            coordinator_open: false,
            help_open: false,
        }
    }

    pub fn selected_workflow(&self) -> Option<&Workflow> {
        self.workflows.get(self.selected_index)
    }

    pub fn selected_id(&self) -> Option<WorkflowId> {
        self.selected_workflow().map(|workflow| workflow.id.clone())
    }

    pub fn running_ids(&self) -> BTreeSet<WorkflowId> {
        self.workflows
            .iter()
            .filter(|workflow| workflow.lifecycle.is_running())
            .map(|workflow| workflow.id.clone())
            .collect()
    }

    /// Replaces the roster wholesale, keeping the selection pinned to the
    /// same workflow identity. A vanished id falls back to index 0.
    pub fn replace_workflows(&mut self, workflows: Vec<Workflow>) {
        let previous = self.selected_id();
        self.workflows = workflows;
        self.selected_index = previous
            .and_then(|id| {
                self.workflows
                    .iter()
                    .position(|workflow| workflow.id == id)
            })
            .unwrap_or(0);
    }

    pub fn move_selection_up(&mut self) -> bool {
        if self.selected_index == 0 {
            return false;
        }
        self.selected_index -= 1;
        true
    }

    pub fn move_selection_down(&mut self) -> bool {
        let last = self.workflows.len().saturating_sub(1);
        if self.selected_index >= last {
            return false;
        }
        self.selected_index += 1;
        true
    }

    pub fn select_index(&mut self, index: usize) -> bool {
        if index >= self.workflows.len() || index == self.selected_index {
            return false;
        }
        self.selected_index = index;
        true
    }

    pub fn cycle_focus_forward(&mut self) {
        self.focus = step_forward(self.focus, self.coordinator_open);
    }

    pub fn cycle_focus_backward(&mut self) {
        self.focus = step_backward(self.focus, self.coordinator_open);
    }

    pub fn set_focus(&mut self, focus: DashboardFocus) {
        self.focus = focus;
    }

    pub fn toggle_coordinator_panel(&mut self) {
        self.coordinator_open = !self.coordinator_open;
        if !self.coordinator_open && self.focus == DashboardFocus::Coordinator {
            self.focus = DashboardFocus::Table;
        }
    }

    /// Global interaction: flips the overlay without touching focus.
    pub fn toggle_help(&mut self) {
        self.help_open = !self.help_open;
    }
}
