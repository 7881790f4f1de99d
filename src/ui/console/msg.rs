use super::*;
use crate::infrastructure::adapters::{Issue, QueryError, WorkflowCommandError};

/// One external event per update step: bus traffic, a semantic user
/// action, the roster timer, or an async completion re-entering the loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Event(ConsoleEvent),
    Action(Action),
    RosterRefresh,
    TreeLoadCompleted(TreeLoadCompletion),
    StartWorkflowCompleted(CommandCompletion),
    StopWorkflowCompleted(CommandCompletion),
}

/// Semantic input. The rendering shell owns raw key and mouse events and
/// translates them before they reach this layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    MoveSelectionUp,
    MoveSelectionDown,
    SelectRow(usize),
    Confirm,
    FocusNext,
    FocusPrev,
    FocusPane(DashboardFocus),
    ToggleCoordinatorPanel,
    ToggleHelp,
    ToggleTreeMode,
    ReloadTree,
    StartSelected,
    StopSelected,
    SetPaneScroll {
        worker: Option<String>,
        position: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLoadCompletion {
    pub root_id: String,
    pub result: Result<Vec<Issue>, QueryError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCompletion {
    pub workflow_id: WorkflowId,
    pub result: Result<(), WorkflowCommandError>,
}

/// Follow-up asynchronous requests. Effects are descriptions only; the
/// host dispatches them fire-and-forget and routes completions back in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RunTreeQuery { root_id: String, query: String },
    StartWorkflow(WorkflowId),
    StopWorkflow(WorkflowId),
}
