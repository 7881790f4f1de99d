use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::{TreeDirection, TreeMode, Workflow, WorkflowId};

/// Synchronous roster source. Returns the full current roster on every
/// call; the console replaces its list wholesale and re-binds selection by
/// id afterwards.
pub trait WorkflowRoster {
    fn list(&self) -> Result<Vec<Workflow>, RosterError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    Unavailable(String),
    ParseError(String),
}

impl RosterError {
    pub fn message(&self) -> String {
        match self {
            Self::Unavailable(message) => format!("workflow roster unavailable: {message}"),
            Self::ParseError(message) => format!("workflow roster parse failed: {message}"),
        }
    }
}

/// Flat issue row returned by the query executor. The tree collaborator
/// decides how rows relate; this layer only ferries them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub status: String,
    pub parent_id: Option<String>,
    pub dep_ids: Vec<String>,
}

pub trait IssueQueryExecutor {
    fn execute(&self, query: &str) -> Result<Vec<Issue>, QueryError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    ExecutionFailed(String),
}

impl QueryError {
    pub fn message(&self) -> String {
        match self {
            Self::ExecutionFailed(message) => format!("issue query failed: {message}"),
        }
    }
}

/// Start/stop commands against the workflow orchestrator. Failures are
/// typed by category so the console can pick a user-facing message without
/// string-matching at the call site.
pub trait WorkflowCommands {
    fn start(&self, id: &WorkflowId) -> Result<(), WorkflowCommandError>;
    fn stop(&self, id: &WorkflowId) -> Result<(), WorkflowCommandError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowCommandError {
    UncommittedChanges,
    BranchCheckedOutElsewhere,
    WorktreePathExists,
    Failed(String),
}

impl WorkflowCommandError {
    /// Best-effort mapping from a raw orchestrator error line to a known
    /// category; anything unrecognized passes through verbatim.
    pub fn classify(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        if lowered.contains("uncommitted") {
            return Self::UncommittedChanges;
        }
        if lowered.contains("checked out") {
            return Self::BranchCheckedOutElsewhere;
        }
        if lowered.contains("already exists") {
            return Self::WorktreePathExists;
        }
        Self::Failed(raw.to_string())
    }

    pub fn message(&self) -> String {
        match self {
            Self::UncommittedChanges => {
                "workflow has uncommitted changes; commit or stash them first".to_string()
            }
            Self::BranchCheckedOutElsewhere => {
                "workflow branch is checked out in another worktree".to_string()
            }
            Self::WorktreePathExists => "workflow worktree path already exists".to_string(),
            Self::Failed(message) => format!("workflow command failed: {message}"),
        }
    }
}

/// Timestamp bookkeeping only. The console treats the clock as optional
/// and skips last-update stamping when none is wired in.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
            return 0;
        };
        u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Capability surface of the external tree widget. The console never walks
/// the tree itself; it restores view state, forwards cursor movement, and
/// reads the selection back out.
pub trait EpicTree {
    fn root_id(&self) -> &str;
    fn direction(&self) -> TreeDirection;
    fn mode(&self) -> TreeMode;
    fn selected_issue(&self) -> Option<String>;
    fn move_cursor_up(&mut self);
    fn move_cursor_down(&mut self);
    fn toggle_mode(&mut self);
    fn focus_issue(&mut self, issue_id: &str) -> bool;
    fn select_issue(&mut self, issue_id: &str) -> bool;
}

pub trait EpicTreeBuilder {
    fn build(
        &self,
        root_id: &str,
        issues: &[Issue],
        direction: TreeDirection,
        mode: TreeMode,
    ) -> Box<dyn EpicTree>;
}
