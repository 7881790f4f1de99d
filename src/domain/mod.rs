use std::path::PathBuf;

/// Opaque stable identifier for a workflow. The event stream carries raw
/// strings; an empty id marks a malformed upstream event and is rejected at
/// the routing boundary, not here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkflowId(String);

impl WorkflowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStatus {
    Running,
    Stopped,
    Failed,
}

impl LifecycleStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Roster entry produced by the roster collaborator. The roster reloads
/// wholesale and reorders freely; everything downstream binds by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    pub lifecycle: LifecycleStatus,
    pub epic_id: Option<String>,
    pub worktree_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowValidationError {
    EmptyId,
    EmptyName,
}

impl Workflow {
    pub fn try_new(
        id: impl Into<String>,
        name: impl Into<String>,
        lifecycle: LifecycleStatus,
        epic_id: Option<String>,
        worktree_path: PathBuf,
    ) -> Result<Self, WorkflowValidationError> {
        let id = id.into();
        let name = name.into();
        if id.trim().is_empty() {
            return Err(WorkflowValidationError::EmptyId);
        }
        if name.trim().is_empty() {
            return Err(WorkflowValidationError::EmptyName);
        }

        Ok(Self {
            id: WorkflowId::new(id),
            name,
            lifecycle,
            epic_id: epic_id.filter(|epic| !epic.is_empty()),
            worktree_path,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentStatus {
    #[default]
    Unknown,
    Ready,
    Working,
    Waiting,
    Retired,
    Failed,
}

impl AgentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Ready => "ready",
            Self::Working => "working",
            Self::Waiting => "waiting",
            Self::Retired => "retired",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub context_tokens: u64,
}

/// One coherent chat message, reassembled from streamed fragments. Tool
/// calls stay isolated: deltas never merge into them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub tool_call: bool,
}

impl ChatMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_call: false,
        }
    }

    pub fn tool(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_call: true,
        }
    }
}

/// A publish/subscribe message exchanged between agents on a named channel.
/// Sub-kinds arrive as dotted strings from the bus ("message.posted"); only
/// conversational kinds survive routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusEvent {
    pub kind: String,
    pub channel: String,
    pub sender: String,
    pub body: String,
    pub ts: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeDirection {
    #[default]
    Down,
    Up,
}

impl TreeDirection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeMode {
    #[default]
    Deps,
    Children,
}

impl TreeMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Deps => "deps",
            Self::Children => "children",
        }
    }
}
