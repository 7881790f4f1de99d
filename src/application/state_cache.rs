use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::domain::{
    AgentStatus, BusEvent, ChatMessage, TokenUsage, TreeDirection, TreeMode, WorkflowId,
};

pub const WORKFLOW_CACHE_CAP: usize = 10;
pub const BUS_EVENT_CAP: usize = 500;

/// Per-agent pane: the coordinator and every worker carry the same shape.
/// `phase` stays `None` for the coordinator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgentPane {
    pub messages: Vec<ChatMessage>,
    pub status: AgentStatus,
    pub phase: Option<String>,
    pub usage: Option<TokenUsage>,
    pub queue_depth: u32,
    pub scroll: f32,
}

impl AgentPane {
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

/// Saved tree view triple, restored when the user returns to a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SavedTreeView {
    pub direction: TreeDirection,
    pub mode: TreeMode,
    pub selected_issue: Option<String>,
}

/// The per-workflow aggregate. Owned exclusively by the cache; mutated only
/// through the event router and explicit UI interactions.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    pub coordinator: AgentPane,
    pub workers: BTreeMap<String, AgentPane>,
    pub active_workers: Vec<String>,
    pub bus_events: VecDeque<BusEvent>,
    pub tree_view: SavedTreeView,
    pub needs_attention: bool,
    pub last_update_ms: u64,
}

impl WorkflowState {
    fn new() -> Self {
        Self {
            coordinator: AgentPane::default(),
            workers: BTreeMap::new(),
            active_workers: Vec::new(),
            bus_events: VecDeque::new(),
            tree_view: SavedTreeView::default(),
            needs_attention: false,
            last_update_ms: 0,
        }
    }

    pub fn worker_pane_mut(&mut self, worker_id: &str) -> &mut AgentPane {
        self.workers.entry(worker_id.to_string()).or_default()
    }

    pub fn worker_pane(&self, worker_id: &str) -> Option<&AgentPane> {
        self.workers.get(worker_id)
    }

    /// Idempotent add; insertion order is display order.
    pub fn activate_worker(&mut self, worker_id: &str) {
        if !self.active_workers.iter().any(|id| id == worker_id) {
            self.active_workers.push(worker_id.to_string());
        }
    }

    /// Drops the worker from the active list but keeps its pane for
    /// historical display.
    pub fn retire_worker(&mut self, worker_id: &str) {
        self.active_workers.retain(|id| id != worker_id);
        self.worker_pane_mut(worker_id).status = AgentStatus::Retired;
    }

    pub fn push_bus_event(&mut self, event: BusEvent) {
        self.bus_events.push_back(event);
        while self.bus_events.len() > BUS_EVENT_CAP {
            self.bus_events.pop_front();
        }
    }
}

/// Which entries eviction must not touch: workflows whose live lifecycle
/// is running, plus the currently selected one.
#[derive(Debug, Clone, Copy)]
pub struct Protection<'a> {
    running: &'a BTreeSet<WorkflowId>,
    selected: Option<&'a WorkflowId>,
}

impl<'a> Protection<'a> {
    pub fn new(running: &'a BTreeSet<WorkflowId>, selected: Option<&'a WorkflowId>) -> Self {
        Self { running, selected }
    }

    pub fn shields(&self, id: &WorkflowId) -> bool {
        self.selected == Some(id) || self.running.contains(id)
    }
}

/// Bounded mapping workflow-id → aggregate state. Entries appear lazily on
/// first reference and leave on an explicit stop event or eviction.
#[derive(Debug, Default)]
pub struct StateCache {
    entries: BTreeMap<WorkflowId, WorkflowState>,
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &WorkflowId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &WorkflowId) -> Option<&WorkflowState> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &WorkflowId) -> Option<&mut WorkflowState> {
        self.entries.get_mut(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &WorkflowId> {
        self.entries.keys()
    }

    pub fn over_cap(&self) -> bool {
        self.entries.len() > WORKFLOW_CACHE_CAP
    }

    /// Returns the existing state or inserts a fresh one stamped `now_ms`.
    /// Insertion past the cap evicts the oldest unprotected entry; the
    /// entry being created is exempt from that pass, so the returned
    /// reference is always the requested id's state.
    pub fn get_or_create(
        &mut self,
        id: &WorkflowId,
        protection: &Protection<'_>,
        now_ms: u64,
    ) -> &mut WorkflowState {
        if !self.entries.contains_key(id) {
            let mut state = WorkflowState::new();
            state.last_update_ms = now_ms;
            self.entries.insert(id.clone(), state);
            if self.entries.len() > WORKFLOW_CACHE_CAP {
                self.evict_oldest(protection, id);
            }
        }

        self.entries
            .entry(id.clone())
            .or_insert_with(WorkflowState::new)
    }

    /// Removes the whole aggregate, persisted tree view included. A later
    /// revisit starts from tree defaults.
    pub fn remove(&mut self, id: &WorkflowId) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Two-pass linear scan: collect unprotected candidates, drop the one
    /// with the smallest last-update stamp. Ties resolve to the smallest id
    /// because the map iterates in id order and `min_by_key` keeps the
    /// first minimum. When everything is shielded the cap is allowed to
    /// slip; callers can observe that via `over_cap`.
    fn evict_oldest(&mut self, protection: &Protection<'_>, keep: &WorkflowId) {
        let victim = self
            .entries
            .iter()
            .filter(|(id, _)| *id != keep && !protection.shields(id))
            .min_by_key(|(_, state)| state.last_update_ms)
            .map(|(id, _)| id.clone());

        if let Some(id) = victim {
            self.entries.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests;
