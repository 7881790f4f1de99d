use serde_json::Value;

use crate::application::event_router::{self, ConsoleEvent};
use crate::application::state_cache::{Protection, StateCache, WorkflowState};
use crate::application::tree_loads::{TreeLoadDisposition, TreeLoadOrchestrator};
use crate::domain::WorkflowId;
use crate::infrastructure::adapters::{Clock, EpicTree, EpicTreeBuilder, WorkflowRoster};
use crate::infrastructure::event_log::{Entry, EventLogger};
use crate::ui::focus::{DashboardFocus, EpicViewFocus};
use crate::ui::state::DashboardState;

mod msg;
pub use msg::{Action, CommandCompletion, Effect, Msg, TreeLoadCompletion};
mod logging;
mod update;
mod update_navigation;

pub struct AppDependencies {
    pub roster: Box<dyn WorkflowRoster>,
    pub tree_builder: Box<dyn EpicTreeBuilder>,
    pub clock: Option<Box<dyn Clock>>,
    pub event_log: Box<dyn EventLogger>,
}

/// The update funnel. One instance owns the read-model and all live view
/// state; the host feeds it one `Msg` per step and executes the returned
/// `Effect`s, feeding their completions back as later `Msg`s.
pub struct ConsoleApp {
    state: DashboardState,
    cache: StateCache,
    tree_loads: TreeLoadOrchestrator,
    last_notice: Option<String>,
    roster: Box<dyn WorkflowRoster>,
    tree_builder: Box<dyn EpicTreeBuilder>,
    clock: Option<Box<dyn Clock>>,
    event_log: Box<dyn EventLogger>,
}

impl ConsoleApp {
    pub fn new(deps: AppDependencies) -> Self {
        Self {
            state: DashboardState::new(Vec::new()),
            cache: StateCache::new(),
            tree_loads: TreeLoadOrchestrator::new(),
            last_notice: None,
            roster: deps.roster,
            tree_builder: deps.tree_builder,
            clock: deps.clock,
            event_log: deps.event_log,
        }
    }

    /// First roster sync plus the initial tree trigger. Kept out of the
    /// constructor because it already produces follow-up effects.
    pub fn init(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.refresh_roster(&mut effects);
        self.event_log.log(
            Entry::new("update", "init")
                .with_field("workflows", Value::from(self.state.workflows.len())),
        );
        effects
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn cache(&self) -> &StateCache {
        &self.cache
    }

    pub fn tree(&self) -> Option<&dyn EpicTree> {
        self.tree_loads.tree()
    }

    pub fn details_visible(&self) -> bool {
        self.tree_loads.details_visible()
    }

    pub fn selected_workflow_state(&self) -> Option<&WorkflowState> {
        let id = self.state.selected_id()?;
        self.cache.get(&id)
    }

    pub fn last_notice(&self) -> Option<&str> {
        self.last_notice.as_deref()
    }

    /// Notices surface once; reading one consumes it.
    pub fn take_notice(&mut self) -> Option<String> {
        self.last_notice.take()
    }

    pub(super) fn now_millis(&self) -> u64 {
        self.clock.as_deref().map_or(0, |clock| clock.now_millis())
    }
}
