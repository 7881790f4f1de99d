use crate::application::state_cache::{AgentPane, Protection, StateCache, WorkflowState};
use crate::domain::{AgentStatus, BusEvent, ChatMessage, TokenUsage, WorkflowId};
use crate::infrastructure::adapters::Clock;

/// Fixed prefix the agent runtime puts on tool-call output. Content
/// starting with it always opens a new message, delta flag or not.
pub const TOOL_CALL_MARKER: &str = "[tool-call]";

/// Bus sub-kinds worth showing; everything else is bus administration.
const RETAINED_BUS_KINDS: [&str; 2] = ["message.posted", "reply.posted"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputOrigin {
    Coordinator,
    Worker(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPayload {
    TokenUsage {
        usage: Option<TokenUsage>,
        queue_depth: u32,
    },
    Status {
        status: AgentStatus,
        phase: Option<String>,
    },
    Text {
        content: String,
        delta: bool,
    },
    WorkerSpawned,
    WorkerRetired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDetail {
    Output {
        origin: OutputOrigin,
        payload: OutputPayload,
    },
    Bus(BusEvent),
    Notice,
    WorkflowStopped,
}

/// The discriminated event as delivered by the subscription. The workflow
/// id rides beside the detail as a raw string because malformed upstream
/// events arrive with it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleEvent {
    pub workflow_id: String,
    pub detail: EventDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Applied,
    Ignored,
}

/// Classifies one inbound event and applies its mutation to the cache.
/// This is the only mutation funnel for workflow state; UI interactions go
/// through their own explicit paths.
pub fn route(
    cache: &mut StateCache,
    protection: &Protection<'_>,
    clock: Option<&dyn Clock>,
    event: ConsoleEvent,
) -> RouteOutcome {
    if event.workflow_id.is_empty() {
        return RouteOutcome::Ignored;
    }
    let id = WorkflowId::new(event.workflow_id);

    // Stop events tear the aggregate down without lazily recreating it;
    // a stop for an unknown workflow is an idempotent no-op.
    if matches!(event.detail, EventDetail::WorkflowStopped) {
        cache.remove(&id);
        return RouteOutcome::Applied;
    }

    let now_ms = clock.map(|clock| clock.now_millis());
    let state = cache.get_or_create(&id, protection, now_ms.unwrap_or(0));

    let applied = match event.detail {
        EventDetail::Output { origin, payload } => apply_output(state, &origin, payload),
        EventDetail::Bus(bus_event) => apply_bus_event(state, bus_event),
        EventDetail::Notice => {
            state.needs_attention = true;
            true
        }
        EventDetail::WorkflowStopped => false,
    };

    if applied && let Some(now_ms) = now_ms {
        state.last_update_ms = now_ms;
    }

    if applied {
        RouteOutcome::Applied
    } else {
        RouteOutcome::Ignored
    }
}

fn apply_output(state: &mut WorkflowState, origin: &OutputOrigin, payload: OutputPayload) -> bool {
    match payload {
        OutputPayload::WorkerSpawned => {
            let OutputOrigin::Worker(worker_id) = origin else {
                return false;
            };
            state.activate_worker(worker_id);
            state.worker_pane_mut(worker_id).status = AgentStatus::Ready;
            true
        }
        OutputPayload::WorkerRetired => {
            let OutputOrigin::Worker(worker_id) = origin else {
                return false;
            };
            state.retire_worker(worker_id);
            true
        }
        OutputPayload::TokenUsage { usage, queue_depth } => {
            let pane = origin_pane_mut(state, origin);
            // Heartbeats without usage data keep the prior bucket; an
            // empty flicker on every heartbeat is worse than a stale one.
            if let Some(usage) = usage {
                pane.usage = Some(usage);
            }
            pane.queue_depth = queue_depth;
            true
        }
        OutputPayload::Status { status, phase } => {
            let pane = origin_pane_mut(state, origin);
            pane.status = status;
            if let Some(phase) = phase {
                pane.phase = Some(phase);
            }
            true
        }
        OutputPayload::Text { content, delta } => {
            append_text(origin_pane_mut(state, origin), content, delta);
            true
        }
    }
}

fn origin_pane_mut<'a>(state: &'a mut WorkflowState, origin: &OutputOrigin) -> &'a mut AgentPane {
    match origin {
        OutputOrigin::Coordinator => &mut state.coordinator,
        OutputOrigin::Worker(worker_id) => state.worker_pane_mut(worker_id),
    }
}

/// Delta reassembly keyed on the origin's last message: a delta extends it
/// unless that message is a tool call or missing, in which case the delta
/// degrades to a fresh message.
fn append_text(pane: &mut AgentPane, content: String, delta: bool) {
    if content.starts_with(TOOL_CALL_MARKER) {
        pane.messages.push(ChatMessage::tool(content));
        return;
    }

    if delta
        && let Some(last) = pane.messages.last_mut()
        && !last.tool_call
    {
        last.text.push_str(&content);
        return;
    }

    pane.messages.push(ChatMessage::plain(content));
}

fn apply_bus_event(state: &mut WorkflowState, event: BusEvent) -> bool {
    if !RETAINED_BUS_KINDS.contains(&event.kind.as_str()) {
        return false;
    }
    state.push_bus_event(event);
    true
}
