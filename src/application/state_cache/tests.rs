use super::{
    AgentPane, BUS_EVENT_CAP, Protection, SavedTreeView, StateCache, WORKFLOW_CACHE_CAP,
};
use crate::domain::{AgentStatus, BusEvent, TreeDirection, TreeMode, WorkflowId};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn wf(id: &str) -> WorkflowId {
    WorkflowId::new(id)
}

fn bus_event(body: &str) -> BusEvent {
    BusEvent {
        kind: "message.posted".to_string(),
        channel: "general".to_string(),
        sender: "coordinator".to_string(),
        body: body.to_string(),
        ts: 0,
    }
}

fn no_protection() -> (BTreeSet<WorkflowId>, Option<WorkflowId>) {
    (BTreeSet::new(), None)
}

#[test]
fn get_or_create_is_lazy_and_idempotent() {
    let mut cache = StateCache::new();
    let (running, selected) = no_protection();
    let protection = Protection::new(&running, selected.as_ref());

    assert!(!cache.contains(&wf("wf-1")));
    cache.get_or_create(&wf("wf-1"), &protection, 5).needs_attention = true;
    assert_eq!(cache.len(), 1);

    let state = cache.get_or_create(&wf("wf-1"), &protection, 9);
    assert!(state.needs_attention, "existing state should be returned");
    assert_eq!(state.last_update_ms, 5, "existing stamp should be kept");
}

#[test]
fn insertion_past_cap_evicts_oldest_unprotected() {
    let mut cache = StateCache::new();
    let (running, selected) = no_protection();
    let protection = Protection::new(&running, selected.as_ref());

    for index in 0..WORKFLOW_CACHE_CAP {
        cache.get_or_create(&wf(&format!("wf-{index:02}")), &protection, index as u64 + 1);
    }
    assert_eq!(cache.len(), WORKFLOW_CACHE_CAP);

    cache.get_or_create(&wf("wf-new"), &protection, 99);
    assert_eq!(cache.len(), WORKFLOW_CACHE_CAP);
    assert!(!cache.contains(&wf("wf-00")), "oldest entry should be gone");
    assert!(cache.contains(&wf("wf-new")));
}

#[test]
fn eviction_never_removes_the_selected_workflow() {
    let mut cache = StateCache::new();
    let running = BTreeSet::new();
    let selected = wf("wf-00");
    let protection = Protection::new(&running, Some(&selected));

    for index in 0..=WORKFLOW_CACHE_CAP {
        cache.get_or_create(&wf(&format!("wf-{index:02}")), &protection, index as u64 + 1);
    }

    assert_eq!(cache.len(), WORKFLOW_CACHE_CAP);
    assert!(
        cache.contains(&wf("wf-00")),
        "selected entry carries the oldest stamp but must survive"
    );
    assert!(!cache.contains(&wf("wf-01")), "next-oldest goes instead");
}

#[test]
fn eviction_never_removes_running_workflows() {
    let mut cache = StateCache::new();
    let running: BTreeSet<WorkflowId> = [wf("wf-00"), wf("wf-01")].into_iter().collect();
    let protection = Protection::new(&running, None);

    for index in 0..=WORKFLOW_CACHE_CAP {
        cache.get_or_create(&wf(&format!("wf-{index:02}")), &protection, index as u64 + 1);
    }

    assert!(cache.contains(&wf("wf-00")));
    assert!(cache.contains(&wf("wf-01")));
    assert!(!cache.contains(&wf("wf-02")));
}

#[test]
fn fully_protected_cache_exceeds_cap_without_eviction() {
    let mut cache = StateCache::new();
    let running: BTreeSet<WorkflowId> = (0..=WORKFLOW_CACHE_CAP)
        .map(|index| wf(&format!("wf-{index:02}")))
        .collect();
    let protection = Protection::new(&running, None);

    for index in 0..=WORKFLOW_CACHE_CAP {
        cache.get_or_create(&wf(&format!("wf-{index:02}")), &protection, index as u64 + 1);
    }

    assert_eq!(cache.len(), WORKFLOW_CACHE_CAP + 1);
    assert!(cache.over_cap());
}

#[test]
fn equal_timestamps_evict_the_smallest_id() {
    let mut cache = StateCache::new();
    let (running, selected) = no_protection();
    let protection = Protection::new(&running, selected.as_ref());

    for index in 0..WORKFLOW_CACHE_CAP {
        cache.get_or_create(&wf(&format!("wf-{index:02}")), &protection, 7);
    }
    cache.get_or_create(&wf("wf-zz"), &protection, 7);

    assert!(!cache.contains(&wf("wf-00")));
    assert!(cache.contains(&wf("wf-01")));
    assert!(cache.contains(&wf("wf-zz")));
}

#[test]
fn removal_resets_tree_view_on_revisit() {
    let mut cache = StateCache::new();
    let (running, selected) = no_protection();
    let protection = Protection::new(&running, selected.as_ref());

    let state = cache.get_or_create(&wf("wf-1"), &protection, 1);
    state.tree_view = SavedTreeView {
        direction: TreeDirection::Up,
        mode: TreeMode::Children,
        selected_issue: Some("issue-4".to_string()),
    };

    assert!(cache.remove(&wf("wf-1")));
    assert!(!cache.remove(&wf("wf-1")), "second remove is a no-op");

    let revisited = cache.get_or_create(&wf("wf-1"), &protection, 2);
    assert_eq!(revisited.tree_view, SavedTreeView::default());
}

#[test]
fn bus_events_stay_capped_in_fifo_order() {
    let mut cache = StateCache::new();
    let (running, selected) = no_protection();
    let protection = Protection::new(&running, selected.as_ref());
    let state = cache.get_or_create(&wf("wf-1"), &protection, 1);

    for index in 0..BUS_EVENT_CAP + 25 {
        state.push_bus_event(bus_event(&format!("msg-{index}")));
    }

    assert_eq!(state.bus_events.len(), BUS_EVENT_CAP);
    assert_eq!(state.bus_events.front().map(|e| e.body.as_str()), Some("msg-25"));
    assert_eq!(
        state.bus_events.back().map(|e| e.body.as_str()),
        Some(&format!("msg-{}", BUS_EVENT_CAP + 24)[..])
    );
}

#[test]
fn worker_activation_is_idempotent_and_retirement_keeps_the_pane() {
    let mut cache = StateCache::new();
    let (running, selected) = no_protection();
    let protection = Protection::new(&running, selected.as_ref());
    let state = cache.get_or_create(&wf("wf-1"), &protection, 1);

    state.activate_worker("builder");
    state.activate_worker("tester");
    state.activate_worker("builder");
    assert_eq!(state.active_workers, vec!["builder", "tester"]);

    state.retire_worker("builder");
    assert_eq!(state.active_workers, vec!["tester"]);
    assert_eq!(
        state.worker_pane("builder").map(|pane| pane.status),
        Some(AgentStatus::Retired)
    );
}

#[test]
fn new_pane_defaults_are_empty() {
    let pane = AgentPane::default();
    assert!(pane.messages.is_empty());
    assert_eq!(pane.status, AgentStatus::Unknown);
    assert_eq!(pane.usage, None);
    assert_eq!(pane.queue_depth, 0);
    assert_eq!(pane.scroll, 0.0);
    assert_eq!(pane.last_message(), None);
}

fn arb_workflow_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("wf-[a-f0-9]{2}", 1..60)
}

proptest::proptest! {
    #[test]
    fn cache_never_exceeds_cap_without_protection(
        ids in arb_workflow_ids(),
        stamps in prop::collection::vec(0u64..1_000, 60),
    ) {
        let mut cache = StateCache::new();
        let (running, selected) = no_protection();
        let protection = Protection::new(&running, selected.as_ref());

        for (index, id) in ids.iter().enumerate() {
            cache.get_or_create(&wf(id), &protection, stamps[index % stamps.len()]);
            prop_assert!(cache.len() <= WORKFLOW_CACHE_CAP);
        }
    }

    #[test]
    fn selected_entry_survives_any_insertion_sequence(
        ids in arb_workflow_ids(),
        stamps in prop::collection::vec(0u64..1_000, 60),
    ) {
        let mut cache = StateCache::new();
        let running = BTreeSet::new();
        let selected = wf("wf-selected");
        let protection = Protection::new(&running, Some(&selected));

        cache.get_or_create(&selected, &protection, 0);
        for (index, id) in ids.iter().enumerate() {
            cache.get_or_create(&wf(id), &protection, stamps[index % stamps.len()]);
            prop_assert!(cache.contains(&selected));
        }
    }
}
