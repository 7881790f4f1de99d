use super::*;

impl ConsoleApp {
    pub(super) fn msg_kind(msg: &Msg) -> &'static str {
        match msg {
            Msg::Event(_) => "event",
            Msg::Action(_) => "action",
            Msg::RosterRefresh => "roster_refresh",
            Msg::TreeLoadCompleted(_) => "tree_load_completed",
            Msg::StartWorkflowCompleted(_) => "start_completed",
            Msg::StopWorkflowCompleted(_) => "stop_completed",
        }
    }

    pub(super) fn action_kind(action: &Action) -> &'static str {
        match action {
            Action::MoveSelectionUp => "move_selection_up",
            Action::MoveSelectionDown => "move_selection_down",
            Action::SelectRow(_) => "select_row",
            Action::Confirm => "confirm",
            Action::FocusNext => "focus_next",
            Action::FocusPrev => "focus_prev",
            Action::FocusPane(_) => "focus_pane",
            Action::ToggleCoordinatorPanel => "toggle_coordinator_panel",
            Action::ToggleHelp => "toggle_help",
            Action::ToggleTreeMode => "toggle_tree_mode",
            Action::ReloadTree => "reload_tree",
            Action::StartSelected => "start_selected",
            Action::StopSelected => "stop_selected",
            Action::SetPaneScroll { .. } => "set_pane_scroll",
        }
    }

    pub(super) fn log_step(&self, msg_kind: &'static str, effects: &[Effect]) {
        self.event_log.log(
            Entry::new("update", "step")
                .with_field("msg", Value::from(msg_kind))
                .with_field("focus", Value::from(self.state.focus.label()))
                .with_field(
                    "selected",
                    match self.state.selected_id() {
                        Some(id) => Value::from(id.to_string()),
                        None => Value::Null,
                    },
                )
                .with_field("effects", Value::from(effects.len())),
        );

        if self.cache.over_cap() {
            self.event_log.log(
                Entry::new("cache", "over_cap")
                    .with_field("entries", Value::from(self.cache.len())),
            );
        }
    }
}
