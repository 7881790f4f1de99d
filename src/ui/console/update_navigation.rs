use super::*;

impl ConsoleApp {
    pub(super) fn apply_action(&mut self, action: Action, effects: &mut Vec<Effect>) {
        self.event_log
            .log(Entry::new("input", Self::action_kind(&action)));

        match action {
            Action::MoveSelectionUp => self.move_selection(-1, effects),
            Action::MoveSelectionDown => self.move_selection(1, effects),
            Action::SelectRow(index) => {
                let previous = self.state.selected_id();
                if self.state.select_index(index) {
                    self.sync_selection_context(previous, effects);
                    // A pointer click that changes selection doubles as
                    // the acknowledge interaction for that row.
                    self.acknowledge_selected();
                }
            }
            Action::Confirm => {
                if self.state.focus == DashboardFocus::Table {
                    self.acknowledge_selected();
                }
            }
            Action::FocusNext => self.state.cycle_focus_forward(),
            Action::FocusPrev => self.state.cycle_focus_backward(),
            Action::FocusPane(target) => {
                let coordinator_closed =
                    target == DashboardFocus::Coordinator && !self.state.coordinator_open;
                if !coordinator_closed {
                    self.state.set_focus(target);
                }
            }
            Action::ToggleCoordinatorPanel => self.state.toggle_coordinator_panel(),
            Action::ToggleHelp => self.state.toggle_help(),
            Action::ToggleTreeMode => {
                if matches!(self.state.focus, DashboardFocus::EpicView(_))
                    && let Some(tree) = self.tree_loads.tree_mut()
                {
                    tree.toggle_mode();
                }
            }
            Action::ReloadTree => {
                if let Some(request) = self.tree_loads.refresh() {
                    self.event_log.log(
                        Entry::new("tree", "requested")
                            .with_field("root", Value::from(request.root_id.clone())),
                    );
                    effects.push(Effect::RunTreeQuery {
                        root_id: request.root_id,
                        query: request.query,
                    });
                }
            }
            Action::StartSelected => {
                if let Some(id) = self.state.selected_id() {
                    effects.push(Effect::StartWorkflow(id));
                }
            }
            Action::StopSelected => {
                if let Some(id) = self.state.selected_id() {
                    effects.push(Effect::StopWorkflow(id));
                }
            }
            Action::SetPaneScroll { worker, position } => {
                self.set_pane_scroll(worker.as_deref(), position);
            }
        }
    }

    fn move_selection(&mut self, direction: i8, effects: &mut Vec<Effect>) {
        match self.state.focus {
            DashboardFocus::Table => {
                let previous = self.state.selected_id();
                let moved = if direction.is_negative() {
                    self.state.move_selection_up()
                } else {
                    self.state.move_selection_down()
                };
                if moved {
                    self.sync_selection_context(previous, effects);
                }
            }
            DashboardFocus::EpicView(EpicViewFocus::Tree) => {
                if let Some(tree) = self.tree_loads.tree_mut() {
                    if direction.is_negative() {
                        tree.move_cursor_up();
                    } else {
                        tree.move_cursor_down();
                    }
                }
            }
            _ => {}
        }
    }

    /// Runs after anything that may have re-pointed the selection: roster
    /// replacement, cursor moves, pointer selection. Persists the outgoing
    /// workflow's tree view on an identity change, then applies the load
    /// trigger policy against the (possibly new) selected root.
    pub(super) fn sync_selection_context(
        &mut self,
        previous: Option<WorkflowId>,
        effects: &mut Vec<Effect>,
    ) {
        let current = self.state.selected_id();
        if previous != current
            && let Some(previous_id) = previous
        {
            // Persisting counts as a UI reference, so the outgoing entry
            // is created on demand; it may hold nothing but the triple.
            let now = self.now_millis();
            let running = self.state.running_ids();
            let protection = Protection::new(&running, current.as_ref());
            let state = self.cache.get_or_create(&previous_id, &protection, now);
            self.tree_loads.save_and_clear(&mut state.tree_view);
            self.event_log.log(
                Entry::new("update", "navigated")
                    .with_field("from", Value::from(previous_id.to_string()))
                    .with_field(
                        "to",
                        match &current {
                            Some(id) => Value::from(id.to_string()),
                            None => Value::Null,
                        },
                    ),
            );
        }

        let root = self
            .state
            .selected_workflow()
            .and_then(|workflow| workflow.epic_id.clone());
        if let Some(root) = root
            && let Some(request) = self.tree_loads.request(&root)
        {
            self.event_log.log(
                Entry::new("tree", "requested")
                    .with_field("root", Value::from(request.root_id.clone())),
            );
            effects.push(Effect::RunTreeQuery {
                root_id: request.root_id,
                query: request.query,
            });
        }
    }

    /// Explicit acknowledge: clears the attention flag on the selected
    /// workflow. Passive cursor movement never reaches this.
    pub(super) fn acknowledge_selected(&mut self) {
        let Some(id) = self.state.selected_id() else {
            return;
        };
        let now = self.now_millis();
        let stamped = self.clock.is_some();
        let running = self.state.running_ids();
        let protection = Protection::new(&running, Some(&id));

        let state = self.cache.get_or_create(&id, &protection, now);
        if !state.needs_attention {
            return;
        }
        state.needs_attention = false;
        if stamped {
            state.last_update_ms = now;
        }

        self.event_log.log(
            Entry::new("update", "acknowledged").with_field("workflow", Value::from(id.to_string())),
        );
    }

    fn set_pane_scroll(&mut self, worker: Option<&str>, position: f32) {
        let Some(id) = self.state.selected_id() else {
            return;
        };
        let clamped = position.clamp(0.0, 1.0);
        let now = self.now_millis();
        let running = self.state.running_ids();
        let protection = Protection::new(&running, Some(&id));

        let state = self.cache.get_or_create(&id, &protection, now);
        match worker {
            None => state.coordinator.scroll = clamped,
            Some(worker_id) => state.worker_pane_mut(worker_id).scroll = clamped,
        }
    }
}
