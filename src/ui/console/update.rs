use super::*;

impl ConsoleApp {
    /// Consumes exactly one external event and returns the follow-up
    /// asynchronous requests. Nothing in here blocks; collaborator
    /// failures become notices, never panics.
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        let msg_kind = Self::msg_kind(&msg);
        let mut effects = Vec::new();

        match msg {
            Msg::Event(event) => self.apply_console_event(event),
            Msg::Action(action) => self.apply_action(action, &mut effects),
            Msg::RosterRefresh => self.refresh_roster(&mut effects),
            Msg::TreeLoadCompleted(completion) => self.apply_tree_load_completion(completion),
            Msg::StartWorkflowCompleted(completion) => {
                self.apply_command_completion("start", completion);
            }
            Msg::StopWorkflowCompleted(completion) => {
                self.apply_command_completion("stop", completion);
            }
        }

        self.log_step(msg_kind, &effects);
        effects
    }

    fn apply_console_event(&mut self, event: ConsoleEvent) {
        let workflow_id = event.workflow_id.clone();
        let running = self.state.running_ids();
        let selected = self.state.selected_id();
        let protection = Protection::new(&running, selected.as_ref());

        let outcome = event_router::route(
            &mut self.cache,
            &protection,
            self.clock.as_deref(),
            event,
        );

        self.event_log.log(
            Entry::new(
                "router",
                match outcome {
                    event_router::RouteOutcome::Applied => "applied",
                    event_router::RouteOutcome::Ignored => "ignored",
                },
            )
            .with_field("workflow", Value::from(workflow_id)),
        );
    }

    pub(super) fn refresh_roster(&mut self, effects: &mut Vec<Effect>) {
        match self.roster.list() {
            Ok(workflows) => {
                let previous = self.state.selected_id();
                self.state.replace_workflows(workflows);
                self.sync_selection_context(previous, effects);
            }
            Err(error) => self.set_notice(error.message()),
        }
    }

    fn apply_tree_load_completion(&mut self, completion: TreeLoadCompletion) {
        let persisted = self
            .state
            .selected_id()
            .and_then(|id| self.cache.get(&id))
            .map(|state| state.tree_view.clone())
            .unwrap_or_default();

        let disposition = self.tree_loads.complete(
            &completion.root_id,
            completion.result,
            &persisted,
            self.tree_builder.as_ref(),
        );

        match disposition {
            TreeLoadDisposition::Stale => {
                self.event_log.log(
                    Entry::new("tree", "stale")
                        .with_field("root", Value::from(completion.root_id)),
                );
            }
            TreeLoadDisposition::Applied => {
                self.event_log.log(
                    Entry::new("tree", "applied")
                        .with_field("root", Value::from(completion.root_id)),
                );
            }
            TreeLoadDisposition::Cleared { error } => {
                if let Some(message) = error {
                    self.set_notice(message);
                }
                self.event_log.log(
                    Entry::new("tree", "cleared")
                        .with_field("root", Value::from(completion.root_id)),
                );
            }
        }
    }

    fn apply_command_completion(&mut self, command: &'static str, completion: CommandCompletion) {
        match completion.result {
            Ok(()) => {
                self.event_log.log(
                    Entry::new("command", "succeeded")
                        .with_field("command", Value::from(command))
                        .with_field("workflow", Value::from(completion.workflow_id.to_string())),
                );
            }
            Err(error) => {
                self.set_notice(error.message());
                self.event_log.log(
                    Entry::new("command", "failed")
                        .with_field("command", Value::from(command))
                        .with_field("workflow", Value::from(completion.workflow_id.to_string())),
                );
            }
        }
    }

    pub(super) fn set_notice(&mut self, message: String) {
        self.event_log
            .log(Entry::new("update", "notice").with_field("message", Value::from(message.clone())));
        self.last_notice = Some(message);
    }
}
