//! The form session: owner of the completion set and the only writer to it.

use super::{CompletionSet, DispatchOutcome, FormState, VisibilityResolver};
use crate::core::{FormEvent, FormInput, InputValue, StageKind};
use crate::errors::{RegistryValidationError, Result, StagegateError};
use crate::events::{emit_form_event, EventSink, NoOpEventSink};
use crate::registry::StageRegistry;
use crate::render::{TerminalView, View, Widget};
use crate::stages::{StageDefinition, TerminalEffect};
use crate::utils::generate_session_id;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    /// Accepting input.
    Active,
    /// A delayed terminal effect is waiting to fire.
    AwaitingTerminal {
        /// The button that scheduled it.
        stage_id: String,
    },
    /// The terminal view is showing.
    Terminated,
}

/// Completed versus required stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Required stages that are complete.
    pub completed: usize,
    /// Stages that require completion (everything but headers and buttons).
    pub required: usize,
}

impl Progress {
    /// Returns true once every required stage is complete.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.completed == self.required
    }
}

/// Rebuilds the registry when a session is reset.
pub type RegistryReload = Arc<dyn Fn() -> Result<StageRegistry> + Send + Sync>;

/// One rendering of a form.
///
/// All state is owned here and mutated synchronously by [`dispatch`](Self::dispatch).
pub struct FormSession {
    session_id: Uuid,
    title: String,
    registry: Arc<StageRegistry>,
    completion: CompletionSet,
    state: FormState,
    displayed: HashMap<String, InputValue>,
    phase: SessionPhase,
    terminal_view: Option<TerminalView>,
    sink: Arc<dyn EventSink>,
    reload: Option<RegistryReload>,
}

impl FormSession {
    /// Starts a session over a registry.
    #[must_use]
    pub fn new(registry: Arc<StageRegistry>) -> Self {
        Self {
            session_id: generate_session_id(),
            title: registry.name().to_string(),
            registry,
            completion: CompletionSet::new(),
            state: FormState::new(),
            displayed: HashMap::new(),
            phase: SessionPhase::Active,
            terminal_view: None,
            sink: Arc::new(NoOpEventSink),
            reload: None,
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Sets how the registry is rebuilt on [`reset`](Self::reset).
    ///
    /// Without one, a reset keeps the current registry.
    #[must_use]
    pub fn with_reload(mut self, reload: RegistryReload) -> Self {
        self.reload = Some(reload);
        self
    }

    /// Sets the title shown above the form.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Returns the session id.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    /// Returns the completion set.
    #[must_use]
    pub fn completion(&self) -> &CompletionSet {
        &self.completion
    }

    /// Returns the accepted values.
    #[must_use]
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Returns the lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// Returns true while the session accepts input.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    /// Returns a visibility resolver over the current state.
    #[must_use]
    pub fn visibility(&self) -> VisibilityResolver<'_> {
        VisibilityResolver::new(&self.registry, &self.completion)
    }

    /// Returns true if the stage with this id is shown.
    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.visibility().is_visible_id(id)
    }

    /// Returns true if the stage with this id is complete.
    #[must_use]
    pub fn is_complete(&self, id: &str) -> bool {
        self.completion.contains(id)
    }

    /// Returns what the widget of a stage currently displays.
    #[must_use]
    pub fn displayed(&self, id: &str) -> Option<&InputValue> {
        self.displayed.get(id)
    }

    /// Counts completed required stages.
    #[must_use]
    pub fn progress(&self) -> Progress {
        let required: Vec<&StageDefinition> = self
            .registry
            .iter()
            .filter(|d| d.kind.is_gating() && d.kind != StageKind::ActionButton)
            .collect();
        Progress {
            completed: required.iter().filter(|d| self.completion.contains(&d.id)).count(),
            required: required.len(),
        }
    }

    /// Routes one input event to its stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage id is unknown, the value does not fit the
    /// stage kind, the stage is hidden, or a select option is not offered.
    /// Rejected values are not errors.
    pub fn dispatch(&mut self, input: FormInput) -> Result<DispatchOutcome> {
        if !self.is_active() {
            debug!(
                session_id = %self.session_id,
                stage_id = %input.stage_id,
                phase = ?self.phase,
                "Discarding input after terminal effect"
            );
            return Ok(DispatchOutcome::Discarded);
        }

        let registry = Arc::clone(&self.registry);
        let (index, def) = registry
            .find(&input.stage_id)
            .ok_or_else(|| StagegateError::unknown_stage(&input.stage_id))?;

        if !input.value.fits(def.kind) {
            return Err(StagegateError::KindMismatch {
                stage_id: def.id.clone(),
                expected: def.kind,
                received: input.value.label(),
            });
        }
        if !self.visibility().is_visible(index) {
            return Err(StagegateError::stage_hidden(&def.id));
        }

        let outcome = match input.value {
            InputValue::Text(raw) => self.handle_validated(def, InputValue::Text(raw)),
            InputValue::Select(option) => {
                if !def.offers(&option) {
                    return Err(StagegateError::unknown_option(&def.id, option));
                }
                self.handle_validated(def, InputValue::Select(option))
            }
            InputValue::Toggle(checked) => self.handle_toggle(def, checked),
            InputValue::Activate => self.handle_activate(def)?,
        };
        Ok(outcome)
    }

    /// Fires a pending delayed terminal effect.
    ///
    /// Returns the notice to show, or `None` if nothing was pending. When the
    /// effect asks for it, the session is fully reset afterwards.
    pub fn fire_deferred_terminal(&mut self) -> Option<TerminalView> {
        let SessionPhase::AwaitingTerminal { stage_id } = &self.phase else {
            warn!(session_id = %self.session_id, "Deferred terminal fired with nothing pending");
            return None;
        };
        let stage_id = stage_id.clone();

        let Some(TerminalEffect::Delayed {
            notice,
            reset_after,
            ..
        }) = self.registry.find(&stage_id).and_then(|(_, d)| d.terminal.clone())
        else {
            return None;
        };

        let view = TerminalView {
            asset: None,
            message: Some(notice),
        };
        info!(session_id = %self.session_id, stage_id = %stage_id, "Delayed terminal failure fired");
        emit_form_event(
            self.sink.as_ref(),
            &FormEvent::terminal(&self.session_id.to_string(), &stage_id, "delayed"),
        );

        if reset_after {
            self.reset();
        } else {
            self.phase = SessionPhase::Terminated;
            self.terminal_view = Some(view.clone());
        }
        Some(view)
    }

    /// Fully resets the session, as a reload would.
    ///
    /// Completion set, form state and displayed values are cleared and a new
    /// session id is assigned. A configured reload rebuilds the registry; if
    /// it fails the current registry is kept.
    pub fn reset(&mut self) {
        if let Some(reload) = &self.reload {
            match reload() {
                Ok(registry) => self.registry = Arc::new(registry),
                Err(e) => warn!(session_id = %self.session_id, error = %e, "Registry reload failed"),
            }
        }
        self.completion.clear();
        self.state.clear();
        self.displayed.clear();
        self.phase = SessionPhase::Active;
        self.terminal_view = None;
        self.session_id = generate_session_id();
        info!(session_id = %self.session_id, "Session reset");
        emit_form_event(self.sink.as_ref(), &FormEvent::reset(&self.session_id.to_string()));
    }

    /// Renders the current view.
    #[must_use]
    pub fn view(&self) -> View {
        if let Some(terminal) = &self.terminal_view {
            return View::Terminal(terminal.clone());
        }

        let resolver = self.visibility();
        let widgets = resolver
            .visible_indices()
            .into_iter()
            .filter_map(|i| self.registry.get(i).map(|def| (i, def)))
            .map(|(i, def)| Widget {
                id: def.id.clone(),
                kind: def.kind,
                prompt: def.prompt.clone(),
                options: def.options.clone(),
                status: resolver.status(i),
                displayed: self.displayed.get(&def.id).cloned(),
            })
            .collect();

        View::Form {
            title: self.title.clone(),
            widgets,
        }
    }

    fn sid(&self) -> String {
        self.session_id.to_string()
    }

    fn handle_validated(&mut self, def: &StageDefinition, value: InputValue) -> DispatchOutcome {
        let raw = value.as_str().unwrap_or_default().to_string();
        self.displayed.insert(def.id.clone(), value.clone());

        if def.validate(&raw) {
            return self.complete(def, value);
        }

        match &def.on_invalid {
            Some(response) => {
                if let Some(target) = &response.reset_to {
                    let reset = match value {
                        InputValue::Select(_) => InputValue::Select(target.clone()),
                        _ => InputValue::Text(target.clone()),
                    };
                    self.displayed.insert(def.id.clone(), reset);
                }
                debug!(session_id = %self.session_id, stage_id = %def.id, "Value rejected with acknowledgment");
                emit_form_event(
                    self.sink.as_ref(),
                    &FormEvent::acknowledged(&self.sid(), &def.id, response.message.as_deref()),
                );
                DispatchOutcome::Acknowledged {
                    stage_id: def.id.clone(),
                    response: response.clone(),
                }
            }
            None => {
                debug!(session_id = %self.session_id, stage_id = %def.id, "Value rejected");
                emit_form_event(self.sink.as_ref(), &FormEvent::rejected(&self.sid(), &def.id));
                DispatchOutcome::Rejected {
                    stage_id: def.id.clone(),
                }
            }
        }
    }

    fn handle_toggle(&mut self, def: &StageDefinition, checked: bool) -> DispatchOutcome {
        self.displayed.insert(def.id.clone(), InputValue::Toggle(checked));
        if checked {
            return self.complete(def, InputValue::Toggle(true));
        }

        let before = self.visibility().visible_ids();
        self.completion.remove(&def.id);
        self.state.record(def.id.clone(), InputValue::Toggle(false));
        let after = self.visibility().visible_ids();
        let concealed: Vec<String> = before.into_iter().filter(|id| !after.contains(id)).collect();

        debug!(session_id = %self.session_id, stage_id = %def.id, concealed = concealed.len(), "Checkbox cleared");
        emit_form_event(self.sink.as_ref(), &FormEvent::cleared(&self.sid(), &def.id, &concealed));
        DispatchOutcome::Cleared {
            stage_id: def.id.clone(),
            concealed,
        }
    }

    fn handle_activate(&mut self, def: &StageDefinition) -> Result<DispatchOutcome> {
        let effect = def.terminal.clone().ok_or_else(|| {
            RegistryValidationError::new(format!("Button stage '{}' has no terminal effect", def.id))
                .with_stages(vec![def.id.clone()])
        })?;

        match &effect {
            TerminalEffect::Immediate { asset, caption } => {
                self.phase = SessionPhase::Terminated;
                self.terminal_view = Some(TerminalView {
                    asset: Some(asset.clone()),
                    message: caption.clone(),
                });
                info!(session_id = %self.session_id, stage_id = %def.id, asset = %asset, "Terminal failure view shown");
            }
            TerminalEffect::Delayed { delay_ms, .. } => {
                self.phase = SessionPhase::AwaitingTerminal {
                    stage_id: def.id.clone(),
                };
                info!(session_id = %self.session_id, stage_id = %def.id, delay_ms = *delay_ms, "Terminal failure scheduled");
            }
        }

        emit_form_event(
            self.sink.as_ref(),
            &FormEvent::terminal(&self.sid(), &def.id, effect.mode()),
        );
        Ok(DispatchOutcome::Terminal {
            stage_id: def.id.clone(),
            effect,
        })
    }

    fn complete(&mut self, def: &StageDefinition, value: InputValue) -> DispatchOutcome {
        let before = self.visibility().visible_ids();
        let newly = self.completion.insert(def.id.clone());
        self.state.record(def.id.clone(), value);
        let revealed: Vec<String> = self
            .visibility()
            .visible_ids()
            .into_iter()
            .filter(|id| !before.contains(id))
            .collect();

        debug!(
            session_id = %self.session_id,
            stage_id = %def.id,
            newly_completed = newly,
            revealed = ?revealed,
            "Stage accepted value"
        );
        emit_form_event(self.sink.as_ref(), &FormEvent::completed(&self.sid(), &def.id, &revealed));
        DispatchOutcome::Accepted {
            stage_id: def.id.clone(),
            revealed,
        }
    }
}

impl std::fmt::Debug for FormSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSession")
            .field("session_id", &self.session_id)
            .field("registry", &self.registry.name())
            .field("completed", &self.completion.len())
            .field("phase", &self.phase)
            .finish()
    }
}
