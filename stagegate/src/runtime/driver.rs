//! The single-threaded driver around a form session.

use super::{TerminalTimer, TimerSignal};
use crate::core::{FormInput, InputValue};
use crate::errors::{Result, StagegateError};
use crate::events::{EventSink, NoOpEventSink};
use crate::render::{TerminalView, View};
use crate::session::{DispatchOutcome, FormSession};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

/// Owns a session and its deferred terminal timer.
///
/// Inputs and timer signals are applied one at a time, each to completion.
/// Dropping the driver, or calling [`shutdown`](Self::shutdown), cancels a
/// pending timer so it cannot reach a torn-down view.
pub struct FormDriver {
    session: FormSession,
    timer: Option<TerminalTimer>,
    signal_tx: UnboundedSender<TimerSignal>,
    signal_rx: UnboundedReceiver<TimerSignal>,
    sink: Arc<dyn EventSink>,
    closed: bool,
}

impl FormDriver {
    /// Wraps a session.
    #[must_use]
    pub fn new(session: FormSession) -> Self {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        Self {
            session,
            timer: None,
            signal_tx,
            signal_rx,
            sink: Arc::new(NoOpEventSink),
            closed: false,
        }
    }

    /// Sets the sink the driver reports timer activity to.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the session.
    #[must_use]
    pub fn session(&self) -> &FormSession {
        &self.session
    }

    /// Renders the current view.
    #[must_use]
    pub fn view(&self) -> View {
        self.session.view()
    }

    /// Returns true while a delayed terminal effect is scheduled.
    #[must_use]
    pub fn has_pending_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Returns true once [`shutdown`](Self::shutdown) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Dispatches one input and schedules any delayed effect it triggers.
    ///
    /// # Errors
    ///
    /// Propagates dispatch errors from the session. Activating a button with a
    /// delayed effect outside a tokio runtime fails with
    /// [`StagegateError::RuntimeUnavailable`] and leaves the session untouched.
    pub fn handle(&mut self, input: FormInput) -> Result<DispatchOutcome> {
        if input.value == InputValue::Activate
            && self.session.is_active()
            && self.schedules_delay(&input.stage_id)
            && tokio::runtime::Handle::try_current().is_err()
        {
            return Err(StagegateError::RuntimeUnavailable {
                stage_id: input.stage_id,
            });
        }

        let outcome = self.session.dispatch(input)?;

        if let DispatchOutcome::Terminal { stage_id, effect } = &outcome {
            if let Some(delay) = effect.delay() {
                if let Some(previous) = self.timer.take() {
                    previous.cancel("superseded");
                }
                debug!(stage_id = %stage_id, delay = ?delay, "Scheduling terminal timer");
                self.timer = Some(TerminalTimer::schedule(
                    stage_id.clone(),
                    delay,
                    self.signal_tx.clone(),
                ));
            }
        }
        Ok(outcome)
    }

    /// Waits for the next timer signal.
    ///
    /// Pends forever when nothing is scheduled, so it is meant to be raced
    /// against input in a `select!`.
    pub async fn next_signal(&mut self) -> Option<TimerSignal> {
        self.signal_rx.recv().await
    }

    /// Applies a timer signal to the session.
    ///
    /// Returns the notice to display, if the signal fired an effect.
    pub async fn apply_signal(&mut self, signal: TimerSignal) -> Option<TerminalView> {
        let TimerSignal::TerminalDue { stage_id } = signal;
        if self.closed || self.timer.take().is_none() {
            debug!(stage_id = %stage_id, closed = self.closed, "Ignoring stale timer signal");
            return None;
        }

        let notice = self.session.fire_deferred_terminal();
        self.sink
            .emit(
                "form.timer_fired",
                Some(serde_json::json!({
                    "stage": stage_id,
                    "session_id": self.session.session_id().to_string(),
                    "applied": notice.is_some(),
                })),
            )
            .await;
        notice
    }

    /// Ends the session, cancelling any scheduled effect.
    ///
    /// Signals that were already posted are dropped, and later calls to
    /// [`apply_signal`](Self::apply_signal) do nothing.
    pub fn shutdown(&mut self, reason: &str) {
        self.closed = true;
        if let Some(timer) = self.timer.take() {
            info!(reason = %reason, "Cancelling pending terminal timer");
            timer.cancel(reason);
        }
        self.signal_rx.close();
        while let Ok(stale) = self.signal_rx.try_recv() {
            debug!(signal = ?stale, "Dropping undelivered timer signal");
        }
    }

    fn schedules_delay(&self, stage_id: &str) -> bool {
        self.session
            .registry()
            .find(stage_id)
            .and_then(|(_, def)| def.terminal.as_ref())
            .is_some_and(|effect| effect.delay().is_some())
    }
}

impl std::fmt::Debug for FormDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormDriver")
            .field("session", &self.session)
            .field("pending_timer", &self.has_pending_timer())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;
    use crate::registry::RegistryBuilder;
    use crate::stages::{StageDefinition, TerminalEffect};
    use std::time::Duration;

    fn driver(effect: TerminalEffect, sink: Arc<CollectingEventSink>) -> FormDriver {
        let registry = RegistryBuilder::new("driver")
            .stage(StageDefinition::checkbox("terms", "Terms"))
            .stage(StageDefinition::button("submit", "Submit", effect))
            .build()
            .unwrap();
        let session = FormSession::new(Arc::new(registry)).with_sink(sink.clone());
        FormDriver::new(session).with_sink(sink)
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_effect_fires_through_signal() {
        let sink = Arc::new(CollectingEventSink::new());
        let mut driver = driver(
            TerminalEffect::delayed(Duration::from_secs(3), "Account creation failed", false),
            sink.clone(),
        );

        driver.handle(FormInput::toggle("terms", true)).unwrap();
        driver.handle(FormInput::activate("submit")).unwrap();
        assert!(driver.has_pending_timer());
        assert!(!driver.view().is_terminal());

        let signal = tokio::time::timeout(Duration::from_secs(10), driver.next_signal())
            .await
            .unwrap()
            .unwrap();
        let notice = driver.apply_signal(signal).await.unwrap();

        assert_eq!(notice.message.as_deref(), Some("Account creation failed"));
        assert!(driver.view().is_terminal());
        assert!(!driver.has_pending_timer());
        assert_eq!(sink.events_of_type("form.timer_fired").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_effect() {
        let sink = Arc::new(CollectingEventSink::new());
        let mut driver = driver(
            TerminalEffect::delayed(Duration::from_secs(3), "never shown", true),
            sink.clone(),
        );

        driver.handle(FormInput::toggle("terms", true)).unwrap();
        driver.handle(FormInput::activate("submit")).unwrap();
        driver.shutdown("form closed");
        assert!(!driver.has_pending_timer());

        let waited = tokio::time::timeout(Duration::from_secs(10), driver.next_signal()).await;
        assert_eq!(waited.ok().flatten(), None, "no signal may arrive after shutdown");
        assert!(driver.is_closed());
        assert!(sink.events_of_type("form.timer_fired").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drops_signal_already_posted() {
        let sink = Arc::new(CollectingEventSink::new());
        let mut driver = driver(
            TerminalEffect::delayed(Duration::from_secs(3), "too late", false),
            sink.clone(),
        );

        driver.handle(FormInput::toggle("terms", true)).unwrap();
        driver.handle(FormInput::activate("submit")).unwrap();
        // The timer elapses and posts before the driver gets a turn.
        tokio::time::sleep(Duration::from_secs(4)).await;
        driver.shutdown("form closed");

        assert_eq!(driver.next_signal().await, None);
        let late = TimerSignal::TerminalDue {
            stage_id: "submit".to_string(),
        };
        assert!(driver.apply_signal(late).await.is_none());
        assert!(!driver.view().is_terminal());
        assert!(sink.events_of_type("form.timer_fired").is_empty());
    }

    #[tokio::test]
    async fn test_signal_without_pending_timer_is_ignored() {
        let sink = Arc::new(CollectingEventSink::new());
        let mut driver = driver(
            TerminalEffect::delayed(Duration::from_secs(3), "unscheduled", false),
            sink.clone(),
        );
        driver.handle(FormInput::toggle("terms", true)).unwrap();

        let stray = TimerSignal::TerminalDue {
            stage_id: "submit".to_string(),
        };
        assert!(driver.apply_signal(stray).await.is_none());
        assert!(driver.session().is_active());
        assert!(sink.events_of_type("form.timer_fired").is_empty());
    }

    #[test]
    fn test_delayed_effect_outside_runtime_is_an_error() {
        let sink = Arc::new(CollectingEventSink::new());
        let mut driver = driver(
            TerminalEffect::delayed(Duration::from_secs(3), "no runtime", true),
            sink,
        );
        driver.handle(FormInput::toggle("terms", true)).unwrap();

        let err = driver.handle(FormInput::activate("submit")).unwrap_err();
        assert!(matches!(err, StagegateError::RuntimeUnavailable { .. }));
        assert!(driver.session().is_active());
        assert!(!driver.has_pending_timer());
    }

    #[test]
    fn test_immediate_effect_needs_no_runtime() {
        let sink = Arc::new(CollectingEventSink::new());
        let mut driver = driver(TerminalEffect::immediate("bsod.png"), sink);
        driver.handle(FormInput::toggle("terms", true)).unwrap();
        assert!(driver.handle(FormInput::activate("submit")).is_ok());
        assert!(driver.view().is_terminal());
    }

    #[tokio::test]
    async fn test_immediate_effect_schedules_nothing() {
        let sink = Arc::new(CollectingEventSink::new());
        let mut driver = driver(TerminalEffect::immediate("bsod.png"), sink);

        driver.handle(FormInput::toggle("terms", true)).unwrap();
        driver.handle(FormInput::activate("submit")).unwrap();
        assert!(!driver.has_pending_timer());
        assert!(driver.view().is_terminal());
        assert_eq!(
            driver.handle(FormInput::toggle("terms", false)).unwrap(),
            DispatchOutcome::Discarded
        );
    }
}
