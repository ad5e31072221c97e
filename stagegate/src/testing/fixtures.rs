//! Test fixtures for sessions.

use crate::config::FormConfig;
use crate::core::FormInput;
use crate::events::CollectingEventSink;
use crate::registry::{RegistryBuilder, StageRegistry};
use crate::session::{DispatchOutcome, FormSession};
use crate::signup::{ids, signup_session};
use crate::stages::{NonEmpty, StageDefinition};
use std::sync::Arc;

/// Builds a registry of `len` non-empty text stages named `s0`, `s1`, ...
///
/// # Panics
///
/// Panics if `len` is zero.
#[must_use]
pub fn linear_registry(len: usize) -> StageRegistry {
    (0..len)
        .fold(RegistryBuilder::new("linear"), |builder, i| {
            builder.stage(StageDefinition::text(format!("s{i}"), format!("Stage {i}")).with_validator(NonEmpty))
        })
        .build()
        .expect("linear registry is valid")
}

/// Starts the stock signup form with a fixed palette seed and a collecting sink.
///
/// # Panics
///
/// Panics if the default signup registry fails to build.
#[must_use]
pub fn collecting_signup_session(config: FormConfig) -> (FormSession, Arc<CollectingEventSink>) {
    let sink = Arc::new(CollectingEventSink::new());
    let config = match config.palette_seed {
        Some(_) => config,
        None => config.with_palette_seed(0x5EED),
    };
    let session = signup_session(&config, sink.clone()).expect("signup registry is valid");
    (session, sink)
}

/// A session plus helpers for walking the stock form.
#[derive(Debug)]
pub struct SessionFixture {
    /// The session under test.
    pub session: FormSession,
    /// Events the session emitted.
    pub sink: Arc<CollectingEventSink>,
}

impl SessionFixture {
    /// Starts the stock form with default configuration.
    #[must_use]
    pub fn signup() -> Self {
        Self::with_config(FormConfig::default())
    }

    /// Starts the stock form with a configuration.
    #[must_use]
    pub fn with_config(config: FormConfig) -> Self {
        let (session, sink) = collecting_signup_session(config);
        Self { session, sink }
    }

    /// Dispatches an input, panicking on caller errors.
    ///
    /// # Panics
    ///
    /// Panics if dispatch returns an error.
    pub fn send(&mut self, input: FormInput) -> DispatchOutcome {
        self.session
            .dispatch(input)
            .unwrap_or_else(|e| panic!("dispatch failed: {e}"))
    }

    /// Completes the stock form up to and including the terms checkbox.
    pub fn fill_all(&mut self) {
        let color = self
            .session
            .registry()
            .find(ids::FAVORITE_COLOR)
            .and_then(|(_, def)| def.options.first().cloned())
            .unwrap_or_default();

        self.send(FormInput::text(ids::USERNAME, "alice"));
        self.send(FormInput::text(ids::EMAIL, "alice@example.com"));
        self.send(FormInput::text(ids::PASSWORD, "hunter2"));
        self.send(FormInput::select(ids::FAVORITE_COLOR, color));
        self.send(FormInput::select(ids::GAMBLE, "Black"));
        self.send(FormInput::text(ids::ARITHMETIC, "21"));
        self.send(FormInput::toggle(ids::TERMS, true));
    }
}
