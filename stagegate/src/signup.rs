//! The stock joke signup form.

use crate::config::FormConfig;
use crate::errors::Result;
use crate::events::EventSink;
use crate::palette::{generate_palette, seeded_palette};
use crate::registry::{RegistryBuilder, StageRegistry};
use crate::session::FormSession;
use crate::stages::{
    AnyValue, ExactMatch, ExcludeValues, InvalidResponse, NonEmpty, PatternValidator,
    StageDefinition,
};
use std::sync::Arc;

/// Stage ids of the stock form.
pub mod ids {
    /// Username field.
    pub const USERNAME: &str = "username";
    /// Email field.
    pub const EMAIL: &str = "email";
    /// Password field.
    pub const PASSWORD: &str = "password";
    /// "Security questions" header.
    pub const SECURITY_HEADER: &str = "security_questions";
    /// Favorite color dropdown.
    pub const FAVORITE_COLOR: &str = "favorite_color";
    /// Red or black dropdown.
    pub const GAMBLE: &str = "gamble";
    /// Arithmetic question.
    pub const ARITHMETIC: &str = "arithmetic";
    /// Terms checkbox.
    pub const TERMS: &str = "terms";
    /// Final button.
    pub const CREATE_ACCOUNT: &str = "create_account";
}

/// The trick answer of the gamble question.
pub const GAMBLE_TRICK: &str = "gambling is bad";

/// Builds the stock signup registry.
///
/// # Errors
///
/// Returns an error if the configuration produces an invalid registry, for
/// example a gamble fallback that is not one of its options.
pub fn signup_registry(config: &FormConfig) -> Result<StageRegistry> {
    let palette = match config.palette_seed {
        Some(seed) => seeded_palette(seed, config.palette_size),
        None => generate_palette(config.palette_size),
    };

    let registry = RegistryBuilder::new(config.title.clone())
        .stage(StageDefinition::text(ids::USERNAME, "Enter username").with_validator(NonEmpty))
        .stage(StageDefinition::text(ids::EMAIL, "Enter email").with_validator(PatternValidator::email()))
        .stage(StageDefinition::password(ids::PASSWORD, "Enter password").with_validator(NonEmpty))
        .stage(StageDefinition::header(ids::SECURITY_HEADER, "Security questions"))
        .stage(
            StageDefinition::select(ids::FAVORITE_COLOR, "What's your favorite color?", palette)
                .with_validator(AnyValue),
        )
        .stage(
            StageDefinition::select(ids::GAMBLE, "100,000$, Red or black", ["Red", "Black", GAMBLE_TRICK])
                .with_validator(ExcludeValues::new([GAMBLE_TRICK]))
                .with_on_invalid(
                    InvalidResponse::acknowledge(config.gamble_acknowledgment.clone())
                        .reset_to(config.gamble_fallback.clone()),
                ),
        )
        .stage(
            StageDefinition::text(ids::ARITHMETIC, "What's 9 + 10?")
                .with_validator(ExactMatch::new(config.arithmetic_answer.clone())),
        )
        .stage(StageDefinition::checkbox(ids::TERMS, "I agree to the terms and conditions I did not read"))
        .stage(StageDefinition::button(ids::CREATE_ACCOUNT, "Create account", config.terminal.effect()))
        .build()?;

    Ok(registry)
}

/// Starts a session over the stock form.
///
/// Without a palette seed, every reset draws a fresh palette, as a reload
/// would.
///
/// # Errors
///
/// Returns an error if the registry cannot be built.
pub fn signup_session(config: &FormConfig, sink: Arc<dyn EventSink>) -> Result<FormSession> {
    let registry = Arc::new(signup_registry(config)?);
    let session = FormSession::new(registry)
        .with_title(config.title.clone())
        .with_sink(sink);
    if config.palette_seed.is_some() {
        return Ok(session);
    }

    let config = config.clone();
    Ok(session.with_reload(Arc::new(move || signup_registry(&config))))
}
