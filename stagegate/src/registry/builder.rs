//! Registry builder with validation.

use super::StageRegistry;
use crate::core::StageKind;
use crate::errors::{ContractErrorInfo, RegistryValidationError};
use crate::stages::StageDefinition;
use std::collections::HashSet;
use tracing::debug;

/// Builder for creating validated stage registries.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    name: String,
    stages: Vec<StageDefinition>,
}

impl RegistryBuilder {
    /// Creates a new registry builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    /// Appends a stage. Validation is deferred to [`build`](Self::build).
    #[must_use]
    pub fn stage(mut self, definition: StageDefinition) -> Self {
        self.stages.push(definition);
        self
    }

    /// Appends a stage, validating it against the stages added so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition is malformed or its id is taken.
    pub fn add_stage(&mut self, definition: StageDefinition) -> Result<(), RegistryValidationError> {
        validate_definition(&definition)?;
        if self.stages.iter().any(|d| d.id == definition.id) {
            return Err(duplicate_id(&definition.id));
        }
        self.stages.push(definition);
        Ok(())
    }

    /// Returns the registry name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of stages added so far.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Builds the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry is empty, an id is repeated, or a
    /// definition carries fields its kind does not allow.
    pub fn build(self) -> Result<StageRegistry, RegistryValidationError> {
        if self.stages.is_empty() {
            return Err(RegistryValidationError::new(format!(
                "Registry '{}' has no stages",
                self.name
            ))
            .with_error_info(ContractErrorInfo::suggested(
                "REGISTRY-EMPTY",
                "Cannot build an empty registry",
            )));
        }

        let mut seen = HashSet::new();
        for definition in &self.stages {
            validate_definition(definition)?;
            if !seen.insert(definition.id.as_str()) {
                return Err(duplicate_id(&definition.id));
            }
        }

        debug!(registry = %self.name, stages = self.stages.len(), "Built stage registry");
        Ok(StageRegistry::from_validated(self.name, self.stages))
    }
}

fn duplicate_id(id: &str) -> RegistryValidationError {
    RegistryValidationError::new(format!("Stage id '{id}' is declared more than once"))
        .with_stages(vec![id.to_string()])
        .with_error_info(
            ContractErrorInfo::suggested("REGISTRY-DUPLICATE_ID", format!("Duplicate id '{id}'"))
                .with_context_entry("stage", id),
        )
}

fn invalid(definition: &StageDefinition, code: &str, message: String) -> RegistryValidationError {
    RegistryValidationError::new(message.clone())
        .with_stages(vec![definition.id.clone()])
        .with_error_info(
            ContractErrorInfo::suggested(code, message)
                .with_context_entry("stage", definition.id.clone())
                .with_context_entry("kind", definition.kind.to_string()),
        )
}

/// Checks the kind-specific fields of a single definition.
fn validate_definition(definition: &StageDefinition) -> Result<(), RegistryValidationError> {
    if definition.id.trim().is_empty() {
        return Err(invalid(
            definition,
            "REGISTRY-EMPTY_ID",
            "Stage id cannot be empty or whitespace-only".to_string(),
        ));
    }

    match definition.kind {
        StageKind::SingleSelect => {
            if definition.options.is_empty() {
                return Err(invalid(
                    definition,
                    "REGISTRY-MISSING_OPTIONS",
                    format!("Select stage '{}' has no options", definition.id),
                ));
            }
            if let Some(target) = definition.on_invalid.as_ref().and_then(|r| r.reset_to.as_deref()) {
                if !definition.offers(target) {
                    return Err(invalid(
                        definition,
                        "REGISTRY-RESET_NOT_AN_OPTION",
                        format!(
                            "Select stage '{}' resets to '{}', which it does not offer",
                            definition.id, target
                        ),
                    ));
                }
            }
        }
        _ if !definition.options.is_empty() => {
            return Err(invalid(
                definition,
                "REGISTRY-UNEXPECTED_OPTIONS",
                format!(
                    "Stage '{}' is a {} stage and cannot carry options",
                    definition.id, definition.kind
                ),
            ));
        }
        _ => {}
    }

    match (definition.kind, definition.terminal.is_some()) {
        (StageKind::ActionButton, false) => Err(invalid(
            definition,
            "REGISTRY-MISSING_TERMINAL",
            format!("Button stage '{}' has no terminal effect", definition.id),
        )),
        (kind, true) if kind != StageKind::ActionButton => Err(invalid(
            definition,
            "REGISTRY-UNEXPECTED_TERMINAL",
            format!(
                "Stage '{}' is a {} stage and cannot carry a terminal effect",
                definition.id, kind
            ),
        )),
        _ => Ok(()),
    }
}
