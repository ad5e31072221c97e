//! The ordered stage table.
//!
//! [`StageRegistry`] is the single source of truth for rendering order and
//! gating order. It is immutable once built; reordering means building a new
//! registry with [`RegistryBuilder`].

mod builder;

pub use builder::RegistryBuilder;

use crate::stages::StageDefinition;
use std::collections::HashMap;

/// An immutable, validated, ordered list of stage definitions.
#[derive(Debug, Clone)]
pub struct StageRegistry {
    name: String,
    stages: Vec<StageDefinition>,
    index: HashMap<String, usize>,
}

impl StageRegistry {
    pub(crate) fn from_validated(name: String, stages: Vec<StageDefinition>) -> Self {
        let index = stages
            .iter()
            .enumerate()
            .map(|(i, def)| (def.id.clone(), i))
            .collect();
        Self { name, stages, index }
    }

    /// Returns the registry name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the registry has no stages. Built registries never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the stage at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StageDefinition> {
        self.stages.get(index)
    }

    /// Returns the position of the stage with this id.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Looks up a stage and its position by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<(usize, &StageDefinition)> {
        self.position(id).map(|i| (i, &self.stages[i]))
    }

    /// Iterates stages in order.
    pub fn iter(&self) -> std::slice::Iter<'_, StageDefinition> {
        self.stages.iter()
    }

    /// Returns the stage ids in order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.stages.iter().map(|d| d.id.as_str()).collect()
    }

    /// Returns the number of stages that take part in gating.
    #[must_use]
    pub fn gating_count(&self) -> usize {
        self.stages.iter().filter(|d| d.kind.is_gating()).count()
    }
}

impl<'a> IntoIterator for &'a StageRegistry {
    type Item = &'a StageDefinition;
    type IntoIter = std::slice::Iter<'a, StageDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
