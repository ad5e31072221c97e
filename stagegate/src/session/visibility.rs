//! Derives which stages are shown from the registry and the completion set.

use super::CompletionSet;
use crate::core::StageStatus;
use crate::registry::StageRegistry;

/// Read-only view answering visibility questions.
///
/// Stage `i` is visible iff every gating (non-header) stage before it is
/// complete. Nothing is cached; every query walks the registry.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityResolver<'a> {
    registry: &'a StageRegistry,
    completion: &'a CompletionSet,
}

impl<'a> VisibilityResolver<'a> {
    /// Creates a resolver over a registry and a completion set.
    #[must_use]
    pub fn new(registry: &'a StageRegistry, completion: &'a CompletionSet) -> Self {
        Self {
            registry,
            completion,
        }
    }

    /// Returns true if the stage at `index` should be shown.
    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        if index >= self.registry.len() {
            return false;
        }
        self.registry
            .iter()
            .take(index)
            .filter(|def| def.kind.is_gating())
            .all(|def| self.completion.contains(&def.id))
    }

    /// Returns true if the stage with this id should be shown.
    #[must_use]
    pub fn is_visible_id(&self, id: &str) -> bool {
        self.registry
            .position(id)
            .is_some_and(|index| self.is_visible(index))
    }

    /// Returns the index of the first gating stage that is not complete.
    #[must_use]
    pub fn frontier(&self) -> Option<usize> {
        self.registry
            .iter()
            .position(|def| def.kind.is_gating() && !self.completion.contains(&def.id))
    }

    /// Returns the indices of every visible stage, in order.
    #[must_use]
    pub fn visible_indices(&self) -> Vec<usize> {
        let end = self.frontier().map_or(self.registry.len(), |f| f + 1);
        (0..end).collect()
    }

    /// Returns the ids of every visible stage, in order.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<String> {
        self.visible_indices()
            .into_iter()
            .filter_map(|i| self.registry.get(i).map(|def| def.id.clone()))
            .collect()
    }

    /// Returns the rendered status of the stage at `index`.
    ///
    /// Visible headers count as complete.
    #[must_use]
    pub fn status(&self, index: usize) -> StageStatus {
        match self.registry.get(index) {
            Some(def) if self.is_visible(index) => {
                if !def.kind.is_gating() || self.completion.contains(&def.id) {
                    StageStatus::Complete
                } else {
                    StageStatus::Pending
                }
            }
            _ => StageStatus::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryBuilder;
    use crate::stages::{StageDefinition, TerminalEffect};
    use pretty_assertions::assert_eq;

    fn registry() -> StageRegistry {
        RegistryBuilder::new("visibility")
            .stage(StageDefinition::text("username", "Username"))
            .stage(StageDefinition::password("password", "Password"))
            .stage(StageDefinition::header("questions", "Security questions"))
            .stage(StageDefinition::select("color", "Color", ["#000000"]))
            .stage(StageDefinition::button("submit", "Submit", TerminalEffect::immediate("bsod.png")))
            .build()
            .unwrap()
    }

    #[test]
    fn test_first_stage_always_visible() {
        let registry = registry();
        let completion = CompletionSet::new();
        let resolver = VisibilityResolver::new(&registry, &completion);

        assert!(resolver.is_visible(0));
        assert!(!resolver.is_visible(1));
        assert_eq!(resolver.visible_ids(), vec!["username"]);
    }

    #[test]
    fn test_header_revealed_with_next_stage() {
        let registry = registry();
        let completion: CompletionSet = ["username", "password"].into_iter().collect();
        let resolver = VisibilityResolver::new(&registry, &completion);

        assert_eq!(resolver.visible_ids(), vec!["username", "password", "questions", "color"]);
        assert_eq!(resolver.status(2), StageStatus::Complete);
        assert_eq!(resolver.status(3), StageStatus::Pending);
        assert_eq!(resolver.status(4), StageStatus::Hidden);
    }

    #[test]
    fn test_gap_hides_everything_after_it() {
        let registry = registry();
        let completion: CompletionSet = ["username", "color"].into_iter().collect();
        let resolver = VisibilityResolver::new(&registry, &completion);

        assert!(resolver.is_visible(1));
        assert!(!resolver.is_visible(3));
        assert_eq!(resolver.status(3), StageStatus::Hidden);
        assert_eq!(resolver.frontier(), Some(1));
    }

    #[test]
    fn test_out_of_range_is_hidden() {
        let registry = registry();
        let completion: CompletionSet = ["username", "password", "color", "submit"].into_iter().collect();
        let resolver = VisibilityResolver::new(&registry, &completion);

        assert!(resolver.is_visible(4));
        assert!(!resolver.is_visible(5));
        assert_eq!(resolver.frontier(), None);
        assert_eq!(resolver.visible_indices(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_visible_by_id() {
        let registry = registry();
        let completion: CompletionSet = ["username"].into_iter().collect();
        let resolver = VisibilityResolver::new(&registry, &completion);

        assert!(resolver.is_visible_id("password"));
        assert!(!resolver.is_visible_id("questions"));
        assert!(!resolver.is_visible_id("nope"));
    }
}
