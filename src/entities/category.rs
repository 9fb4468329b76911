// 🏷️ Category Entity - leaf skill of the taxonomy
//
// A category is created once while the registry is built and never mutated
// afterwards. Hierarchy is flat: `group` references a Group id, there is no
// parent chain to walk.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::triggers::trigger_matches;

/// Category Entity
///
/// Identity: `id` ("A1", "B3", ...), unique across the registry
/// Values: group reference, label, description, normalized triggers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Unique id (e.g. "A1")
    pub id: String,

    /// Id of the owning Group (e.g. "A")
    pub group: String,

    /// Short name (e.g. "Strategy & Feasibility")
    pub label: String,

    /// Free-text description from the taxonomy document
    pub description: String,

    /// Normalized keyword/phrase triggers, never empty.
    /// Ordered set so scoring and serialization are deterministic.
    pub triggers: BTreeSet<String>,
}

impl Category {
    /// "A1: Strategy & Feasibility"
    pub fn display_name(&self) -> String {
        format!("{}: {}", self.id, self.label)
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Triggers found in an already-normalized text, in trigger order
    pub fn matched_triggers(&self, normalized_text: &str) -> Vec<String> {
        self.triggers
            .iter()
            .filter(|trigger| trigger_matches(trigger, normalized_text))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Category {
        Category {
            id: "A5".to_string(),
            group: "A".to_string(),
            label: "Prototyping & Vibe Coding".to_string(),
            description: String::new(),
            triggers: ["vibe coding", "prototype", "rapid"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }

    #[test]
    fn test_category_display_name() {
        assert_eq!(sample().display_name(), "A5: Prototyping & Vibe Coding");
    }

    #[test]
    fn test_category_matched_triggers_are_ordered() {
        let category = sample();
        let matched = category.matched_triggers("rapidly build a prototype");

        assert_eq!(matched, vec!["prototype".to_string(), "rapid".to_string()]);
        assert_eq!(category.trigger_count(), 3);
    }

    #[test]
    fn test_category_no_matches() {
        assert!(sample().matched_triggers("quarterly budget review").is_empty());
    }
}
