// 🏷️ Classifier - score a document against every category's triggers
//
// Pure function of (text, registry, threshold): no hidden state, no I/O, so
// the same inputs always give the same ordered matches and any number of
// callers can share one registry.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::entities::Category;
use crate::error::{ensure_unit_interval, Result};
use crate::registry::TaxonomyRegistry;
use crate::triggers::normalize_text;

/// Score at or above which a match counts as a primary skill
pub const DEFAULT_PRIMARY_CUTOFF: f64 = 0.5;

// ============================================================================
// MATCH
// ============================================================================

/// How strongly a document covers a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Clearly and substantially covered
    Primary,

    /// Touched on, not a focus
    Secondary,
}

impl Tier {
    /// Tag weight used when reporting a skill
    pub fn weight(&self) -> f64 {
        match self {
            Tier::Primary => 0.8,
            Tier::Secondary => 0.3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Primary => "primary",
            Tier::Secondary => "secondary",
        }
    }
}

/// One category a document was matched to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub category_id: String,

    /// Fraction of the category's triggers found in the document, in [0, 1]
    pub score: f64,

    pub tier: Tier,

    /// Triggers that were found, in trigger order
    pub matched_triggers: Vec<String>,
}

// ============================================================================
// CLASSIFIER
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    primary_cutoff: f64,
}

impl Classifier {
    /// Create a classifier; `primary_cutoff` must lie in [0, 1]
    pub fn new(primary_cutoff: f64) -> Result<Self> {
        ensure_unit_interval("primary cutoff", primary_cutoff)?;
        Ok(Classifier { primary_cutoff })
    }

    pub fn primary_cutoff(&self) -> f64 {
        self.primary_cutoff
    }

    /// Classify a document against every category of the registry.
    ///
    /// Categories with no matched trigger, or scoring below `threshold`, are
    /// dropped. The rest come back by descending score, ties broken by
    /// ascending category id.
    pub fn classify(&self, text: &str, registry: &TaxonomyRegistry, threshold: f64) -> Result<Vec<Match>> {
        ensure_unit_interval("threshold", threshold)?;

        let normalized = normalize_text(text);
        if normalized.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches: Vec<Match> = registry
            .all_categories()
            .iter()
            .filter_map(|category| self.score_category(category, &normalized))
            .filter(|m| m.score >= threshold)
            .collect();

        matches.sort_by(compare_matches);

        debug!(
            categories = registry.count(),
            matches = matches.len(),
            threshold,
            "Classified document"
        );

        Ok(matches)
    }

    /// Score one category against normalized text; None when nothing matched
    pub fn score_category(&self, category: &Category, normalized_text: &str) -> Option<Match> {
        if category.triggers.is_empty() {
            return None;
        }

        let matched_triggers = category.matched_triggers(normalized_text);
        if matched_triggers.is_empty() {
            return None;
        }

        let score = matched_triggers.len() as f64 / category.trigger_count() as f64;
        let tier = if score >= self.primary_cutoff {
            Tier::Primary
        } else {
            Tier::Secondary
        };

        Some(Match {
            category_id: category.id.clone(),
            score,
            tier,
            matched_triggers,
        })
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier {
            primary_cutoff: DEFAULT_PRIMARY_CUTOFF,
        }
    }
}

/// Classify with the default primary cutoff
pub fn classify(text: &str, registry: &TaxonomyRegistry, threshold: f64) -> Result<Vec<Match>> {
    Classifier::default().classify(text, registry, threshold)
}

/// Descending score, then ascending category id
pub(crate) fn compare_matches(a: &Match, b: &Match) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.category_id.cmp(&b.category_id))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Group;
    use crate::error::TaxonomyError;
    use crate::registry::{CategoryDefinition, TaxonomyDefinition};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn test_registry() -> TaxonomyRegistry {
        let definition = TaxonomyDefinition {
            groups: vec![
                Group::new("A", "AI Product Development"),
                Group::new("B", "AI Technical Skills"),
            ],
            categories: vec![
                CategoryDefinition::new("A5", "A", "Prototyping & Vibe Coding")
                    .with_triggers(&["vibe coding", "prototype", "rapid"]),
                CategoryDefinition::new("A3", "A", "Eval & Iteration")
                    .with_triggers(&["eval", "experiment", "metric"]),
                CategoryDefinition::new("B1", "B", "Models & Selection")
                    .with_triggers(&["model selection", "fine tuning"]),
                CategoryDefinition::new("B3", "B", "Agents & RAG").with_triggers(&["agent", "rag", "retrieval"]),
            ],
        };
        TaxonomyRegistry::load(&definition).unwrap()
    }

    const DOCUMENTS: &[&str] = &[
        "We used AI coding tools to rapidly build a prototype",
        "Run evals and experiments, track metrics, then build an agent with retrieval",
        "Fine tuning versus model selection for RAG agents",
        "Quarterly budget planning",
        "",
    ];

    #[test]
    fn test_prototype_document_scores_two_thirds() {
        let registry = test_registry();
        let matches = classify("We used AI coding tools to rapidly build a prototype", &registry, 0.0).unwrap();

        assert_eq!(matches.len(), 1);
        let top = &matches[0];
        assert_eq!(top.category_id, "A5");
        assert!((top.score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(top.matched_triggers, vec!["prototype".to_string(), "rapid".to_string()]);
        assert_eq!(top.tier, Tier::Primary);
    }

    #[test]
    fn test_empty_document_yields_no_matches() {
        let registry = test_registry();

        assert!(classify("", &registry, 0.0).unwrap().is_empty());
        assert!(classify("  ...  ", &registry, 0.0).unwrap().is_empty());
    }

    #[test]
    fn test_unrelated_document_yields_no_matches() {
        let registry = test_registry();
        assert!(classify("Quarterly budget planning", &registry, 0.0).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_threshold() {
        let registry = test_registry();

        for threshold in [1.5, -0.1, f64::NAN] {
            let result = classify("rapid prototype", &registry, threshold);
            assert!(matches!(result, Err(TaxonomyError::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_invalid_threshold_checked_before_empty_text() {
        let registry = test_registry();
        assert!(classify("", &registry, 2.0).is_err());
    }

    #[test]
    fn test_sorted_by_score_then_id() {
        let registry = test_registry();
        let text = "Run evals and experiments, track metrics, then build an agent with retrieval";
        let matches = classify(text, &registry, 0.0).unwrap();

        let ids: Vec<&str> = matches.iter().map(|m| m.category_id.as_str()).collect();
        assert_eq!(ids, vec!["A3", "B3"]);
        assert_eq!(matches[0].score, 1.0);
        assert!((matches[1].score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_broken_by_category_id() {
        let registry = test_registry();
        // B1 (2/2) and B3 (2/3) vs A5 (1/3): full score first, then ids ascending on ties
        let matches = classify("fine tuning and model selection for rag agents, rapid", &registry, 0.0).unwrap();
        let ids: Vec<&str> = matches.iter().map(|m| m.category_id.as_str()).collect();
        assert_eq!(ids, vec!["B1", "B3", "A5"]);

        let tied = classify("prototype agent", &registry, 0.0).unwrap();
        let ids: Vec<&str> = tied.iter().map(|m| m.category_id.as_str()).collect();
        assert_eq!(ids, vec!["A5", "B3"]);
        assert_eq!(tied[0].score, tied[1].score);
    }

    #[test]
    fn test_threshold_monotonicity() {
        let registry = test_registry();
        let thresholds = [0.0, 0.2, 1.0 / 3.0, 0.5, 2.0 / 3.0, 0.9, 1.0];

        for doc in DOCUMENTS {
            for pair in thresholds.windows(2) {
                let low: HashSet<String> = classify(doc, &registry, pair[0])
                    .unwrap()
                    .into_iter()
                    .map(|m| m.category_id)
                    .collect();
                let high: HashSet<String> = classify(doc, &registry, pair[1])
                    .unwrap()
                    .into_iter()
                    .map(|m| m.category_id)
                    .collect();
                assert!(high.is_subset(&low), "{:?} at {:?}", doc, pair);
            }
        }
    }

    #[test]
    fn test_threshold_filters_low_scores() {
        let registry = test_registry();
        let text = "Run evals and experiments, track metrics, then build an agent with retrieval";

        let matches = classify(text, &registry, 0.9).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].category_id, "A3");
    }

    #[test]
    fn test_classify_is_idempotent() {
        let registry = test_registry();

        for doc in DOCUMENTS {
            let first = classify(doc, &registry, 0.0).unwrap();
            let second = classify(doc, &registry, 0.0).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let registry = test_registry();

        for doc in DOCUMENTS {
            for m in classify(doc, &registry, 0.0).unwrap() {
                assert!(m.score > 0.0 && m.score <= 1.0);
            }
        }
    }

    #[test]
    fn test_score_category_bounds() {
        let registry = test_registry();
        let classifier = Classifier::default();
        let a5 = registry.get_category("A5").unwrap();

        assert!(classifier.score_category(a5, "budget review").is_none());

        let full = classifier
            .score_category(a5, &normalize_text("Vibe coding a rapid prototype"))
            .unwrap();
        assert_eq!(full.score, 1.0);
    }

    #[test]
    fn test_primary_cutoff_sets_tier() {
        let registry = test_registry();
        let strict = Classifier::new(0.9).unwrap();

        let matches = strict
            .classify("We used AI coding tools to rapidly build a prototype", &registry, 0.0)
            .unwrap();
        assert_eq!(matches[0].tier, Tier::Secondary);
        assert_eq!(matches[0].tier.weight(), 0.3);
    }

    #[test]
    fn test_invalid_primary_cutoff() {
        assert!(matches!(Classifier::new(1.2), Err(TaxonomyError::InvalidArgument(_))));
        assert_eq!(Classifier::default().primary_cutoff(), DEFAULT_PRIMARY_CUTOFF);
    }

    #[test]
    fn test_concurrent_callers_share_registry() {
        let registry = Arc::new(test_registry());
        let expected = classify(DOCUMENTS[1], &registry, 0.0).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || classify(DOCUMENTS[1], &registry, 0.0).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_default_taxonomy_classifies_syllabus() {
        let registry = TaxonomyRegistry::with_defaults().unwrap();
        let syllabus = "Week 1: Retrieval-augmented generation (RAG) with vector search and embeddings. \
                        Week 2: Building agents with LangChain and LangGraph, tool use and orchestration.";

        let matches = classify(syllabus, &registry, 0.0).unwrap();
        assert_eq!(matches[0].category_id, "B3");
        assert_eq!(matches[0].tier, Tier::Primary);
    }

    #[test]
    fn test_default_taxonomy_overlapping_trigger() {
        let registry = TaxonomyRegistry::with_defaults().unwrap();
        let matches = classify("Practice with someone on one-on-one coaching", &registry, 0.0).unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].category_id, "D2");
        assert_eq!(matches[0].matched_triggers, vec!["coaching", "one on one"]);
        assert_eq!(matches[0].score, 0.25);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Primary).unwrap(), "\"primary\"");
        assert_eq!(Tier::Secondary.as_str(), "secondary");
    }
}
