// 📚 Taxonomy Registry - the fixed catalog of groups and categories
//
// Built once from a TaxonomyDefinition, read-only afterwards. Because nothing
// mutates it after `load`, a registry can be shared across threads (Arc)
// without any locking.

use anyhow::{bail, Context as AnyhowContext};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::entities::{Category, Group};
use crate::error::{Result, TaxonomyError};
use crate::markdown::parse_taxonomy;
use crate::triggers::{extract_triggers, normalize_trigger};

// ============================================================================
// DEFINITION (input side)
// ============================================================================

/// One category as declared in a taxonomy source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub id: String,

    /// Id of the group this category belongs to
    pub group: String,

    pub label: String,

    #[serde(default)]
    pub description: String,

    /// Bullet-point topics listed under the category
    #[serde(default)]
    pub example_topics: Vec<String>,

    /// Curated triggers. When empty, triggers are extracted from the
    /// label, example topics and description.
    #[serde(default)]
    pub triggers: Vec<String>,
}

impl CategoryDefinition {
    pub fn new(id: impl Into<String>, group: impl Into<String>, label: impl Into<String>) -> Self {
        CategoryDefinition {
            id: id.into(),
            group: group.into(),
            label: label.into(),
            description: String::new(),
            example_topics: Vec::new(),
            triggers: Vec::new(),
        }
    }

    /// Builder: add description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: add example topic
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.example_topics.push(topic.into());
        self
    }

    /// Builder: add curated triggers
    pub fn with_triggers(mut self, triggers: &[&str]) -> Self {
        self.triggers.extend(triggers.iter().map(|t| t.to_string()));
        self
    }

    /// Normalized trigger set for this definition
    fn resolve_triggers(&self) -> BTreeSet<String> {
        if self.triggers.is_empty() {
            return extract_triggers(&self.label, &self.description, &self.example_topics);
        }

        self.triggers
            .iter()
            .map(|t| normalize_trigger(t))
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Flat tuple form of a taxonomy entry:
/// (group id, group name, category id, category label, description)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyRow {
    pub group_id: String,
    pub group_name: String,
    pub category_id: String,
    pub label: String,
    pub description: String,
}

impl TaxonomyRow {
    pub fn new(
        group_id: impl Into<String>,
        group_name: impl Into<String>,
        category_id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        TaxonomyRow {
            group_id: group_id.into(),
            group_name: group_name.into(),
            category_id: category_id.into(),
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Structured taxonomy source: groups plus categories in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyDefinition {
    pub groups: Vec<Group>,
    pub categories: Vec<CategoryDefinition>,
}

impl TaxonomyDefinition {
    /// Build a definition from flat rows.
    ///
    /// Groups are declared in first-seen order. A group id that shows up
    /// again under a different name is rejected.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = TaxonomyRow>,
    {
        let mut definition = TaxonomyDefinition::default();

        for row in rows {
            match definition.groups.iter().find(|g| g.id == row.group_id) {
                Some(existing) if existing.name != row.group_name => {
                    return Err(TaxonomyError::MalformedTaxonomy(format!(
                        "group {} declared as both '{}' and '{}'",
                        row.group_id, existing.name, row.group_name
                    )));
                }
                Some(_) => {}
                None => definition.groups.push(Group::new(row.group_id.clone(), row.group_name)),
            }

            definition.categories.push(
                CategoryDefinition::new(row.category_id, row.group_id, row.label)
                    .with_description(row.description),
            );
        }

        Ok(definition)
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Read-only catalog of groups and categories.
///
/// Invariants (checked by `load`):
/// - group ids and category ids are non-empty and unique
/// - every category references a declared group
/// - every category has at least one trigger
#[derive(Debug, Clone)]
pub struct TaxonomyRegistry {
    groups: Vec<Group>,
    categories: Vec<Category>,
    index: HashMap<String, usize>,
}

impl TaxonomyRegistry {
    /// Parse a definition into immutable Group/Category records.
    pub fn load(definition: &TaxonomyDefinition) -> Result<Self> {
        Self::build(definition).inspect_err(|e| warn!(error = %e, "Rejected taxonomy definition"))
    }

    fn build(definition: &TaxonomyDefinition) -> Result<Self> {
        let mut group_ids = HashSet::new();
        for group in &definition.groups {
            if group.id.trim().is_empty() {
                return Err(malformed(format!("group '{}' has an empty id", group.name)));
            }
            if !group_ids.insert(group.id.as_str()) {
                return Err(malformed(format!("duplicate group id {}", group.id)));
            }
        }

        let mut categories = Vec::with_capacity(definition.categories.len());
        let mut index = HashMap::with_capacity(definition.categories.len());

        for def in &definition.categories {
            if def.id.trim().is_empty() {
                return Err(malformed(format!("category '{}' has an empty id", def.label)));
            }
            if index.contains_key(&def.id) {
                return Err(malformed(format!("duplicate category id {}", def.id)));
            }
            if !group_ids.contains(def.group.as_str()) {
                return Err(malformed(format!(
                    "category {} references unknown group {}",
                    def.id, def.group
                )));
            }

            let triggers = def.resolve_triggers();
            if triggers.is_empty() {
                return Err(malformed(format!("category {} has no extractable triggers", def.id)));
            }

            index.insert(def.id.clone(), categories.len());
            categories.push(Category {
                id: def.id.clone(),
                group: def.group.clone(),
                label: def.label.clone(),
                description: def.description.clone(),
                triggers,
            });
        }

        debug!(
            groups = definition.groups.len(),
            categories = categories.len(),
            "Loaded taxonomy"
        );

        Ok(TaxonomyRegistry {
            groups: definition.groups.clone(),
            categories,
            index,
        })
    }

    /// Registry preloaded with the built-in AI product-management skills taxonomy
    pub fn with_defaults() -> Result<Self> {
        Self::load(&default_definition())
    }

    /// Load a taxonomy from a markdown outline (.md) or a JSON definition (.json)
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read taxonomy file: {:?}", path))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let definition = match extension.as_deref() {
            Some("md") | Some("markdown") => parse_taxonomy(&content),
            Some("json") => serde_json::from_str::<TaxonomyDefinition>(&content)
                .context("Failed to parse taxonomy JSON")?,
            _ => bail!("Unsupported taxonomy file type: {:?} (expected .md or .json)", path),
        };

        let registry = Self::load(&definition)
            .with_context(|| format!("Invalid taxonomy in {:?}", path))?;
        Ok(registry)
    }

    /// Get category by id
    pub fn get_category(&self, id: &str) -> Result<&Category> {
        self.find_category(id)
            .ok_or_else(|| TaxonomyError::NotFound(format!("category {}", id)))
    }

    /// Get category by id, None if absent
    pub fn find_category(&self, id: &str) -> Option<&Category> {
        self.index.get(id).map(|&i| &self.categories[i])
    }

    /// All categories in declaration order
    pub fn all_categories(&self) -> &[Category] {
        &self.categories
    }

    /// All groups in declaration order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Get group by id
    pub fn get_group(&self, id: &str) -> Result<&Group> {
        self.groups
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| TaxonomyError::NotFound(format!("group {}", id)))
    }

    /// Categories of one group, in declaration order
    pub fn categories_in_group(&self, group_id: &str) -> Vec<&Category> {
        self.categories.iter().filter(|c| c.group == group_id).collect()
    }

    /// Group a category belongs to
    pub fn group_of(&self, category: &Category) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == category.group)
    }

    /// Number of categories
    pub fn count(&self) -> usize {
        self.categories.len()
    }

    /// Deterministic SHA-256 digest of the catalog content.
    /// Independent of declaration order.
    pub fn fingerprint(&self) -> String {
        let mut sorted: Vec<&Category> = self.categories.iter().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));

        let mut hasher = Sha256::new();
        for category in sorted {
            hasher.update(category.id.as_bytes());
            hasher.update([0u8]);
            hasher.update(category.group.as_bytes());
            hasher.update([0u8]);
            hasher.update(category.label.as_bytes());
            for trigger in &category.triggers {
                hasher.update([0u8]);
                hasher.update(trigger.as_bytes());
            }
            hasher.update([0xffu8]);
        }
        format!("{:x}", hasher.finalize())
    }
}

fn malformed(message: String) -> TaxonomyError {
    TaxonomyError::MalformedTaxonomy(message)
}

// ============================================================================
// BUILT-IN TAXONOMY
// ============================================================================

/// The AI product-management skills taxonomy used for tagging course syllabi.
///
/// Structure:
/// - A. AI Product Development: A1-A5
/// - B. AI Technical Skills: B1-B3
/// - D. PM Leadership: D1-D2
/// - E. Design: E1
///
/// There is no group C. The course CSV export labels design skills E1, so the
/// letters here follow it, even though outlines headed `# A.` to `# D.` are
/// the usual shape. [`crate::markdown::parse_taxonomy`] accepts any capital
/// letter, so both layouts load.
///
/// Triggers are curated by hand rather than extracted.
pub fn default_definition() -> TaxonomyDefinition {
    TaxonomyDefinition {
        groups: vec![
            Group::new("A", "AI Product Development"),
            Group::new("B", "AI Technical Skills"),
            Group::new("D", "PM Leadership"),
            Group::new("E", "Design"),
        ],
        categories: vec![
            // ================================================================
            // A. AI PRODUCT DEVELOPMENT
            // ================================================================
            CategoryDefinition::new("A1", "A", "Strategy & Feasibility")
                .with_description(
                    "Identifying where AI creates user value, sizing opportunities and judging \
                     technical and business feasibility before committing to build.",
                )
                .with_triggers(&[
                    "product strategy",
                    "ai strategy",
                    "feasibility",
                    "opportunity",
                    "use case",
                    "business case",
                    "build vs buy",
                    "roadmap",
                    "market",
                ]),
            CategoryDefinition::new("A2", "A", "PRD & Specs")
                .with_description(
                    "Writing product requirements and specifications for AI features, including \
                     model behavior, guardrails and acceptance criteria.",
                )
                .with_triggers(&[
                    "prd",
                    "product requirement",
                    "spec",
                    "user stor",
                    "acceptance criteria",
                    "guardrail",
                    "requirements doc",
                ]),
            CategoryDefinition::new("A3", "A", "Eval & Iteration")
                .with_description(
                    "Measuring AI quality with evals, experiments and metrics, then iterating on \
                     prompts, data and models.",
                )
                .with_triggers(&[
                    "eval",
                    "a b test",
                    "experiment",
                    "metric",
                    "benchmark",
                    "error analysis",
                    "iterat",
                    "llm as*judge",
                ]),
            CategoryDefinition::new("A4", "A", "Shipping & Lifecycle")
                .with_description(
                    "Launching AI features and running them in production: rollout, monitoring, \
                     feedback loops and cost control.",
                )
                .with_triggers(&[
                    "launch",
                    "rollout",
                    "go to market",
                    "monitoring",
                    "production",
                    "feedback loop",
                    "lifecycle",
                    "deploy",
                ]),
            CategoryDefinition::new("A5", "A", "Prototyping & Vibe Coding")
                .with_description(
                    "Building working prototypes quickly with AI coding tools such as Cursor, \
                     Lovable, Bolt, v0 or Replit.",
                )
                .with_triggers(&[
                    "prototyp",
                    "vibe*cod",
                    "build*ship",
                    "coding with ai",
                    "ai coding",
                    "cursor",
                    "lovable",
                    "replit",
                    "no code",
                ]),
            // ================================================================
            // B. AI TECHNICAL SKILLS
            // ================================================================
            CategoryDefinition::new("B1", "B", "Models & Selection")
                .with_description(
                    "Understanding how LLMs and ML models work and choosing between them on \
                     capability, latency and cost.",
                )
                .with_triggers(&[
                    "llm",
                    "large language model",
                    "machine learning",
                    "model selection",
                    "fine tun",
                    "token",
                    "foundation model",
                    "prompt engineering",
                ]),
            CategoryDefinition::new("B2", "B", "System Architecture")
                .with_description(
                    "Designing the systems around models: APIs, data pipelines, integrations and \
                     infrastructure trade-offs.",
                )
                .with_triggers(&[
                    "system design",
                    "architecture",
                    "api",
                    "data pipeline",
                    "infrastructure",
                    "integration",
                    "latency",
                    "scalab",
                ]),
            CategoryDefinition::new("B3", "B", "Agents & RAG")
                .with_description(
                    "Retrieval-augmented generation, vector search and agentic workflows with \
                     tools and orchestration.",
                )
                .with_triggers(&[
                    "agent",
                    "rag",
                    "retrieval",
                    "vector",
                    "embedding",
                    "langchain",
                    "langgraph",
                    "tool use",
                    "orchestrat",
                ]),
            // ================================================================
            // D. PM LEADERSHIP
            // ================================================================
            CategoryDefinition::new("D1", "D", "Communication & Influence")
                .with_description(
                    "Aligning stakeholders and executives, storytelling and leading without \
                     authority.",
                )
                .with_triggers(&[
                    "stakeholder",
                    "communicat",
                    "storytelling",
                    "influence",
                    "presentation",
                    "executive",
                    "alignment",
                ]),
            CategoryDefinition::new("D2", "D", "Management & Team Dev")
                .with_description(
                    "Hiring, coaching and growing product teams and the managers who lead them.",
                )
                .with_triggers(&[
                    "hiring",
                    "coaching",
                    "mentor",
                    "team building",
                    "people management",
                    "career",
                    "leadership",
                    "one on one",
                ]),
            // ================================================================
            // E. DESIGN
            // ================================================================
            CategoryDefinition::new("E1", "E", "Design")
                .with_description(
                    "UX and visual design for AI products, design systems and conversational \
                     interfaces.",
                )
                .with_triggers(&[
                    "ux",
                    "user experience",
                    "figma",
                    "design system",
                    "wirefram",
                    "user research",
                    "usability",
                    "interface design",
                ]),
        ],
    }
}

// ============================================================================
// TESTS
// ============================================================================
