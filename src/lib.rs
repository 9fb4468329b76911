// Skill Tagger - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod error;
pub mod entities;
pub mod triggers;       // Text normalization & keyword matching
pub mod registry;       // Taxonomy Registry - immutable catalog
pub mod markdown;       // Taxonomy outline parser
pub mod classifier;     // Scoring & ranking
pub mod syllabus;       // Course profiles & section summaries
pub mod tools;          // Tool mentions in syllabus text
pub mod signals;        // Course name / topic / tool evidence
pub mod report;         // CSV / JSON output
pub mod config;

// Re-export commonly used types
pub use error::{Result, TaxonomyError};
pub use entities::{Category, Group};
pub use triggers::{extract_triggers, normalize_text, normalize_trigger, trigger_matches};
pub use registry::{
    default_definition, CategoryDefinition, TaxonomyDefinition, TaxonomyRegistry, TaxonomyRow,
};
pub use markdown::parse_taxonomy;
pub use classifier::{classify, Classifier, Match, Tier, DEFAULT_PRIMARY_CUTOFF};
pub use syllabus::{aggregate_profiles, summarize_sections, CourseProfile, RawCourseRow};
pub use tools::{detect_tools, tool_found_in};
pub use signals::{apply_prototyping_signal, prototyping_tier};
pub use report::{
    skill_label, tag_courses, write_csv, ClassificationReport, CourseTagging, CsvRow,
};
pub use config::Settings;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
