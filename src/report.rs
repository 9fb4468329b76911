// 📊 Reports - course tagging, CSV export and JSON classification reports
//
// Everything here consumes `classify` output; nothing feeds back into scoring.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;

use crate::classifier::{Classifier, Match, Tier};
use crate::entities::Category;
use crate::registry::TaxonomyRegistry;
use crate::signals::{apply_prototyping_signal, prototyping_tier};
use crate::syllabus::{summarize_sections, CourseProfile};
use crate::tools::detect_tools;

// ============================================================================
// CLASSIFICATION REPORT
// ============================================================================

/// Serializable result of one classification call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub generated_at: DateTime<Utc>,

    /// Digest of the taxonomy the matches were computed against
    pub taxonomy_fingerprint: String,

    pub threshold: f64,

    pub matches: Vec<Match>,
}

impl ClassificationReport {
    pub fn new(registry: &TaxonomyRegistry, threshold: f64, matches: Vec<Match>) -> Self {
        ClassificationReport {
            generated_at: Utc::now(),
            taxonomy_fingerprint: registry.fingerprint(),
            threshold,
            matches,
        }
    }

    pub fn primary_count(&self) -> usize {
        self.matches.iter().filter(|m| m.tier == Tier::Primary).count()
    }
}

// ============================================================================
// COURSE TAGGING
// ============================================================================

/// Matches for one course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseTagging {
    pub course_id: i64,
    pub course_name: String,
    pub matches: Vec<Match>,

    /// Tools named in the syllabus
    #[serde(default)]
    pub tools: Vec<String>,
}

/// Tag every profile, keeping profile order.
///
/// Name, topics and syllabus are classified together; course signals then
/// adjust the prototyping match. Signal-added matches skip the threshold.
pub fn tag_courses(
    profiles: &[CourseProfile],
    registry: &TaxonomyRegistry,
    classifier: &Classifier,
    threshold: f64,
) -> crate::error::Result<Vec<CourseTagging>> {
    profiles
        .iter()
        .map(|profile| {
            let mut matches = classifier.classify(&profile.classification_text(), registry, threshold)?;
            let tools = detect_tools(&profile.syllabus_text);

            if let Some(tier) = prototyping_tier(profile, &tools) {
                apply_prototyping_signal(&mut matches, registry, tier);
            }

            Ok(CourseTagging {
                course_id: profile.course_id,
                course_name: profile.course_name.clone(),
                matches,
                tools,
            })
        })
        .collect()
}

/// "A1: Strategy & Feasibility (80%)"
pub fn skill_label(category: &Category, tier: Tier) -> String {
    format!("{} ({}%)", category.display_name(), (tier.weight() * 100.0).round() as u32)
}

// ============================================================================
// CSV EXPORT
// ============================================================================

/// One row of the course/skill CSV
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvRow {
    pub course_name: String,
    pub course_url: String,
    pub topics: String,
    pub skills: String,
    pub tools: String,
    pub syllabus_summary: String,
}

/// Build CSV rows sorted by course name
pub fn csv_rows(
    taggings: &[CourseTagging],
    profiles: &[CourseProfile],
    registry: &TaxonomyRegistry,
) -> Vec<CsvRow> {
    let profile_by_id: HashMap<i64, &CourseProfile> = profiles.iter().map(|p| (p.course_id, p)).collect();

    let mut sorted: Vec<&CourseTagging> = taggings.iter().collect();
    sorted.sort_by(|a, b| a.course_name.cmp(&b.course_name));

    sorted
        .into_iter()
        .map(|tagging| {
            let profile = profile_by_id.get(&tagging.course_id);

            let skills = tagging
                .matches
                .iter()
                .map(|m| match registry.find_category(&m.category_id) {
                    Some(category) => skill_label(category, m.tier),
                    None => m.category_id.clone(),
                })
                .collect::<Vec<_>>()
                .join(", ");

            CsvRow {
                course_name: tagging.course_name.clone(),
                course_url: profile.map(|p| p.course_url.clone()).unwrap_or_default(),
                topics: profile.map(|p| p.topics.clone()).unwrap_or_default(),
                skills,
                tools: tagging.tools.join(", "),
                syllabus_summary: profile
                    .map(|p| summarize_sections(&p.syllabus_text))
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Write the course/skill CSV (header + one row per course)
pub fn write_csv<W: Write>(
    writer: W,
    taggings: &[CourseTagging],
    profiles: &[CourseProfile],
    registry: &TaxonomyRegistry,
) -> Result<usize> {
    let rows = csv_rows(taggings, profiles, registry);
    let mut csv_writer = csv::Writer::from_writer(writer);

    for row in &rows {
        csv_writer.serialize(row).context("Failed to write CSV row")?;
    }
    csv_writer.flush().context("Failed to flush CSV output")?;

    Ok(rows.len())
}

// ============================================================================
// TESTS
// ============================================================================
