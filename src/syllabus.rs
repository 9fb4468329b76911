// 📖 Syllabus - course rows -> profiles, and section summaries
//
// Raw exports have one row per syllabus item; a profile gathers all items of
// one course into a single text the classifier can score.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

/// Maximum number of section titles kept in a summary
pub const MAX_SUMMARY_SECTIONS: usize = 15;

/// Share of numbered titles above which a summary is re-sorted by number
const NUMBERED_SHARE: f64 = 0.4;

/// Administrative section titles that say nothing about course content
const SKIP_PATTERNS: &[&str] = &[
    "where to get support",
    "homework",
    "video recording",
    "recording",
    "password",
    "zoom",
    "dropbox",
    "welcome",
    "onboarding",
    "how to",
    "click on",
    "enter the password",
    "support@maven",
    "platform",
    "instructions",
    "three things to do",
    "what makes cohort-based",
    "live discussion",
    "weekly recap",
    "template:",
    "setting up",
    "class resources",
];

/// "04 – FigJam", "3. Evals", "12: Wrap-up"
static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*[–\-:.\s]").expect("leading number pattern"));

/// "Module 3: ...", "Week 2 - ..."
static UNIT_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:module|week|lesson|session|class|part|chapter)\s+(\d+)")
        .expect("unit number pattern")
});

// ============================================================================
// COURSE ROWS & PROFILES
// ============================================================================

/// One row of a raw course export (one syllabus item)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCourseRow {
    #[serde(rename = "COURSE_ID")]
    pub course_id: i64,

    #[serde(rename = "COURSE_NAME")]
    pub course_name: String,

    #[serde(rename = "COURSE_URL", default)]
    pub course_url: String,

    #[serde(rename = "COURSE_SLUG", default)]
    pub course_slug: String,

    #[serde(rename = "TOPICS", default)]
    pub topics: Option<String>,

    #[serde(rename = "ITEM_TITLE", default)]
    pub item_title: Option<String>,

    #[serde(rename = "CONTENT_PLAINTEXT", default)]
    pub content: Option<String>,
}

/// All syllabus items of one course, flattened to text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseProfile {
    pub course_id: i64,
    pub course_name: String,
    #[serde(default)]
    pub course_url: String,
    #[serde(default)]
    pub course_slug: String,
    /// Comma-separated topic tags
    #[serde(default)]
    pub topics: String,
    #[serde(default)]
    pub syllabus_text: String,
}

impl CourseProfile {
    /// Topic tags as a list, blanks dropped
    pub fn topic_list(&self) -> Vec<&str> {
        self.topics
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Name, topic tags and syllabus as one document
    pub fn classification_text(&self) -> String {
        [self.course_name.as_str(), self.topics.as_str(), self.syllabus_text.as_str()]
            .iter()
            .filter(|part| !part.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Group raw rows by course id.
///
/// Course metadata comes from the first row of each course. Every row with a
/// title or content adds a "### {title}\n{content}" part; parts are joined by
/// blank lines. Output is sorted by course id.
pub fn aggregate_profiles<I>(rows: I) -> Vec<CourseProfile>
where
    I: IntoIterator<Item = RawCourseRow>,
{
    let mut courses: BTreeMap<i64, (CourseProfile, Vec<String>)> = BTreeMap::new();

    for row in rows {
        let (_, parts) = courses.entry(row.course_id).or_insert_with(|| {
            (
                CourseProfile {
                    course_id: row.course_id,
                    course_name: row.course_name.clone(),
                    course_url: row.course_url.clone(),
                    course_slug: row.course_slug.clone(),
                    topics: row.topics.clone().unwrap_or_default(),
                    syllabus_text: String::new(),
                },
                Vec::new(),
            )
        });

        let title = row.item_title.unwrap_or_default();
        let content = row.content.unwrap_or_default();
        if !title.is_empty() || !content.is_empty() {
            parts.push(format!("### {}\n{}", title, content));
        }
    }

    courses
        .into_values()
        .map(|(mut profile, parts)| {
            profile.syllabus_text = parts.join("\n\n");
            profile
        })
        .collect()
}

// ============================================================================
// SECTION SUMMARY
// ============================================================================

/// Summarize a syllabus by its "### " section titles.
///
/// Administrative titles and titles of 3 characters or fewer are skipped,
/// duplicates are dropped case-insensitively. When enough titles carry a
/// leading number they are put in numeric order (unnumbered ones last).
pub fn summarize_sections(syllabus_text: &str) -> String {
    let mut seen = HashSet::new();
    let titles: Vec<&str> = syllabus_text
        .lines()
        .filter_map(|line| line.trim().strip_prefix("### "))
        .map(str::trim)
        .filter(|title| !is_administrative(title))
        .filter(|title| title.chars().count() > 3)
        .filter(|title| seen.insert(title.to_lowercase()))
        .collect();

    let mut numbered: Vec<(Option<u32>, &str)> = titles.iter().map(|t| (leading_number(t), *t)).collect();
    let with_number = numbered.iter().filter(|(n, _)| n.is_some()).count();

    if with_number as f64 > titles.len() as f64 * NUMBERED_SHARE {
        // stable: equal keys keep their original order
        numbered.sort_by_key(|(n, _)| n.unwrap_or(u32::MAX));
    }

    numbered
        .into_iter()
        .take(MAX_SUMMARY_SECTIONS)
        .map(|(_, title)| title)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Leading ordinal of a section title ("04 – FigJam" -> 4, "Module 3: ..." -> 3)
pub fn leading_number(title: &str) -> Option<u32> {
    LEADING_NUMBER_RE
        .captures(title)
        .or_else(|| UNIT_NUMBER_RE.captures(title))
        .and_then(|caps| caps[1].parse().ok())
}

fn is_administrative(title: &str) -> bool {
    let lower = title.to_lowercase();
    SKIP_PATTERNS.iter().any(|p| lower.contains(p))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, name: &str, title: Option<&str>, content: Option<&str>) -> RawCourseRow {
        RawCourseRow {
            course_id: id,
            course_name: name.to_string(),
            course_url: format!("https://example.com/{}", id),
            course_slug: format!("course-{}", id),
            topics: Some("AI, Prototyping".to_string()),
            item_title: title.map(str::to_string),
            content: content.map(str::to_string),
        }
    }

    #[test]
    fn test_aggregate_profiles_groups_and_sorts() {
        let rows = vec![
            row(7, "Vibe Coding 101", Some("Intro"), Some("Set up Cursor")),
            row(3, "AI Evals", Some("Error analysis"), None),
            row(7, "Vibe Coding 101", Some("Ship it"), Some("Deploy to Replit")),
        ];

        let profiles = aggregate_profiles(rows);

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].course_id, 3);
        assert_eq!(profiles[0].syllabus_text, "### Error analysis\n");
        assert_eq!(
            profiles[1].syllabus_text,
            "### Intro\nSet up Cursor\n\n### Ship it\nDeploy to Replit"
        );
        assert_eq!(profiles[1].topic_list(), vec!["AI", "Prototyping"]);
    }

    #[test]
    fn test_classification_text_joins_non_empty_parts() {
        let mut profile = aggregate_profiles(vec![row(4, "Build & Ship", Some("Deploy"), None)]).remove(0);
        assert_eq!(profile.classification_text(), "Build & Ship\nAI, Prototyping\n### Deploy\n");

        profile.topics.clear();
        profile.syllabus_text.clear();
        assert_eq!(profile.classification_text(), "Build & Ship");
    }

    #[test]
    fn test_aggregate_profiles_skips_empty_items() {
        let rows = vec![row(1, "Empty", None, None), row(1, "Empty", Some(""), Some(""))];
        let profiles = aggregate_profiles(rows);

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].syllabus_text, "");
    }

    #[test]
    fn test_raw_row_deserializes_export_names() {
        let json = r#"{"COURSE_ID": 12, "COURSE_NAME": "RAG", "TOPICS": null, "ITEM_TITLE": "Vectors"}"#;
        let row: RawCourseRow = serde_json::from_str(json).unwrap();

        assert_eq!(row.course_id, 12);
        assert_eq!(row.topics, None);
        assert_eq!(row.item_title.as_deref(), Some("Vectors"));
        assert_eq!(row.course_url, "");
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("04 – FigJam"), Some(4));
        assert_eq!(leading_number("3. Evals"), Some(3));
        assert_eq!(leading_number("Module 12: Agents"), Some(12));
        assert_eq!(leading_number("week 2 - RAG"), Some(2));
        assert_eq!(leading_number("Agents 101"), None);
        assert_eq!(leading_number("2024"), None);
    }

    #[test]
    fn test_summary_skips_admin_and_duplicates() {
        let text = "### Welcome to the course\n### Prompting basics\n### Zoom link\n### PROMPTING BASICS\n### Q&A\n### Evals";

        assert_eq!(summarize_sections(text), "Prompting basics, Evals");
    }

    #[test]
    fn test_summary_sorts_numbered_titles() {
        let text = "### 03 - Agents\n### 01 - Foundations\n### Bonus: guest talk\n### 02 - Retrieval";

        assert_eq!(
            summarize_sections(text),
            "01 - Foundations, 02 - Retrieval, 03 - Agents, Bonus: guest talk"
        );
    }

    #[test]
    fn test_summary_keeps_order_when_few_numbered() {
        let text = "### Agents\n### Retrieval\n### 1. Setup notes\n### Evals\n### Shipping";

        assert_eq!(
            summarize_sections(text),
            "Agents, Retrieval, 1. Setup notes, Evals, Shipping"
        );
    }

    #[test]
    fn test_summary_caps_section_count() {
        let text: String = (0..20).map(|i| format!("### Topic number {}\n", i)).collect();
        let summary = summarize_sections(&text);

        assert_eq!(summary.split(", ").count(), MAX_SUMMARY_SECTIONS);
        assert!(summary.starts_with("Topic number 0, "));
    }

    #[test]
    fn test_summary_of_empty_text() {
        assert_eq!(summarize_sections(""), "");
    }
}
