// 🧭 Course signals - evidence outside the syllabus body
//
// A course can be about prototyping even when its syllabus barely says so:
// the course name, its topic tags and the coding tools it names all count.

use regex::Regex;
use std::sync::LazyLock;

use crate::classifier::{compare_matches, Match, Tier};
use crate::registry::TaxonomyRegistry;
use crate::syllabus::CourseProfile;

/// Category the course signals feed
pub const PROTOTYPING_CATEGORY: &str = "A5";

/// AI coding tools that mark a prototyping course
pub const VIBE_TOOLS: &[&str] = &["Bolt", "Cursor", "Devin", "Lovable", "Replit", "v0", "Windsurf"];

/// Topic tags that make prototyping a primary skill
pub const PRIMARY_TOPICS: &[&str] = &["Prototyping", "Coding with AI"];

/// Vibe tools needed for a primary tag on tools alone
pub const PRIMARY_VIBE_TOOL_COUNT: usize = 3;

static PROTOTYPING_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)prototyp|vibe\s*cod|builder\s+bootcamp|build\s+and\s+ship|build\s*&\s*ship")
        .expect("course name pattern")
});

/// Prototyping tier implied by course name, topics and detected tools.
///
/// - Primary: a primary topic tag, a prototyping course name, or at least
///   `PRIMARY_VIBE_TOOL_COUNT` vibe tools
/// - Secondary: any vibe tool
pub fn prototyping_tier(profile: &CourseProfile, tools: &[String]) -> Option<Tier> {
    let has_primary_topic = profile
        .topic_list()
        .into_iter()
        .any(|topic| PRIMARY_TOPICS.contains(&topic));
    let vibe_count = tools.iter().filter(|t| VIBE_TOOLS.contains(&t.as_str())).count();

    if has_primary_topic || PROTOTYPING_NAME_RE.is_match(&profile.course_name) || vibe_count >= PRIMARY_VIBE_TOOL_COUNT {
        Some(Tier::Primary)
    } else if vibe_count > 0 {
        Some(Tier::Secondary)
    } else {
        None
    }
}

/// Fold a signal tier into classifier output.
///
/// An existing match is only ever raised to Primary, never lowered. A missing
/// match is added with score 0.0 and no matched triggers. Nothing happens when
/// the registry has no prototyping category.
pub fn apply_prototyping_signal(matches: &mut Vec<Match>, registry: &TaxonomyRegistry, tier: Tier) {
    if registry.find_category(PROTOTYPING_CATEGORY).is_none() {
        return;
    }

    match matches.iter_mut().find(|m| m.category_id == PROTOTYPING_CATEGORY) {
        Some(existing) => {
            if tier == Tier::Primary {
                existing.tier = Tier::Primary;
            }
        }
        None => {
            matches.push(Match {
                category_id: PROTOTYPING_CATEGORY.to_string(),
                score: 0.0,
                tier,
                matched_triggers: Vec::new(),
            });
            matches.sort_by(compare_matches);
        }
    }
}
