// 📝 Taxonomy Markdown - outline document -> TaxonomyDefinition
//
// Expected shape:
//
//   # A. AI Product Development
//
//   ## A1. Strategy & Feasibility
//
//   First paragraph is the description.
//
//   - Example topic
//   - Another topic
//
// Structural checks (unknown groups, duplicates, empty triggers) are left to
// `TaxonomyRegistry::load`.

use regex::Regex;
use std::sync::LazyLock;

use crate::entities::Group;
use crate::registry::{CategoryDefinition, TaxonomyDefinition};

/// "# A. AI Product Development"
static GROUP_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+([A-Z])\.\s+(.+?)\s*$").expect("group header pattern"));

/// "## A1. Strategy & Feasibility"
static CATEGORY_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^##\s+(([A-Z])\d+)\.\s+(.+?)\s*$").expect("category header pattern")
});

/// Parse a taxonomy outline.
///
/// The group of a category is the letter prefix of its code ("B3" -> "B").
/// A category section runs until the next group or category header.
pub fn parse_taxonomy(text: &str) -> TaxonomyDefinition {
    let groups: Vec<Group> = GROUP_HEADER_RE
        .captures_iter(text)
        .map(|caps| Group::new(&caps[1], caps[2].trim()))
        .collect();

    let mut boundaries: Vec<usize> = GROUP_HEADER_RE
        .find_iter(text)
        .chain(CATEGORY_HEADER_RE.find_iter(text))
        .map(|m| m.start())
        .collect();
    boundaries.sort_unstable();

    let categories = CATEGORY_HEADER_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let header = caps.get(0)?;
            let start = header.end();
            let end = boundaries
                .iter()
                .copied()
                .find(|&b| b > header.start())
                .unwrap_or(text.len());
            let section = &text[start..end.max(start)];

            let mut definition = CategoryDefinition::new(&caps[1], &caps[2], caps[3].trim())
                .with_description(first_paragraph(section));
            definition.example_topics = bullet_items(section);
            Some(definition)
        })
        .collect();

    TaxonomyDefinition { groups, categories }
}

/// First non-empty paragraph that is not a bullet list, lines joined by spaces
fn first_paragraph(section: &str) -> String {
    section
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .take(1)
        .filter(|p| !p.lines().all(|line| bullet_text(line).is_some()))
        .map(|p| p.lines().map(str::trim).collect::<Vec<_>>().join(" "))
        .next()
        .unwrap_or_default()
}

fn bullet_items(section: &str) -> Vec<String> {
    section
        .lines()
        .filter_map(bullet_text)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn bullet_text(line: &str) -> Option<&str> {
    let line = line.trim();
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TaxonomyRegistry;

    const OUTLINE: &str = "\
# AI PM Skills Taxonomy

Intro text that is not part of any category.

# A. AI Product Development

## A1. Strategy & Feasibility

Identifying where AI creates value
and whether it can be built.

- Opportunity sizing
- Build vs buy

## A2. PRD & Specs

Writing specs for AI features.

# B. AI Technical Skills

## B3. Agents & RAG

- Retrieval pipelines
* Agent orchestration
";

    #[test]
    fn test_parse_groups() {
        let definition = parse_taxonomy(OUTLINE);

        assert_eq!(
            definition.groups,
            vec![Group::new("A", "AI Product Development"), Group::new("B", "AI Technical Skills")]
        );
    }

    #[test]
    fn test_parse_categories_in_order() {
        let definition = parse_taxonomy(OUTLINE);
        let ids: Vec<&str> = definition.categories.iter().map(|c| c.id.as_str()).collect();

        assert_eq!(ids, vec!["A1", "A2", "B3"]);
        assert_eq!(definition.categories[2].group, "B");
        assert_eq!(definition.categories[0].label, "Strategy & Feasibility");
    }

    #[test]
    fn test_parse_description_and_topics() {
        let definition = parse_taxonomy(OUTLINE);
        let a1 = &definition.categories[0];

        assert_eq!(
            a1.description,
            "Identifying where AI creates value and whether it can be built."
        );
        assert_eq!(a1.example_topics, vec!["Opportunity sizing", "Build vs buy"]);
    }

    #[test]
    fn test_section_stops_at_next_group_header() {
        let definition = parse_taxonomy(OUTLINE);
        let a2 = &definition.categories[1];

        assert_eq!(a2.description, "Writing specs for AI features.");
        assert!(a2.example_topics.is_empty());
    }

    #[test]
    fn test_bullet_only_section_has_no_description() {
        let definition = parse_taxonomy(OUTLINE);
        let b3 = &definition.categories[2];

        assert_eq!(b3.description, "");
        assert_eq!(b3.example_topics, vec!["Retrieval pipelines", "Agent orchestration"]);
    }

    #[test]
    fn test_parsed_outline_loads_into_registry() {
        let registry = TaxonomyRegistry::load(&parse_taxonomy(OUTLINE)).unwrap();

        assert_eq!(registry.count(), 3);
        let b3 = registry.get_category("B3").unwrap();
        assert!(b3.triggers.contains("agent orchestration"));
        assert!(b3.triggers.contains("rag"));
    }

    #[test]
    fn test_any_group_letter_loads() {
        let outline = "# C. Leadership\n\n## C1. Coaching\n\n- One on ones\n\n# E. Design\n\n## E1. Design\n\n- Figma\n";
        let registry = TaxonomyRegistry::load(&parse_taxonomy(outline)).unwrap();

        assert_eq!(registry.get_category("C1").unwrap().group, "C");
        assert_eq!(registry.get_category("E1").unwrap().group, "E");
    }

    #[test]
    fn test_empty_document() {
        let definition = parse_taxonomy("");
        assert!(definition.groups.is_empty());
        assert!(definition.categories.is_empty());
    }
}
