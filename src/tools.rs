// 🧰 Tools - named AI tools mentioned in syllabus text
//
// Unambiguous names match case-insensitively. Names that double as ordinary
// words ("cursor", "bolt", "make") must be capitalized and clear of their
// everyday phrases.

use regex::Regex;
use std::sync::LazyLock;

/// Every tool `detect_tools` looks for, in output order
pub const KNOWN_TOOLS: &[&str] = &[
    "Bolt",
    "ChatGPT",
    "Claude",
    "Claude Code",
    "Copilot",
    "Cursor",
    "Custom GPTs",
    "DALL-E",
    "Devin",
    "Figma",
    "GPT-4",
    "Gemini",
    "Google Colab",
    "Hugging Face",
    "LangChain",
    "LangGraph",
    "Lovable",
    "Make",
    "Midjourney",
    "n8n",
    "NotebookLM",
    "Notion AI",
    "OpenAI API",
    "Perplexity",
    "Pinecone",
    "Relay",
    "Replit",
    "Stable Diffusion",
    "v0",
    "Windsurf",
    "Zapier",
];

/// Names that are safe as plain case-insensitive substrings
const TIER1_TOOLS: &[&str] = &[
    "ChatGPT",
    "OpenAI API",
    "Claude Code",
    "Lovable",
    "Figma",
    "LangChain",
    "LangGraph",
    "n8n",
    "Replit",
    "Zapier",
    "Custom GPTs",
    "NotebookLM",
    "DALL-E",
    "Hugging Face",
    "Pinecone",
    "Google Colab",
    "Notion AI",
    "Stable Diffusion",
    "Midjourney",
    "GPT-4",
];

/// Characters around an anchor searched for context words
const CONTEXT_WINDOW: usize = 150;

const CLAUDE_CONTEXT: &[&str] = &["Anthropic", "Sonnet", "Opus", "Haiku", "API", "model", "AI", "LLM", "chatbot"];
const DEVIN_CONTEXT: &[&str] = &["AI", "agent", "coding", "engineer", "tool", "software"];
const RELAY_CONTEXT: &[&str] = &["app", "automation", "workflow"];

static CURSOR_UI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)cursor\s+position|text\s+cursor|mouse\s+cursor").expect("cursor phrase pattern")
});

static BOLT_IDIOM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)bolt\s+on|nuts\s+and\s+bolts").expect("bolt phrase pattern"));

static WINDSURFING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bwindsurfing\b").expect("windsurfing pattern"));

/// "v0" on its own, not glued to other text
static V0_STANDALONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)v0(?:\s|[,;.!?)]|$)").expect("v0 pattern"));

static MAKE_NAMED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Make\.com|Make\s+(?:automation|scenario|integration)").expect("make pattern")
});

/// "Make" a few characters after a word like "tools" or "platform"
static MAKE_LISTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:tools?|platform|software|app)\b.{0,30}\bMake\b").expect("make list pattern")
});

/// Check if a tool is genuinely referenced in the text.
///
/// Unknown tool names fall back to a case-insensitive substring match.
pub fn tool_found_in(tool: &str, text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    if TIER1_TOOLS.contains(&tool) {
        return contains_ignore_case(text, tool);
    }

    match tool {
        "Claude" => {
            contains_ignore_case(text, "claude code")
                || (has_word(text, "Claude") && has_nearby(text, "Claude", CLAUDE_CONTEXT))
        }
        "Cursor" => word_outside(text, "Cursor", &CURSOR_UI_RE),
        "Bolt" => word_outside(text, "Bolt", &BOLT_IDIOM_RE),
        "Windsurf" => word_outside(text, "Windsurf", &WINDSURFING_RE),
        "v0" => V0_STANDALONE_RE.is_match(text) && has_unversioned_v0(text),
        "Make" => MAKE_NAMED_RE.is_match(text) || MAKE_LISTED_RE.is_match(text),
        "Gemini" | "Copilot" | "Perplexity" => has_word(text, tool),
        "Devin" => has_word(text, "Devin") && has_nearby(text, "Devin", DEVIN_CONTEXT),
        "Relay" => {
            text.contains("Relay.app") || (has_word(text, "Relay") && has_nearby(text, "Relay", RELAY_CONTEXT))
        }
        _ => contains_ignore_case(text, tool),
    }
}

/// All known tools mentioned in the text, in `KNOWN_TOOLS` order.
///
/// "Claude" is left out when "Claude Code" was found.
pub fn detect_tools(text: &str) -> Vec<String> {
    let found: Vec<&str> = KNOWN_TOOLS
        .iter()
        .copied()
        .filter(|tool| tool_found_in(tool, text))
        .collect();

    let has_claude_code = found.contains(&"Claude Code");
    found
        .into_iter()
        .filter(|tool| !(has_claude_code && *tool == "Claude"))
        .map(str::to_string)
        .collect()
}

fn contains_ignore_case(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(&needle.to_lowercase())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Case-sensitive whole-word occurrence
fn has_word(text: &str, word: &str) -> bool {
    text.match_indices(word).any(|(pos, _)| {
        let before = text[..pos].chars().next_back();
        let after = text[pos + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Whole word still present once the excluded phrases are cut out
fn word_outside(text: &str, word: &str, excluded: &Regex) -> bool {
    has_word(text, word) && has_word(&excluded.replace_all(text, ""), word)
}

/// Any context word within `CONTEXT_WINDOW` bytes of an anchor occurrence
fn has_nearby(text: &str, anchor: &str, context: &[&str]) -> bool {
    text.match_indices(anchor).any(|(pos, _)| {
        let mut start = pos.saturating_sub(CONTEXT_WINDOW);
        while !text.is_char_boundary(start) {
            start -= 1;
        }
        let mut end = (pos + anchor.len() + CONTEXT_WINDOW).min(text.len());
        while !text.is_char_boundary(end) {
            end += 1;
        }

        let snippet = text[start..end].to_lowercase();
        context.iter().any(|word| snippet.contains(&word.to_lowercase()))
    })
}

/// Some "v0" that is not the start of a version string like "v0.2"
fn has_unversioned_v0(text: &str) -> bool {
    text.match_indices("v0").any(|(pos, _)| {
        let mut after = text[pos + 2..].chars();
        !(after.next() == Some('.') && after.next().is_some_and(|c| c.is_ascii_digit()))
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier1_case_insensitive() {
        assert!(tool_found_in("Replit", "deploy on replit"));
        assert!(tool_found_in("n8n", "Automations in N8N"));
        assert!(!tool_found_in("Figma", "Sketch only"));
        assert!(!tool_found_in("Figma", ""));
    }

    #[test]
    fn test_cursor_needs_capital_and_no_ui_phrase() {
        assert!(tool_found_in("Cursor", "Build the app in Cursor."));
        assert!(!tool_found_in("Cursor", "build the app in cursor"));
        assert!(!tool_found_in("Cursor", "Move the mouse Cursor to the button"));
        assert!(!tool_found_in("Cursor", "Check the Cursor position"));
        assert!(tool_found_in("Cursor", "Move the mouse cursor, then open Cursor"));
    }

    #[test]
    fn test_bolt_excludes_idioms() {
        assert!(!tool_found_in("Bolt", "The nuts and bolts of prompting"));
        assert!(!tool_found_in("Bolt", "Bolt on a chatbot later"));
        assert!(tool_found_in("Bolt", "Learn the nuts and bolts, then ship with Bolt"));
    }

    #[test]
    fn test_v0_excludes_version_strings() {
        assert!(tool_found_in("v0", "Prototype in v0 and Lovable"));
        assert!(tool_found_in("v0", "Tools: v0, Bolt"));
        assert!(!tool_found_in("v0", "Release v0.2 is out"));
        assert!(!tool_found_in("v0", "api/v0/items"));
    }

    #[test]
    fn test_windsurf_excludes_windsurfing() {
        assert!(tool_found_in("Windsurf", "Pair with Windsurf"));
        assert!(!tool_found_in("Windsurf", "Windsurfing retreat"));
    }

    #[test]
    fn test_claude_needs_ai_context() {
        assert!(tool_found_in("Claude", "Compare Claude with other LLM options"));
        assert!(!tool_found_in("Claude", "Guest talk by Claude Monet"));
        assert!(tool_found_in("Claude", "Set up claude code"));
    }

    #[test]
    fn test_make_only_as_product() {
        assert!(tool_found_in("Make", "Automate it with Make.com"));
        assert!(tool_found_in("Make", "Tools we cover: Zapier, Make"));
        assert!(!tool_found_in("Make", "Make sure you attend"));
    }

    #[test]
    fn test_devin_needs_context() {
        assert!(tool_found_in("Devin", "Devin, the AI software engineer"));
        assert!(!tool_found_in("Devin", "Hosted by Devin"));
    }

    #[test]
    fn test_detect_tools() {
        let text = "### 01 - Prototyping with Cursor\nMove the mouse cursor. Ship with Replit, v0 and Claude Code.";

        assert_eq!(detect_tools(text), vec!["Claude Code", "Cursor", "Replit", "v0"]);
        assert!(detect_tools("Quarterly budget planning").is_empty());
    }
}
