// 🔎 Triggers - text normalization and keyword matching
// Triggers are data: plain phrases, optionally with `*` wildcards

use std::collections::BTreeSet;

/// Wildcard separator inside a trigger ("vibe*cod")
pub const WILDCARD: char = '*';

/// Longest phrase (in words) kept as a single trigger during extraction
pub const MAX_PHRASE_WORDS: usize = 3;

/// Shortest standalone keyword pulled out of a long description fragment
pub const MIN_KEYWORD_CHARS: usize = 5;

const PHRASE_DELIMITERS: &[char] = &[',', ';', '.', ':', '(', ')', '&', '/', '\n', '"', '—', '–'];

const CONJUNCTIONS: &[&str] = &["and", "or"];

const STOPWORDS: &[&str] = &[
    "a", "about", "across", "all", "an", "and", "any", "are", "as", "at", "be", "between", "by",
    "can", "each", "for", "from", "how", "in", "into", "is", "it", "its", "more", "of", "on",
    "or", "other", "over", "so", "such", "than", "that", "the", "their", "them", "these", "they",
    "this", "through", "to", "up", "use", "using", "via", "what", "when", "which", "while", "who",
    "with", "within", "without", "you", "your",
];

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Lowercase, turn every non-alphanumeric run into a single space, trim.
///
/// "Vibe-Coding: 101!" -> "vibe coding 101"
pub fn normalize_text(text: &str) -> String {
    normalize_with(text, |_| false)
}

/// Same as [`normalize_text`] but keeps `*` wildcards, with no spaces around
/// them and none dangling at either end.
///
/// "Vibe * Cod" -> "vibe*cod"
pub fn normalize_trigger(raw: &str) -> String {
    let normalized = normalize_with(raw, |c| c == WILDCARD);
    normalized
        .split(WILDCARD)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("*")
}

fn normalize_with(text: &str, keep: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() || keep(ch) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_space = true;
        }
    }

    out
}

// ============================================================================
// MATCHING
// ============================================================================

/// Check if a normalized trigger occurs in a normalized text.
///
/// Plain triggers must start at a word boundary but may end inside a word,
/// so "rapid" matches "rapidly" while "ai" does not match "maintain".
/// Wildcard triggers anchor their first piece the same way; the remaining
/// pieces only have to appear in order after it.
pub fn trigger_matches(trigger: &str, text: &str) -> bool {
    let mut pieces = trigger.split(WILDCARD).filter(|piece| !piece.is_empty());

    let Some(first) = pieces.next() else {
        return false;
    };

    // Step one char at a time: occurrences may overlap ("someone on one")
    let mut start = 0;
    while let Some(offset) = text[start..].find(first) {
        let pos = start + offset;

        if is_word_start(text, pos) {
            let mut current_pos = pos + first.len();
            let rest_in_order = pieces.clone().all(|piece| match text[current_pos..].find(piece) {
                Some(offset) => {
                    current_pos += offset + piece.len();
                    true
                }
                None => false,
            });
            if rest_in_order {
                return true;
            }
        }

        start = pos + text[pos..].chars().next().map_or(1, char::len_utf8);
    }

    false
}

fn is_word_start(text: &str, pos: usize) -> bool {
    pos == 0 || text.as_bytes()[pos - 1] == b' '
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Derive triggers from a category's free text when none were curated.
///
/// Label and example topics contribute short phrases. Description fragments
/// contribute short phrases too; longer fragments fall back to their
/// content words.
pub fn extract_triggers(label: &str, description: &str, example_topics: &[String]) -> BTreeSet<String> {
    let mut triggers = BTreeSet::new();

    let short_sources = std::iter::once(label).chain(example_topics.iter().map(String::as_str));
    for source in short_sources {
        for phrase in candidate_phrases(source) {
            if word_count(&phrase) <= MAX_PHRASE_WORDS {
                triggers.insert(phrase);
            }
        }
    }

    for phrase in candidate_phrases(description) {
        if word_count(&phrase) <= MAX_PHRASE_WORDS {
            triggers.insert(phrase);
            continue;
        }
        for word in phrase.split(' ') {
            if !is_stopword(word) && word.chars().count() >= MIN_KEYWORD_CHARS {
                triggers.insert(word.to_string());
            }
        }
    }

    triggers
}

/// Split free text into normalized phrases on punctuation and and/or,
/// with stopwords trimmed from both ends.
fn candidate_phrases(text: &str) -> Vec<String> {
    let mut phrases = Vec::new();

    for chunk in text.split(|c: char| PHRASE_DELIMITERS.contains(&c)) {
        let normalized = normalize_text(chunk);
        let words: Vec<&str> = normalized.split(' ').filter(|w| !w.is_empty()).collect();

        for part in words.split(|w| CONJUNCTIONS.contains(w)) {
            let trimmed = trim_stopwords(part);
            if !trimmed.is_empty() {
                phrases.push(trimmed.join(" "));
            }
        }
    }

    phrases
}

fn trim_stopwords<'a, 'b>(words: &'a [&'b str]) -> &'a [&'b str] {
    let start = words.iter().position(|w| !is_stopword(w)).unwrap_or(words.len());
    let end = words.iter().rposition(|w| !is_stopword(w)).map_or(start, |i| i + 1);
    &words[start..end.max(start)]
}

fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

fn word_count(phrase: &str) -> usize {
    phrase.split(' ').filter(|w| !w.is_empty()).count()
}

// ============================================================================
// TESTS
// ============================================================================
