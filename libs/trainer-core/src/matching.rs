//! Text comparison used by the typed-answer validators.

use serde::{Deserialize, Serialize};

/// How a typed answer relates to a set of accepted answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    /// Equal to an accepted answer after whitespace normalization.
    Exact,
    /// Equal to an accepted answer only when letter case is ignored.
    WrongCase,
    /// Not equal to any accepted answer.
    NoMatch,
}

/// Compare a typed answer against every accepted answer.
///
/// An exact match anywhere in the set wins over a case-insensitive match.
/// Empty input never matches.
pub fn compare_text<'a, I>(typed: &str, accepted: I) -> TextMatch
where
    I: IntoIterator<Item = &'a str>,
{
    let typed = normalize_whitespace(typed);
    if typed.is_empty() {
        return TextMatch::NoMatch;
    }
    let typed_lower = typed.to_lowercase();

    let mut result = TextMatch::NoMatch;
    for candidate in accepted {
        let candidate = normalize_whitespace(candidate);
        if candidate.is_empty() {
            continue;
        }
        if candidate == typed {
            return TextMatch::Exact;
        }
        if candidate.to_lowercase() == typed_lower {
            result = TextMatch::WrongCase;
        }
    }
    result
}

/// Normalize whitespace in a string (trim and collapse multiple spaces).
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether the trimmed text is a non-empty run of ASCII digits.
pub fn is_all_digits(s: &str) -> bool {
    let trimmed = s.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit())
}

/// Count whitespace-separated words.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}
