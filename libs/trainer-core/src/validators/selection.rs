//! Selection validators: multiple choice, connector insert, picture vocabulary.

use super::Verdict;
use crate::matching::normalize_whitespace;

/// Validate a selected option index.
///
/// Out-of-range indices are incorrect.
pub fn validate_index(
    option_count: usize,
    correct_index: usize,
    acceptable_indices: &[usize],
    selected: usize,
) -> Verdict {
    if selected >= option_count {
        return Verdict::incorrect();
    }
    Verdict::from_bool(selected == correct_index || acceptable_indices.contains(&selected))
}

/// Validate a selected option by value.
pub fn validate_choice(correct: &str, alternatives: &[String], selected: &str) -> Verdict {
    let selected = normalize_whitespace(selected);
    if selected.is_empty() {
        return Verdict::incorrect();
    }
    let matches = std::iter::once(correct)
        .chain(alternatives.iter().map(String::as_str))
        .any(|candidate| normalize_whitespace(candidate) == selected);
    Verdict::from_bool(matches)
}
