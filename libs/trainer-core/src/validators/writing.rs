//! Free writing: graded on effort, not content.

use super::Verdict;
use crate::matching::word_count;

/// Pass iff the text has at least `min_words` words.
pub fn validate_writing(min_words: usize, text: &str) -> Verdict {
    let count = word_count(text);
    Verdict::from_bool(count > 0 && count >= min_words)
}
