//! Sequence validators: word order and sentence builder.

use super::Verdict;

/// Validate an ordered answer against the canonical order and any accepted
/// alternate orders. Comparison is exact, token by token.
pub fn validate_sequence(
    correct_order: &[String],
    alternate_orders: &[Vec<String>],
    submitted: &[String],
) -> Verdict {
    if submitted.is_empty() {
        return Verdict::incorrect();
    }
    let matches = std::iter::once(correct_order)
        .chain(alternate_orders.iter().map(Vec::as_slice))
        .any(|order| order == submitted);
    Verdict::from_bool(matches)
}
