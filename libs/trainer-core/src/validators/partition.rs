//! Set-partition validators: matching pairs and sorting into categories.

use super::{ItemFeedback, Verdict};
use crate::types::{MatchPair, SortItem};
use std::collections::BTreeMap;

/// Validate a matching exercise. `mapping` maps each left item to a right item.
///
/// Every left item gets feedback; unassigned items are incorrect.
pub fn validate_matching(pairs: &[MatchPair], mapping: &BTreeMap<String, String>) -> Verdict {
    partition(
        pairs
            .iter()
            .map(|p| (p.left.as_str(), p.right.as_str())),
        mapping,
    )
}

/// Validate a sorting exercise. `mapping` maps each item id to a category id.
pub fn validate_sorting(items: &[SortItem], mapping: &BTreeMap<String, String>) -> Verdict {
    partition(
        items
            .iter()
            .map(|i| (i.id.as_str(), i.category_id.as_str())),
        mapping,
    )
}

fn partition<'a, I>(expected: I, mapping: &BTreeMap<String, String>) -> Verdict
where
    I: Iterator<Item = (&'a str, &'a str)>,
{
    let items: Vec<ItemFeedback> = expected
        .map(|(key, target)| {
            let correct = mapping.get(key).is_some_and(|chosen| chosen == target);
            ItemFeedback::new(key, correct)
        })
        .collect();

    let all_correct = !items.is_empty() && items.iter().all(|i| i.correct);
    Verdict::from_bool(all_correct).with_items(items)
}
