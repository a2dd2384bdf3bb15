//! Typed-text validators: fill in the blank and conjugation tables.

use super::{ItemFeedback, Outcome, Verdict};
use crate::matching::{compare_text, is_all_digits, normalize_whitespace, TextMatch};
use crate::types::ConjugationRow;

/// Validate a fill-in-the-blank answer.
///
/// Digits that match an accepted answer open a follow-up when the content
/// defines `numeric_word_form`; only the spelled-out word completes it.
pub fn validate_fill_blank(
    correct_answer: &str,
    acceptable_answers: &[String],
    numeric_word_form: Option<&str>,
    typed: &str,
) -> Verdict {
    let accepted: Vec<&str> = std::iter::once(correct_answer)
        .chain(acceptable_answers.iter().map(String::as_str))
        .collect();

    if let Some(word) = numeric_word_form {
        if is_all_digits(typed) {
            let digits = normalize_whitespace(typed);
            let is_accepted = accepted.iter().any(|a| normalize_whitespace(a) == digits);
            return if is_accepted {
                Verdict::from(Outcome::NumberWordRequired {
                    expected: word.to_string(),
                })
            } else {
                Verdict::incorrect()
            };
        }
    }

    verdict_for(compare_text(typed, accepted.iter().copied()))
}

/// Validate the spelled-out word of a numeric follow-up.
pub fn validate_number_word(numeric_word_form: &str, typed: &str) -> Verdict {
    verdict_for(compare_text(typed, [numeric_word_form]))
}

/// Validate a conjugation table, row by row.
///
/// Missing rows count as incorrect. The table is wrong-case only if every row
/// matches when ignoring case.
pub fn validate_conjugation(rows: &[ConjugationRow], answers: &[String]) -> Verdict {
    if rows.is_empty() {
        return Verdict::incorrect();
    }

    let mut any_wrong = false;
    let mut any_case_only = false;

    let items = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let typed = answers.get(idx).map(String::as_str).unwrap_or("");
            let accepted = std::iter::once(row.correct_answer.as_str())
                .chain(row.acceptable_answers.iter().map(String::as_str));
            let result = compare_text(typed, accepted);
            match result {
                TextMatch::Exact => ItemFeedback::new(&row.pronoun, true),
                TextMatch::WrongCase => {
                    any_case_only = true;
                    ItemFeedback {
                        key: row.pronoun.clone(),
                        correct: false,
                        case_only: true,
                    }
                }
                TextMatch::NoMatch => {
                    any_wrong = true;
                    ItemFeedback::new(&row.pronoun, false)
                }
            }
        })
        .collect();

    let verdict = if any_wrong {
        Verdict::incorrect()
    } else if any_case_only {
        Verdict::wrong_case()
    } else {
        Verdict::correct()
    };
    verdict.with_items(items)
}

fn verdict_for(result: TextMatch) -> Verdict {
    match result {
        TextMatch::Exact => Verdict::correct(),
        TextMatch::WrongCase => Verdict::wrong_case(),
        TextMatch::NoMatch => Verdict::incorrect(),
    }
}
