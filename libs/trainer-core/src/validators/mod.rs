//! Answer validators, one family per exercise type.
//!
//! Every validator is a pure function of content and answer. User input is
//! never an error: an empty answer, or an answer of the wrong shape, resolves
//! to [`Outcome::Incorrect`].

pub mod partition;
pub mod selection;
pub mod sequence;
pub mod text;
pub mod writing;

use crate::types::{Answer, ExerciseContent};
use serde::{Deserialize, Serialize};

pub use partition::{validate_matching, validate_sorting};
pub use selection::{validate_choice, validate_index};
pub use sequence::validate_sequence;
pub use text::{validate_conjugation, validate_fill_blank, validate_number_word};
pub use writing::validate_writing;

/// Correctness signal for a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    /// Right word, wrong letter case. Must not cost an attempt.
    WrongCase,
    Incorrect,
    /// Digits were given where the number must also be spelled out.
    NumberWordRequired { expected: String },
}

/// Per-item feedback for multi-part exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFeedback {
    /// Left item, sorting item id, or conjugation pronoun.
    pub key: String,
    pub correct: bool,
    /// Matched only when ignoring case.
    #[serde(default)]
    pub case_only: bool,
}

impl ItemFeedback {
    pub fn new(key: impl Into<String>, correct: bool) -> Self {
        Self {
            key: key.into(),
            correct,
            case_only: false,
        }
    }
}

/// Result of validating one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemFeedback>,
}

impl Verdict {
    pub fn correct() -> Self {
        Self::from(Outcome::Correct)
    }

    pub fn incorrect() -> Self {
        Self::from(Outcome::Incorrect)
    }

    pub fn wrong_case() -> Self {
        Self::from(Outcome::WrongCase)
    }

    /// Build a verdict from a boolean.
    pub fn from_bool(correct: bool) -> Self {
        if correct {
            Self::correct()
        } else {
            Self::incorrect()
        }
    }

    /// Attach per-item feedback.
    pub fn with_items(mut self, items: Vec<ItemFeedback>) -> Self {
        self.items = items;
        self
    }

    pub fn is_correct(&self) -> bool {
        self.outcome == Outcome::Correct
    }

    /// Whether submitting this verdict counts as an attempt.
    pub fn consumes_attempt(&self) -> bool {
        matches!(self.outcome, Outcome::Correct | Outcome::Incorrect)
    }

    /// Feedback for a single item, if present.
    pub fn item(&self, key: &str) -> Option<&ItemFeedback> {
        self.items.iter().find(|i| i.key == key)
    }
}

impl From<Outcome> for Verdict {
    fn from(outcome: Outcome) -> Self {
        Self {
            outcome,
            items: Vec::new(),
        }
    }
}

/// Validate an answer against exercise content.
pub fn validate(content: &ExerciseContent, answer: &Answer) -> Verdict {
    match (content, answer) {
        (
            ExerciseContent::MultipleChoice {
                options,
                correct_index,
                acceptable_indices,
                ..
            },
            Answer::Index(index),
        ) => validate_index(options.len(), *correct_index, acceptable_indices, *index),

        (
            ExerciseContent::FillBlank {
                correct_answer,
                acceptable_answers,
                numeric_word_form,
                ..
            },
            Answer::Text(text),
        ) => validate_fill_blank(
            correct_answer,
            acceptable_answers,
            numeric_word_form.as_deref(),
            text,
        ),

        (ExerciseContent::ConjugationTable { rows, .. }, Answer::Rows(answers)) => {
            validate_conjugation(rows, answers)
        }

        (
            ExerciseContent::ConnectorInsert {
                correct_connector,
                acceptable_connectors,
                ..
            },
            Answer::Choice(choice),
        ) => validate_choice(correct_connector, acceptable_connectors, choice),

        (
            ExerciseContent::PictureVocabulary {
                correct_answer,
                acceptable_answers,
                ..
            },
            Answer::Choice(choice),
        ) => validate_choice(correct_answer, acceptable_answers, choice),

        (ExerciseContent::Matching { pairs }, Answer::Mapping(mapping)) => {
            validate_matching(pairs, mapping)
        }

        (ExerciseContent::Sorting { items, .. }, Answer::Mapping(mapping)) => {
            validate_sorting(items, mapping)
        }

        (
            ExerciseContent::WordOrder {
                correct_order,
                alternate_orders,
                ..
            },
            Answer::Sequence(sequence),
        ) => validate_sequence(correct_order, alternate_orders, sequence),

        (
            ExerciseContent::SentenceBuilder {
                correct_sentence,
                alternate_sentences,
                ..
            },
            Answer::Sequence(sequence),
        ) => validate_sequence(correct_sentence, alternate_sentences, sequence),

        (ExerciseContent::Writing { min_words, .. }, Answer::Text(text)) => {
            validate_writing(*min_words, text)
        }

        _ => Verdict::incorrect(),
    }
}

/// The canonical correct answer for a piece of content.
///
/// Used to show the solution once a session is revealed. Writing exercises
/// have no canonical text and return `None`.
pub fn canonical_answer(content: &ExerciseContent) -> Option<Answer> {
    let answer = match content {
        ExerciseContent::MultipleChoice { correct_index, .. } => Answer::Index(*correct_index),
        ExerciseContent::FillBlank { correct_answer, .. } => Answer::Text(correct_answer.clone()),
        ExerciseContent::ConjugationTable { rows, .. } => {
            Answer::Rows(rows.iter().map(|r| r.correct_answer.clone()).collect())
        }
        ExerciseContent::ConnectorInsert {
            correct_connector, ..
        } => Answer::Choice(correct_connector.clone()),
        ExerciseContent::PictureVocabulary { correct_answer, .. } => {
            Answer::Choice(correct_answer.clone())
        }
        ExerciseContent::Matching { pairs } => Answer::Mapping(
            pairs
                .iter()
                .map(|p| (p.left.clone(), p.right.clone()))
                .collect(),
        ),
        ExerciseContent::Sorting { items, .. } => Answer::Mapping(
            items
                .iter()
                .map(|i| (i.id.clone(), i.category_id.clone()))
                .collect(),
        ),
        ExerciseContent::WordOrder { correct_order, .. } => {
            Answer::Sequence(correct_order.clone())
        }
        ExerciseContent::SentenceBuilder {
            correct_sentence, ..
        } => Answer::Sequence(correct_sentence.clone()),
        ExerciseContent::Writing { .. } => return None,
    };
    Some(answer)
}
