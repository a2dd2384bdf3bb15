//! Core types for the exercise trainer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Exercise kind discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    MultipleChoice,
    FillBlank,
    ConjugationTable,
    ConnectorInsert,
    PictureVocabulary,
    Matching,
    Sorting,
    WordOrder,
    SentenceBuilder,
    Writing,
}

impl ExerciseType {
    /// All ten kinds, in catalog order.
    pub const ALL: [ExerciseType; 10] = [
        Self::MultipleChoice,
        Self::FillBlank,
        Self::ConjugationTable,
        Self::ConnectorInsert,
        Self::PictureVocabulary,
        Self::Matching,
        Self::Sorting,
        Self::WordOrder,
        Self::SentenceBuilder,
        Self::Writing,
    ];

    /// Get the type name as used in content files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::FillBlank => "fill_blank",
            Self::ConjugationTable => "conjugation_table",
            Self::ConnectorInsert => "connector_insert",
            Self::PictureVocabulary => "picture_vocabulary",
            Self::Matching => "matching",
            Self::Sorting => "sorting",
            Self::WordOrder => "word_order",
            Self::SentenceBuilder => "sentence_builder",
            Self::Writing => "writing",
        }
    }

    /// Parse from string.
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl std::fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An exercise as authored in content files. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    pub level: u32,
    pub difficulty: u8,
    pub area_id: String,
    pub theme_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: ExerciseContent,
}

/// One row of a conjugation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConjugationRow {
    pub pronoun: String,
    pub correct_answer: String,
    #[serde(default)]
    pub acceptable_answers: Vec<String>,
}

/// A left/right pair of a matching exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

/// A target bucket of a sorting exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortCategory {
    pub id: String,
    pub label: String,
}

/// A draggable item of a sorting exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortItem {
    pub id: String,
    pub text: String,
    pub category_id: String,
}

/// Type-specific exercise payload, tagged by exercise type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExerciseContent {
    #[serde(rename_all = "camelCase")]
    MultipleChoice {
        question: String,
        options: Vec<String>,
        correct_index: usize,
        #[serde(default)]
        acceptable_indices: Vec<usize>,
    },
    #[serde(rename_all = "camelCase")]
    FillBlank {
        sentence: String,
        correct_answer: String,
        #[serde(default)]
        acceptable_answers: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        numeric_word_form: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ConjugationTable {
        verb: String,
        rows: Vec<ConjugationRow>,
    },
    #[serde(rename_all = "camelCase")]
    ConnectorInsert {
        before: String,
        after: String,
        options: Vec<String>,
        correct_connector: String,
        #[serde(default)]
        acceptable_connectors: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    PictureVocabulary {
        image: String,
        options: Vec<String>,
        correct_answer: String,
        #[serde(default)]
        acceptable_answers: Vec<String>,
    },
    Matching {
        pairs: Vec<MatchPair>,
    },
    Sorting {
        categories: Vec<SortCategory>,
        items: Vec<SortItem>,
    },
    #[serde(rename_all = "camelCase")]
    WordOrder {
        words: Vec<String>,
        correct_order: Vec<String>,
        #[serde(default)]
        alternate_orders: Vec<Vec<String>>,
    },
    #[serde(rename_all = "camelCase")]
    SentenceBuilder {
        word_bank: Vec<String>,
        correct_sentence: Vec<String>,
        #[serde(default)]
        alternate_sentences: Vec<Vec<String>>,
    },
    #[serde(rename_all = "camelCase")]
    Writing {
        prompt: String,
        min_words: usize,
        #[serde(default)]
        hints: Vec<String>,
    },
}

impl ExerciseContent {
    /// The exercise type this payload belongs to.
    pub fn exercise_type(&self) -> ExerciseType {
        match self {
            Self::MultipleChoice { .. } => ExerciseType::MultipleChoice,
            Self::FillBlank { .. } => ExerciseType::FillBlank,
            Self::ConjugationTable { .. } => ExerciseType::ConjugationTable,
            Self::ConnectorInsert { .. } => ExerciseType::ConnectorInsert,
            Self::PictureVocabulary { .. } => ExerciseType::PictureVocabulary,
            Self::Matching { .. } => ExerciseType::Matching,
            Self::Sorting { .. } => ExerciseType::Sorting,
            Self::WordOrder { .. } => ExerciseType::WordOrder,
            Self::SentenceBuilder { .. } => ExerciseType::SentenceBuilder,
            Self::Writing { .. } => ExerciseType::Writing,
        }
    }
}

/// A learner's submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// Selected option index (multiple choice).
    Index(usize),
    /// Free text (fill blank, writing, numeric follow-up).
    Text(String),
    /// Selected option by value (connector insert, picture vocabulary).
    Choice(String),
    /// One text per row (conjugation table).
    Rows(Vec<String>),
    /// Item -> target assignment (matching: left -> right, sorting: item id -> category id).
    Mapping(BTreeMap<String, String>),
    /// Ordered tokens (word order, sentence builder).
    Sequence(Vec<String>),
}

impl Answer {
    /// The answer used when the learner submits without selecting anything.
    pub fn empty_for(exercise_type: ExerciseType) -> Self {
        match exercise_type {
            ExerciseType::MultipleChoice => Self::Index(usize::MAX),
            ExerciseType::FillBlank | ExerciseType::Writing => Self::Text(String::new()),
            ExerciseType::ConnectorInsert | ExerciseType::PictureVocabulary => {
                Self::Choice(String::new())
            }
            ExerciseType::ConjugationTable => Self::Rows(Vec::new()),
            ExerciseType::Matching | ExerciseType::Sorting => Self::Mapping(BTreeMap::new()),
            ExerciseType::WordOrder | ExerciseType::SentenceBuilder => Self::Sequence(Vec::new()),
        }
    }
}

/// Record written once per completed exercise. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResult {
    pub id: String,
    pub child_profile_id: String,
    pub exercise_id: String,
    pub area_id: String,
    pub theme_id: String,
    pub level: u32,
    pub correct: bool,
    pub score: u8,
    pub attempts: u32,
    pub time_spent_seconds: u32,
    pub completed_at: DateTime<Utc>,
}

/// Progress on one theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeProgress {
    pub exercises_completed: u32,
    pub exercises_total: u32,
    pub stars_earned: u32,
}

impl ThemeProgress {
    /// Whether every exercise of the theme has been completed.
    pub fn is_complete(&self) -> bool {
        self.exercises_total > 0 && self.exercises_completed >= self.exercises_total
    }
}

/// A badge held by a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    pub id: String,
    pub earned_at: DateTime<Utc>,
}

/// A child's profile with cumulative gamification state.
///
/// `total_stars`, `current_levels` and `theme_progress` are derived from the
/// result log and may lag behind it until the next recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub nickname: String,
    pub avatar_id: String,
    pub total_stars: u32,
    #[serde(default)]
    pub current_levels: BTreeMap<String, u32>,
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_date: Option<NaiveDate>,
    #[serde(default)]
    pub theme_progress: BTreeMap<String, ThemeProgress>,
    #[serde(default)]
    pub badges: Vec<EarnedBadge>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create an empty profile.
    pub fn new(id: String, nickname: String, avatar_id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            nickname,
            avatar_id,
            total_stars: 0,
            current_levels: BTreeMap::new(),
            current_streak: 0,
            longest_streak: 0,
            last_active_date: None,
            theme_progress: BTreeMap::new(),
            badges: Vec::new(),
            created_at,
        }
    }

    /// Whether the profile holds the given badge.
    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.badges.iter().any(|b| b.id == badge_id)
    }
}

/// Rule parameters shared by session, scoring and streak code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerSettings {
    pub max_attempts: u32,
    pub stars_per_level: u32,
    pub daily_reset_hour: u32,
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            stars_per_level: 10,
            daily_reset_hour: 0,
        }
    }
}
