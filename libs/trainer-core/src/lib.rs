//! Core exercise trainer library.
//!
//! Provides:
//! - Exercise content model and content validation
//! - Answer validators for the ten exercise types
//! - Star scoring and the two leveling schemes
//! - The per-exercise attempt session state machine
//! - Streak, badge and profile aggregate rules
//! - Randomization and pointer hit-testing helpers

pub mod aggregates;
pub mod badges;
pub mod content;
pub mod error;
pub mod matching;
pub mod pointer;
pub mod scoring;
pub mod session;
pub mod shuffle;
pub mod streak;
pub mod types;
pub mod validators;

pub use aggregates::ProfileAggregates;
pub use content::{parse_catalog, parse_exercises, validate_exercise, Catalog, Theme};
pub use error::{ContentError, Result, ScoringError};
pub use matching::{compare_text, TextMatch};
pub use scoring::{calculate_level, stars, vocabulary_level};
pub use session::{ExerciseSession, Phase, SessionOutcome, SubmitOutcome};
pub use streak::{update_streak, StreakUpdate};
pub use types::{
    Answer, EarnedBadge, Exercise, ExerciseContent, ExerciseResult, ExerciseType, ThemeProgress,
    TrainerSettings, UserProfile,
};
pub use validators::{validate, Outcome, Verdict};
