//! Test fixtures and factory functions for creating test data.

use chrono::{DateTime, TimeZone, Utc};

use trainer_core::{parse_catalog, Catalog, ExerciseResult};
use trainer_local::progress::CompletedExercise;

/// Two themes: `animals` with two exercises and `numbers` with one.
pub const CATALOG_JSON: &str = r#"{
  "themes": [
    { "id": "animals", "areaId": "vocabulary", "title": "Animals" },
    { "id": "numbers", "areaId": "math", "title": "Numbers", "requiredVocabularyLevel": 2 }
  ],
  "exercises": [
    {
      "id": "animals-1",
      "type": "multiple_choice",
      "level": 1,
      "difficulty": 1,
      "areaId": "vocabulary",
      "themeId": "animals",
      "content": {
        "type": "multiple_choice",
        "question": "Which animal says moo?",
        "options": ["cat", "cow", "dog"],
        "correctIndex": 1
      }
    },
    {
      "id": "animals-2",
      "type": "fill_blank",
      "level": 1,
      "difficulty": 2,
      "areaId": "vocabulary",
      "themeId": "animals",
      "content": {
        "type": "fill_blank",
        "sentence": "A spider has ___ legs.",
        "correctAnswer": "8",
        "acceptableAnswers": ["acht"],
        "numericWordForm": "acht"
      }
    },
    {
      "id": "numbers-1",
      "type": "word_order",
      "level": 1,
      "difficulty": 1,
      "areaId": "math",
      "themeId": "numbers",
      "content": {
        "type": "word_order",
        "words": ["three", "two", "one"],
        "correctOrder": ["one", "two", "three"]
      }
    }
  ]
}"#;

pub fn catalog() -> Catalog {
    parse_catalog(CATALOG_JSON).expect("fixture catalog is valid")
}

/// A UTC timestamp on day `d` of May 2026 at `hour`.
pub fn day(d: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, d, hour, 0, 0).unwrap()
}

/// A completion for a catalog exercise.
pub fn completed(catalog: &Catalog, exercise_id: &str, correct: bool, attempts: u32) -> CompletedExercise {
    let exercise = catalog.get(exercise_id).expect("exercise in fixture catalog");
    CompletedExercise {
        exercise_id: exercise.id.clone(),
        area_id: exercise.area_id.clone(),
        theme_id: exercise.theme_id.clone(),
        level: exercise.level,
        correct,
        attempts,
        time_spent_seconds: 30,
    }
}

/// A stored result for dashboard tests.
pub fn result(
    profile_id: &str,
    exercise_id: &str,
    area_id: &str,
    correct: bool,
    attempts: u32,
    completed_at: DateTime<Utc>,
) -> ExerciseResult {
    ExerciseResult {
        id: format!("{profile_id}-{exercise_id}-{}", completed_at.timestamp()),
        child_profile_id: profile_id.to_string(),
        exercise_id: exercise_id.to_string(),
        area_id: area_id.to_string(),
        theme_id: format!("{area_id}-theme"),
        level: 1,
        correct,
        score: if correct { 3 } else { 0 },
        attempts,
        time_spent_seconds: 60,
        completed_at,
    }
}

/// Raw entries as written by builds before namespacing. The cached
/// `totalStars` is stale on purpose; the results add up to 5.
pub fn legacy_entries() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "profiles",
            r#"[{
                "id": "legacy-1",
                "nickname": "Mia",
                "avatarId": "fox",
                "totalStars": 99,
                "currentStreak": 1,
                "longestStreak": 3,
                "lastActiveDate": "2026-04-30",
                "createdAt": "2026-04-01T08:00:00Z"
            }]"#,
        ),
        (
            "results",
            r#"[
                {"id": "legacy-r1", "childProfileId": "legacy-1", "exerciseId": "animals-1",
                 "areaId": "vocabulary", "themeId": "animals", "level": 1, "correct": true,
                 "score": 3, "attempts": 1, "timeSpentSeconds": 20,
                 "completedAt": "2026-04-29T09:00:00Z"},
                {"id": "legacy-r2", "childProfileId": "legacy-1", "exerciseId": "animals-2",
                 "areaId": "vocabulary", "themeId": "animals", "level": 1, "correct": true,
                 "score": 2, "attempts": 2, "timeSpentSeconds": 45,
                 "completedAt": "2026-04-30T09:00:00Z"}
            ]"#,
        ),
        ("activeProfile", r#""legacy-1""#),
        ("soundEnabled", "false"),
    ]
}
