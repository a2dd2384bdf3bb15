//! Exercise content loading and validation.
//!
//! # Format
//! ```json
//! {
//!   "themes": [
//!     { "id": "animals", "areaId": "vocabulary", "title": "Animals", "requiredVocabularyLevel": 1 }
//!   ],
//!   "exercises": [
//!     {
//!       "id": "animals-1", "type": "multiple_choice", "level": 1, "difficulty": 1,
//!       "areaId": "vocabulary", "themeId": "animals",
//!       "content": { "type": "multiple_choice", "question": "Which animal barks?",
//!                    "options": ["cat", "dog"], "correctIndex": 1 }
//!     }
//!   ]
//! }
//! ```
//!
//! Content errors are authoring mistakes and are reported here, before any
//! exercise reaches a session.

use crate::error::{ContentError, Result};
use crate::scoring;
use crate::types::{Exercise, ExerciseContent};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A theme groups exercises and may be locked behind a vocabulary level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    pub area_id: String,
    pub title: String,
    #[serde(default = "default_required_level")]
    pub required_vocabulary_level: u32,
}

fn default_required_level() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    themes: Vec<Theme>,
    exercises: Vec<Exercise>,
}

/// Validated exercise content.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    themes: Vec<Theme>,
    exercises: Vec<Exercise>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, validating every exercise.
    pub fn new(themes: Vec<Theme>, exercises: Vec<Exercise>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(exercises.len());
        for (idx, exercise) in exercises.iter().enumerate() {
            validate_exercise(exercise)?;
            if by_id.insert(exercise.id.clone(), idx).is_some() {
                return Err(ContentError::DuplicateId {
                    id: exercise.id.clone(),
                });
            }
        }
        Ok(Self {
            themes,
            exercises,
            by_id,
        })
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.by_id.get(id).map(|&idx| &self.exercises[idx])
    }

    pub fn theme(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    /// Exercises of one theme, ordered by level then difficulty.
    pub fn exercises_for_theme(&self, theme_id: &str) -> Vec<&Exercise> {
        let mut found: Vec<&Exercise> = self
            .exercises
            .iter()
            .filter(|e| e.theme_id == theme_id)
            .collect();
        found.sort_by_key(|e| (e.level, e.difficulty));
        found
    }

    /// Exercises of one area at a given level.
    pub fn exercises_for_level(&self, area_id: &str, level: u32) -> Vec<&Exercise> {
        self.exercises
            .iter()
            .filter(|e| e.area_id == area_id && e.level == level)
            .collect()
    }

    /// Number of exercises per theme.
    pub fn theme_totals(&self) -> HashMap<String, u32> {
        let mut totals = HashMap::new();
        for exercise in &self.exercises {
            *totals.entry(exercise.theme_id.clone()).or_insert(0) += 1;
        }
        totals
    }

    /// Themes available at a vocabulary star count.
    pub fn unlocked_themes(&self, vocabulary_stars: u32) -> Vec<&Theme> {
        self.themes
            .iter()
            .filter(|t| scoring::is_theme_unlocked(t.required_vocabulary_level, vocabulary_stars))
            .collect()
    }
}

/// Parse and validate a catalog file (`{themes, exercises}`).
pub fn parse_catalog(json: &str) -> Result<Catalog> {
    let file: CatalogFile = serde_json::from_str(json)?;
    Catalog::new(file.themes, file.exercises)
}

/// Parse and validate a bare array of exercises.
pub fn parse_exercises(json: &str) -> Result<Vec<Exercise>> {
    let exercises: Vec<Exercise> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    for exercise in &exercises {
        validate_exercise(exercise)?;
        if !seen.insert(exercise.id.as_str()) {
            return Err(ContentError::DuplicateId {
                id: exercise.id.clone(),
            });
        }
    }
    Ok(exercises)
}

/// Check one exercise for authoring mistakes.
pub fn validate_exercise(exercise: &Exercise) -> Result<()> {
    let id = exercise.id.as_str();
    if id.trim().is_empty() {
        return Err(ContentError::MissingField {
            id: id.to_string(),
            field: "id",
        });
    }

    let actual = exercise.content.exercise_type();
    if actual != exercise.exercise_type {
        return Err(ContentError::TypeMismatch {
            id: id.to_string(),
            declared: exercise.exercise_type,
            actual,
        });
    }
    if exercise.level == 0 {
        return Err(invalid(id, "level must be at least 1"));
    }
    if !(1..=3).contains(&exercise.difficulty) {
        return Err(invalid(
            id,
            format!("difficulty must be 1-3, got {}", exercise.difficulty),
        ));
    }
    if exercise.area_id.trim().is_empty() {
        return Err(missing(id, "areaId"));
    }
    if exercise.theme_id.trim().is_empty() {
        return Err(missing(id, "themeId"));
    }

    match &exercise.content {
        ExerciseContent::MultipleChoice {
            options,
            correct_index,
            acceptable_indices,
            ..
        } => {
            if options.len() < 2 {
                return Err(invalid(id, "multiple choice needs at least two options"));
            }
            if let Some(bad) = std::iter::once(correct_index)
                .chain(acceptable_indices)
                .find(|&&i| i >= options.len())
            {
                return Err(invalid(
                    id,
                    format!("option index {bad} out of range ({} options)", options.len()),
                ));
            }
        }
        ExerciseContent::FillBlank {
            correct_answer,
            numeric_word_form,
            ..
        } => {
            require_text(id, correct_answer, "correctAnswer")?;
            if let Some(word) = numeric_word_form {
                require_text(id, word, "numericWordForm")?;
            }
        }
        ExerciseContent::ConjugationTable { rows, .. } => {
            if rows.is_empty() {
                return Err(missing(id, "rows"));
            }
            for row in rows {
                require_text(id, &row.correct_answer, "correctAnswer")?;
            }
        }
        ExerciseContent::ConnectorInsert {
            options,
            correct_connector,
            ..
        } => {
            require_text(id, correct_connector, "correctConnector")?;
            if !options.contains(correct_connector) {
                return Err(invalid(id, "correct connector is not among the options"));
            }
        }
        ExerciseContent::PictureVocabulary {
            options,
            correct_answer,
            ..
        } => {
            require_text(id, correct_answer, "correctAnswer")?;
            if !options.is_empty() && !options.contains(correct_answer) {
                return Err(invalid(id, "correct answer is not among the options"));
            }
        }
        ExerciseContent::Matching { pairs } => {
            if pairs.is_empty() {
                return Err(missing(id, "pairs"));
            }
            let mut lefts = HashSet::new();
            for pair in pairs {
                if !lefts.insert(pair.left.as_str()) {
                    return Err(invalid(id, format!("duplicate left item {}", pair.left)));
                }
            }
        }
        ExerciseContent::Sorting { categories, items } => {
            if categories.is_empty() {
                return Err(missing(id, "categories"));
            }
            if items.is_empty() {
                return Err(missing(id, "items"));
            }
            let category_ids: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();
            let mut item_ids = HashSet::new();
            for item in items {
                if !category_ids.contains(item.category_id.as_str()) {
                    return Err(invalid(
                        id,
                        format!("item {} uses unknown category {}", item.id, item.category_id),
                    ));
                }
                if !item_ids.insert(item.id.as_str()) {
                    return Err(invalid(id, format!("duplicate item {}", item.id)));
                }
            }
        }
        ExerciseContent::WordOrder {
            words,
            correct_order,
            alternate_orders,
        } => {
            check_orders(id, words, correct_order, alternate_orders)?;
        }
        ExerciseContent::SentenceBuilder {
            word_bank,
            correct_sentence,
            alternate_sentences,
        } => {
            check_orders(id, word_bank, correct_sentence, alternate_sentences)?;
        }
        ExerciseContent::Writing { min_words, .. } => {
            if *min_words == 0 {
                return Err(invalid(id, "minWords must be at least 1"));
            }
        }
    }
    Ok(())
}

/// Every accepted order must use only tokens available to the learner.
fn check_orders(
    id: &str,
    tokens: &[String],
    correct: &[String],
    alternates: &[Vec<String>],
) -> Result<()> {
    if correct.is_empty() {
        return Err(missing(id, "correct order"));
    }
    for order in std::iter::once(correct).chain(alternates.iter().map(Vec::as_slice)) {
        let mut available: HashMap<&str, usize> = HashMap::new();
        for token in tokens {
            *available.entry(token.as_str()).or_insert(0) += 1;
        }
        for token in order {
            match available.get_mut(token.as_str()) {
                Some(count) if *count > 0 => *count -= 1,
                _ => {
                    return Err(invalid(
                        id,
                        format!("token {token:?} is not available in the word list"),
                    ))
                }
            }
        }
    }
    Ok(())
}

fn require_text(id: &str, value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        Err(missing(id, field))
    } else {
        Ok(())
    }
}

fn missing(id: &str, field: &'static str) -> ContentError {
    ContentError::MissingField {
        id: id.to_string(),
        field,
    }
}

fn invalid(id: &str, reason: impl Into<String>) -> ContentError {
    ContentError::Invalid {
        id: id.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExerciseType;

    const CATALOG: &str = r#"{
        "themes": [
            { "id": "animals", "areaId": "vocabulary", "title": "Animals" },
            { "id": "verbs", "areaId": "grammar", "title": "Verbs", "requiredVocabularyLevel": 3 }
        ],
        "exercises": [
            {
                "id": "animals-1", "type": "multiple_choice", "level": 1, "difficulty": 1,
                "areaId": "vocabulary", "themeId": "animals",
                "content": { "type": "multiple_choice", "question": "Which animal barks?",
                             "options": ["cat", "dog"], "correctIndex": 1 }
            },
            {
                "id": "animals-2", "type": "word_order", "level": 2, "difficulty": 2,
                "areaId": "vocabulary", "themeId": "animals",
                "content": { "type": "word_order", "words": ["eat", "apples", "I"],
                             "correctOrder": ["I", "eat", "apples"],
                             "alternateOrders": [["apples", "I", "eat"]] }
            },
            {
                "id": "verbs-1", "type": "fill_blank", "level": 1, "difficulty": 1,
                "areaId": "grammar", "themeId": "verbs",
                "content": { "type": "fill_blank", "sentence": "Ich ___ drei Jahre alt.",
                             "correctAnswer": "bin" }
            }
        ]
    }"#;

    fn exercise(content: ExerciseContent) -> Exercise {
        Exercise {
            id: "x-1".into(),
            exercise_type: content.exercise_type(),
            level: 1,
            difficulty: 1,
            area_id: "area".into(),
            theme_id: "theme".into(),
            title: None,
            content,
        }
    }

    #[test]
    fn parse_catalog_file() {
        let catalog = parse_catalog(CATALOG).unwrap();
        assert_eq!(catalog.exercises().len(), 3);
        assert_eq!(catalog.themes().len(), 2);
        assert_eq!(catalog.theme("animals").unwrap().required_vocabulary_level, 1);
        assert_eq!(
            catalog.get("animals-2").unwrap().exercise_type,
            ExerciseType::WordOrder
        );
        assert_eq!(catalog.theme_totals().get("animals"), Some(&2));
        assert_eq!(catalog.exercises_for_theme("animals")[0].id, "animals-1");
        assert_eq!(catalog.exercises_for_level("grammar", 1).len(), 1);
    }

    #[test]
    fn themes_unlock_by_vocabulary_level() {
        let catalog = parse_catalog(CATALOG).unwrap();
        let ids = |stars| {
            catalog
                .unlocked_themes(stars)
                .iter()
                .map(|t| t.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(0), vec!["animals"]);
        assert_eq!(ids(12), vec!["animals", "verbs"]);
    }

    #[test]
    fn reject_type_mismatch() {
        let json = r#"[{
            "id": "bad", "type": "matching", "level": 1, "difficulty": 1,
            "areaId": "a", "themeId": "t",
            "content": { "type": "writing", "prompt": "Write", "minWords": 3 }
        }]"#;
        let result = parse_exercises(json);
        assert!(matches!(
            result,
            Err(ContentError::TypeMismatch {
                declared: ExerciseType::Matching,
                actual: ExerciseType::Writing,
                ..
            })
        ));
    }

    #[test]
    fn reject_duplicate_ids() {
        let json = r#"[
            { "id": "w", "type": "writing", "level": 1, "difficulty": 1, "areaId": "a", "themeId": "t",
              "content": { "type": "writing", "prompt": "Write", "minWords": 3 } },
            { "id": "w", "type": "writing", "level": 1, "difficulty": 1, "areaId": "a", "themeId": "t",
              "content": { "type": "writing", "prompt": "Again", "minWords": 3 } }
        ]"#;
        assert!(matches!(
            parse_exercises(json),
            Err(ContentError::DuplicateId { .. })
        ));
    }

    #[test]
    fn reject_missing_field_json() {
        let json = r#"[{ "id": "w", "type": "writing", "level": 1, "difficulty": 1,
                          "areaId": "a", "themeId": "t",
                          "content": { "type": "writing", "prompt": "Write" } }]"#;
        assert!(matches!(parse_exercises(json), Err(ContentError::Json(_))));
    }

    #[test]
    fn reject_out_of_range_index() {
        let ex = exercise(ExerciseContent::MultipleChoice {
            question: "?".into(),
            options: vec!["a".into(), "b".into()],
            correct_index: 2,
            acceptable_indices: vec![],
        });
        assert!(matches!(
            validate_exercise(&ex),
            Err(ContentError::Invalid { .. })
        ));
    }

    #[test]
    fn reject_bad_difficulty() {
        let mut ex = exercise(ExerciseContent::Writing {
            prompt: "Write".into(),
            min_words: 3,
            hints: vec![],
        });
        ex.difficulty = 4;
        assert!(validate_exercise(&ex).is_err());
    }

    #[test]
    fn reject_unknown_sorting_category() {
        let ex = exercise(ExerciseContent::Sorting {
            categories: vec![crate::types::SortCategory {
                id: "fruit".into(),
                label: "Fruit".into(),
            }],
            items: vec![crate::types::SortItem {
                id: "carrot".into(),
                text: "Carrot".into(),
                category_id: "veg".into(),
            }],
        });
        assert!(matches!(
            validate_exercise(&ex),
            Err(ContentError::Invalid { .. })
        ));
    }

    #[test]
    fn reject_order_with_unknown_token() {
        let ex = exercise(ExerciseContent::WordOrder {
            words: vec!["I".into(), "eat".into()],
            correct_order: vec!["I".into(), "eat".into(), "apples".into()],
            alternate_orders: vec![],
        });
        assert!(validate_exercise(&ex).is_err());
    }

    #[test]
    fn empty_fill_blank_answer_is_missing_field() {
        let ex = exercise(ExerciseContent::FillBlank {
            sentence: "___".into(),
            correct_answer: " ".into(),
            acceptable_answers: vec![],
            hint: None,
            numeric_word_form: None,
        });
        assert!(matches!(
            validate_exercise(&ex),
            Err(ContentError::MissingField {
                field: "correctAnswer",
                ..
            })
        ));
    }
}
