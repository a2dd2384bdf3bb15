//! Profile aggregates derived from the result log.
//!
//! The profile caches these values for quick reads. The log is the source of
//! truth: a crash between writing a result and saving the profile leaves the
//! cache stale until the next recompute.

use crate::error::ScoringError;
use crate::scoring::calculate_level;
use crate::types::{ExerciseResult, ThemeProgress, UserProfile};
use std::collections::{BTreeMap, HashMap};

/// Derived profile values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileAggregates {
    pub total_stars: u32,
    pub current_levels: BTreeMap<String, u32>,
    pub theme_progress: BTreeMap<String, ThemeProgress>,
}

impl ProfileAggregates {
    /// Recompute aggregates from a profile's results.
    ///
    /// `theme_totals` gives the number of exercises per theme; themes missing
    /// from it keep `previous` totals (or 0).
    pub fn from_results(
        results: &[ExerciseResult],
        theme_totals: &HashMap<String, u32>,
        previous: &BTreeMap<String, ThemeProgress>,
        stars_per_level: u32,
    ) -> Result<Self, ScoringError> {
        let total_stars: u32 = results.iter().map(|r| u32::from(r.score)).sum();

        let mut area_stars: BTreeMap<String, u32> = BTreeMap::new();
        for r in results {
            *area_stars.entry(r.area_id.clone()).or_default() += u32::from(r.score);
        }
        let current_levels = area_stars
            .into_iter()
            .map(|(area, stars)| Ok((area, calculate_level(stars, stars_per_level)?)))
            .collect::<Result<BTreeMap<_, _>, ScoringError>>()?;

        // theme -> exercise -> best score among correct results
        let mut best: BTreeMap<&str, BTreeMap<&str, u8>> = BTreeMap::new();
        for r in results.iter().filter(|r| r.correct) {
            let entry = best
                .entry(r.theme_id.as_str())
                .or_default()
                .entry(r.exercise_id.as_str())
                .or_default();
            *entry = (*entry).max(r.score);
        }

        let mut theme_progress: BTreeMap<String, ThemeProgress> = BTreeMap::new();
        for theme in results.iter().map(|r| r.theme_id.as_str()) {
            if theme_progress.contains_key(theme) {
                continue;
            }
            let exercises = best.get(theme);
            let total = theme_totals
                .get(theme)
                .copied()
                .or_else(|| previous.get(theme).map(|p| p.exercises_total))
                .unwrap_or(0);
            theme_progress.insert(
                theme.to_string(),
                ThemeProgress {
                    exercises_completed: exercises.map(|e| e.len() as u32).unwrap_or(0),
                    exercises_total: total,
                    stars_earned: exercises
                        .map(|e| e.values().map(|&s| u32::from(s)).sum::<u32>())
                        .unwrap_or(0),
                },
            );
        }

        Ok(Self {
            total_stars,
            current_levels,
            theme_progress,
        })
    }

    /// Overwrite the cached aggregates on a profile.
    pub fn apply_to(self, profile: &mut UserProfile) {
        profile.total_stars = self.total_stars;
        profile.current_levels = self.current_levels;
        profile.theme_progress = self.theme_progress;
    }

    /// Whether the profile's cache already matches.
    pub fn matches(&self, profile: &UserProfile) -> bool {
        profile.total_stars == self.total_stars
            && profile.current_levels == self.current_levels
            && profile.theme_progress == self.theme_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn result(exercise: &str, area: &str, theme: &str, correct: bool, score: u8) -> ExerciseResult {
        ExerciseResult {
            id: format!("r-{exercise}-{score}"),
            child_profile_id: "p1".into(),
            exercise_id: exercise.into(),
            area_id: area.into(),
            theme_id: theme.into(),
            level: 1,
            correct,
            score,
            attempts: if correct { 4 - u32::from(score).min(3) } else { 3 },
            time_spent_seconds: 30,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn empty_log_gives_empty_aggregates() {
        let aggregates =
            ProfileAggregates::from_results(&[], &HashMap::new(), &BTreeMap::new(), 10).unwrap();
        assert_eq!(aggregates, ProfileAggregates::default());
    }

    #[test]
    fn totals_levels_and_themes() {
        let results = vec![
            result("e1", "reading", "animals", true, 3),
            result("e1", "reading", "animals", true, 2),
            result("e2", "reading", "animals", false, 0),
            result("e3", "grammar", "verbs", true, 1),
        ];
        let totals = HashMap::from([("animals".to_string(), 2), ("verbs".to_string(), 5)]);
        let aggregates =
            ProfileAggregates::from_results(&results, &totals, &BTreeMap::new(), 5).unwrap();

        assert_eq!(aggregates.total_stars, 6);
        assert_eq!(aggregates.current_levels.get("reading"), Some(&2));
        assert_eq!(aggregates.current_levels.get("grammar"), Some(&1));

        let animals = &aggregates.theme_progress["animals"];
        assert_eq!(animals.exercises_completed, 1);
        assert_eq!(animals.exercises_total, 2);
        assert_eq!(animals.stars_earned, 3);

        let verbs = &aggregates.theme_progress["verbs"];
        assert_eq!(verbs.exercises_completed, 1);
        assert_eq!(verbs.exercises_total, 5);
    }

    #[test]
    fn unknown_theme_total_keeps_previous() {
        let results = vec![result("e1", "reading", "animals", true, 3)];
        let previous = BTreeMap::from([(
            "animals".to_string(),
            ThemeProgress {
                exercises_completed: 0,
                exercises_total: 8,
                stars_earned: 0,
            },
        )]);
        let aggregates =
            ProfileAggregates::from_results(&results, &HashMap::new(), &previous, 10).unwrap();
        assert_eq!(aggregates.theme_progress["animals"].exercises_total, 8);
    }

    #[test]
    fn apply_and_match() {
        let results = vec![result("e1", "reading", "animals", true, 3)];
        let aggregates =
            ProfileAggregates::from_results(&results, &HashMap::new(), &BTreeMap::new(), 10)
                .unwrap();
        let mut profile = UserProfile::new("p1".into(), "Mia".into(), "fox".into(), Utc::now());
        assert!(!aggregates.matches(&profile));
        aggregates.clone().apply_to(&mut profile);
        assert!(aggregates.matches(&profile));
        assert_eq!(profile.total_stars, 3);
    }
}
