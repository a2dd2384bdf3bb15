//! Badge threshold table.

use crate::types::{EarnedBadge, ExerciseResult, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a badge requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "threshold", rename_all = "snake_case")]
pub enum BadgeRule {
    CompletedExercises(u32),
    TotalStars(u32),
    LongestStreak(u32),
    FirstTryResults(u32),
    CompletedThemes(u32),
}

/// A badge definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeDefinition {
    pub id: &'static str,
    pub rule: BadgeRule,
}

/// Every badge the trainer awards.
pub const BADGES: &[BadgeDefinition] = &[
    BadgeDefinition {
        id: "first_steps",
        rule: BadgeRule::CompletedExercises(1),
    },
    BadgeDefinition {
        id: "star_collector",
        rule: BadgeRule::TotalStars(25),
    },
    BadgeDefinition {
        id: "star_master",
        rule: BadgeRule::TotalStars(100),
    },
    BadgeDefinition {
        id: "streak_3",
        rule: BadgeRule::LongestStreak(3),
    },
    BadgeDefinition {
        id: "streak_7",
        rule: BadgeRule::LongestStreak(7),
    },
    BadgeDefinition {
        id: "perfectionist",
        rule: BadgeRule::FirstTryResults(10),
    },
    BadgeDefinition {
        id: "theme_champion",
        rule: BadgeRule::CompletedThemes(1),
    },
];

/// Counters a badge rule is checked against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BadgeProgress {
    pub completed_exercises: u32,
    pub total_stars: u32,
    pub longest_streak: u32,
    pub first_try_results: u32,
    pub completed_themes: u32,
}

impl BadgeProgress {
    /// Collect counters from a profile and its result log.
    pub fn collect(profile: &UserProfile, results: &[ExerciseResult]) -> Self {
        Self {
            completed_exercises: results.len() as u32,
            total_stars: profile.total_stars,
            longest_streak: profile.longest_streak,
            first_try_results: results
                .iter()
                .filter(|r| r.correct && r.attempts == 1)
                .count() as u32,
            completed_themes: profile
                .theme_progress
                .values()
                .filter(|t| t.is_complete())
                .count() as u32,
        }
    }
}

impl BadgeRule {
    pub fn is_met(&self, progress: &BadgeProgress) -> bool {
        match *self {
            Self::CompletedExercises(n) => progress.completed_exercises >= n,
            Self::TotalStars(n) => progress.total_stars >= n,
            Self::LongestStreak(n) => progress.longest_streak >= n,
            Self::FirstTryResults(n) => progress.first_try_results >= n,
            Self::CompletedThemes(n) => progress.completed_themes >= n,
        }
    }
}

/// Badges newly earned by a profile. Held badges are never returned again.
pub fn newly_earned(
    profile: &UserProfile,
    progress: &BadgeProgress,
    now: DateTime<Utc>,
) -> Vec<EarnedBadge> {
    BADGES
        .iter()
        .filter(|b| !profile.has_badge(b.id) && b.rule.is_met(progress))
        .map(|b| EarnedBadge {
            id: b.id.to_string(),
            earned_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile::new("p1".into(), "Mia".into(), "fox".into(), Utc::now())
    }

    #[test]
    fn nothing_earned_without_progress() {
        let earned = newly_earned(&profile(), &BadgeProgress::default(), Utc::now());
        assert!(earned.is_empty());
    }

    #[test]
    fn first_result_earns_first_steps() {
        let progress = BadgeProgress {
            completed_exercises: 1,
            ..Default::default()
        };
        let earned = newly_earned(&profile(), &progress, Utc::now());
        let ids: Vec<_> = earned.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["first_steps"]);
    }

    #[test]
    fn held_badges_not_repeated() {
        let mut p = profile();
        p.badges.push(EarnedBadge {
            id: "first_steps".into(),
            earned_at: Utc::now(),
        });
        let progress = BadgeProgress {
            completed_exercises: 5,
            longest_streak: 3,
            ..Default::default()
        };
        let earned = newly_earned(&p, &progress, Utc::now());
        let ids: Vec<_> = earned.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["streak_3"]);
    }

    #[test]
    fn star_thresholds() {
        let progress = BadgeProgress {
            total_stars: 100,
            ..Default::default()
        };
        let earned = newly_earned(&profile(), &progress, Utc::now());
        let ids: Vec<_> = earned.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["star_collector", "star_master"]);
    }
}
