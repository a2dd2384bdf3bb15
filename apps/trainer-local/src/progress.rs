//! Completion pipeline: result log, profile aggregates, streak and badges.

use crate::context::{AppContext, Cue};
use crate::repository::{ProfileRepository, ResultRepository};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use trainer_core::badges::{newly_earned, BadgeProgress};
use trainer_core::scoring::result_score;
use trainer_core::streak::adjusted_day;
use trainer_core::{
    update_streak, EarnedBadge, ExerciseResult, ExerciseSession, ProfileAggregates, ScoringError,
    StreakUpdate, UserProfile,
};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    #[error("session is not finished")]
    SessionNotFinished,

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

pub type Result<T> = std::result::Result<T, ProgressError>;

/// A finished exercise, ready to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedExercise {
    pub exercise_id: String,
    pub area_id: String,
    pub theme_id: String,
    pub level: u32,
    pub correct: bool,
    pub attempts: u32,
    pub time_spent_seconds: u32,
}

impl CompletedExercise {
    /// Build from a session in a terminal phase.
    pub fn from_session(session: &ExerciseSession<'_>, time_spent_seconds: u32) -> Result<Self> {
        let outcome = session.outcome()?.ok_or(ProgressError::SessionNotFinished)?;
        let exercise = session.exercise();
        Ok(Self {
            exercise_id: exercise.id.clone(),
            area_id: exercise.area_id.clone(),
            theme_id: exercise.theme_id.clone(),
            level: exercise.level,
            correct: outcome.correct,
            attempts: outcome.attempts,
            time_spent_seconds,
        })
    }
}

/// A level reached in an area by this completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUp {
    pub area_id: String,
    pub level: u32,
}

/// What a completion changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSummary {
    pub result: ExerciseResult,
    pub total_stars: u32,
    pub streak: StreakUpdate,
    pub level_ups: Vec<LevelUp>,
    pub new_badges: Vec<EarnedBadge>,
}

/// Record a completed exercise for a profile.
///
/// The result is appended first. If a later step fails the cached profile
/// aggregates are stale until the next [`recompute_profile`].
pub fn record_completion(
    ctx: &AppContext,
    profile_id: &str,
    completion: CompletedExercise,
    now: DateTime<Utc>,
) -> Result<CompletionSummary> {
    let repo = ctx.repository();
    let mut profile = repo
        .get_profile(profile_id)
        .ok_or_else(|| ProgressError::ProfileNotFound(profile_id.to_string()))?;

    let score = result_score(completion.correct, completion.attempts)?;
    let result = ExerciseResult {
        id: Uuid::new_v4().to_string(),
        child_profile_id: profile.id.clone(),
        exercise_id: completion.exercise_id,
        area_id: completion.area_id,
        theme_id: completion.theme_id,
        level: completion.level,
        correct: completion.correct,
        score,
        attempts: completion.attempts,
        time_spent_seconds: completion.time_spent_seconds,
        completed_at: now,
    };
    repo.append_result(&result);

    let mut results = repo.results_for_profile(&profile.id);
    if !results.iter().any(|r| r.id == result.id) {
        // storage dropped the write; count it for this summary anyway
        results.push(result.clone());
    }

    let previous_levels = profile.current_levels.clone();
    recompute_aggregates(ctx, &mut profile, &results)?;

    let today = adjusted_day(&now, ctx.settings().daily_reset_hour);
    let streak = update_streak(
        profile.current_streak,
        profile.longest_streak,
        profile.last_active_date,
        today,
    );
    let streak_extended = streak.current_streak > profile.current_streak;
    profile.current_streak = streak.current_streak;
    profile.longest_streak = streak.longest_streak;
    profile.last_active_date = Some(today);

    let progress = BadgeProgress::collect(&profile, &results);
    let new_badges = newly_earned(&profile, &progress, now);
    profile.badges.extend(new_badges.iter().cloned());

    let level_ups: Vec<LevelUp> = profile
        .current_levels
        .iter()
        .filter(|(area, level)| **level > previous_levels.get(*area).copied().unwrap_or(1))
        .map(|(area, level)| LevelUp {
            area_id: area.clone(),
            level: *level,
        })
        .collect();

    repo.save_profile(&profile);
    tracing::info!(
        profile_id = %profile.id,
        exercise_id = %result.exercise_id,
        correct = result.correct,
        score = result.score,
        "recorded exercise completion"
    );

    ctx.emit(Cue::ExerciseComplete {
        correct: result.correct,
        stars: result.score,
    });
    if streak_extended && streak.current_streak > 1 {
        ctx.emit(Cue::StreakExtended {
            days: streak.current_streak,
        });
    }
    for level_up in &level_ups {
        ctx.emit(Cue::LevelUp {
            area_id: level_up.area_id.clone(),
            level: level_up.level,
        });
    }
    for badge in &new_badges {
        ctx.emit(Cue::BadgeEarned {
            badge_id: badge.id.clone(),
        });
    }

    Ok(CompletionSummary {
        result,
        total_stars: profile.total_stars,
        streak,
        level_ups,
        new_badges,
    })
}

/// Replace a profile's cached aggregates with values derived from `results`.
/// Returns whether anything changed.
pub fn recompute_aggregates(
    ctx: &AppContext,
    profile: &mut UserProfile,
    results: &[ExerciseResult],
) -> std::result::Result<bool, ScoringError> {
    let aggregates = ProfileAggregates::from_results(
        results,
        ctx.theme_totals(),
        &profile.theme_progress,
        ctx.settings().stars_per_level,
    )?;
    if aggregates.matches(profile) {
        return Ok(false);
    }
    aggregates.apply_to(profile);
    Ok(true)
}

/// Load a profile, repair its cached aggregates from the log and save it if
/// they were stale.
pub fn recompute_profile(ctx: &AppContext, profile_id: &str) -> Result<UserProfile> {
    let repo = ctx.repository();
    let mut profile = repo
        .get_profile(profile_id)
        .ok_or_else(|| ProgressError::ProfileNotFound(profile_id.to_string()))?;
    let results = repo.results_for_profile(profile_id);
    if recompute_aggregates(ctx, &mut profile, &results)? {
        tracing::info!(profile_id, "repaired stale profile aggregates");
        repo.save_profile(&profile);
    }
    Ok(profile)
}
