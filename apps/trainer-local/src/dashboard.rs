//! Dashboard statistics over the result log.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use trainer_core::streak::adjusted_day;
use trainer_core::{ExerciseResult, UserProfile};

/// Exercises need at least this many results to appear as "hardest".
pub const HARDEST_MIN_SAMPLES: usize = 3;

/// Number of hardest exercises reported.
pub const HARDEST_LIMIT: usize = 5;

/// Longest daily activity series; longer requests are clamped.
pub const MAX_ACTIVITY_DAYS: u32 = 366;

/// Which results the dashboard covers.
#[derive(Debug, Clone)]
pub struct DashboardFilter {
    pub profile_id: Option<String>,
    pub area_id: Option<String>,
    pub theme_id: Option<String>,
    /// Length of the daily activity series, ending today.
    pub activity_days: u32,
    pub daily_reset_hour: u32,
}

impl Default for DashboardFilter {
    fn default() -> Self {
        Self {
            profile_id: None,
            area_id: None,
            theme_id: None,
            activity_days: 30,
            daily_reset_hour: 0,
        }
    }
}

impl DashboardFilter {
    fn matches(&self, result: &ExerciseResult) -> bool {
        self.profile_id
            .as_deref()
            .map_or(true, |id| result.child_profile_id == id)
            && self.area_id.as_deref().map_or(true, |id| result.area_id == id)
            && self.theme_id.as_deref().map_or(true, |id| result.theme_id == id)
    }
}

/// Totals over all matching results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub results: usize,
    pub correct: usize,
    pub correct_rate: f64,
    pub average_attempts: f64,
    pub total_time_seconds: u64,
    pub stars: u32,
}

/// Per-child summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildSummary {
    pub profile_id: String,
    pub nickname: String,
    pub total_stars: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub badges: usize,
    pub last_active_date: Option<NaiveDate>,
    pub totals: Totals,
}

/// Totals for one group (area, theme or level).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub key: String,
    pub totals: Totals,
}

/// An exercise with its success rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDifficulty {
    pub exercise_id: String,
    pub results: usize,
    pub correct_rate: f64,
    pub average_attempts: f64,
}

/// Results on one study day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub results: usize,
    pub correct: usize,
    pub time_spent_seconds: u64,
}

/// Everything the classroom dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub totals: Totals,
    pub children: Vec<ChildSummary>,
    pub by_area: Vec<Breakdown>,
    pub by_theme: Vec<Breakdown>,
    pub by_level: Vec<Breakdown>,
    pub hardest_exercises: Vec<ExerciseDifficulty>,
    /// Oldest day first, ending at `today`.
    pub activity: Vec<DailyActivity>,
}

impl DashboardStats {
    pub fn compute(
        results: &[ExerciseResult],
        profiles: &[UserProfile],
        filter: &DashboardFilter,
        today: NaiveDate,
    ) -> Self {
        let matching: Vec<&ExerciseResult> = results.iter().filter(|r| filter.matches(r)).collect();

        let children = profiles
            .iter()
            .filter(|p| filter.profile_id.as_deref().map_or(true, |id| p.id == id))
            .map(|p| {
                let own: Vec<&ExerciseResult> = matching
                    .iter()
                    .copied()
                    .filter(|r| r.child_profile_id == p.id)
                    .collect();
                ChildSummary {
                    profile_id: p.id.clone(),
                    nickname: p.nickname.clone(),
                    total_stars: p.total_stars,
                    current_streak: p.current_streak,
                    longest_streak: p.longest_streak,
                    badges: p.badges.len(),
                    last_active_date: p.last_active_date,
                    totals: totals(&own),
                }
            })
            .collect();

        Self {
            totals: totals(&matching),
            children,
            by_area: breakdown(&matching, |r| r.area_id.clone()),
            by_theme: breakdown(&matching, |r| r.theme_id.clone()),
            by_level: breakdown(&matching, |r| r.level),
            hardest_exercises: hardest(&matching),
            activity: activity(&matching, filter, today),
        }
    }
}

fn totals(results: &[&ExerciseResult]) -> Totals {
    if results.is_empty() {
        return Totals::default();
    }
    let count = results.len();
    let correct = results.iter().filter(|r| r.correct).count();
    let attempts: u64 = results.iter().map(|r| u64::from(r.attempts)).sum();
    Totals {
        results: count,
        correct,
        correct_rate: correct as f64 / count as f64,
        average_attempts: attempts as f64 / count as f64,
        total_time_seconds: results.iter().map(|r| u64::from(r.time_spent_seconds)).sum(),
        stars: results.iter().map(|r| u32::from(r.score)).sum(),
    }
}

/// Groups in key order.
fn breakdown<K, F>(results: &[&ExerciseResult], key: F) -> Vec<Breakdown>
where
    K: Ord + ToString,
    F: Fn(&ExerciseResult) -> K,
{
    let mut groups: BTreeMap<K, Vec<&ExerciseResult>> = BTreeMap::new();
    for r in results {
        groups.entry(key(*r)).or_default().push(*r);
    }
    groups
        .into_iter()
        .map(|(key, group)| Breakdown {
            key: key.to_string(),
            totals: totals(&group),
        })
        .collect()
}

/// Lowest correct rate first; ties go to more attempts, then id.
fn hardest(results: &[&ExerciseResult]) -> Vec<ExerciseDifficulty> {
    let mut by_exercise: BTreeMap<&str, Vec<&ExerciseResult>> = BTreeMap::new();
    for r in results {
        by_exercise.entry(r.exercise_id.as_str()).or_default().push(*r);
    }

    let mut ranked: Vec<ExerciseDifficulty> = by_exercise
        .into_iter()
        .filter(|(_, group)| group.len() >= HARDEST_MIN_SAMPLES)
        .map(|(id, group)| {
            let t = totals(&group);
            ExerciseDifficulty {
                exercise_id: id.to_string(),
                results: t.results,
                correct_rate: t.correct_rate,
                average_attempts: t.average_attempts,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.correct_rate
            .total_cmp(&b.correct_rate)
            .then(b.average_attempts.total_cmp(&a.average_attempts))
            .then_with(|| a.exercise_id.cmp(&b.exercise_id))
    });
    ranked.truncate(HARDEST_LIMIT);
    ranked
}

fn activity(
    results: &[&ExerciseResult],
    filter: &DashboardFilter,
    today: NaiveDate,
) -> Vec<DailyActivity> {
    let days = filter.activity_days.clamp(1, MAX_ACTIVITY_DAYS) as usize;
    // walk back from today; stops early at the start of the calendar
    let mut dates: Vec<NaiveDate> = std::iter::successors(Some(today), |d| d.pred_opt())
        .take(days)
        .collect();
    dates.reverse();

    let mut buckets: BTreeMap<NaiveDate, DailyActivity> = dates
        .into_iter()
        .map(|date| {
            (
                date,
                DailyActivity {
                    date,
                    results: 0,
                    correct: 0,
                    time_spent_seconds: 0,
                },
            )
        })
        .collect();

    for r in results {
        let day = adjusted_day(&r.completed_at, filter.daily_reset_hour);
        if let Some(bucket) = buckets.get_mut(&day) {
            bucket.results += 1;
            bucket.correct += usize::from(r.correct);
            bucket.time_spent_seconds += u64::from(r.time_spent_seconds);
        }
    }

    buckets.into_values().collect()
}
