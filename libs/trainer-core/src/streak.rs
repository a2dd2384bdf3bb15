//! Daily streak bookkeeping at day granularity.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// Streak values after recording activity on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// A previous streak was interrupted by a gap of two or more days.
    pub broken: bool,
}

/// Update a streak for activity on `today`.
///
/// - no previous activity: streak starts at 1
/// - same day (or an earlier `today`, e.g. clock skew): unchanged
/// - next day: streak + 1, longest raised if exceeded
/// - gap of two or more days: streak back to 1, longest kept
pub fn update_streak(
    current_streak: u32,
    longest_streak: u32,
    last_active: Option<NaiveDate>,
    today: NaiveDate,
) -> StreakUpdate {
    let Some(last) = last_active else {
        return StreakUpdate {
            current_streak: 1,
            longest_streak: longest_streak.max(1),
            broken: false,
        };
    };

    let gap = (today - last).num_days();
    match gap {
        g if g <= 0 => StreakUpdate {
            current_streak: current_streak.max(1),
            longest_streak: longest_streak.max(current_streak.max(1)),
            broken: false,
        },
        1 => {
            let current = current_streak + 1;
            StreakUpdate {
                current_streak: current,
                longest_streak: longest_streak.max(current),
                broken: false,
            }
        }
        _ => StreakUpdate {
            current_streak: 1,
            longest_streak: longest_streak.max(current_streak),
            broken: true,
        },
    }
}

/// The study day a timestamp belongs to.
///
/// Hours before `daily_reset_hour` count towards the previous day, so late
/// evening practice after midnight still extends yesterday's streak.
pub fn adjusted_day<Tz: TimeZone>(now: &DateTime<Tz>, daily_reset_hour: u32) -> NaiveDate {
    if now.hour() < daily_reset_hour {
        (now.clone() - Duration::days(1)).date_naive()
    } else {
        now.date_naive()
    }
}
