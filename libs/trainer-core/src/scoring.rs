//! Star ratings and the two leveling schemes.
//!
//! The generic level (stars / stars-per-level) drives level display. The
//! vocabulary level uses a fixed threshold table and gates theme unlocking.
//! They are separate on purpose and must not be merged.

use crate::error::ScoringError;

/// Stars needed for vocabulary levels 2, 3 and 4.
pub const VOCABULARY_THRESHOLDS: [u32; 3] = [4, 12, 20];

/// Star rating for a solved exercise.
///
/// One attempt earns 3 stars, two earn 2, anything more earns 1.
/// Non-positive attempt counts are rejected.
pub fn stars(attempts: i64) -> Result<u8, ScoringError> {
    match attempts {
        a if a <= 0 => Err(ScoringError::InvalidAttempts(a)),
        1 => Ok(3),
        2 => Ok(2),
        _ => Ok(1),
    }
}

/// Score stored on a result: the star rating when solved, 0 when revealed.
pub fn result_score(correct: bool, attempts: u32) -> Result<u8, ScoringError> {
    let rating = stars(i64::from(attempts))?;
    Ok(if correct { rating } else { 0 })
}

/// Generic level for a star total. Levels start at 1.
pub fn calculate_level(total_stars: u32, stars_per_level: u32) -> Result<u32, ScoringError> {
    if stars_per_level == 0 {
        return Err(ScoringError::InvalidStarsPerLevel);
    }
    Ok(total_stars / stars_per_level + 1)
}

/// Stars still missing until the next generic level.
pub fn stars_to_next_level(total_stars: u32, stars_per_level: u32) -> Result<u32, ScoringError> {
    if stars_per_level == 0 {
        return Err(ScoringError::InvalidStarsPerLevel);
    }
    Ok(stars_per_level - total_stars % stars_per_level)
}

/// Vocabulary level from the fixed 4/12/20 table (levels 1 to 4).
pub fn vocabulary_level(stars: u32) -> u32 {
    1 + VOCABULARY_THRESHOLDS
        .iter()
        .filter(|&&threshold| stars >= threshold)
        .count() as u32
}

/// Whether a theme requiring `required_level` is unlocked for `stars`.
pub fn is_theme_unlocked(required_level: u32, stars: u32) -> bool {
    vocabulary_level(stars) >= required_level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_by_attempts() {
        assert_eq!(stars(1), Ok(3));
        assert_eq!(stars(2), Ok(2));
        assert_eq!(stars(3), Ok(1));
        assert_eq!(stars(10), Ok(1));
    }

    #[test]
    fn stars_rejects_non_positive_attempts() {
        assert_eq!(stars(0), Err(ScoringError::InvalidAttempts(0)));
        assert_eq!(stars(-1), Err(ScoringError::InvalidAttempts(-1)));
    }

    #[test]
    fn revealed_results_score_zero() {
        assert_eq!(result_score(true, 1), Ok(3));
        assert_eq!(result_score(false, 3), Ok(0));
        assert!(result_score(false, 0).is_err());
    }

    #[test]
    fn generic_level() {
        assert_eq!(calculate_level(0, 10), Ok(1));
        assert_eq!(calculate_level(9, 10), Ok(1));
        assert_eq!(calculate_level(10, 10), Ok(2));
        assert_eq!(calculate_level(35, 10), Ok(4));
        assert_eq!(calculate_level(5, 0), Err(ScoringError::InvalidStarsPerLevel));
    }

    #[test]
    fn next_level_distance() {
        assert_eq!(stars_to_next_level(0, 10), Ok(10));
        assert_eq!(stars_to_next_level(13, 10), Ok(7));
    }

    #[test]
    fn vocabulary_thresholds() {
        assert_eq!(vocabulary_level(0), 1);
        assert_eq!(vocabulary_level(3), 1);
        assert_eq!(vocabulary_level(4), 2);
        assert_eq!(vocabulary_level(11), 2);
        assert_eq!(vocabulary_level(12), 3);
        assert_eq!(vocabulary_level(20), 4);
        assert_eq!(vocabulary_level(500), 4);
    }

    #[test]
    fn schemes_stay_distinct() {
        // 12 stars: generic level 2, vocabulary level 3
        assert_eq!(calculate_level(12, 10), Ok(2));
        assert_eq!(vocabulary_level(12), 3);
    }

    #[test]
    fn theme_unlocking() {
        assert!(is_theme_unlocked(1, 0));
        assert!(!is_theme_unlocked(2, 3));
        assert!(is_theme_unlocked(2, 4));
        assert!(is_theme_unlocked(4, 20));
    }
}
