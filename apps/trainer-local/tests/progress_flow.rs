//! End-to-end completion flow: session, result log, profile aggregates.

mod common;

use common::fixtures::{completed, day};
use common::TestContext;
use pretty_assertions::assert_eq;

use trainer_core::{Answer, ExerciseSession, Phase, ProfileAggregates};
use trainer_local::context::Cue;
use trainer_local::progress::{record_completion, recompute_profile, CompletedExercise};
use trainer_local::repository::{ProfileRepository, ResultRepository};

#[test]
fn session_with_number_word_follow_up_is_recorded() {
    let t = TestContext::new();
    let profile = t.create_profile("Mia");
    let exercise = t.catalog.get("animals-2").unwrap();

    let mut session = ExerciseSession::new(exercise, t.ctx.settings().max_attempts);
    session.submit_answer(&Answer::Text("8".into()));
    assert!(matches!(session.phase(), Phase::AwaitingNumberWord { .. }));
    session.submit_answer(&Answer::Text("Acht".into()));
    assert_eq!(session.attempts(), 0);
    session.submit_answer(&Answer::Text("acht".into()));
    assert_eq!(session.phase(), &Phase::Solved);

    let completion = CompletedExercise::from_session(&session, 42).unwrap();
    let summary = record_completion(&t.ctx, &profile.id, completion, day(1, 9)).unwrap();

    assert_eq!(summary.result.attempts, 1);
    assert_eq!(summary.result.score, 3);
    assert_eq!(summary.result.time_spent_seconds, 42);
    assert_eq!(summary.result.theme_id, "animals");

    let stored = t.repo().get_profile(&profile.id).unwrap();
    let animals = &stored.theme_progress["animals"];
    assert_eq!(animals.exercises_completed, 1);
    assert_eq!(animals.exercises_total, 2);
    assert_eq!(animals.stars_earned, 3);
}

#[test]
fn unfinished_session_cannot_be_recorded() {
    let t = TestContext::new();
    let exercise = t.catalog.get("animals-1").unwrap();
    let session = ExerciseSession::new(exercise, 3);
    assert!(CompletedExercise::from_session(&session, 5).is_err());
}

#[test]
fn completing_a_theme_earns_theme_champion() {
    let t = TestContext::new();
    let profile = t.create_profile("Mia");

    record_completion(&t.ctx, &profile.id, completed(&t.catalog, "animals-1", true, 1), day(1, 9))
        .unwrap();
    let summary = record_completion(
        &t.ctx,
        &profile.id,
        completed(&t.catalog, "animals-2", true, 2),
        day(1, 10),
    )
    .unwrap();

    let badges: Vec<_> = summary.new_badges.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(badges, vec!["theme_champion"]);
    assert!(t.cues.take().contains(&Cue::BadgeEarned {
        badge_id: "theme_champion".into()
    }));

    // repeating an exercise never duplicates a badge
    let again = record_completion(
        &t.ctx,
        &profile.id,
        completed(&t.catalog, "animals-1", true, 1),
        day(1, 11),
    )
    .unwrap();
    assert!(again.new_badges.is_empty());
    let stored = t.repo().get_profile(&profile.id).unwrap();
    assert_eq!(stored.badges.len(), 2);
}

#[test]
fn cached_aggregates_always_match_the_log() {
    let t = TestContext::new();
    let profile = t.create_profile("Mia");
    let plan = [
        ("animals-1", false, 3),
        ("animals-1", true, 2),
        ("numbers-1", true, 1),
        ("animals-2", true, 3),
        ("animals-1", true, 1),
    ];

    for (i, (exercise, correct, attempts)) in plan.into_iter().enumerate() {
        record_completion(
            &t.ctx,
            &profile.id,
            completed(&t.catalog, exercise, correct, attempts),
            day(1 + i as u32, 9),
        )
        .unwrap();

        let stored = t.repo().get_profile(&profile.id).unwrap();
        let results = t.repo().results_for_profile(&profile.id);
        let fresh = ProfileAggregates::from_results(
            &results,
            t.ctx.theme_totals(),
            &stored.theme_progress,
            t.ctx.settings().stars_per_level,
        )
        .unwrap();
        assert!(fresh.matches(&stored), "stale cache after step {i}");
    }

    let stored = t.repo().get_profile(&profile.id).unwrap();
    // scores 0, 2, 3, 1, 3
    assert_eq!(stored.total_stars, 9);
    assert_eq!(stored.current_streak, 5);
    assert_eq!(stored.longest_streak, 5);
    // best score per exercise: animals-1 -> 3, animals-2 -> 1
    assert_eq!(stored.theme_progress["animals"].stars_earned, 4);
    assert_eq!(stored.theme_progress["numbers"].exercises_completed, 1);
}

#[test]
fn recompute_after_lost_profile_write() {
    let t = TestContext::new();
    let profile = t.create_profile("Mia");
    let snapshot = t.repo().get_profile(&profile.id).unwrap();

    record_completion(&t.ctx, &profile.id, completed(&t.catalog, "numbers-1", true, 1), day(2, 9))
        .unwrap();
    // simulate a crash before the profile save landed
    t.repo().save_profile(&snapshot);

    let repaired = recompute_profile(&t.ctx, &profile.id).unwrap();
    assert_eq!(repaired.total_stars, 3);
    assert_eq!(repaired.current_levels.get("math"), Some(&1));
    assert_eq!(t.repo().all_results().len(), 1);
}
