//! Randomization helpers for presenting exercises.
//!
//! All helpers take the RNG as a parameter so callers can seed it.

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle answer options, returning the new position of the correct one.
///
/// `None` when `correct_index` does not point into `options`.
pub fn shuffle_options<R: Rng + ?Sized>(
    options: &[String],
    correct_index: usize,
    rng: &mut R,
) -> Option<(Vec<String>, usize)> {
    if correct_index >= options.len() {
        return None;
    }
    let mut order: Vec<usize> = (0..options.len()).collect();
    order.shuffle(rng);

    let shuffled = order.iter().map(|&i| options[i].clone()).collect();
    let new_index = order.iter().position(|&i| i == correct_index)?;
    Some((shuffled, new_index))
}

/// Scramble words for a word-order exercise.
///
/// When another arrangement exists, the result never equals the input order,
/// so the exercise never starts out already solved.
pub fn scramble_words<R: Rng + ?Sized>(words: &[String], rng: &mut R) -> Vec<String> {
    let mut scrambled = words.to_vec();
    let has_alternative = words.windows(2).any(|w| w[0] != w[1]);
    if !has_alternative {
        return scrambled;
    }
    scrambled.shuffle(rng);
    if scrambled == words {
        // a rotation of a sequence with two distinct words differs from it
        scrambled.rotate_left(1);
    }
    scrambled
}

/// Pick up to `count` distinct items without replacement.
pub fn pick_exercises<'a, T, R: Rng + ?Sized>(pool: &'a [T], count: usize, rng: &mut R) -> Vec<&'a T> {
    pool.choose_multiple(rng, count).collect()
}

/// Shuffled right-hand column for a matching exercise.
pub fn shuffled_pairs_right_side<R: Rng + ?Sized>(rights: &[String], rng: &mut R) -> Vec<String> {
    scramble_words(rights, rng)
}
